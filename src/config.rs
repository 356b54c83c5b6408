use std::env;
use std::str::FromStr;

use crate::fixtures::DEFAULT_FIXTURE_COUNT;
use crate::predict::{PredictConfig, PredictModel};
use crate::team_gen::DEFAULT_SEED_COUNT;

const DEFAULT_STANDINGS_ROWS: usize = 14;

/// Runtime settings, read from `SQUADCRAFT_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub seed: Option<u64>,
    pub teams: usize,
    pub fixtures: usize,
    pub standings_rows: usize,
    pub prediction_model: PredictModel,
    pub home_advantage: Option<f64>,
    pub noise_width: Option<f64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            teams: DEFAULT_SEED_COUNT,
            fixtures: DEFAULT_FIXTURE_COUNT,
            standings_rows: DEFAULT_STANDINGS_ROWS,
            prediction_model: PredictModel::FormAware,
            home_advantage: None,
            noise_width: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            seed: parse_opt(&lookup, "SQUADCRAFT_SEED"),
            teams: parse_opt(&lookup, "SQUADCRAFT_TEAMS")
                .unwrap_or(defaults.teams)
                .clamp(1, 64),
            fixtures: parse_opt(&lookup, "SQUADCRAFT_FIXTURES")
                .unwrap_or(defaults.fixtures)
                .clamp(1, 100),
            standings_rows: parse_opt(&lookup, "SQUADCRAFT_STANDINGS")
                .unwrap_or(defaults.standings_rows)
                .clamp(2, 64),
            prediction_model: lookup("SQUADCRAFT_MODEL")
                .and_then(|raw| parse_model(&raw))
                .unwrap_or(defaults.prediction_model),
            home_advantage: parse_opt::<f64>(&lookup, "SQUADCRAFT_HOME_ADV")
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 0.2)),
            noise_width: parse_opt::<f64>(&lookup, "SQUADCRAFT_NOISE")
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 0.3)),
        }
    }

    /// Prediction constants for the given model with any overrides applied.
    pub fn predict_config(&self, model: PredictModel) -> PredictConfig {
        let mut cfg = PredictConfig::for_model(model);
        if let Some(home) = self.home_advantage {
            cfg.home_advantage = home;
        }
        if let Some(noise) = self.noise_width {
            cfg.noise_width = noise;
        }
        cfg
    }
}

fn parse_opt<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|val| val.trim().parse::<T>().ok())
}

fn parse_model(raw: &str) -> Option<PredictModel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "basic" => Some(PredictModel::Basic),
        "form" | "form_aware" | "form-aware" => Some(PredictModel::FormAware),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn values_are_parsed_and_clamped() {
        let cfg = config_from(&[
            ("SQUADCRAFT_SEED", " 42 "),
            ("SQUADCRAFT_TEAMS", "500"),
            ("SQUADCRAFT_FIXTURES", "0"),
            ("SQUADCRAFT_MODEL", "Basic"),
            ("SQUADCRAFT_HOME_ADV", "0.9"),
            ("SQUADCRAFT_NOISE", "nope"),
        ]);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.teams, 64);
        assert_eq!(cfg.fixtures, 1);
        assert_eq!(cfg.prediction_model, PredictModel::Basic);
        assert_eq!(cfg.home_advantage, Some(0.2));
        assert_eq!(cfg.noise_width, None);
    }

    #[test]
    fn overrides_reach_the_predict_config() {
        let cfg = config_from(&[("SQUADCRAFT_NOISE", "0")]);
        let predict = cfg.predict_config(PredictModel::FormAware);
        assert_eq!(predict.model, PredictModel::FormAware);
        assert_eq!(predict.noise_width, 0.0);
        assert_eq!(predict.home_advantage, crate::predict::HOME_ADVANTAGE);
    }
}
