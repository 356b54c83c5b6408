use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::team::{Form, Outcome, Team};

pub const DEFAULT_POWER: f64 = 50.0;
pub const LOGISTIC_SCALE: f64 = 8.0;
pub const NOISE_WIDTH: f64 = 0.06;
pub const FORM_NOISE_WIDTH: f64 = 0.04;
pub const HOME_ADVANTAGE: f64 = 0.02;
pub const DRAW_RESERVE: f64 = 0.08;

const PA_BOUNDS: (f64, f64) = (0.05, 0.93);
const PB_BOUNDS: (f64, f64) = (0.05, 0.85);
const PD_BOUNDS: (f64, f64) = (0.05, 0.30);
const FALLBACK_PA: f64 = 0.33;
const FALLBACK_PB: f64 = 0.33;
const FALLBACK_PD: f64 = 0.34;

const CONFIDENCE_FLOOR: f64 = 0.55;
const CONFIDENCE_SLOPE: f64 = 0.8;
const CONFIDENCE_CAP: f64 = 0.95;

// Weights of the form-aware strength difference, in power points.
const FORM_WEIGHT: f64 = 10.0;
const FORM_SCALE: f64 = 15.0;
const ATTACK_WEIGHT: f64 = 5.0;
const DEFENSE_WEIGHT: f64 = 5.0;
const GOALS_SCALE: f64 = 30.0;

const ODDS_MIN_PROB: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictModel {
    /// Power difference only.
    Basic,
    /// Power plus recent form, goals scored and goals conceded.
    FormAware,
}

/// Tunable constants of the prediction heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictConfig {
    pub model: PredictModel,
    pub logistic_scale: f64,
    pub noise_width: f64,
    pub home_advantage: f64,
    pub draw_reserve: f64,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            model: PredictModel::Basic,
            logistic_scale: LOGISTIC_SCALE,
            noise_width: NOISE_WIDTH,
            home_advantage: HOME_ADVANTAGE,
            draw_reserve: DRAW_RESERVE,
        }
    }
}

impl PredictConfig {
    pub fn form_aware() -> Self {
        Self {
            model: PredictModel::FormAware,
            noise_width: FORM_NOISE_WIDTH,
            ..Self::default()
        }
    }

    pub fn for_model(model: PredictModel) -> Self {
        match model {
            PredictModel::Basic => Self::default(),
            PredictModel::FormAware => Self::form_aware(),
        }
    }

    pub fn without_noise(self) -> Self {
        Self {
            noise_width: 0.0,
            ..self
        }
    }
}

/// The side a prediction favors, or the drawn result of a simulated match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pick {
    A,
    D,
    B,
}

impl Pick {
    pub fn outcome_for_a(self) -> Outcome {
        match self {
            Pick::A => Outcome::Win,
            Pick::D => Outcome::Draw,
            Pick::B => Outcome::Loss,
        }
    }

    pub fn outcome_for_b(self) -> Outcome {
        self.outcome_for_a().reversed()
    }

    pub fn label(self) -> &'static str {
        match self {
            Pick::A => "A",
            Pick::D => "Draw",
            Pick::B => "B",
        }
    }
}

/// What the model reads from one side. Absent fields fall back to neutral defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideRating {
    pub power: Option<f64>,
    pub form: Option<Form>,
    pub scored: Option<u32>,
    pub conceded: Option<u32>,
}

impl SideRating {
    pub fn with_power(power: f64) -> Self {
        Self {
            power: Some(power),
            ..Self::default()
        }
    }

    pub fn power_or_default(&self) -> f64 {
        self.power
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_POWER)
    }

    fn form_points(&self) -> f64 {
        self.form.map(|f| f.points() as f64).unwrap_or(0.0)
    }

    fn scored_or_zero(&self) -> f64 {
        self.scored.unwrap_or(0) as f64
    }

    fn conceded_or_zero(&self) -> f64 {
        self.conceded.unwrap_or(0) as f64
    }
}

impl From<&Team> for SideRating {
    fn from(team: &Team) -> Self {
        Self {
            power: Some(team.power as f64),
            form: Some(team.form),
            scored: Some(team.scored),
            conceded: Some(team.conceded),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub pa: f64,
    pub pd: f64,
    pub pb: f64,
    pub pick: Pick,
    pub confidence: f64,
    pub exp_a: u32,
    pub exp_b: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedOdds {
    pub a: f64,
    pub d: f64,
    pub b: f64,
}

impl Prediction {
    pub fn probability(&self, side: Pick) -> f64 {
        match side {
            Pick::A => self.pa,
            Pick::D => self.pd,
            Pick::B => self.pb,
        }
    }

    /// Decimal odds, with each probability floored at 1%.
    pub fn implied_odds(&self) -> ImpliedOdds {
        ImpliedOdds {
            a: 1.0 / self.pa.max(ODDS_MIN_PROB),
            d: 1.0 / self.pd.max(ODDS_MIN_PROB),
            b: 1.0 / self.pb.max(ODDS_MIN_PROB),
        }
    }

    /// Maps a uniform draw in [0, 1) onto the cumulative A, D, B distribution.
    pub fn outcome_for_draw(&self, u: f64) -> Pick {
        if u < self.pa {
            Pick::A
        } else if u < self.pa + self.pd {
            Pick::D
        } else {
            Pick::B
        }
    }

    pub fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> Pick {
        self.outcome_for_draw(rng.r#gen::<f64>())
    }
}

pub fn predict<R: Rng + ?Sized>(
    a: &SideRating,
    b: &SideRating,
    cfg: &PredictConfig,
    rng: &mut R,
) -> Prediction {
    let diff = strength_diff(a, b, cfg.model);
    let base = logistic(diff / cfg.logistic_scale);
    let noise = (rng.r#gen::<f64>() - 0.5) * cfg.noise_width;
    let (pa, pd, pb) = split_probabilities(base + noise + cfg.home_advantage, cfg.draw_reserve);

    Prediction {
        pa,
        pd,
        pb,
        pick: pick_side(pa, pd, pb),
        confidence: confidence(pa, pd, pb),
        exp_a: expected_score(a, cfg.model, rng),
        exp_b: expected_score(b, cfg.model, rng),
    }
}

pub fn predict_teams<R: Rng + ?Sized>(
    a: &Team,
    b: &Team,
    cfg: &PredictConfig,
    rng: &mut R,
) -> Prediction {
    predict(&SideRating::from(a), &SideRating::from(b), cfg, rng)
}

/// Turns a raw side-A probability into a normalized (pa, pd, pb) triple.
pub fn split_probabilities(pa_raw: f64, draw_reserve: f64) -> (f64, f64, f64) {
    let pa = clamp(pa_raw, PA_BOUNDS.0, PA_BOUNDS.1);
    let pb = clamp(1.0 - pa - draw_reserve, PB_BOUNDS.0, PB_BOUNDS.1);
    let pd = clamp(1.0 - pa - pb, PD_BOUNDS.0, PD_BOUNDS.1);

    let sum = pa + pb + pd;
    if !sum.is_finite() || sum <= 0.0 {
        return (FALLBACK_PA, FALLBACK_PD, FALLBACK_PB);
    }
    (pa / sum, pd / sum, pb / sum)
}

/// Highest probability wins; ties go to A, then B, then the draw.
pub fn pick_side(pa: f64, pd: f64, pb: f64) -> Pick {
    if pa >= pb && pa >= pd {
        Pick::A
    } else if pb >= pd {
        Pick::B
    } else {
        Pick::D
    }
}

pub fn confidence(pa: f64, pd: f64, pb: f64) -> f64 {
    let spread = (pa - pb).abs().max((pa - pd).abs()).max((pb - pd).abs());
    clamp(
        CONFIDENCE_FLOOR + CONFIDENCE_SLOPE * spread,
        CONFIDENCE_FLOOR,
        CONFIDENCE_CAP,
    )
}

fn strength_diff(a: &SideRating, b: &SideRating, model: PredictModel) -> f64 {
    let power_diff = a.power_or_default() - b.power_or_default();
    match model {
        PredictModel::Basic => power_diff,
        PredictModel::FormAware => {
            let form_diff = (a.form_points() - b.form_points()) / FORM_SCALE;
            let attack_diff = (a.scored_or_zero() - b.scored_or_zero()) / GOALS_SCALE;
            let defense_diff = (b.conceded_or_zero() - a.conceded_or_zero()) / GOALS_SCALE;
            power_diff
                + form_diff * FORM_WEIGHT
                + attack_diff * ATTACK_WEIGHT
                + defense_diff * DEFENSE_WEIGHT
        }
    }
}

fn expected_score<R: Rng + ?Sized>(side: &SideRating, model: PredictModel, rng: &mut R) -> u32 {
    let power = side.power_or_default();
    let raw = match model {
        PredictModel::Basic => (power - 60.0) / 18.0 + rng.r#gen::<f64>() * 2.0,
        PredictModel::FormAware => {
            (power / 100.0) * 2.0
                + (side.form_points() / FORM_SCALE) * 0.5
                + rng.r#gen::<f64>() * 0.5
        }
    };
    let rounded = raw.round();
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u32
    } else {
        0
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn probabilities_are_normalized_for_all_power_pairs() {
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = PredictConfig::default();
        for pa_power in 1..=99 {
            for pb_power in (1..=99).step_by(7) {
                let p = predict(
                    &SideRating::with_power(pa_power as f64),
                    &SideRating::with_power(pb_power as f64),
                    &cfg,
                    &mut rng,
                );
                assert!((p.pa + p.pd + p.pb - 1.0).abs() < 1e-9);
                for v in [p.pa, p.pd, p.pb] {
                    assert!(v > 0.0 && v < 1.0);
                }
                assert!((CONFIDENCE_FLOOR..=CONFIDENCE_CAP).contains(&p.confidence));
            }
        }
    }

    #[test]
    fn equal_power_without_noise_is_only_skewed_by_home_and_draw() {
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = PredictConfig::default().without_noise();
        let p = predict(
            &SideRating::with_power(70.0),
            &SideRating::with_power(70.0),
            &cfg,
            &mut rng,
        );
        let bound = 2.0 * HOME_ADVANTAGE + DRAW_RESERVE + 1e-9;
        assert!(p.pa >= p.pb);
        assert!(p.pa - p.pb <= bound);
        assert_eq!(p.pick, Pick::A);
    }

    #[test]
    fn missing_or_non_numeric_power_defaults_to_fifty() {
        let cfg = PredictConfig::default().without_noise();
        let explicit = predict(
            &SideRating::with_power(50.0),
            &SideRating::with_power(80.0),
            &cfg,
            &mut StdRng::seed_from_u64(5),
        );
        let missing = predict(
            &SideRating::default(),
            &SideRating::with_power(80.0),
            &cfg,
            &mut StdRng::seed_from_u64(5),
        );
        let nan = predict(
            &SideRating::with_power(f64::NAN),
            &SideRating::with_power(80.0),
            &cfg,
            &mut StdRng::seed_from_u64(5),
        );
        assert_eq!(explicit, missing);
        assert_eq!(explicit, nan);
    }

    #[test]
    fn big_power_gap_hits_the_clamp() {
        let (pa, pd, pb) = split_probabilities(0.99, DRAW_RESERVE);
        // 0.93 / (0.93 + 0.05 + 0.05)
        assert!((pa - 0.93 / 1.03).abs() < 1e-9);
        assert!((pd - pb).abs() < 1e-12);
    }

    #[test]
    fn tie_break_prefers_a_then_b() {
        assert_eq!(pick_side(0.4, 0.2, 0.4), Pick::A);
        assert_eq!(pick_side(0.3, 0.35, 0.35), Pick::B);
        assert_eq!(pick_side(0.3, 0.4, 0.3), Pick::D);
    }

    #[test]
    fn form_aware_model_rewards_better_form() {
        let cfg = PredictConfig::form_aware().without_noise();
        let hot = SideRating {
            power: Some(70.0),
            form: Some(Form::new([Outcome::Win; 5])),
            scored: Some(30),
            conceded: Some(10),
        };
        let cold = SideRating {
            power: Some(70.0),
            form: Some(Form::new([Outcome::Loss; 5])),
            scored: Some(10),
            conceded: Some(30),
        };
        let mut rng = StdRng::seed_from_u64(2);
        let p = predict(&hot, &cold, &cfg, &mut rng);
        let q = predict(&cold, &hot, &cfg, &mut rng);
        assert!(p.pa > q.pa);
        assert_eq!(p.pick, Pick::A);
    }

    #[test]
    fn draws_map_onto_cumulative_distribution() {
        let p = Prediction {
            pa: 0.5,
            pd: 0.2,
            pb: 0.3,
            pick: Pick::A,
            confidence: 0.7,
            exp_a: 1,
            exp_b: 1,
        };
        assert_eq!(p.outcome_for_draw(0.0), Pick::A);
        assert_eq!(p.outcome_for_draw(0.49), Pick::A);
        assert_eq!(p.outcome_for_draw(0.5), Pick::D);
        assert_eq!(p.outcome_for_draw(0.69), Pick::D);
        assert_eq!(p.outcome_for_draw(0.7), Pick::B);
        let odds = p.implied_odds();
        assert!((odds.a - 2.0).abs() < 1e-9);
        assert!((odds.d - 5.0).abs() < 1e-9);
    }
}
