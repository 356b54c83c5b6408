use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::predict::{PredictConfig, Prediction, predict_teams};
use crate::standings::{Sport, name_matches};
use crate::team::Team;
use crate::team_gen::{random_key, random_team};

pub const DEFAULT_FIXTURE_COUNT: usize = 14;
const STARTS_IN_MIN: u32 = 30;
const STARTS_IN_MAX: u32 = 180;

/// An upcoming match between two generated teams, with its prediction attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub sport: Sport,
    pub a: Team,
    pub b: Team,
    pub prediction: Prediction,
    pub starts_in_min: u32,
}

impl Fixture {
    pub fn power_index(&self) -> u32 {
        self.a.power as u32 + self.b.power as u32
    }
}

pub fn random_fixture<R: Rng + ?Sized>(rng: &mut R, cfg: &PredictConfig) -> Fixture {
    let a = random_team(rng);
    let b = random_team(rng);
    let sport = Sport::random(rng);
    let starts_in_min = rng.gen_range(STARTS_IN_MIN..=STARTS_IN_MAX);
    let prediction = predict_teams(&a, &b, cfg, rng);
    Fixture {
        id: random_key(rng),
        sport,
        a,
        b,
        prediction,
        starts_in_min,
    }
}

pub fn random_fixtures<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    cfg: &PredictConfig,
) -> Vec<Fixture> {
    (0..n).map(|_| random_fixture(rng, cfg)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSort {
    Time,
    Confidence,
    Index,
}

impl FixtureSort {
    pub fn next(self) -> Self {
        match self {
            FixtureSort::Time => FixtureSort::Confidence,
            FixtureSort::Confidence => FixtureSort::Index,
            FixtureSort::Index => FixtureSort::Time,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FixtureSort::Time => "Time",
            FixtureSort::Confidence => "Confidence",
            FixtureSort::Index => "Power index",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFilter {
    pub sport: Option<Sport>,
    pub query: String,
    pub sort: FixtureSort,
}

impl Default for FixtureFilter {
    fn default() -> Self {
        Self {
            sport: None,
            query: String::new(),
            sort: FixtureSort::Time,
        }
    }
}

impl FixtureFilter {
    pub fn apply<'a>(&self, fixtures: &'a [Fixture]) -> Vec<&'a Fixture> {
        let mut out: Vec<&Fixture> = fixtures
            .iter()
            .filter(|f| self.sport.is_none_or(|s| f.sport == s))
            .filter(|f| name_matches(&f.a.name, &self.query) || name_matches(&f.b.name, &self.query))
            .collect();
        match self.sort {
            FixtureSort::Time => out.sort_by_key(|f| f.starts_in_min),
            FixtureSort::Confidence => out.sort_by(|x, y| {
                y.prediction
                    .confidence
                    .partial_cmp(&x.prediction.confidence)
                    .unwrap_or(Ordering::Equal)
            }),
            FixtureSort::Index => out.sort_by_key(|f| std::cmp::Reverse(f.power_index())),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn fixtures_sort_by_each_mode() {
        let mut rng = StdRng::seed_from_u64(21);
        let fixtures = random_fixtures(&mut rng, 30, &PredictConfig::default());
        let mut filter = FixtureFilter::default();

        let by_time = filter.apply(&fixtures);
        assert_eq!(by_time.len(), 30);
        assert!(by_time.windows(2).all(|w| w[0].starts_in_min <= w[1].starts_in_min));

        filter.sort = FixtureSort::Confidence;
        let by_conf = filter.apply(&fixtures);
        assert!(
            by_conf
                .windows(2)
                .all(|w| w[0].prediction.confidence >= w[1].prediction.confidence)
        );

        filter.sort = FixtureSort::Index;
        let by_index = filter.apply(&fixtures);
        assert!(by_index.windows(2).all(|w| w[0].power_index() >= w[1].power_index()));
    }

    #[test]
    fn fixtures_carry_their_own_ids() {
        let mut rng = StdRng::seed_from_u64(23);
        let fixtures = random_fixtures(&mut rng, 50, &PredictConfig::default());
        let ids: std::collections::HashSet<&str> =
            fixtures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
        assert!(
            fixtures
                .iter()
                .all(|f| f.id != f.a.id.as_str() && f.id != f.b.id.as_str())
        );
    }

    #[test]
    fn sport_filter_keeps_only_that_sport() {
        let mut rng = StdRng::seed_from_u64(22);
        let fixtures = random_fixtures(&mut rng, 40, &PredictConfig::default());
        let filter = FixtureFilter {
            sport: Some(Sport::Hockey),
            ..Default::default()
        };
        assert!(filter.apply(&fixtures).iter().all(|f| f.sport == Sport::Hockey));
    }
}
