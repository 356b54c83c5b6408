use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::predict::{Pick, PredictConfig, Prediction, predict_teams};
use crate::team::{Outcome, Team, TeamId, TeamPatch};
use crate::team_gen::{DEFAULT_SEED_COUNT, dedup_by_id, random_team, random_teams};

const SIM_POWER_MIN: i32 = 50;
const SIM_POWER_MAX: i32 = 99;
const SIM_POWER_SHIFT_MAX: i32 = 2;
const SIM_GOALS_MAX: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
    #[error("team id already in use: {0}")]
    DuplicateId(TeamId),
    #[error("team {0} cannot play itself")]
    SameTeam(TeamId),
}

/// A single state transition of the store.
#[derive(Debug, Clone)]
pub enum TeamAction {
    SetAll(Vec<Team>),
    Add(Team),
    Update { id: TeamId, patch: TeamPatch },
    Remove { id: TeamId },
    Seed { n: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedMatch {
    pub prediction: Prediction,
    pub outcome: Pick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exhibition {
    pub opponent: Team,
    pub result: SimulatedMatch,
}

/// Owns the canonical, ordered team list together with the random source that drives
/// generation and simulation.
#[derive(Debug, Clone)]
pub struct TeamStore<R = StdRng> {
    teams: Vec<Team>,
    rng: R,
    predict: PredictConfig,
}

impl TeamStore<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TeamStore<R> {
    /// A store holding the default number of demo teams.
    pub fn new(mut rng: R) -> Self {
        let teams = random_teams(&mut rng, DEFAULT_SEED_COUNT);
        Self {
            teams,
            rng,
            predict: PredictConfig::default(),
        }
    }

    pub fn empty(rng: R) -> Self {
        Self {
            teams: Vec::new(),
            rng,
            predict: PredictConfig::default(),
        }
    }

    pub fn with_predict_config(mut self, cfg: PredictConfig) -> Self {
        self.predict = cfg;
        self
    }

    pub fn predict_config(&self) -> &PredictConfig {
        &self.predict
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn dispatch(&mut self, action: TeamAction) -> Result<(), StoreError> {
        match action {
            TeamAction::SetAll(teams) => {
                self.set_all(teams);
            }
            TeamAction::Add(team) => self.add(team)?,
            TeamAction::Update { id, patch } => {
                self.update(&id, &patch);
            }
            TeamAction::Remove { id } => {
                self.remove(&id);
            }
            TeamAction::Seed { n } => self.reseed(n.unwrap_or(DEFAULT_SEED_COUNT)),
        }
        Ok(())
    }

    /// Replaces the whole collection. Later teams reusing an earlier id are dropped;
    /// returns how many were dropped.
    pub fn set_all(&mut self, teams: Vec<Team>) -> usize {
        let incoming = teams.len();
        self.teams = dedup_by_id(teams);
        incoming - self.teams.len()
    }

    /// Prepends `team`.
    pub fn add(&mut self, team: Team) -> Result<(), StoreError> {
        if self.position(&team.id).is_some() {
            return Err(StoreError::DuplicateId(team.id));
        }
        self.teams.insert(0, team);
        Ok(())
    }

    /// Generates a demo team, prepends it and returns its id.
    pub fn add_random(&mut self) -> TeamId {
        loop {
            let team = random_team(&mut self.rng);
            let id = team.id.clone();
            if self.add(team).is_ok() {
                return id;
            }
        }
    }

    /// Merges `patch` into the team with `id`. Returns false when no team matched.
    pub fn update(&mut self, id: &TeamId, patch: &TeamPatch) -> bool {
        match self.teams.iter_mut().find(|t| &t.id == id) {
            Some(team) => {
                patch.apply(team);
                true
            }
            None => false,
        }
    }

    /// Returns false when no team matched.
    pub fn remove(&mut self, id: &TeamId) -> bool {
        let before = self.teams.len();
        self.teams.retain(|t| &t.id != id);
        self.teams.len() != before
    }

    pub fn reseed(&mut self, n: usize) {
        self.teams = random_teams(&mut self.rng, n);
    }

    pub fn reseed_default(&mut self) {
        self.reseed(DEFAULT_SEED_COUNT);
    }

    pub fn get_by_id(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TeamId) -> Option<usize> {
        self.teams.iter().position(|t| &t.id == id)
    }

    /// Prediction for two stored teams without touching either of them.
    pub fn predict_pair(&mut self, id_a: &TeamId, id_b: &TeamId) -> Result<Prediction, StoreError> {
        let (ia, ib) = self.resolve_pair(id_a, id_b)?;
        Ok(predict_teams(
            &self.teams[ia],
            &self.teams[ib],
            &self.predict,
            &mut self.rng,
        ))
    }

    /// Plays `id_a` against `id_b`, draws a result from the prediction and updates
    /// form, power and goal counters of both teams. The store is left untouched on error.
    pub fn simulate_match(
        &mut self,
        id_a: &TeamId,
        id_b: &TeamId,
    ) -> Result<SimulatedMatch, StoreError> {
        let (ia, ib) = self.resolve_pair(id_a, id_b)?;
        let prediction = predict_teams(
            &self.teams[ia],
            &self.teams[ib],
            &self.predict,
            &mut self.rng,
        );
        let outcome = prediction.sample_outcome(&mut self.rng);

        apply_result(&mut self.teams[ia], outcome.outcome_for_a(), &mut self.rng);
        apply_result(&mut self.teams[ib], outcome.outcome_for_b(), &mut self.rng);

        Ok(SimulatedMatch {
            prediction,
            outcome,
        })
    }

    /// Plays a stored team against a generated opponent that is never stored.
    pub fn simulate_exhibition(&mut self, id: &TeamId) -> Result<Exhibition, StoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StoreError::TeamNotFound(id.clone()))?;
        let opponent = random_team(&mut self.rng);
        let prediction = predict_teams(&self.teams[idx], &opponent, &self.predict, &mut self.rng);
        let outcome = prediction.sample_outcome(&mut self.rng);
        apply_result(&mut self.teams[idx], outcome.outcome_for_a(), &mut self.rng);

        Ok(Exhibition {
            opponent,
            result: SimulatedMatch {
                prediction,
                outcome,
            },
        })
    }

    fn resolve_pair(&self, id_a: &TeamId, id_b: &TeamId) -> Result<(usize, usize), StoreError> {
        let ia = self
            .position(id_a)
            .ok_or_else(|| StoreError::TeamNotFound(id_a.clone()))?;
        let ib = self
            .position(id_b)
            .ok_or_else(|| StoreError::TeamNotFound(id_b.clone()))?;
        if ia == ib {
            return Err(StoreError::SameTeam(id_a.clone()));
        }
        Ok((ia, ib))
    }
}

fn apply_result<R: Rng + ?Sized>(team: &mut Team, result: Outcome, rng: &mut R) {
    let shift = match result {
        Outcome::Win => rng.gen_range(0..=SIM_POWER_SHIFT_MAX),
        Outcome::Draw => 0,
        Outcome::Loss => -rng.gen_range(0..=SIM_POWER_SHIFT_MAX),
    };
    team.form.push(result);
    team.power = (team.power as i32 + shift).clamp(SIM_POWER_MIN, SIM_POWER_MAX) as u8;
    team.scored = team.scored.saturating_add(rng.gen_range(0..=SIM_GOALS_MAX));
    team.conceded = team.conceded.saturating_add(rng.gen_range(0..=SIM_GOALS_MAX));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::{Form, TeamColor};

    fn fixed_team(id: &str, power: u8) -> Team {
        Team {
            id: TeamId::from(id),
            name: format!("Team {id}"),
            power,
            color: TeamColor::Accent,
            form: Form::new([Outcome::Draw; 5]),
            scored: 0,
            conceded: 0,
            created_at: chrono::Utc::now(),
            is_user_created: true,
        }
    }

    #[test]
    fn new_store_holds_default_seed() {
        let store = TeamStore::seeded(1);
        assert_eq!(store.len(), DEFAULT_SEED_COUNT);
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut store = TeamStore::empty(StdRng::seed_from_u64(1));
        store.add(fixed_team("a", 70)).unwrap();
        let err = store.add(fixed_team("a", 80)).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(TeamId::from("a")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.teams()[0].power, 70);
    }

    #[test]
    fn set_all_drops_repeated_ids() {
        let mut store = TeamStore::empty(StdRng::seed_from_u64(1));
        let dropped = store.set_all(vec![
            fixed_team("a", 60),
            fixed_team("b", 61),
            fixed_team("a", 62),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_by_id(&TeamId::from("a")).unwrap().power, 60);
    }

    #[test]
    fn simulate_against_self_is_rejected() {
        let mut store = TeamStore::empty(StdRng::seed_from_u64(1));
        store.add(fixed_team("a", 60)).unwrap();
        let before = store.teams().to_vec();
        let id = TeamId::from("a");
        assert_eq!(
            store.simulate_match(&id, &id),
            Err(StoreError::SameTeam(id.clone()))
        );
        assert_eq!(store.teams(), before.as_slice());
    }

    #[test]
    fn power_stays_in_simulation_band() {
        let mut store = TeamStore::empty(StdRng::seed_from_u64(4));
        store.set_all(vec![fixed_team("weak", 3), fixed_team("strong", 99)]);
        let weak = TeamId::from("weak");
        let strong = TeamId::from("strong");
        for _ in 0..200 {
            store.simulate_match(&weak, &strong).unwrap();
            for team in store.teams() {
                assert!((50..=99).contains(&team.power));
            }
        }
    }

    #[test]
    fn exhibition_only_touches_the_stored_team() {
        let mut store = TeamStore::empty(StdRng::seed_from_u64(8));
        store.set_all(vec![fixed_team("a", 70), fixed_team("b", 70)]);
        let a = TeamId::from("a");
        let b_before = store.get_by_id(&TeamId::from("b")).cloned();
        let ex = store.simulate_exhibition(&a).unwrap();
        let team = store.get_by_id(&a).unwrap();
        assert_eq!(team.form.latest(), ex.result.outcome.outcome_for_a());
        assert_eq!(store.get_by_id(&TeamId::from("b")).cloned(), b_before);
        assert!(store.get_by_id(&ex.opponent.id).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn dispatch_routes_every_action() {
        let mut store = TeamStore::empty(StdRng::seed_from_u64(2));
        store.dispatch(TeamAction::Seed { n: Some(3) }).unwrap();
        assert_eq!(store.len(), 3);
        store.dispatch(TeamAction::Add(fixed_team("x", 55))).unwrap();
        assert_eq!(store.teams()[0].id, TeamId::from("x"));
        store
            .dispatch(TeamAction::Update {
                id: TeamId::from("x"),
                patch: TeamPatch {
                    power: Some(66),
                    ..Default::default()
                },
            })
            .unwrap();
        assert_eq!(store.teams()[0].power, 66);
        store
            .dispatch(TeamAction::Remove {
                id: TeamId::from("x"),
            })
            .unwrap();
        assert_eq!(store.len(), 3);
        store.dispatch(TeamAction::Seed { n: None }).unwrap();
        assert_eq!(store.len(), DEFAULT_SEED_COUNT);
        store.dispatch(TeamAction::SetAll(Vec::new())).unwrap();
        assert!(store.is_empty());
    }
}
