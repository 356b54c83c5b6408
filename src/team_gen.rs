use std::collections::HashSet;
use std::ops::RangeInclusive;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use crate::team::{FORM_LEN, Form, Outcome, Team, TeamColor, TeamId, clamp_power};

pub const NAMES_A: [&str; 10] = [
    "Thunder",
    "Storm",
    "Velocity",
    "Phoenix",
    "Lightning",
    "Cosmic",
    "Falcon",
    "Aurora",
    "Raptors",
    "Titans",
];
pub const NAMES_B: [&str; 10] = [
    "Hawks", "Eagles", "Rebels", "Rangers", "Bolts", "Knights", "Wolves", "Dragons", "Comets",
    "Rockets",
];

pub const DEFAULT_SEED_COUNT: usize = 8;
pub const POWER_RANGE: RangeInclusive<i32> = 60..=95;
const SCORED_RANGE: RangeInclusive<u32> = 12..=42;
const CONCEDED_RANGE: RangeInclusive<u32> = 8..=35;
const DRAFT_SCORED_RANGE: RangeInclusive<u32> = 10..=40;
const DRAFT_CONCEDED_RANGE: RangeInclusive<u32> = 8..=35;
const MIN_NAME_LEN: usize = 2;

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> TeamId {
    TeamId::new(random_key(rng))
}

/// Base-36 text of a random 64-bit value.
pub fn random_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut n: u64 = rng.r#gen();
    let mut buf = Vec::with_capacity(13);
    loop {
        buf.push(ID_ALPHABET[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    buf.reverse();
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let a = NAMES_A[rng.gen_range(0..NAMES_A.len())];
    let b = NAMES_B[rng.gen_range(0..NAMES_B.len())];
    format!("{a} {b}")
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> TeamColor {
    TeamColor::ALL[rng.gen_range(0..TeamColor::ALL.len())]
}

pub fn random_outcome<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    Outcome::ALL[rng.gen_range(0..Outcome::ALL.len())]
}

pub fn random_form<R: Rng + ?Sized>(rng: &mut R) -> Form {
    let mut results = [Outcome::Draw; FORM_LEN];
    for slot in &mut results {
        *slot = random_outcome(rng);
    }
    Form::new(results)
}

pub fn random_power<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    clamp_power(rng.gen_range(POWER_RANGE))
}

/// A procedurally generated demo team.
pub fn random_team<R: Rng + ?Sized>(rng: &mut R) -> Team {
    Team {
        id: random_id(rng),
        name: random_name(rng),
        power: random_power(rng),
        color: random_color(rng),
        form: random_form(rng),
        scored: rng.gen_range(SCORED_RANGE),
        conceded: rng.gen_range(CONCEDED_RANGE),
        created_at: Utc::now(),
        is_user_created: false,
    }
}

/// `n` teams with distinct ids; a clashing id is drawn again.
pub fn random_teams<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Team> {
    let mut seen = HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let team = random_team(rng);
        if seen.insert(team.id.clone()) {
            out.push(team);
        }
    }
    out
}

/// Keeps the first team for every id, in order.
pub fn dedup_by_id(teams: Vec<Team>) -> Vec<Team> {
    let mut seen: HashSet<TeamId> = HashSet::with_capacity(teams.len());
    teams
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("team name needs at least 2 characters")]
    NameTooShort,
}

/// Fields of the create-team form before they become a [`Team`].
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDraft {
    pub name: String,
    pub power: i32,
    pub color: TeamColor,
    pub form: Form,
}

impl Default for TeamDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            power: 75,
            color: TeamColor::Primary,
            form: Form::new([
                Outcome::Win,
                Outcome::Draw,
                Outcome::Loss,
                Outcome::Win,
                Outcome::Draw,
            ]),
        }
    }
}

impl TeamDraft {
    pub fn can_save(&self) -> bool {
        self.name.trim().chars().count() >= MIN_NAME_LEN
    }

    /// Fills every field from a freshly generated team.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let team = random_team(rng);
        self.name = team.name;
        self.power = team.power as i32;
        self.color = team.color;
        self.form = team.form;
    }

    pub fn adjust_power(&mut self, delta: i32) {
        self.power = clamp_power(self.power.saturating_add(delta)) as i32;
    }

    pub fn cycle_form(&mut self, idx: usize) {
        if let Some(current) = self.form.results().get(idx).copied() {
            self.form.set(idx, current.cycle());
        }
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Team, DraftError> {
        if !self.can_save() {
            return Err(DraftError::NameTooShort);
        }
        Ok(Team {
            id: random_id(rng),
            name: self.name.trim().to_string(),
            power: clamp_power(self.power),
            color: self.color,
            form: self.form,
            scored: rng.gen_range(DRAFT_SCORED_RANGE),
            conceded: rng.gen_range(DRAFT_CONCEDED_RANGE),
            created_at: Utc::now(),
            is_user_created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn random_team_respects_generation_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for team in random_teams(&mut rng, 200) {
            assert!((60..=95).contains(&team.power));
            assert!(SCORED_RANGE.contains(&team.scored));
            assert!(CONCEDED_RANGE.contains(&team.conceded));
            assert!(!team.is_user_created);
            let (a, b) = team.name.split_once(' ').unwrap();
            assert!(NAMES_A.contains(&a));
            assert!(NAMES_B.contains(&b));
            assert!(!team.id.as_str().is_empty());
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = random_teams(&mut StdRng::seed_from_u64(99), 4);
        let b = random_teams(&mut StdRng::seed_from_u64(99), 4);
        let ids_a: Vec<_> = a.iter().map(|t| t.id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a[0].name, b[0].name);
    }

    #[test]
    fn generated_rosters_never_share_ids() {
        let mut rng = StdRng::seed_from_u64(11);
        let teams = random_teams(&mut rng, 500);
        assert_eq!(teams.len(), 500);
        let ids: HashSet<TeamId> = teams.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn dedup_keeps_first_of_each_id() {
        let mut rng = StdRng::seed_from_u64(12);
        let a = random_team(&mut rng);
        let mut a_again = random_team(&mut rng);
        a_again.id = a.id.clone();
        let b = random_team(&mut rng);

        let out = dedup_by_id(vec![a.clone(), a_again, b.clone()]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn random_form_draws_every_outcome() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..100 {
            for o in random_form(&mut rng).iter() {
                seen[(o.marker() + 1) as usize] = true;
            }
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn draft_rejects_short_names() {
        let mut rng = StdRng::seed_from_u64(3);
        let draft = TeamDraft {
            name: "  x ".to_string(),
            ..Default::default()
        };
        assert!(!draft.can_save());
        assert_eq!(draft.build(&mut rng), Err(DraftError::NameTooShort));
    }

    #[test]
    fn draft_builds_user_team() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut draft = TeamDraft {
            name: "  Night Owls ".to_string(),
            power: 120,
            ..Default::default()
        };
        draft.cycle_form(2);
        let team = draft.build(&mut rng).unwrap();
        assert_eq!(team.name, "Night Owls");
        assert_eq!(team.power, 99);
        assert!(team.is_user_created);
        assert_eq!(team.form.results()[2], Outcome::Draw);
        assert!(DRAFT_SCORED_RANGE.contains(&team.scored));

        draft.adjust_power(-500);
        assert_eq!(draft.power, 1);
    }
}
