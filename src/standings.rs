use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::store::TeamStore;
use crate::team::{Form, Outcome, Team, TeamColor, TeamId, TeamPatch, deserialize_power};
use crate::team_gen::random_team;

const PLAYED_MIN: u32 = 10;
const PLAYED_MAX: u32 = 26;
const DEMO_GF_MIN: u32 = 12;
const DEMO_GF_MAX: u32 = 55;
const DEMO_GA_MIN: u32 = 10;
const DEMO_GA_MAX: u32 = 50;

// Naive next-round model used by the table view.
const ROUND_OPP_POWER_MIN: i32 = 60;
const ROUND_OPP_POWER_MAX: i32 = 95;
const ROUND_NOISE_WIDTH: f64 = 0.12;
const ROUND_PA_BOUNDS: (f64, f64) = (0.1, 0.8);
const ROUND_PD_BASE: f64 = 0.15;
const ROUND_PD_BOUNDS: (f64, f64) = (0.05, 0.35);
const ROUND_GOALS_MAX: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Football,
    Basketball,
    Hockey,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Football, Sport::Basketball, Sport::Hockey];

    pub fn label(self) -> &'static str {
        match self {
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Hockey => "Hockey",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Cycles All -> Football -> Basketball -> Hockey -> All.
pub fn next_sport_filter(current: Option<Sport>) -> Option<Sport> {
    match current {
        None => Some(Sport::Football),
        Some(Sport::Football) => Some(Sport::Basketball),
        Some(Sport::Basketball) => Some(Sport::Hockey),
        Some(Sport::Hockey) => None,
    }
}

pub fn sport_filter_label(filter: Option<Sport>) -> &'static str {
    filter.map(Sport::label).unwrap_or("All")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub name: String,
    pub sport: Sport,
    #[serde(deserialize_with = "deserialize_power")]
    pub power: u8,
    pub color: TeamColor,
    pub form: Form,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub gf: u32,
    pub ga: u32,
}

impl StandingRow {
    /// Builds a table row for a stored team with a random but consistent record.
    pub fn from_team<R: Rng + ?Sized>(team: &Team, rng: &mut R) -> Self {
        let played = rng.gen_range(PLAYED_MIN..=PLAYED_MAX);
        let wins = rng.gen_range(0..=played);
        let draws = rng.gen_range(0..=played - wins);
        Self {
            team_id: team.id.clone(),
            name: team.name.clone(),
            sport: Sport::random(rng),
            power: team.power,
            color: team.color,
            form: team.form,
            played,
            wins,
            draws,
            losses: played - wins - draws,
            gf: team.scored,
            ga: team.conceded,
        }
    }

    /// Takes the live rating, form and goal counters from the stored team.
    /// The played record stays with the row.
    pub fn refresh_from(&mut self, team: &Team) {
        self.name = team.name.clone();
        self.power = team.power;
        self.color = team.color;
        self.form = team.form;
        self.gf = team.scored;
        self.ga = team.conceded;
    }

    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    pub fn goal_diff(&self) -> i64 {
        self.gf as i64 - self.ga as i64
    }

    pub fn form_points(&self) -> u32 {
        self.form.points()
    }

    fn record(&mut self, outcome: Outcome) {
        self.played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.form.push(outcome);
    }
}

/// A demo row for a team that does not exist in the store.
pub fn random_row<R: Rng + ?Sized>(rng: &mut R) -> StandingRow {
    let team = random_team(rng);
    let mut row = StandingRow::from_team(&team, rng);
    row.gf = rng.gen_range(DEMO_GF_MIN..=DEMO_GF_MAX);
    row.ga = rng.gen_range(DEMO_GA_MIN..=DEMO_GA_MAX);
    row
}

pub fn random_table<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<StandingRow> {
    (0..n).map(|_| random_row(rng)).collect()
}

pub fn table_from_teams<R: Rng + ?Sized>(teams: &[Team], rng: &mut R) -> Vec<StandingRow> {
    teams.iter().map(|t| StandingRow::from_team(t, rng)).collect()
}

/// Plays one more round for `row` against an anonymous opponent.
pub fn simulate_round<R: Rng + ?Sized>(row: &StandingRow, rng: &mut R) -> StandingRow {
    let opp_power = rng.gen_range(ROUND_OPP_POWER_MIN..=ROUND_OPP_POWER_MAX);
    let diff = row.power as f64 - opp_power as f64;
    let base = 1.0 / (1.0 + (-(diff / 8.0)).exp());
    let noise = (rng.r#gen::<f64>() - 0.5) * ROUND_NOISE_WIDTH;
    let pa = (base + noise).clamp(ROUND_PA_BOUNDS.0, ROUND_PA_BOUNDS.1);
    let pd = (ROUND_PD_BASE + (0.2 - noise.abs())).clamp(ROUND_PD_BOUNDS.0, ROUND_PD_BOUNDS.1);

    let u = rng.r#gen::<f64>();
    let outcome = if u < pa {
        Outcome::Win
    } else if u < pa + pd {
        Outcome::Draw
    } else {
        Outcome::Loss
    };

    let mut next = row.clone();
    next.record(outcome);
    next.gf += rng.gen_range(0..=ROUND_GOALS_MAX);
    next.ga += rng.gen_range(0..=ROUND_GOALS_MAX);
    next
}

pub fn simulate_table_round<R: Rng + ?Sized>(rows: &[StandingRow], rng: &mut R) -> Vec<StandingRow> {
    rows.iter().map(|row| simulate_round(row, rng)).collect()
}

/// Refreshes every row whose team is still stored. Returns how many matched.
pub fn refresh_from_store<R: Rng>(rows: &mut [StandingRow], store: &TeamStore<R>) -> usize {
    let mut refreshed = 0;
    for row in rows.iter_mut() {
        if let Some(team) = store.get_by_id(&row.team_id) {
            row.refresh_from(team);
            refreshed += 1;
        }
    }
    refreshed
}

/// Pushes simulated rows back into the store for teams that live there.
/// Returns how many teams were updated.
pub fn sync_to_store<R: Rng>(rows: &[StandingRow], store: &mut TeamStore<R>) -> usize {
    let mut updated = 0;
    for row in rows {
        let patch = TeamPatch {
            form: Some(row.form),
            power: Some(row.power as i32),
            scored: Some(row.gf),
            conceded: Some(row.ga),
            ..Default::default()
        };
        if store.update(&row.team_id, &patch) {
            updated += 1;
        }
    }
    updated
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Pts,
    Gd,
    Played,
    Wins,
    Draws,
    Losses,
    Gf,
    Ga,
    Name,
    Power,
    FormPts,
}

impl SortKey {
    pub const ALL: [SortKey; 11] = [
        SortKey::Name,
        SortKey::Played,
        SortKey::Wins,
        SortKey::Draws,
        SortKey::Losses,
        SortKey::Gf,
        SortKey::Ga,
        SortKey::Gd,
        SortKey::Pts,
        SortKey::Power,
        SortKey::FormPts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Pts => "Pts",
            SortKey::Gd => "GD",
            SortKey::Played => "P",
            SortKey::Wins => "W",
            SortKey::Draws => "D",
            SortKey::Losses => "L",
            SortKey::Gf => "GF",
            SortKey::Ga => "GA",
            SortKey::Name => "Team",
            SortKey::Power => "Pow",
            SortKey::FormPts => "Form",
        }
    }

    fn default_dir(self) -> SortDir {
        if self == SortKey::Name {
            SortDir::Asc
        } else {
            SortDir::Desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDir::Asc => "↑",
            SortDir::Desc => "↓",
        }
    }
}

/// Filter and ordering applied to the standings table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsView {
    pub sport: Option<Sport>,
    pub query: String,
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for StandingsView {
    fn default() -> Self {
        Self {
            sport: None,
            query: String::new(),
            key: SortKey::Pts,
            dir: SortDir::Desc,
        }
    }
}

impl StandingsView {
    /// Re-selecting the active key flips the direction; a new key starts from its
    /// natural direction.
    pub fn select_key(&mut self, key: SortKey) {
        if key == self.key {
            self.dir = self.dir.flipped();
        } else {
            self.key = key;
            self.dir = key.default_dir();
        }
    }

    pub fn cycle_sport(&mut self) {
        self.sport = next_sport_filter(self.sport);
    }

    pub fn apply<'a>(&self, rows: &'a [StandingRow]) -> Vec<&'a StandingRow> {
        let mut out: Vec<&StandingRow> = rows
            .iter()
            .filter(|r| self.sport.is_none_or(|s| r.sport == s))
            .filter(|r| name_matches(&r.name, &self.query))
            .collect();
        out.sort_by(|a, b| {
            let ord = compare_rows(a, b, self.key);
            match self.dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });
        out
    }
}

fn compare_rows(a: &StandingRow, b: &StandingRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Pts => a.points().cmp(&b.points()),
        SortKey::Gd => a.goal_diff().cmp(&b.goal_diff()),
        SortKey::Played => a.played.cmp(&b.played),
        SortKey::Wins => a.wins.cmp(&b.wins),
        SortKey::Draws => a.draws.cmp(&b.draws),
        SortKey::Losses => a.losses.cmp(&b.losses),
        SortKey::Gf => a.gf.cmp(&b.gf),
        SortKey::Ga => a.ga.cmp(&b.ga),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Power => a.power.cmp(&b.power),
        SortKey::FormPts => a.form_points().cmp(&b.form_points()),
    }
}

/// Case-insensitive substring match on a trimmed query; an empty query matches.
pub fn name_matches(name: &str, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&needle.to_lowercase())
}
