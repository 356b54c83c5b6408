use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

pub const FORM_LEN: usize = 5;
pub const POWER_MIN: u8 = 1;
pub const POWER_MAX: u8 = 99;

/// Result of one match from a single team's point of view.
///
/// Serialized as the integer markers `1` (win), `0` (draw) and `-1` (loss).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Outcome {
    Loss,
    Draw,
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid outcome marker {0} (expected -1, 0 or 1)")]
pub struct InvalidOutcome(pub i8);

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Loss, Outcome::Draw, Outcome::Win];

    pub fn marker(self) -> i8 {
        match self {
            Outcome::Loss => -1,
            Outcome::Draw => 0,
            Outcome::Win => 1,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }

    /// L -> D -> W -> L, the order the create form steps through.
    pub fn cycle(self) -> Self {
        match self {
            Outcome::Loss => Outcome::Draw,
            Outcome::Draw => Outcome::Win,
            Outcome::Win => Outcome::Loss,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }
}

impl From<Outcome> for i8 {
    fn from(outcome: Outcome) -> Self {
        outcome.marker()
    }
}

impl TryFrom<i8> for Outcome {
    type Error = InvalidOutcome;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Outcome::Loss),
            0 => Ok(Outcome::Draw),
            1 => Ok(Outcome::Win),
            other => Err(InvalidOutcome(other)),
        }
    }
}

/// The five most recent results, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form([Outcome; FORM_LEN]);

impl Form {
    pub fn new(results: [Outcome; FORM_LEN]) -> Self {
        Self(results)
    }

    /// Drops the oldest result and appends `outcome` as the newest.
    pub fn push(&mut self, outcome: Outcome) {
        self.0.rotate_left(1);
        self.0[FORM_LEN - 1] = outcome;
    }

    pub fn with_result(mut self, outcome: Outcome) -> Self {
        self.push(outcome);
        self
    }

    pub fn results(&self) -> &[Outcome; FORM_LEN] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.0.iter().copied()
    }

    pub fn latest(&self) -> Outcome {
        self.0[FORM_LEN - 1]
    }

    pub fn set(&mut self, idx: usize, outcome: Outcome) {
        if let Some(slot) = self.0.get_mut(idx) {
            *slot = outcome;
        }
    }

    pub fn wins(&self) -> usize {
        self.iter().filter(|o| *o == Outcome::Win).count()
    }

    pub fn points(&self) -> u32 {
        self.iter().map(Outcome::points).sum()
    }

    /// Share of wins in the window, in percent.
    pub fn win_rate(&self) -> f64 {
        self.wins() as f64 / FORM_LEN as f64 * 100.0
    }

    pub fn letters(&self) -> String {
        self.iter().map(Outcome::letter).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Primary,
    Accent,
    Info,
    Warn,
    Danger,
}

impl TeamColor {
    pub const ALL: [TeamColor; 5] = [
        TeamColor::Primary,
        TeamColor::Accent,
        TeamColor::Info,
        TeamColor::Warn,
        TeamColor::Danger,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            TeamColor::Primary => "#7C5CFF",
            TeamColor::Accent => "#00E6A8",
            TeamColor::Info => "#4FC3FF",
            TeamColor::Warn => "#FFB020",
            TeamColor::Danger => "#FF4D6D",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TeamColor::Primary => (0x7C, 0x5C, 0xFF),
            TeamColor::Accent => (0x00, 0xE6, 0xA8),
            TeamColor::Info => (0x4F, 0xC3, 0xFF),
            TeamColor::Warn => (0xFF, 0xB0, 0x20),
            TeamColor::Danger => (0xFF, 0x4D, 0x6D),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(deserialize_with = "deserialize_power")]
    pub power: u8,
    pub color: TeamColor,
    pub form: Form,
    pub scored: u32,
    pub conceded: u32,
    pub created_at: DateTime<Utc>,
    pub is_user_created: bool,
}

impl Team {
    /// Goals for per goal against, to one decimal.
    pub fn attack_index(&self) -> f64 {
        let ratio = self.scored as f64 / self.conceded.max(1) as f64;
        (ratio * 10.0).round() / 10.0
    }

    /// First word of the name, used where space is tight.
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

pub fn clamp_power(raw: i32) -> u8 {
    raw.clamp(POWER_MIN as i32, POWER_MAX as i32) as u8
}

/// Rejects power ratings outside [1, 99] instead of storing them.
pub fn deserialize_power<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = u8::deserialize(deserializer)?;
    if (POWER_MIN..=POWER_MAX).contains(&raw) {
        Ok(raw)
    } else {
        Err(de::Error::custom(format!(
            "power {raw} outside {POWER_MIN}..={POWER_MAX}"
        )))
    }
}

/// Partial update merged into a team by id. Identity fields are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub power: Option<i32>,
    pub color: Option<TeamColor>,
    pub form: Option<Form>,
    pub scored: Option<u32>,
    pub conceded: Option<u32>,
}

impl TeamPatch {
    pub fn apply(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name = name.clone();
        }
        if let Some(power) = self.power {
            team.power = clamp_power(power);
        }
        if let Some(color) = self.color {
            team.color = color;
        }
        if let Some(form) = self.form {
            team.form = form;
        }
        if let Some(scored) = self.scored {
            team.scored = scored;
        }
        if let Some(conceded) = self.conceded {
            team.conceded = conceded;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
