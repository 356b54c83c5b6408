use std::collections::VecDeque;

use crate::config::AppConfig;
use crate::fixtures::{Fixture, FixtureFilter, random_fixtures};
use crate::predict::{Pick, PredictConfig, PredictModel, Prediction, predict_teams};
use crate::standings::{
    SortKey, StandingRow, StandingsView, next_sport_filter, random_table, refresh_from_store,
    simulate_table_round, sync_to_store, table_from_teams,
};
use crate::store::{StoreError, TeamStore};
use crate::team::{FORM_LEN, Team, TeamColor};
use crate::team_gen::TeamDraft;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Teams,
    Prediction,
    Standings,
    Fixtures,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Screen::Teams => "Teams",
            Screen::Prediction => "Prediction",
            Screen::Standings => "Standings",
            Screen::Fixtures => "Fixtures",
        }
    }
}

/// Two teams on the prediction screen. These are local copies; the store keeps the
/// canonical records.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub a: Team,
    pub b: Team,
    pub prediction: Prediction,
    pub last_outcome: Option<Pick>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub store: TeamStore,
    pub config: AppConfig,
    pub matchup_config: PredictConfig,
    pub selected: usize,
    pub matchup: Option<Matchup>,
    pub standings: Vec<StandingRow>,
    pub standings_view: StandingsView,
    pub sort_cursor: usize,
    pub standings_scroll: usize,
    pub fixtures: Vec<Fixture>,
    pub fixture_filter: FixtureFilter,
    pub fixtures_selected: usize,
    pub draft: Option<TeamDraft>,
    pub search_active: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut store = match config.seed {
            Some(seed) => TeamStore::seeded(seed),
            None => TeamStore::from_entropy(),
        }
        .with_predict_config(config.predict_config(PredictModel::Basic));
        store.reseed(config.teams);

        let matchup_config = config.predict_config(config.prediction_model);
        let mut state = Self {
            screen: Screen::Teams,
            store,
            matchup_config,
            selected: 0,
            matchup: None,
            standings: Vec::new(),
            standings_view: StandingsView::default(),
            sort_cursor: SortKey::ALL
                .iter()
                .position(|k| *k == SortKey::Pts)
                .unwrap_or(0),
            standings_scroll: 0,
            fixtures: Vec::new(),
            fixture_filter: FixtureFilter::default(),
            fixtures_selected: 0,
            draft: None,
            search_active: false,
            logs: VecDeque::new(),
            help_overlay: false,
            config,
        };
        state.rebuild_standings();
        state.refresh_fixtures();
        state.push_log(format!("[INFO] Seeded {} teams", state.store.len()));
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if screen == Screen::Prediction && self.matchup.is_none() {
            self.open_matchup();
        }
        if screen == Screen::Standings {
            refresh_from_store(&mut self.standings, &self.store);
        }
        self.screen = screen;
        self.search_active = false;
    }

    pub fn cycle_screen(&mut self) {
        let next = match self.screen {
            Screen::Teams => Screen::Prediction,
            Screen::Prediction => Screen::Standings,
            Screen::Standings => Screen::Fixtures,
            Screen::Fixtures => Screen::Teams,
        };
        self.set_screen(next);
    }

    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Teams | Screen::Prediction => self.store.len(),
            Screen::Standings => self.visible_standings().len(),
            Screen::Fixtures => self.visible_fixtures().len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.screen {
            Screen::Teams | Screen::Prediction => &mut self.selected,
            Screen::Standings => &mut self.standings_scroll,
            Screen::Fixtures => &mut self.fixtures_selected,
        }
    }

    pub fn select_next(&mut self) {
        let total = self.list_len();
        let cursor = self.cursor_mut();
        if total == 0 {
            *cursor = 0;
            return;
        }
        *cursor = (*cursor + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.list_len();
        let cursor = self.cursor_mut();
        if total == 0 {
            *cursor = 0;
        } else if *cursor == 0 {
            *cursor = total - 1;
        } else {
            *cursor -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.list_len();
        let cursor = self.cursor_mut();
        if total == 0 {
            *cursor = 0;
        } else if *cursor >= total {
            *cursor = total - 1;
        }
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.store.teams().get(self.selected)
    }

    // Teams screen

    pub fn add_random_team(&mut self) {
        let id = self.store.add_random();
        self.selected = 0;
        if let Some(team) = self.store.get_by_id(&id) {
            let msg = format!("[INFO] Added {} ({})", team.name, team.power);
            self.push_log(msg);
        }
    }

    pub fn reseed_teams(&mut self) {
        self.store.reseed(self.config.teams);
        self.selected = 0;
        self.matchup = None;
        self.rebuild_standings();
        self.push_log(format!("[INFO] Reseeded {} teams", self.store.len()));
    }

    /// Only user-created teams can be deleted.
    pub fn delete_selected(&mut self) {
        let Some(team) = self.selected_team() else {
            self.push_log("[INFO] No team selected");
            return;
        };
        if !team.is_user_created {
            let msg = format!("[WARN] {} is a demo team and cannot be deleted", team.name);
            self.push_log(msg);
            return;
        }
        let (id, name) = (team.id.clone(), team.name.clone());
        if self.store.remove(&id) {
            self.push_log(format!("[INFO] Deleted {name}"));
        }
        if self
            .matchup
            .as_ref()
            .is_some_and(|m| m.a.id == id || m.b.id == id)
        {
            self.matchup = None;
        }
        self.clamp_selection();
    }

    pub fn simulate_exhibition_selected(&mut self) {
        let Some(id) = self.selected_team().map(|t| t.id.clone()) else {
            self.push_log("[INFO] No team selected");
            return;
        };
        match self.store.simulate_exhibition(&id) {
            Ok(ex) => {
                let name = self
                    .store
                    .get_by_id(&id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                let result = ex.result.outcome.outcome_for_a();
                self.push_log(format!(
                    "[ALERT] {} vs {}: {:?}",
                    name, ex.opponent.name, result
                ));
            }
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    // Create form

    pub fn begin_create(&mut self) {
        self.draft = Some(TeamDraft::default());
    }

    pub fn cancel_create(&mut self) {
        self.draft = None;
    }

    pub fn draft_push_char(&mut self, c: char) {
        if let Some(draft) = &mut self.draft {
            draft.name.push(c);
        }
    }

    pub fn draft_backspace(&mut self) {
        if let Some(draft) = &mut self.draft {
            draft.name.pop();
        }
    }

    pub fn draft_adjust_power(&mut self, delta: i32) {
        if let Some(draft) = &mut self.draft {
            draft.adjust_power(delta);
        }
    }

    pub fn draft_cycle_color(&mut self) {
        if let Some(draft) = &mut self.draft {
            let idx = TeamColor::ALL
                .iter()
                .position(|c| *c == draft.color)
                .unwrap_or(0);
            draft.color = TeamColor::ALL[(idx + 1) % TeamColor::ALL.len()];
        }
    }

    pub fn draft_cycle_form(&mut self, idx: usize) {
        if idx >= FORM_LEN {
            return;
        }
        if let Some(draft) = &mut self.draft {
            draft.cycle_form(idx);
        }
    }

    pub fn draft_randomize(&mut self) {
        if let Some(draft) = &mut self.draft {
            draft.randomize(self.store.rng_mut());
        }
    }

    pub fn save_draft(&mut self) {
        let Some(draft) = self.draft.clone() else {
            return;
        };
        let team = match draft.build(self.store.rng_mut()) {
            Ok(team) => team,
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                return;
            }
        };
        let name = team.name.clone();
        match self.store.add(team) {
            Ok(()) => {
                self.draft = None;
                self.selected = 0;
                self.push_log(format!("[INFO] Created {name}"));
            }
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    // Prediction screen

    /// Pairs the selected team with the next one in the list.
    pub fn open_matchup(&mut self) {
        let teams = self.store.teams();
        if teams.len() < 2 {
            self.push_log("[INFO] Need at least two teams for a prediction");
            return;
        }
        let ia = self.selected.min(teams.len() - 1);
        let ib = (ia + 1) % teams.len();
        let (a, b) = (teams[ia].clone(), teams[ib].clone());
        self.set_matchup(a, b);
    }

    pub fn set_matchup(&mut self, a: Team, b: Team) {
        let prediction = predict_teams(&a, &b, &self.matchup_config, self.store.rng_mut());
        self.matchup = Some(Matchup {
            a,
            b,
            prediction,
            last_outcome: None,
        });
    }

    pub fn rerun_prediction(&mut self) {
        let Some(m) = self.matchup.take() else {
            return;
        };
        self.set_matchup(m.a, m.b);
    }

    pub fn swap_matchup(&mut self) {
        let Some(m) = self.matchup.take() else {
            return;
        };
        self.set_matchup(m.b, m.a);
    }

    /// Stored teams are played through the store; fixture teams, none of which are
    /// stored, only get a sampled result.
    pub fn simulate_matchup(&mut self) {
        let Some(m) = self.matchup.clone() else {
            self.push_log("[INFO] No matchup selected");
            return;
        };
        let outcome = match self.store.simulate_match(&m.a.id, &m.b.id) {
            Ok(sim) => {
                let a = self.store.get_by_id(&m.a.id).cloned().unwrap_or_else(|| m.a.clone());
                let b = self.store.get_by_id(&m.b.id).cloned().unwrap_or_else(|| m.b.clone());
                self.matchup = Some(Matchup {
                    a,
                    b,
                    prediction: sim.prediction,
                    last_outcome: Some(sim.outcome),
                });
                sim.outcome
            }
            Err(StoreError::TeamNotFound(_))
                if self.store.get_by_id(&m.a.id).is_none()
                    && self.store.get_by_id(&m.b.id).is_none() =>
            {
                let outcome = m.prediction.sample_outcome(self.store.rng_mut());
                if let Some(current) = &mut self.matchup {
                    current.last_outcome = Some(outcome);
                }
                outcome
            }
            Err(err) => {
                self.push_log(format!("[WARN] Cannot simulate matchup: {err}"));
                return;
            }
        };
        let text = match outcome {
            Pick::A => format!("{} win", m.a.name),
            Pick::B => format!("{} win", m.b.name),
            Pick::D => "Draw".to_string(),
        };
        self.push_log(format!("[ALERT] Simulated result: {text}"));
    }

    // Standings screen

    pub fn rebuild_standings(&mut self) {
        let rows = if self.store.is_empty() {
            random_table(self.store.rng_mut(), self.config.standings_rows)
        } else {
            let teams = self.store.teams().to_vec();
            table_from_teams(&teams, self.store.rng_mut())
        };
        self.standings = rows;
        self.standings_scroll = 0;
    }

    pub fn refresh_standings(&mut self) {
        self.standings = random_table(self.store.rng_mut(), self.config.standings_rows);
        self.standings_scroll = 0;
        self.push_log("[INFO] Standings regenerated");
    }

    pub fn simulate_standings_round(&mut self) {
        refresh_from_store(&mut self.standings, &self.store);
        self.standings = simulate_table_round(&self.standings, self.store.rng_mut());
        let synced = sync_to_store(&self.standings, &mut self.store);
        self.push_log(format!(
            "[INFO] Round simulated ({synced} stored teams updated)"
        ));
    }

    pub fn visible_standings(&self) -> Vec<&StandingRow> {
        self.standings_view.apply(&self.standings)
    }

    pub fn move_sort_cursor(&mut self, forward: bool) {
        let n = SortKey::ALL.len();
        self.sort_cursor = if forward {
            (self.sort_cursor + 1) % n
        } else {
            (self.sort_cursor + n - 1) % n
        };
    }

    pub fn apply_sort_cursor(&mut self) {
        let key = SortKey::ALL[self.sort_cursor % SortKey::ALL.len()];
        self.standings_view.select_key(key);
    }

    // Fixtures screen

    pub fn refresh_fixtures(&mut self) {
        let cfg = *self.store.predict_config();
        self.fixtures = random_fixtures(self.store.rng_mut(), self.config.fixtures, &cfg);
        self.fixtures_selected = 0;
    }

    pub fn visible_fixtures(&self) -> Vec<&Fixture> {
        self.fixture_filter.apply(&self.fixtures)
    }

    pub fn cycle_fixture_sort(&mut self) {
        self.fixture_filter.sort = self.fixture_filter.sort.next();
        self.fixtures_selected = 0;
    }

    pub fn open_selected_fixture(&mut self) {
        let Some(fixture) = self.visible_fixtures().get(self.fixtures_selected).map(|f| (*f).clone())
        else {
            return;
        };
        self.matchup = Some(Matchup {
            a: fixture.a,
            b: fixture.b,
            prediction: fixture.prediction,
            last_outcome: None,
        });
        self.screen = Screen::Prediction;
    }

    // Shared filters

    pub fn cycle_sport_filter(&mut self) {
        match self.screen {
            Screen::Standings => {
                self.standings_view.cycle_sport();
                self.standings_scroll = 0;
            }
            Screen::Fixtures => {
                self.fixture_filter.sport = next_sport_filter(self.fixture_filter.sport);
                self.fixtures_selected = 0;
            }
            _ => {}
        }
    }

    fn query_mut(&mut self) -> Option<&mut String> {
        match self.screen {
            Screen::Standings => Some(&mut self.standings_view.query),
            Screen::Fixtures => Some(&mut self.fixture_filter.query),
            _ => None,
        }
    }

    pub fn search_push_char(&mut self, c: char) {
        if let Some(q) = self.query_mut() {
            q.push(c);
        }
        self.clamp_selection();
    }

    pub fn search_backspace(&mut self) {
        if let Some(q) = self.query_mut() {
            q.pop();
        }
        self.clamp_selection();
    }
}
