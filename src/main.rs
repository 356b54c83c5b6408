use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use squadcraft::config::AppConfig;
use squadcraft::predict::{Pick, Prediction};
use squadcraft::standings::{SortKey, sport_filter_label};
use squadcraft::state::{AppState, Screen};
use squadcraft::team::{FORM_LEN, Outcome, TeamColor};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.draft.is_some() {
            self.on_draft_key(key);
            return;
        }
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.state.set_screen(Screen::Teams),
            KeyCode::Char('2') => self.state.set_screen(Screen::Prediction),
            KeyCode::Char('3') => self.state.set_screen(Screen::Standings),
            KeyCode::Char('4') => self.state.set_screen(Screen::Fixtures),
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            _ => match self.state.screen {
                Screen::Teams => self.on_teams_key(key),
                Screen::Prediction => self.on_prediction_key(key),
                Screen::Standings => self.on_standings_key(key),
                Screen::Fixtures => self.on_fixtures_key(key),
            },
        }
    }

    fn on_teams_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.state.begin_create(),
            KeyCode::Char('a') => self.state.add_random_team(),
            KeyCode::Char('r') => self.state.reseed_teams(),
            KeyCode::Char('x') | KeyCode::Delete => self.state.delete_selected(),
            KeyCode::Char('e') => self.state.simulate_exhibition_selected(),
            KeyCode::Char('p') | KeyCode::Enter => {
                self.state.open_matchup();
                self.state.screen = Screen::Prediction;
            }
            _ => {}
        }
    }

    fn on_prediction_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.state.rerun_prediction(),
            KeyCode::Char('w') => self.state.swap_matchup(),
            KeyCode::Char('s') | KeyCode::Enter => self.state.simulate_matchup(),
            KeyCode::Char('p') => self.state.open_matchup(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.set_screen(Screen::Teams),
            _ => {}
        }
    }

    fn on_standings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.state.move_sort_cursor(false),
            KeyCode::Char('l') | KeyCode::Right => self.state.move_sort_cursor(true),
            KeyCode::Char('s') | KeyCode::Enter => self.state.apply_sort_cursor(),
            KeyCode::Char('f') => self.state.cycle_sport_filter(),
            KeyCode::Char('g') => self.state.refresh_standings(),
            KeyCode::Char('t') => self.state.rebuild_standings(),
            KeyCode::Char('o') => self.state.simulate_standings_round(),
            KeyCode::Char('/') => self.state.search_active = true,
            _ => {}
        }
    }

    fn on_fixtures_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.state.cycle_fixture_sort(),
            KeyCode::Char('f') => self.state.cycle_sport_filter(),
            KeyCode::Char('g') => self.state.refresh_fixtures(),
            KeyCode::Enter => self.state.open_selected_fixture(),
            KeyCode::Char('/') => self.state.search_active = true,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.state.search_active = false,
            KeyCode::Backspace => self.state.search_backspace(),
            KeyCode::Char(c) => self.state.search_push_char(c),
            _ => {}
        }
    }

    fn on_draft_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.state.cancel_create(),
            KeyCode::Enter => self.state.save_draft(),
            KeyCode::Backspace => self.state.draft_backspace(),
            KeyCode::Left => self.state.draft_adjust_power(-1),
            KeyCode::Right => self.state.draft_adjust_power(1),
            KeyCode::Down => self.state.draft_adjust_power(-5),
            KeyCode::Up => self.state.draft_adjust_power(5),
            KeyCode::Tab => self.state.draft_cycle_color(),
            KeyCode::F(n) if (1..=FORM_LEN as u8).contains(&n) => {
                self.state.draft_cycle_form(n as usize - 1)
            }
            KeyCode::Char('r') if ctrl => self.state.draft_randomize(),
            KeyCode::Char(c) if !ctrl => self.state.draft_push_char(c),
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Teams => render_teams(frame, chunks[1], &app.state),
        Screen::Prediction => render_prediction(frame, chunks[1], &app.state),
        Screen::Standings => render_standings(frame, chunks[1], &app.state),
        Screen::Fixtures => render_fixtures(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Log").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.draft.is_some() {
        render_draft_overlay(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Teams => format!("SQUADCRAFT TEAMS | {} teams", state.store.len()),
        Screen::Prediction => "SQUADCRAFT PREDICTION".to_string(),
        Screen::Standings => format!(
            "SQUADCRAFT STANDINGS | {} | Sort: {} {}{}",
            sport_filter_label(state.standings_view.sport),
            state.standings_view.key.label(),
            state.standings_view.dir.arrow(),
            search_suffix(state, &state.standings_view.query)
        ),
        Screen::Fixtures => format!(
            "SQUADCRAFT FIXTURES | {} | Sort: {}{}",
            sport_filter_label(state.fixture_filter.sport),
            state.fixture_filter.sort.label(),
            search_suffix(state, &state.fixture_filter.query)
        ),
    };
    let line1 = format!("  (o)  {}", title);
    let line2 = "  /|\\".to_string();
    let line3 = "  / \\".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn search_suffix(state: &AppState, query: &str) -> String {
    if state.search_active {
        format!(" | Search: {query}_")
    } else if query.trim().is_empty() {
        String::new()
    } else {
        format!(" | Search: {query}")
    }
}

fn footer_text(state: &AppState) -> String {
    if state.draft.is_some() {
        return "Type name | ←/→ ↑/↓ Power | Tab Color | F1-F5 Form | Ctrl+R Random | Enter Save | Esc Cancel".to_string();
    }
    if state.search_active {
        return "Type to filter | Backspace Delete | Enter/Esc Done".to_string();
    }
    match state.screen {
        Screen::Teams => {
            "1-4 Screens | j/k Move | n New | a Add random | x Delete | e Exhibition | p Predict | r Reseed | ? Help | q Quit".to_string()
        }
        Screen::Prediction => {
            "1-4 Screens | r Rerun | w Swap | s Simulate | p Pick selected | b Back | ? Help | q Quit".to_string()
        }
        Screen::Standings => {
            "1-4 Screens | ←/→ Column | s Sort | f Sport | / Search | o Sim round | g Demo | t Teams | ? Help | q Quit".to_string()
        }
        Screen::Fixtures => {
            "1-4 Screens | j/k Move | s Sort | f Sport | / Search | Enter Predict | g Refresh | ? Help | q Quit".to_string()
        }
    }
}

fn team_color(color: TeamColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Win => Color::Green,
        Outcome::Draw => Color::Yellow,
        Outcome::Loss => Color::Red,
    }
}

fn form_spans(results: impl Iterator<Item = Outcome>) -> Line<'static> {
    let spans: Vec<Span> = results
        .map(|o| Span::styled(format!("{} ", o.letter()), Style::default().fg(outcome_color(o))))
        .collect();
    Line::from(spans)
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(columns[0]);

    let widths = team_columns();
    render_row_header(
        frame,
        sections[0],
        &widths,
        &["Team", "Pow", "Form", "GF", "GA", "Atk", ""],
    );

    let teams = state.store.teams();
    let list_area = sections[1];
    if teams.is_empty() {
        let empty = Paragraph::new("No teams yet. Press n to create one or a to add a random team")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let (start, end) = visible_range(state.selected, teams.len(), list_area.height as usize);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let team = &teams[idx];
        let selected = idx == state.selected;
        let base = if selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new("").style(base), row_area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        render_cell_text(frame, cols[0], &team.name, base.fg(team_color(team.color)));
        render_cell_text(frame, cols[1], &team.power.to_string(), base);
        frame.render_widget(Paragraph::new(form_spans(team.form.iter())).style(base), cols[2]);
        render_cell_text(frame, cols[3], &team.scored.to_string(), base);
        render_cell_text(frame, cols[4], &team.conceded.to_string(), base);
        render_cell_text(frame, cols[5], &format!("{:.1}", team.attack_index()), base);
        let marker = if team.is_user_created { "USER" } else { "" };
        render_cell_text(frame, cols[6], marker, base.fg(Color::Cyan));
    }

    let detail = Paragraph::new(team_detail_text(state))
        .block(Block::default().title("Team").borders(Borders::LEFT));
    frame.render_widget(detail, columns[1]);
}

fn team_columns() -> [Constraint; 7] {
    [
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
    ]
}

fn team_detail_text(state: &AppState) -> String {
    let Some(team) = state.selected_team() else {
        return "No team selected".to_string();
    };
    let mut lines = vec![
        team.name.clone(),
        format!("Id: {}", team.id),
        format!("Power: {}", team.power),
        format!("Color: {}", team.color.hex()),
        format!("Form: {} ({} pts)", team.form.letters(), team.form.points()),
        format!("Win rate: {:.0}%", team.form.win_rate()),
        format!("Goals: {} for / {} against", team.scored, team.conceded),
        format!("Attack index: {:.1}", team.attack_index()),
        format!("Created: {}", team.created_at.format("%Y-%m-%d %H:%M")),
    ];
    if team.is_user_created {
        lines.push("Custom team (x deletes)".to_string());
    } else {
        lines.push("Demo team".to_string());
    }
    lines.join("\n")
}

fn render_prediction(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(m) = &state.matchup else {
        let empty = Paragraph::new("Need at least two teams. Select one on the Teams screen and press p")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            m.a.name.clone(),
            Style::default()
                .fg(team_color(m.a.color))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  vs  "),
        Span::styled(
            m.b.name.clone(),
            Style::default()
                .fg(team_color(m.b.color))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let forms = Line::from(vec![
        Span::raw(format!("Pow {}  ", m.a.power)),
        Span::raw(m.a.form.letters()),
        Span::raw("    "),
        Span::raw(format!("Pow {}  ", m.b.power)),
        Span::raw(m.b.form.letters()),
    ]);
    frame.render_widget(Paragraph::new(vec![title, forms]), rows[0]);

    frame.render_widget(win_bar_chart(&m.prediction), rows[1]);

    let mut lines = prediction_lines(&m.prediction, &m.a.name, &m.b.name);
    if let Some(outcome) = m.last_outcome {
        let text = match outcome {
            Pick::A => format!("Last result: {} win", m.a.name),
            Pick::B => format!("Last result: {} win", m.b.name),
            Pick::D => "Last result: Draw".to_string(),
        };
        lines.push(String::new());
        lines.push(text);
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), rows[2]);
}

fn prediction_lines(p: &Prediction, name_a: &str, name_b: &str) -> Vec<String> {
    let odds = p.implied_odds();
    let pick = match p.pick {
        Pick::A => name_a.to_string(),
        Pick::B => name_b.to_string(),
        Pick::D => "Draw".to_string(),
    };
    vec![
        format!(
            "{name_a} {:.1}% | Draw {:.1}% | {name_b} {:.1}%",
            p.pa * 100.0,
            p.pd * 100.0,
            p.pb * 100.0
        ),
        format!("Pick: {pick} ({:.0}% confidence)", p.confidence * 100.0),
        format!("Expected score: {} - {}", p.exp_a, p.exp_b),
        format!(
            "Implied odds: {:.2} / {:.2} / {:.2}",
            odds.a, odds.d, odds.b
        ),
    ]
}

fn win_bar_chart(p: &Prediction) -> BarChart<'static> {
    let a = Bar::default()
        .value((p.pa * 100.0).round() as u64)
        .label("A".into())
        .style(Style::default().fg(Color::Green));
    let d = Bar::default()
        .value((p.pd * 100.0).round() as u64)
        .label("D".into())
        .style(Style::default().fg(Color::Yellow));
    let b = Bar::default()
        .value((p.pb * 100.0).round() as u64)
        .label("B".into())
        .style(Style::default().fg(Color::Red));

    BarChart::default()
        .data(BarGroup::default().bars(&[a, d, b]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = standings_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    render_cell_text(
        frame,
        header_cols[0],
        "#",
        Style::default().add_modifier(Modifier::BOLD),
    );
    for (i, key) in SortKey::ALL.iter().enumerate() {
        let mut label = key.label().to_string();
        if *key == state.standings_view.key {
            label.push_str(state.standings_view.dir.arrow());
        }
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if i == state.sort_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        render_cell_text(frame, header_cols[i + 1], &label, style);
    }

    let rows = state.visible_standings();
    let list_area = sections[1];
    if rows.is_empty() {
        let empty = Paragraph::new("No teams match this filter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let max_start = rows.len().saturating_sub(visible);
    let start = state.standings_scroll.min(max_start);
    let end = (start + visible).min(rows.len());

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        let row = rows[idx];
        let style = Style::default();

        // Column order follows SortKey::ALL.
        render_cell_text(frame, cols[0], &(idx + 1).to_string(), style.fg(Color::DarkGray));
        render_cell_text(frame, cols[1], &row.name, style.fg(team_color(row.color)));
        render_cell_text(frame, cols[2], &row.played.to_string(), style);
        render_cell_text(frame, cols[3], &row.wins.to_string(), style);
        render_cell_text(frame, cols[4], &row.draws.to_string(), style);
        render_cell_text(frame, cols[5], &row.losses.to_string(), style);
        render_cell_text(frame, cols[6], &row.gf.to_string(), style);
        render_cell_text(frame, cols[7], &row.ga.to_string(), style);
        render_cell_text(frame, cols[8], &format!("{:+}", row.goal_diff()), style);
        render_cell_text(
            frame,
            cols[9],
            &row.points().to_string(),
            style.add_modifier(Modifier::BOLD),
        );
        render_cell_text(frame, cols[10], &row.power.to_string(), style);
        frame.render_widget(Paragraph::new(form_spans(row.form.iter())), cols[11]);
    }
}

fn standings_columns() -> [Constraint; 12] {
    [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(11),
    ]
}

fn render_fixtures(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = fixture_columns();
    render_row_header(
        frame,
        sections[0],
        &widths,
        &["Starts", "Sport", "Match", "A/D/B", "Pick", "Conf"],
    );

    let fixtures = state.visible_fixtures();
    let list_area = sections[1];
    if fixtures.is_empty() {
        let empty = Paragraph::new("No fixtures match this filter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let (start, end) = visible_range(
        state.fixtures_selected,
        fixtures.len(),
        list_area.height as usize,
    );
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let f = fixtures[idx];
        let style = if idx == state.fixtures_selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new("").style(style), row_area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        let p = &f.prediction;
        let pick = match p.pick {
            Pick::A => f.a.short_name(),
            Pick::B => f.b.short_name(),
            Pick::D => "Draw",
        };
        render_cell_text(frame, cols[0], &format_starts_in(f.starts_in_min), style);
        render_cell_text(frame, cols[1], f.sport.label(), style);
        render_cell_text(frame, cols[2], &format!("{} vs {}", f.a.name, f.b.name), style);
        render_cell_text(
            frame,
            cols[3],
            &format!(
                "{:.0}/{:.0}/{:.0}",
                p.pa * 100.0,
                p.pd * 100.0,
                p.pb * 100.0
            ),
            style,
        );
        render_cell_text(frame, cols[4], pick, style);
        render_cell_text(frame, cols[5], &format!("{:.0}%", p.confidence * 100.0), style);
    }
}

fn fixture_columns() -> [Constraint; 6] {
    [
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Min(30),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(6),
    ]
}

fn format_starts_in(minutes: u32) -> String {
    if minutes >= 60 {
        format!("{}h{:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

fn render_row_header(frame: &mut Frame, area: Rect, widths: &[Constraint], labels: &[&str]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    for (col, label) in cols.iter().zip(labels) {
        render_cell_text(frame, *col, label, style);
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(4);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_draft_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(draft) = &state.draft else {
        return;
    };
    let popup_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup_area);

    let name_style = if draft.can_save() {
        Style::default()
    } else {
        Style::default().fg(Color::Red)
    };
    let slots: Vec<Span> = draft
        .form
        .iter()
        .enumerate()
        .map(|(i, o)| {
            Span::styled(
                format!("F{} {}  ", i + 1, o.letter()),
                Style::default().fg(outcome_color(o)),
            )
        })
        .collect();
    let lines = vec![
        Line::from(vec![Span::raw("Name:  "), Span::styled(format!("{}_", draft.name), name_style)]),
        Line::from(format!("Power: {}", draft.power)),
        Line::from(vec![
            Span::raw("Color: "),
            Span::styled("■■■", Style::default().fg(team_color(draft.color))),
        ]),
        Line::from(slots),
        Line::from(""),
        Line::from(Span::styled(
            if draft.can_save() {
                "Enter to save"
            } else {
                "Name needs at least 2 characters"
            },
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let form = Paragraph::new(lines)
        .block(Block::default().title("New team").borders(Borders::ALL));
    frame.render_widget(form, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "SquadCraft - Help",
        "",
        "Global:",
        "  1 / 2 / 3 / 4  Teams / Prediction / Standings / Fixtures",
        "  Tab            Next screen",
        "  j/k or ↑/↓     Move",
        "  ?              Toggle help",
        "  q              Quit",
        "",
        "Teams:",
        "  n  New team    a  Add random    x  Delete custom team",
        "  e  Exhibition  p  Predict vs next team    r  Reseed",
        "",
        "Prediction:",
        "  r  Rerun    w  Swap sides    s  Simulate match",
        "",
        "Standings / Fixtures:",
        "  ←/→ + s  Sort by column     f  Sport filter",
        "  /        Search by name     o  Simulate round",
        "  g        Regenerate         Enter  Predict fixture",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use squadcraft::team::{Form, TeamPatch};

    use super::*;

    #[test]
    fn detail_panel_shows_win_rate_as_percent() {
        let mut state = AppState::new(AppConfig {
            seed: Some(1),
            ..Default::default()
        });
        let id = state.store.teams()[0].id.clone();
        let patch = TeamPatch {
            form: Some(Form::new([
                Outcome::Win,
                Outcome::Win,
                Outcome::Draw,
                Outcome::Loss,
                Outcome::Win,
            ])),
            ..Default::default()
        };
        assert!(state.store.update(&id, &patch));
        state.selected = 0;

        let text = team_detail_text(&state);
        assert!(text.contains("Win rate: 60%"), "{text}");
    }
}
