use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;

use squadcraft::config::AppConfig;
use squadcraft::predict::PredictConfig;
use squadcraft::store::TeamStore;
use squadcraft::team::{Team, TeamId};

const DEFAULT_TRIALS: usize = 200;
const DEFAULT_SEED: u64 = 2024;

#[derive(Debug, Clone)]
struct SeasonResult {
    points: Vec<u32>,
    final_power: Vec<u8>,
    title_share: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
struct TeamSummary {
    id: TeamId,
    name: String,
    start_power: u8,
    mean_points: f64,
    title_share: f64,
    mean_final_power: f64,
}

#[derive(Debug, Clone, Serialize)]
struct Report {
    seed: u64,
    trials: usize,
    matches_per_season: usize,
    teams: Vec<TeamSummary>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    let teams = parse_arg::<usize>("--teams")
        .unwrap_or(config.teams)
        .clamp(2, 64);
    let trials = parse_arg::<usize>("--trials")
        .unwrap_or(DEFAULT_TRIALS)
        .clamp(1, 100_000);
    let seed = parse_arg::<u64>("--seed")
        .or(config.seed)
        .unwrap_or(DEFAULT_SEED);
    let json = has_flag("--json");
    let predict = config.predict_config(config.prediction_model);

    let mut roster_store = TeamStore::seeded(seed);
    roster_store.reseed(teams);
    let roster = roster_store.teams().to_vec();
    if roster.len() < 2 {
        return Err(anyhow!("need at least two teams, got {}", roster.len()));
    }

    eprintln!(
        "[INFO] Simulating {trials} seasons for {} teams (seed {seed})",
        roster.len()
    );
    let results = (0..trials)
        .into_par_iter()
        .map(|trial| run_season(&roster, predict, seed.wrapping_add(trial as u64)))
        .collect::<Result<Vec<_>>>()?;

    let report = summarize(&roster, &results, seed);
    eprintln!("[INFO] Done: {} matches per season", report.matches_per_season);
    if json {
        let out = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{out}");
    } else {
        print_table(&report);
    }
    Ok(())
}

/// Double round-robin: every ordered pair meets once.
fn run_season(roster: &[Team], predict: PredictConfig, seed: u64) -> Result<SeasonResult> {
    let mut store = TeamStore::empty(StdRng::seed_from_u64(seed)).with_predict_config(predict);
    store.set_all(roster.to_vec());
    let ids: Vec<TeamId> = roster.iter().map(|t| t.id.clone()).collect();
    let mut points = vec![0u32; ids.len()];

    for (i, home) in ids.iter().enumerate() {
        for (j, away) in ids.iter().enumerate() {
            if i == j {
                continue;
            }
            let sim = store
                .simulate_match(home, away)
                .with_context(|| format!("simulate {home} vs {away}"))?;
            points[i] += sim.outcome.outcome_for_a().points();
            points[j] += sim.outcome.outcome_for_b().points();
        }
    }

    let best = points.iter().copied().max().unwrap_or(0);
    let leaders = points.iter().filter(|p| **p == best).count().max(1);
    let title_share = points
        .iter()
        .map(|p| if *p == best { 1.0 / leaders as f64 } else { 0.0 })
        .collect();
    let final_power = ids
        .iter()
        .map(|id| store.get_by_id(id).map(|t| t.power).unwrap_or(0))
        .collect();

    Ok(SeasonResult {
        points,
        final_power,
        title_share,
    })
}

fn summarize(roster: &[Team], results: &[SeasonResult], seed: u64) -> Report {
    let n = results.len().max(1) as f64;
    let mut teams: Vec<TeamSummary> = roster
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let mean_points = results.iter().map(|r| r.points[idx] as f64).sum::<f64>() / n;
            let title_share = results.iter().map(|r| r.title_share[idx]).sum::<f64>() / n;
            let mean_final_power =
                results.iter().map(|r| r.final_power[idx] as f64).sum::<f64>() / n;
            TeamSummary {
                id: team.id.clone(),
                name: team.name.clone(),
                start_power: team.power,
                mean_points,
                title_share,
                mean_final_power,
            }
        })
        .collect();
    teams.sort_by(|a, b| b.mean_points.total_cmp(&a.mean_points));

    Report {
        seed,
        trials: results.len(),
        matches_per_season: roster.len() * roster.len().saturating_sub(1),
        teams,
    }
}

fn print_table(report: &Report) {
    println!(
        "season_sim: {} trials, {} matches per season, seed {}",
        report.trials, report.matches_per_season, report.seed
    );
    println!(
        "{:<24} {:>5} {:>9} {:>8} {:>9}",
        "Team", "Pow", "Pts(avg)", "Title%", "Pow(end)"
    );
    for t in &report.teams {
        println!(
            "{:<24} {:>5} {:>9.1} {:>7.1}% {:>9.1}",
            t.name,
            t.start_power,
            t.mean_points,
            t.title_share * 100.0,
            t.mean_final_power
        );
    }
}

fn parse_arg<T: FromStr>(name: &str) -> Option<T> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<T>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<T>()
        {
            return Some(v);
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
