use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

use squadcraft::fixtures::{FixtureFilter, FixtureSort, random_fixtures};
use squadcraft::predict::{PredictConfig, SideRating, predict};
use squadcraft::standings::{SortKey, StandingsView, random_table, simulate_table_round};
use squadcraft::store::TeamStore;

fn bench_predict(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let a = SideRating::with_power(82.0);
    let b = SideRating::with_power(67.0);
    let basic = PredictConfig::default();
    let form = PredictConfig::form_aware();

    c.bench_function("predict_basic", |bench| {
        bench.iter(|| {
            let p = predict(black_box(&a), black_box(&b), &basic, &mut rng);
            black_box(p.pa);
        })
    });
    c.bench_function("predict_form_aware", |bench| {
        bench.iter(|| {
            let p = predict(black_box(&a), black_box(&b), &form, &mut rng);
            black_box(p.pa);
        })
    });
}

fn bench_simulate_match(c: &mut Criterion) {
    let mut store = TeamStore::seeded(2);
    let ids: Vec<_> = store.teams().iter().map(|t| t.id.clone()).collect();

    c.bench_function("store_simulate_match", |bench| {
        bench.iter(|| {
            let sim = store.simulate_match(&ids[0], &ids[1]).unwrap();
            black_box(sim.outcome);
        })
    });
}

fn bench_standings(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let rows = random_table(&mut rng, 64);
    let mut view = StandingsView::default();
    view.select_key(SortKey::Gd);

    c.bench_function("standings_sort_64", |bench| {
        bench.iter(|| {
            let out = view.apply(black_box(&rows));
            black_box(out.len());
        })
    });
    c.bench_function("standings_round_64", |bench| {
        bench.iter(|| {
            let next = simulate_table_round(black_box(&rows), &mut rng);
            black_box(next.len());
        })
    });
}

fn bench_fixtures(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let fixtures = random_fixtures(&mut rng, 100, &PredictConfig::default());
    let filter = FixtureFilter {
        sort: FixtureSort::Confidence,
        ..Default::default()
    };

    c.bench_function("fixtures_filter_100", |bench| {
        bench.iter(|| {
            let out = filter.apply(black_box(&fixtures));
            black_box(out.len());
        })
    });
}

criterion_group!(
    perf,
    bench_predict,
    bench_simulate_match,
    bench_standings,
    bench_fixtures
);
criterion_main!(perf);
