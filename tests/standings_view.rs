use rand::SeedableRng;
use rand::rngs::StdRng;

use squadcraft::standings::{
    SortDir, SortKey, Sport, StandingsView, random_table, refresh_from_store,
    simulate_table_round, sync_to_store, table_from_teams,
};
use squadcraft::store::TeamStore;

#[test]
fn selecting_the_same_key_toggles_direction() {
    let mut rng = StdRng::seed_from_u64(200);
    let rows = random_table(&mut rng, 20);
    let mut view = StandingsView::default();

    let desc = view.apply(&rows);
    assert!(desc.windows(2).all(|w| w[0].points() >= w[1].points()));

    view.select_key(SortKey::Pts);
    assert_eq!(view.dir, SortDir::Asc);
    let asc = view.apply(&rows);
    assert!(asc.windows(2).all(|w| w[0].points() <= w[1].points()));

    view.select_key(SortKey::Name);
    assert_eq!(view.dir, SortDir::Asc);
    let by_name = view.apply(&rows);
    assert!(
        by_name
            .windows(2)
            .all(|w| w[0].name.to_lowercase() <= w[1].name.to_lowercase())
    );

    view.select_key(SortKey::Gd);
    assert_eq!(view.dir, SortDir::Desc);
}

#[test]
fn filters_combine_sport_and_query() {
    let mut rng = StdRng::seed_from_u64(201);
    let rows = random_table(&mut rng, 60);
    let target = rows[0].name.clone();
    let view = StandingsView {
        sport: Some(rows[0].sport),
        query: target.to_uppercase(),
        ..Default::default()
    };
    let out = view.apply(&rows);
    assert!(!out.is_empty());
    assert!(out.iter().all(|r| r.sport == rows[0].sport && r.name == target));

    let mut cycling = StandingsView::default();
    let sports: Vec<Option<Sport>> = (0..4)
        .map(|_| {
            cycling.cycle_sport();
            cycling.sport
        })
        .collect();
    assert_eq!(
        sports,
        vec![
            Some(Sport::Football),
            Some(Sport::Basketball),
            Some(Sport::Hockey),
            None
        ]
    );
}

#[test]
fn simulated_round_syncs_back_into_the_store() {
    let mut store = TeamStore::seeded(202);
    let teams = store.teams().to_vec();
    let rows = table_from_teams(&teams, store.rng_mut());
    let next = simulate_table_round(&rows, store.rng_mut());

    assert_eq!(sync_to_store(&next, &mut store), teams.len());
    for row in &next {
        let team = store.get_by_id(&row.team_id).unwrap();
        assert_eq!(team.form, row.form);
        assert_eq!(team.scored, row.gf);
        assert_eq!(team.conceded, row.ga);
        assert_eq!(row.played, rows.iter().find(|r| r.team_id == row.team_id).unwrap().played + 1);
    }
}

#[test]
fn demo_rows_do_not_touch_the_store() {
    let mut store = TeamStore::seeded(203);
    let before = store.teams().to_vec();
    let mut rng = StdRng::seed_from_u64(204);
    let demo = random_table(&mut rng, 10);
    assert_eq!(sync_to_store(&demo, &mut store), 0);
    assert_eq!(store.teams(), &before[..]);
}

#[test]
fn rows_refresh_from_a_changed_store_before_a_round() {
    let mut store = TeamStore::seeded(205);
    let teams = store.teams().to_vec();
    let mut rows = table_from_teams(&teams, store.rng_mut());

    for _ in 0..10 {
        store.simulate_match(&teams[0].id, &teams[1].id).unwrap();
    }
    let live = store.get_by_id(&teams[0].id).unwrap().clone();
    assert!(live.scored >= teams[0].scored);

    assert_eq!(refresh_from_store(&mut rows, &store), teams.len());
    let next = simulate_table_round(&rows, store.rng_mut());
    sync_to_store(&next, &mut store);

    let after = store.get_by_id(&teams[0].id).unwrap();
    assert!(after.scored >= live.scored);
    assert!(after.conceded >= live.conceded);
    assert_eq!(after.form.results()[..4], live.form.results()[1..]);
    assert_eq!(after.power, live.power);
}
