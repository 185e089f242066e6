use std::time::Duration;

use glam::Vec2;
use waypoint_defence_arena::{query, CombatArena, SaveState};
use waypoint_defence_core::{
    CombatTuning, EnemyKind, Event, ExpiryReason, InventoryEntry, LevelLayout, TowerKind,
};

const FRAME: Duration = Duration::from_millis(16);

fn tuning(enemies: f32) -> CombatTuning {
    let mut tuning = CombatTuning::default();
    tuning.economy.money_multiplier = Some(1.0);
    tuning.projectiles.critical_chance = 0.0;
    tuning.placement.reserved.clear();
    tuning.level = LevelLayout {
        waypoints: vec![Vec2::new(0.0, 0.0), Vec2::new(1_000.0, 0.0)],
    };
    tuning.waves.base_enemies = enemies;
    tuning.waves.enemies_per_wave = 0.0;
    tuning
}

fn with_inventory(arena: &mut CombatArena, kind: TowerKind, count: u32) {
    let mut state = arena.snapshot();
    state.progress.inventory = vec![InventoryEntry { kind, count }];
    arena.restore(&state);
}

/// Ticks until `stop` matches an emitted event, returning every event seen.
fn run_until(arena: &mut CombatArena, max_ticks: usize, stop: impl Fn(&[Event]) -> bool) -> Vec<Event> {
    let mut seen = Vec::new();
    for _ in 0..max_ticks {
        arena.tick(FRAME);
        seen.extend(arena.drain_events());
        if stop(&seen) {
            break;
        }
    }
    seen
}

fn deaths(events: &[Event]) -> Vec<(u32, u32, f32)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyDied {
                reward,
                streak,
                combo_multiplier,
                ..
            } => Some((*reward, *streak, *combo_multiplier)),
            _ => None,
        })
        .collect()
}

#[test]
fn one_shot_kill_pays_the_base_reward() {
    let mut arena = CombatArena::new(tuning(1.0)).expect("valid tuning");
    with_inventory(&mut arena, TowerKind::Cannon, 1);
    let _ = arena
        .place_tower(TowerKind::Cannon, Vec2::new(100.0, 40.0))
        .expect("valid placement");
    let _ = arena.drain_events();

    let money_before = query::money(arena.world());
    let events = run_until(&mut arena, 500, |seen| !deaths(seen).is_empty());

    assert_eq!(deaths(&events), vec![(10, 1, 1.0)]);
    assert_eq!(query::money(arena.world()), money_before + 10);
    assert_eq!(query::live_enemy_count(arena.world()), 0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::EnemyDamaged { .. }))
            .count(),
        1
    );
}

#[test]
fn second_quick_kill_pays_the_combo() {
    let mut arena = CombatArena::new(tuning(2.0)).expect("valid tuning");
    with_inventory(&mut arena, TowerKind::Cannon, 1);
    let _ = arena
        .place_tower(TowerKind::Cannon, Vec2::new(100.0, 40.0))
        .expect("valid placement");

    let events = run_until(&mut arena, 1_000, |seen| deaths(seen).len() == 2);

    assert_eq!(deaths(&events), vec![(10, 1, 1.0), (15, 2, 1.5)]);
    assert_eq!(query::streak(arena.world()), 2);
}

#[test]
fn streak_resets_after_a_four_second_gap() {
    let mut tuning = tuning(2.0);
    tuning.waves.spawn_delay_increment_ms = 4_200.0;
    tuning.waves.spawn_delay_ceiling_ms = 10_000.0;
    let mut arena = CombatArena::new(tuning).expect("valid tuning");
    with_inventory(&mut arena, TowerKind::Cannon, 1);
    let _ = arena
        .place_tower(TowerKind::Cannon, Vec2::new(100.0, 40.0))
        .expect("valid placement");

    let events = run_until(&mut arena, 2_000, |seen| deaths(seen).len() == 2);

    assert_eq!(deaths(&events), vec![(10, 1, 1.0), (10, 1, 1.0)]);
}

#[test]
fn boss_wave_spawns_the_boss_last() {
    let mut arena = CombatArena::new(tuning(8.0)).expect("valid tuning");
    let mut state = arena.snapshot();
    state.progress.wave = 5;
    arena.restore(&state);

    let events = run_until(&mut arena, 5_000, |seen| {
        seen.iter()
            .any(|event| matches!(event, Event::EnemySpawned { kind: EnemyKind::Boss, .. }))
    });

    let kinds: Vec<EnemyKind> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds.len(), 8);
    assert_eq!(kinds.last(), Some(&EnemyKind::Boss));
    assert!(kinds[..7].iter().all(|kind| *kind != EnemyKind::Boss));
    assert!(query::is_boss_wave(arena.world()));
}

#[test]
fn reaching_the_end_costs_a_life_and_pays_nothing() {
    let mut arena = CombatArena::new(tuning(1.0)).expect("valid tuning");
    let money_before = query::money(arena.world());

    let events = run_until(&mut arena, 2_000, |seen| {
        seen.iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }))
    });

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyReachedEnd { .. })));
    assert!(events.contains(&Event::LifeLost { remaining: 19 }));
    assert!(deaths(&events).is_empty());
    assert!(events.contains(&Event::WaveCompleted {
        wave: 1,
        bonus: 50,
        perfect: false
    }));
    assert_eq!(query::money(arena.world()), money_before + 50);
}

#[test]
fn ticks_after_game_over_are_ignored() {
    let mut tuning = tuning(3.0);
    tuning.economy.starting_lives = 2;
    let mut arena = CombatArena::new(tuning).expect("valid tuning");

    let events = run_until(&mut arena, 5_000, |seen| {
        seen.iter()
            .any(|event| matches!(event, Event::GameOver { .. }))
    });
    assert!(query::is_game_over(arena.world()));
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::GameOver { .. }))
            .count(),
        1
    );

    let clock = query::clock(arena.world());
    arena.tick(FRAME);
    assert!(arena.drain_events().is_empty());
    assert_eq!(query::clock(arena.world()), clock);
}

#[test]
fn shots_at_enemies_that_leave_are_wasted() {
    let mut tuning = tuning(1.0);
    tuning.projectiles.speed = 60.0;
    tuning.level = LevelLayout {
        waypoints: vec![Vec2::new(0.0, 0.0), Vec2::new(150.0, 0.0)],
    };
    let mut arena = CombatArena::new(tuning).expect("valid tuning");
    with_inventory(&mut arena, TowerKind::Bow, 1);
    let _ = arena
        .place_tower(TowerKind::Bow, Vec2::new(0.0, 150.0))
        .expect("valid placement");

    let events = run_until(&mut arena, 2_000, |seen| {
        seen.iter()
            .any(|event| matches!(event, Event::EnemyReachedEnd { .. }))
    });
    let mut events = events;
    events.extend(run_until(&mut arena, 5, |_| false));

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileFired { .. })));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ProjectileExpired {
            reason: ExpiryReason::TargetLost,
            ..
        }
    )));
    assert!(deaths(&events).is_empty());
}

#[test]
fn save_state_round_trips_through_json() {
    let mut arena = CombatArena::new(tuning(4.0)).expect("valid tuning");
    for _ in 0..100 {
        arena.tick(FRAME);
    }
    let state = arena.snapshot();
    let encoded = serde_json::to_string(&state).expect("serialize save");
    let decoded: SaveState = serde_json::from_str(&encoded).expect("parse save");
    assert_eq!(decoded, state);

    let mut resumed = CombatArena::new(tuning(4.0)).expect("valid tuning");
    resumed.restore(&decoded);
    let events = resumed.drain_events();
    assert!(events.contains(&Event::ProgressRestored));
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::WaveStarted { wave: 1, .. })),
        "a wave in progress is announced again"
    );
    assert_eq!(resumed.snapshot().director, state.director);
}

#[test]
fn losing_the_last_life_does_not_complete_the_wave() {
    let mut tuning = tuning(1.0);
    tuning.economy.starting_lives = 1;
    let mut arena = CombatArena::new(tuning).expect("valid tuning");
    let money_before = query::money(arena.world());

    let events = run_until(&mut arena, 1_000, |_| false);

    assert!(query::is_game_over(arena.world()));
    assert!(events.contains(&Event::GameOver { wave: 1, score: 0 }));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. })),
        "a lost run never pays a wave bonus"
    );
    assert_eq!(query::wave(arena.world()), 1);
    assert_eq!(query::money(arena.world()), money_before);
}
