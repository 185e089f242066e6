use glam::Vec2;
use waypoint_defence_core::{
    Achievement, CombatTuning, Command, Event, InventoryEntry, TowerKind,
};
use waypoint_defence_system_achievements::Achievements;
use waypoint_defence_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: Vec<Command>, events: &mut Vec<Event>) {
    for command in commands {
        world::apply(world, command, events);
    }
}

#[test]
fn fiftieth_tower_unlocks_tower_lord_bonus() {
    let mut tuning = CombatTuning::default();
    tuning.economy.money_multiplier = Some(1.0);
    let mut world = World::new(tuning).expect("valid tuning");
    let mut system = Achievements::new();

    let mut snapshot = query::progress(&world);
    snapshot.towers_built = 49;
    snapshot.inventory = vec![InventoryEntry {
        kind: TowerKind::Bow,
        count: 1,
    }];
    let mut events = Vec::new();
    world::apply(&mut world, Command::RestoreProgress { snapshot }, &mut events);

    let mut commands = Vec::new();
    system.handle(&events, &query::progress(&world), &mut commands);
    assert!(commands.is_empty(), "49 towers is one short");

    events.clear();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Bow,
            position: Vec2::new(300.0, 600.0),
        },
        &mut events,
    );
    assert!(
        matches!(events.as_slice(), [Event::TowerPlaced { .. }]),
        "placement failed: {events:?}"
    );

    system.handle(&events, &query::progress(&world), &mut commands);
    assert_eq!(
        commands,
        vec![Command::UnlockAchievement {
            achievement: Achievement::TowerLord
        }]
    );

    events.clear();
    apply_all(&mut world, commands, &mut events);
    assert_eq!(
        events,
        vec![Event::AchievementUnlocked {
            achievement: Achievement::TowerLord
        }]
    );
    assert!((query::money_multiplier(&world) - 1.1).abs() < 1e-6);

    let mut again = Vec::new();
    system.handle(&events, &query::progress(&world), &mut again);
    assert!(again.is_empty());
}
