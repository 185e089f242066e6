#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat arena that owns the authoritative world together with every pure
//! system and drives them in a fixed per-tick order.
//!
//! Each [`CombatArena::tick`] runs, in order: the world tick (clock, streak
//! decay, enemy movement and status effects, tower cooldowns), the wave
//! director, tower targeting and aiming, tower firing, projectile resolution
//! and finally achievement evaluation. Commands produced by a stage are
//! applied before the next stage reads the world, so a projectile can hit an
//! enemy that moved this tick and a dead enemy is never retargeted.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;
use waypoint_defence_core::{
    CombatTuning, Command, Event, GlobalUpgrade, PlacementError, ProgressSnapshot,
    PurchaseError, TowerId, TowerKind, TowerTarget, TowerUpgrade, UpgradeError,
};
use waypoint_defence_system_achievements::Achievements;
use waypoint_defence_system_tower_combat::TowerCombat;
use waypoint_defence_system_tower_targeting::TowerTargeting;
use waypoint_defence_system_wave_director::{WaveDirector, WaveDirectorSnapshot, WavePhase};
use waypoint_defence_world as world;

pub use waypoint_defence_world::{query, PathError, World};

/// Everything required to resume a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Ledger and game state.
    pub progress: ProgressSnapshot,
    /// Wave lifecycle state.
    pub director: WaveDirectorSnapshot,
}

/// Owns the world and the systems that drive it.
#[derive(Debug)]
pub struct CombatArena {
    world: World,
    targeting: TowerTargeting,
    combat: TowerCombat,
    director: WaveDirector,
    achievements: Achievements,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl CombatArena {
    /// Creates an arena for a fresh run.
    pub fn new(tuning: CombatTuning) -> Result<Self, PathError> {
        let director = WaveDirector::new(tuning.waves.clone(), tuning.seed);
        let world = World::new(tuning)?;
        Ok(Self {
            world,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            director,
            achievements: Achievements::new(),
            targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Advances the simulation by `dt`. Ticks after game over are ignored.
    pub fn tick(&mut self, dt: Duration) {
        if query::is_game_over(&self.world) {
            return;
        }

        let mut tick_events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut tick_events);

        self.commands.clear();
        self.director.handle(
            &tick_events,
            query::wave(&self.world),
            query::live_enemy_count(&self.world),
            &mut self.commands,
        );
        self.flush_commands(&mut tick_events);

        self.targeting.handle(
            &query::tower_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(
            &query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands(&mut tick_events);

        world::apply(
            &mut self.world,
            Command::AdvanceProjectiles { dt },
            &mut tick_events,
        );

        self.settle(tick_events);
    }

    /// Buys one tower of `kind` into the inventory.
    pub fn purchase_tower(&mut self, kind: TowerKind) -> Result<(), PurchaseError> {
        let events = self.submit(Command::PurchaseTower { kind });
        let outcome = events
            .iter()
            .find_map(|event| match event {
                Event::PurchaseRejected { reason, .. } => Some(Err(*reason)),
                Event::TowerPurchased { .. } => Some(Ok(())),
                _ => None,
            })
            .unwrap_or(Ok(()));
        self.settle(events);
        outcome
    }

    /// Places an inventory tower of `kind` at `position`.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
    ) -> Result<TowerId, PlacementError> {
        let events = self.submit(Command::PlaceTower { kind, position });
        let outcome = events
            .iter()
            .find_map(|event| match event {
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::NoInventory));
        self.settle(events);
        outcome
    }

    /// Upgrades one stat of a placed tower and returns the price paid.
    pub fn upgrade_tower(
        &mut self,
        tower: TowerId,
        upgrade: TowerUpgrade,
    ) -> Result<u32, UpgradeError> {
        let events = self.submit(Command::UpgradeTower { tower, upgrade });
        let outcome = events
            .iter()
            .find_map(|event| match event {
                Event::UpgradeRejected { reason, .. } => Some(Err(*reason)),
                Event::TowerUpgraded { cost, .. } => Some(Ok(*cost)),
                _ => None,
            })
            .unwrap_or(Err(UpgradeError::UnknownTower));
        self.settle(events);
        outcome
    }

    /// Upgrades every placed tower and returns the price paid.
    pub fn upgrade_all_towers(&mut self, upgrade: GlobalUpgrade) -> Result<u32, UpgradeError> {
        let events = self.submit(Command::UpgradeAllTowers { upgrade });
        let outcome = events
            .iter()
            .find_map(|event| match event {
                Event::GlobalUpgradeRejected { reason, .. } => Some(Err(*reason)),
                Event::GlobalUpgradeApplied { cost, .. } => Some(Ok(*cost)),
                _ => None,
            })
            .unwrap_or(Ok(0));
        self.settle(events);
        outcome
    }

    /// Reports whether the balance covers `cost`.
    #[must_use]
    pub fn can_afford(&self, cost: u32) -> bool {
        query::can_afford(&self.world, cost)
    }

    /// Read-only access to the world for [`query`] functions.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Stage of the wave lifecycle.
    #[must_use]
    pub fn wave_phase(&self) -> WavePhase {
        self.director.phase()
    }

    /// Removes and returns every event emitted since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Captures everything required to resume the run.
    #[must_use]
    pub fn snapshot(&self) -> SaveState {
        SaveState {
            progress: query::progress(&self.world),
            director: self.director.snapshot(),
        }
    }

    /// Resumes a run from `state`.
    ///
    /// Placed towers are kept while enemies and projectiles are cleared. A
    /// wave that was in progress resumes its remaining spawn schedule and is
    /// announced again.
    pub fn restore(&mut self, state: &SaveState) {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::RestoreProgress {
                snapshot: state.progress.clone(),
            },
            &mut events,
        );

        let wave = query::wave(&self.world);
        self.director.restore(&state.director, wave);
        if self.director.phase() != WavePhase::Idle {
            world::apply(
                &mut self.world,
                Command::StartWave {
                    planned: self.director.planned(),
                    boss: self.director.is_boss_wave(),
                },
                &mut events,
            );
        }
        info!(wave, phase = ?self.director.phase(), "arena restored");
        self.settle(events);
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    fn flush_commands(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Lets the achievement system react to `events`, then publishes them.
    fn settle(&mut self, mut events: Vec<Event>) {
        self.commands.clear();
        self.achievements.handle(
            &events,
            &query::progress(&self.world),
            &mut self.commands,
        );
        self.flush_commands(&mut events);
        self.events.append(&mut events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::{InventoryEntry, LevelLayout};

    fn arena() -> CombatArena {
        let mut tuning = CombatTuning::default();
        tuning.economy.money_multiplier = Some(1.0);
        tuning.placement.reserved.clear();
        tuning.level = LevelLayout {
            waypoints: vec![Vec2::new(0.0, 0.0), Vec2::new(1_000.0, 0.0)],
        };
        CombatArena::new(tuning).expect("valid tuning")
    }

    #[test]
    fn first_tick_starts_the_first_wave() {
        let mut arena = arena();
        arena.tick(Duration::from_millis(16));
        let events = arena.drain_events();
        assert!(events.contains(&Event::WaveStarted {
            wave: 1,
            planned: 6,
            boss: false
        }));
        assert_eq!(arena.wave_phase(), WavePhase::Spawning);
        assert!(arena.drain_events().is_empty(), "drain empties the queue");
    }

    #[test]
    fn shop_rejections_surface_as_errors() {
        let mut arena = arena();
        assert_eq!(
            arena.purchase_tower(TowerKind::Laser),
            Err(PurchaseError::Locked { unlock_wave: 10 })
        );
        assert_eq!(
            arena.place_tower(TowerKind::Bow, Vec2::new(100.0, 100.0)),
            Err(PlacementError::NoInventory)
        );
        assert_eq!(
            arena.upgrade_tower(TowerId::new(3), TowerUpgrade::Damage),
            Err(UpgradeError::UnknownTower)
        );
        assert_eq!(arena.purchase_tower(TowerKind::Bow), Ok(()));
        assert_eq!(
            arena.place_tower(TowerKind::Bow, Vec2::new(100.0, 10.0)),
            Err(PlacementError::OnPath)
        );
        let tower = arena
            .place_tower(TowerKind::Bow, Vec2::new(100.0, 100.0))
            .expect("valid placement");
        assert_eq!(arena.upgrade_tower(tower, TowerUpgrade::Speed), Ok(75));
        assert_eq!(arena.upgrade_all_towers(GlobalUpgrade::Range), Ok(100));
        assert!(arena.can_afford(725));
        assert!(!arena.can_afford(726));
    }

    #[test]
    fn snapshot_restores_inventory_into_a_fresh_arena() {
        let arena = arena();
        let mut state = arena.snapshot();
        state.progress.inventory = vec![InventoryEntry {
            kind: TowerKind::Cannon,
            count: 2,
        }];
        state.progress.money = 77;

        let mut fresh = CombatArena::new(query::tuning(arena.world()).clone())
            .expect("valid tuning");
        fresh.restore(&state);
        assert_eq!(query::money(fresh.world()), 77);
        assert_eq!(query::inventory_count(fresh.world(), TowerKind::Cannon), 2);
        assert_eq!(fresh.snapshot(), state);
    }
}
