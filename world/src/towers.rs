//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use waypoint_defence_core::{
    GlobalUpgrade, TowerId, TowerKind, TowerSnapshot, TowerTuning, TowerUpgrade,
};

use crate::economy::floor_scaled;

/// State of a placed tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    pub(crate) position: Vec2,
    pub(crate) rotation: f32,
    pub(crate) range: f32,
    pub(crate) fire_interval: Duration,
    pub(crate) damage: u32,
    pub(crate) level: u32,
    pub(crate) experience: u32,
    pub(crate) experience_to_next: u32,
    /// Time since the tower last fired; compared against the live fire interval.
    pub(crate) since_last_shot: Duration,
    pub(crate) kills: u32,
    pub(crate) damage_dealt: u64,
}

impl TowerState {
    fn new(id: TowerId, kind: TowerKind, position: Vec2, tuning: &TowerTuning) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            rotation: 0.0,
            range: stats.range.min(tuning.max_range),
            fire_interval: stats.fire_interval.max(tuning.min_fire_interval()),
            damage: stats.damage,
            level: 1,
            experience: 0,
            experience_to_next: tuning.initial_experience_to_next,
            since_last_shot: Duration::ZERO,
            kills: 0,
            damage_dealt: 0,
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.since_last_shot >= self.fire_interval
    }

    pub(crate) fn ready_in(&self) -> Duration {
        self.fire_interval.saturating_sub(self.since_last_shot)
    }

    /// Runs the cooldown forward; a ready tower without a target stays ready.
    pub(crate) fn tick_cooldown(&mut self, dt: Duration) {
        self.since_last_shot = self.since_last_shot.saturating_add(dt).min(self.fire_interval);
    }

    pub(crate) fn mark_fired(&mut self) {
        self.since_last_shot = Duration::ZERO;
    }

    /// Eases the facing toward `bearing` by the smoothing fraction.
    pub(crate) fn aim(&mut self, bearing: f32, smoothing: f32) {
        self.rotation += (bearing - self.rotation) * smoothing.clamp(0.0, 1.0);
    }

    pub(crate) fn apply_upgrade(&mut self, upgrade: TowerUpgrade, tuning: &TowerTuning) {
        match upgrade {
            TowerUpgrade::Range => self.extend_range(tuning.range_upgrade_step, tuning),
            TowerUpgrade::Speed => {
                self.shorten_interval(Duration::from_millis(tuning.speed_upgrade_step_ms), tuning)
            }
            TowerUpgrade::Damage => {
                self.damage = self.damage.saturating_add(tuning.damage_upgrade_step)
            }
        }
    }

    pub(crate) fn apply_global(&mut self, upgrade: GlobalUpgrade, tuning: &TowerTuning) {
        match upgrade {
            GlobalUpgrade::Range => self.extend_range(tuning.global_range_step, tuning),
            GlobalUpgrade::Speed => {
                self.shorten_interval(Duration::from_millis(tuning.global_speed_step_ms), tuning)
            }
        }
    }

    /// Adds experience and reports the new level when a threshold was crossed.
    ///
    /// At most one level is gained per award and surplus experience is dropped.
    pub(crate) fn gain_experience(&mut self, amount: u32, tuning: &TowerTuning) -> Option<u32> {
        self.experience = self.experience.saturating_add(amount);
        if self.experience < self.experience_to_next {
            return None;
        }

        self.level += 1;
        self.experience = 0;
        self.experience_to_next =
            floor_scaled(f64::from(self.experience_to_next), tuning.experience_growth);
        self.extend_range(tuning.level_range_bonus, tuning);
        self.damage = self.damage.saturating_add(tuning.level_damage_bonus);
        self.shorten_interval(Duration::from_millis(tuning.level_interval_bonus_ms), tuning);
        Some(self.level)
    }

    fn extend_range(&mut self, step: f32, tuning: &TowerTuning) {
        self.range = (self.range + step).min(tuning.max_range);
    }

    fn shorten_interval(&mut self, step: Duration, tuning: &TowerTuning) {
        self.fire_interval = self
            .fire_interval
            .saturating_sub(step)
            .max(tuning.min_fire_interval());
        self.since_last_shot = self.since_last_shot.min(self.fire_interval);
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            rotation: self.rotation,
            range: self.range,
            fire_interval: self.fire_interval,
            damage: self.damage,
            level: self.level,
            experience: self.experience,
            experience_to_next: self.experience_to_next,
            kills: self.kills,
            total_damage: self.damage_dealt,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Places a freshly built tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, position: Vec2, tuning: &TowerTuning) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self
            .entries
            .insert(id, TowerState::new(id, kind, position, tuning));
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Reports whether any tower centre lies closer than `spacing` to `position`.
    pub(crate) fn is_crowded(&self, position: Vec2, spacing: f32) -> bool {
        self.iter()
            .any(|tower| tower.position.distance(position) < spacing)
    }
}
