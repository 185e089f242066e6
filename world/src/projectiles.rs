//! Homing projectiles in flight.

use std::time::Duration;

use glam::Vec2;
use waypoint_defence_core::{EnemyId, OnHitEffect, TowerId};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) tower: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) rotation: f32,
    /// Damage captured from the tower when fired; later upgrades do not change it.
    pub(crate) damage: u32,
    pub(crate) speed: f32,
    pub(crate) range: f32,
    pub(crate) traveled: f32,
    pub(crate) effect: OnHitEffect,
}

/// What a projectile does during one flight step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// Within hit radius of the target.
    Hit,
    /// Travelled further than its range.
    Exhausted,
    /// Still flying.
    Moving,
}

impl Projectile {
    /// Homes one step toward `target_position`.
    ///
    /// The hit check runs before the range check so a projectile that arrives on
    /// its last permitted step still lands.
    pub(crate) fn step(&mut self, dt: Duration, target_position: Vec2, hit_radius: f32) -> Flight {
        let offset = target_position - self.position;
        let distance = offset.length();
        if distance <= hit_radius {
            return Flight::Hit;
        }
        if self.traveled > self.range {
            return Flight::Exhausted;
        }

        let step = (self.speed * dt.as_secs_f32()).min(distance);
        self.position += offset / distance * step;
        self.traveled += step;
        self.rotation = offset.y.atan2(offset.x);
        Flight::Moving
    }
}
