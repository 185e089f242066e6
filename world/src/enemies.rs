//! Enemy entities walking the path.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use waypoint_defence_core::{EnemyKind, EnemyTuning};

use crate::{path::PathModel, status::StatusEffectSet};

/// Result of moving an enemy for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Movement {
    /// The enemy is still on the path.
    Walking,
    /// The enemy passed the final waypoint and must leave the arena.
    ReachedEnd,
}

/// Health change caused by a single damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DamageOutcome {
    /// Health removed after armor.
    pub(crate) dealt: u32,
    /// Health left after the hit.
    pub(crate) remaining: u32,
    /// Whether this application is the one that killed the enemy.
    pub(crate) killed: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) rotation: f32,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) speed: f32,
    pub(crate) armor: u32,
    pub(crate) reward: u32,
    pub(crate) path_progress: usize,
    pub(crate) status: StatusEffectSet,
}

impl Enemy {
    /// Builds an enemy of `kind` standing on the first waypoint.
    pub(crate) fn spawn(kind: EnemyKind, wave: u32, path: &PathModel) -> Self {
        let stats = kind.stats();
        let max_health = kind.max_health_on_wave(wave);
        Self {
            kind,
            position: path.start(),
            rotation: 0.0,
            health: max_health,
            max_health,
            speed: stats.speed,
            armor: stats.armor,
            reward: stats.reward,
            path_progress: 0,
            status: StatusEffectSet::default(),
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Walks toward the current waypoint, advancing at most one waypoint per call.
    pub(crate) fn advance(&mut self, dt: Duration, path: &PathModel, threshold: f32) -> Movement {
        if self.status.is_frozen() {
            return Movement::Walking;
        }

        let Some(target) = path.point_at(self.path_progress) else {
            return Movement::ReachedEnd;
        };

        let offset = target - self.position;
        let distance = offset.length();
        if distance < threshold {
            self.path_progress += 1;
            if self.path_progress > path.last_index() {
                return Movement::ReachedEnd;
            }
            return Movement::Walking;
        }

        let step = (self.speed * dt.as_secs_f32()).min(distance);
        self.position += offset / distance * step;
        self.rotation = offset.y.atan2(offset.x);
        Movement::Walking
    }

    /// Counts status timers down and applies any poison damage that fell due.
    ///
    /// Damage stops being applied once the enemy dies, so at most one returned
    /// outcome carries the kill.
    pub(crate) fn tick_status<R: Rng>(
        &mut self,
        dt: Duration,
        tuning: &EnemyTuning,
        rng: &mut R,
    ) -> Vec<DamageOutcome> {
        let due = self.status.tick(dt, tuning.poison_expiry, rng);
        due.into_iter()
            .map_while(|damage| self.apply_damage(damage))
            .collect()
    }

    /// Applies `raw` damage through armor; armor always lets at least one point through.
    ///
    /// Returns `None` when the enemy was already dead, which makes repeated
    /// hits in the same tick harmless.
    pub(crate) fn apply_damage(&mut self, raw: u32) -> Option<DamageOutcome> {
        if !self.is_alive() {
            return None;
        }
        let dealt = raw.saturating_sub(self.armor).max(1).min(self.health);
        self.health -= dealt;
        Some(DamageOutcome {
            dealt,
            remaining: self.health,
            killed: self.health == 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use waypoint_defence_core::PoisonExpiry;

    fn straight_path() -> PathModel {
        PathModel::new(vec![Vec2::ZERO, Vec2::new(100.0, 0.0)]).expect("valid path")
    }

    #[test]
    fn armor_always_lets_one_point_through() {
        let mut enemy = Enemy::spawn(EnemyKind::Tank, 1, &straight_path());
        let outcome = enemy.apply_damage(2).expect("enemy alive");
        assert_eq!(outcome.dealt, 1);
        assert_eq!(enemy.health, 79);
        let outcome = enemy.apply_damage(0).expect("enemy alive");
        assert_eq!(outcome.dealt, 1);
        let outcome = enemy.apply_damage(12).expect("enemy alive");
        assert_eq!(outcome.dealt, 10);
    }

    #[test]
    fn only_the_crossing_hit_reports_the_kill() {
        let mut enemy = Enemy::spawn(EnemyKind::Basic, 1, &straight_path());
        let first = enemy.apply_damage(25).expect("enemy alive");
        assert!(first.killed);
        assert_eq!(first.dealt, 20, "damage clamps at remaining health");
        assert_eq!(first.remaining, 0);
        assert!(enemy.apply_damage(25).is_none(), "second hit must be a no-op");
    }

    #[test]
    fn movement_is_distance_stepped_and_clamped() {
        let path = straight_path();
        let mut enemy = Enemy::spawn(EnemyKind::Basic, 1, &path);
        enemy.path_progress = 1;

        let _ = enemy.advance(Duration::from_millis(500), &path, 5.0);
        assert!((enemy.position.x - 60.0).abs() < 1e-3);
        assert_eq!(enemy.rotation, 0.0);

        let _ = enemy.advance(Duration::from_secs(5), &path, 5.0);
        assert!((enemy.position.x - 100.0).abs() < 1e-3, "step is clamped");
    }

    #[test]
    fn enemy_reaches_end_after_last_waypoint() {
        let path = straight_path();
        let mut enemy = Enemy::spawn(EnemyKind::Fast, 1, &path);
        let dt = Duration::from_millis(16);

        assert_eq!(enemy.advance(dt, &path, 5.0), Movement::Walking);
        assert_eq!(enemy.path_progress, 1, "first call consumes the spawn waypoint");

        let mut steps = 0;
        while enemy.advance(dt, &path, 5.0) == Movement::Walking {
            steps += 1;
            assert!(steps < 1_000, "enemy never reached the end");
        }
        assert_eq!(enemy.path_progress, 2);
    }

    #[test]
    fn frozen_enemies_hold_position() {
        let path = straight_path();
        let mut enemy = Enemy::spawn(EnemyKind::Basic, 1, &path);
        enemy.path_progress = 1;
        enemy.status.freeze(Duration::from_secs(2));

        assert_eq!(
            enemy.advance(Duration::from_millis(500), &path, 5.0),
            Movement::Walking
        );
        assert_eq!(enemy.position, Vec2::ZERO);
    }

    #[test]
    fn poison_damage_passes_through_armor() {
        let tuning = EnemyTuning {
            poison_expiry: PoisonExpiry::AfterTicks { count: 3 },
            ..EnemyTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut enemy = Enemy::spawn(EnemyKind::Boss, 1, &straight_path());
        enemy.status.poison(3, Duration::from_secs(1));

        let outcomes = enemy.tick_status(Duration::from_secs(2), &tuning, &mut rng);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|outcome| outcome.dealt == 1));
        assert_eq!(enemy.health, 198);
    }

    #[test]
    fn health_scales_with_wave() {
        let enemy = Enemy::spawn(EnemyKind::Tank, 4, &straight_path());
        assert_eq!(enemy.max_health, 320);
        assert_eq!(enemy.health, enemy.max_health);
    }
}
