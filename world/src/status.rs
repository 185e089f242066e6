//! Countdown-driven status effects attached to enemies.

use std::time::Duration;

use rand::Rng;
use waypoint_defence_core::PoisonExpiry;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Frozen {
    remaining: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Poisoned {
    until_tick: Duration,
    interval: Duration,
    tick_damage: u32,
    ticks_dealt: u32,
}

/// At most one freeze and one poison per enemy; reapplying refreshes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct StatusEffectSet {
    frozen: Option<Frozen>,
    poisoned: Option<Poisoned>,
}

impl StatusEffectSet {
    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub(crate) fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Starts or refreshes a freeze lasting `duration`.
    pub(crate) fn freeze(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.frozen = Some(Frozen {
            remaining: duration,
        });
    }

    /// Starts or refreshes a poison dealing `tick_damage` every `interval`.
    pub(crate) fn poison(&mut self, tick_damage: u32, interval: Duration) {
        if interval.is_zero() {
            return;
        }
        self.poisoned = Some(Poisoned {
            until_tick: interval,
            interval,
            tick_damage,
            ticks_dealt: 0,
        });
    }

    /// Counts every timer down by `dt` and returns the poison damage that fell due.
    ///
    /// Each element of the returned list is one poison tick; callers route them
    /// through armor individually.
    pub(crate) fn tick<R: Rng>(
        &mut self,
        dt: Duration,
        expiry: PoisonExpiry,
        rng: &mut R,
    ) -> Vec<u32> {
        if let Some(frozen) = &mut self.frozen {
            frozen.remaining = frozen.remaining.saturating_sub(dt);
            if frozen.remaining.is_zero() {
                self.frozen = None;
            }
        }

        let mut due = Vec::new();
        let Some(mut poison) = self.poisoned else {
            return due;
        };

        let mut budget = dt;
        let mut active = true;
        while active && budget >= poison.until_tick {
            budget -= poison.until_tick;
            poison.until_tick = poison.interval;
            poison.ticks_dealt = poison.ticks_dealt.saturating_add(1);
            due.push(poison.tick_damage);
            active = match expiry {
                PoisonExpiry::Chance { probability } => rng.gen::<f32>() >= probability,
                PoisonExpiry::AfterTicks { count } => poison.ticks_dealt < count,
            };
        }

        if active {
            poison.until_tick -= budget;
            self.poisoned = Some(poison);
        } else {
            self.poisoned = None;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn freeze_expires_after_its_duration() {
        let mut status = StatusEffectSet::default();
        status.freeze(Duration::from_millis(2_000));
        let expiry = PoisonExpiry::AfterTicks { count: 1 };

        let _ = status.tick(Duration::from_millis(1_500), expiry, &mut rng());
        assert!(status.is_frozen());
        let _ = status.tick(Duration::from_millis(500), expiry, &mut rng());
        assert!(!status.is_frozen());
    }

    #[test]
    fn reapplying_freeze_refreshes_instead_of_stacking() {
        let mut status = StatusEffectSet::default();
        let expiry = PoisonExpiry::AfterTicks { count: 1 };
        status.freeze(Duration::from_millis(2_000));
        let _ = status.tick(Duration::from_millis(1_000), expiry, &mut rng());
        status.freeze(Duration::from_millis(2_000));
        let _ = status.tick(Duration::from_millis(1_999), expiry, &mut rng());
        assert!(status.is_frozen(), "refresh restores the full duration");
        let _ = status.tick(Duration::from_millis(1), expiry, &mut rng());
        assert!(!status.is_frozen(), "durations do not stack");
    }

    #[test]
    fn poison_ticks_on_its_interval_until_tick_budget_is_spent() {
        let mut status = StatusEffectSet::default();
        let expiry = PoisonExpiry::AfterTicks { count: 2 };
        status.poison(3, Duration::from_millis(1_000));

        assert!(status
            .tick(Duration::from_millis(999), expiry, &mut rng())
            .is_empty());
        assert_eq!(
            status.tick(Duration::from_millis(1), expiry, &mut rng()),
            vec![3]
        );
        assert!(status.is_poisoned());
        assert_eq!(
            status.tick(Duration::from_millis(1_000), expiry, &mut rng()),
            vec![3]
        );
        assert!(!status.is_poisoned());
    }

    #[test]
    fn long_steps_deliver_every_due_tick() {
        let mut status = StatusEffectSet::default();
        let expiry = PoisonExpiry::AfterTicks { count: 5 };
        status.poison(4, Duration::from_millis(1_000));
        assert_eq!(
            status.tick(Duration::from_millis(3_500), expiry, &mut rng()),
            vec![4, 4, 4]
        );
        assert!(status.is_poisoned());
    }

    #[test]
    fn certain_chance_ends_poison_after_first_tick() {
        let mut status = StatusEffectSet::default();
        let expiry = PoisonExpiry::Chance { probability: 1.0 };
        status.poison(3, Duration::from_millis(1_000));
        assert_eq!(
            status.tick(Duration::from_millis(5_000), expiry, &mut rng()),
            vec![3]
        );
        assert!(!status.is_poisoned());
    }

    #[test]
    fn zero_chance_never_ends_poison() {
        let mut status = StatusEffectSet::default();
        let expiry = PoisonExpiry::Chance { probability: 0.0 };
        status.poison(3, Duration::from_millis(1_000));
        assert_eq!(
            status
                .tick(Duration::from_millis(10_000), expiry, &mut rng())
                .len(),
            10
        );
        assert!(status.is_poisoned());
    }
}
