#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting data into aiming and firing commands.

use waypoint_defence_core::{Command, TowerCooldownView, TowerTarget};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AimTower` for every acquired target followed by
    /// `Command::FireProjectile` for each of those towers whose cooldown has
    /// expired.
    ///
    /// Towers without a target are never fired, so their cooldown stays
    /// expired until an enemy walks into range.
    pub fn handle(
        &mut self,
        tower_cooldowns: &TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            self.scratch.push(Command::AimTower {
                tower: target.tower,
                bearing: target.bearing,
            });
        }

        for target in tower_targets {
            if tower_cooldowns.is_ready(target.tower) {
                self.scratch.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use waypoint_defence_core::{EnemyId, TowerCooldownSnapshot, TowerId};

    #[test]
    fn no_targets_is_silent() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![snapshot(1, Duration::ZERO)]);
        let mut out = Vec::new();

        system.handle(&cooldowns, &[], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn firing_respects_cooldown_readiness() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![
            snapshot(5, Duration::ZERO),
            snapshot(2, Duration::ZERO),
        ]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(&cooldowns, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AimTower {
                    tower: TowerId::new(2),
                    bearing: 0.5,
                },
                Command::AimTower {
                    tower: TowerId::new(5),
                    bearing: 0.5,
                },
                Command::FireProjectile {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4, 0),
                },
                Command::FireProjectile {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1, 0),
                },
            ],
        );
    }

    #[test]
    fn non_ready_or_missing_towers_only_aim() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![
            snapshot(3, Duration::from_millis(250)),
            snapshot(8, Duration::ZERO),
        ]);
        let targets = vec![target(3, 9), target(8, 2), target(42, 3)];
        let mut out = Vec::new();

        system.handle(&cooldowns, &targets, &mut out);

        let fired: Vec<&Command> = out
            .iter()
            .filter(|command| matches!(command, Command::FireProjectile { .. }))
            .collect();
        assert_eq!(
            fired,
            vec![&Command::FireProjectile {
                tower: TowerId::new(8),
                target: EnemyId::new(2, 0),
            }],
        );
        assert_eq!(out.len(), 4, "every targeting tower still aims");
    }

    #[test]
    fn output_is_appended_not_replaced() {
        let mut system = TowerCombat::new();
        let cooldowns = TowerCooldownView::from_snapshots(vec![snapshot(1, Duration::ZERO)]);
        let mut out = vec![Command::CompleteWave];

        system.handle(&cooldowns, &[target(1, 1)], &mut out);

        assert_eq!(out.first(), Some(&Command::CompleteWave));
        assert_eq!(out.len(), 3);
    }

    fn snapshot(tower: u32, ready_in: Duration) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: TowerId::new(tower),
            ready_in,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy, 0),
            bearing: 0.5,
        }
    }
}
