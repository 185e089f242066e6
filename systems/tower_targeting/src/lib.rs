#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use glam::Vec2;
use waypoint_defence_core::{EnemyId, EnemyView, TowerId, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower selects the nearest live enemy strictly inside its range.
    /// Enemies at equal distance are resolved in favour of the one that comes
    /// first in the view. The output buffer is cleared before populating it
    /// with the latest assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let distance = tower.position.distance(candidate.position);
                if distance >= tower.range {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    enemy: candidate.id,
                    position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                let offset = best_candidate.position - tower.position;
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    bearing: offset.y.atan2(offset.x),
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            if snapshot.range.is_nan() || snapshot.range <= 0.0 {
                continue;
            }

            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                range: snapshot.range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            if snapshot.health == 0 {
                continue;
            }

            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: Vec2,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    enemy: EnemyId,
    position: Vec2,
}

impl BestCandidate {
    /// Strictly closer candidates win; equal distances keep the earlier one.
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}
