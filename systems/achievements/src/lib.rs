#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic achievement system that requests unlocks once progress
//! crosses a milestone.

use waypoint_defence_core::{Achievement, Command, Event, ProgressSnapshot};

/// Pure achievement system that re-evaluates milestones when progress changes.
#[derive(Debug)]
pub struct Achievements {
    pending: bool,
}

impl Default for Achievements {
    fn default() -> Self {
        Self { pending: true }
    }
}

impl Achievements {
    /// Creates a new achievement system that evaluates on its first call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits `Command::UnlockAchievement` for every
    /// milestone the progress satisfies but has not yet recorded.
    ///
    /// Evaluation only runs after an event that can move a milestone was
    /// observed, so idle ticks cost nothing.
    pub fn handle(&mut self, events: &[Event], progress: &ProgressSnapshot, out: &mut Vec<Command>) {
        for event in events {
            if moves_milestone(event) {
                self.pending = true;
            }
        }

        if !self.pending {
            return;
        }
        self.pending = false;

        for achievement in Achievement::ALL {
            if achievement.is_earned(progress) && !progress.has_achievement(achievement) {
                out.push(Command::UnlockAchievement { achievement });
            }
        }
    }
}

fn moves_milestone(event: &Event) -> bool {
    matches!(
        event,
        Event::EnemyDied { .. }
            | Event::TowerPlaced { .. }
            | Event::WaveCompleted { .. }
            | Event::ProgressRestored
    )
}
