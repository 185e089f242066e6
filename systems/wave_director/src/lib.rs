#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for starting waves, pacing enemy
//! spawns and closing waves once the arena is clear.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use waypoint_defence_core::{Command, EnemyKind, Event, WaveTuning};

const RNG_SALT: u64 = 0x7761_7665_5f64_6972;

/// Stage of the wave lifecycle the director is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Counting down to the next wave.
    Idle,
    /// Spawning the enemies of the current wave.
    Spawning,
    /// Every enemy was spawned; waiting for the arena to empty.
    WaitingForClear,
}

/// Persistable state of the director.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveDirectorSnapshot {
    /// Stage of the wave lifecycle.
    pub phase: WavePhase,
    /// Enemies planned for the current wave.
    pub planned: u32,
    /// Enemies already spawned on the current wave.
    pub spawned: u32,
    /// Whether the current wave ends with a boss.
    pub boss: bool,
    /// Delay between the next two spawns, in milliseconds.
    pub spawn_delay_ms: f32,
    /// Amount the delay grows after the next spawn, in milliseconds.
    pub increment_ms: f32,
    /// Amount the increment shrinks after the next spawn, in milliseconds.
    pub decay_ms: f32,
    /// Time left on the running countdown, in milliseconds.
    pub countdown_ms: u64,
}

/// Escalating-then-plateauing spawn cadence.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SpawnPacing {
    delay_ms: f32,
    increment_ms: f32,
    decay_ms: f32,
}

impl SpawnPacing {
    fn new(tuning: &WaveTuning) -> Self {
        Self {
            delay_ms: tuning.initial_spawn_delay_ms.min(tuning.spawn_delay_ceiling_ms),
            increment_ms: tuning.spawn_delay_increment_ms,
            decay_ms: tuning.spawn_delay_decay_ms,
        }
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.max(0.0).round() as u64)
    }

    /// Grows the delay by the shrinking increment until it reaches the ceiling
    /// or the increment runs out.
    fn escalate(&mut self, tuning: &WaveTuning) {
        if self.delay_ms >= tuning.spawn_delay_ceiling_ms || self.increment_ms <= 0.0 {
            return;
        }
        self.delay_ms = (self.delay_ms + self.increment_ms).min(tuning.spawn_delay_ceiling_ms);
        self.increment_ms -= self.decay_ms;
        self.decay_ms *= tuning.spawn_delay_decay_factor;
    }
}

/// Pure system that emits wave lifecycle and spawn commands.
#[derive(Debug)]
pub struct WaveDirector {
    tuning: WaveTuning,
    seed: u64,
    rng: ChaCha8Rng,
    phase: WavePhase,
    planned: u32,
    spawned: u32,
    boss: bool,
    pacing: SpawnPacing,
    countdown: Duration,
}

impl WaveDirector {
    /// Creates a director whose first wave starts on the first call to
    /// [`WaveDirector::handle`].
    #[must_use]
    pub fn new(tuning: WaveTuning, seed: u64) -> Self {
        let pacing = SpawnPacing::new(&tuning);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ RNG_SALT),
            tuning,
            seed,
            phase: WavePhase::Idle,
            planned: 0,
            spawned: 0,
            boss: false,
            pacing,
            countdown: Duration::ZERO,
        }
    }

    /// Consumes the latest world events and emits the commands that advance
    /// the wave lifecycle.
    ///
    /// `wave` is the world's current wave number and `live_enemies` the
    /// number of enemies still in the arena after the world processed the
    /// events. A wave only completes once its whole quota was spawned and no
    /// enemy remains alive.
    pub fn handle(
        &mut self,
        events: &[Event],
        wave: u32,
        live_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        match self.phase {
            WavePhase::Idle => {
                self.countdown = self.countdown.saturating_sub(elapsed);
                if self.countdown.is_zero() {
                    self.start_wave(wave, out);
                }
            }
            WavePhase::Spawning => self.spawn_due(elapsed, wave, out),
            WavePhase::WaitingForClear => {
                if live_enemies == 0 && self.spawned >= self.planned {
                    info!(wave, spawned = self.spawned, "wave cleared");
                    out.push(Command::CompleteWave);
                    self.phase = WavePhase::Idle;
                    self.countdown = self.tuning.inter_wave_pause();
                }
            }
        }
    }

    fn start_wave(&mut self, wave: u32, out: &mut Vec<Command>) {
        self.planned = self.tuning.enemies_on_wave(wave);
        self.spawned = 0;
        self.boss = self.planned > 0 && self.tuning.is_boss_wave(wave);
        self.pacing = SpawnPacing::new(&self.tuning);
        self.countdown = self.pacing.delay();
        self.phase = if self.planned == 0 {
            WavePhase::WaitingForClear
        } else {
            WavePhase::Spawning
        };
        info!(wave, planned = self.planned, boss = self.boss, "starting wave");
        out.push(Command::StartWave {
            planned: self.planned,
            boss: self.boss,
        });
    }

    fn spawn_due(&mut self, elapsed: Duration, wave: u32, out: &mut Vec<Command>) {
        let mut budget = elapsed;
        while self.spawned < self.planned && budget >= self.countdown {
            budget -= self.countdown;
            let kind = self.next_kind(wave);
            debug!(wave, ?kind, index = self.spawned, "spawning enemy");
            out.push(Command::SpawnEnemy { kind });
            self.spawned += 1;
            self.pacing.escalate(&self.tuning);
            self.countdown = self.pacing.delay();
        }

        if self.spawned >= self.planned {
            self.phase = WavePhase::WaitingForClear;
            self.countdown = Duration::ZERO;
        } else {
            self.countdown -= budget;
        }
    }

    fn next_kind(&mut self, wave: u32) -> EnemyKind {
        if self.boss && self.spawned + 1 == self.planned {
            return EnemyKind::Boss;
        }

        // Bosses only ever close a boss wave.
        for rule in self
            .tuning
            .variants
            .iter()
            .filter(|rule| rule.kind != EnemyKind::Boss)
        {
            if wave >= rule.min_wave && self.rng.gen::<f32>() < rule.probability {
                return rule.kind;
            }
        }
        EnemyKind::Basic
    }

    /// Stage of the wave lifecycle.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Enemies planned for the current wave.
    #[must_use]
    pub const fn planned(&self) -> u32 {
        self.planned
    }

    /// Enemies already spawned on the current wave.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Whether the current wave ends with a boss.
    #[must_use]
    pub const fn is_boss_wave(&self) -> bool {
        self.boss
    }

    /// Time until the next spawn or, while idle, until the next wave starts.
    #[must_use]
    pub const fn countdown(&self) -> Duration {
        self.countdown
    }

    /// Captures the director state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> WaveDirectorSnapshot {
        WaveDirectorSnapshot {
            phase: self.phase,
            planned: self.planned,
            spawned: self.spawned,
            boss: self.boss,
            spawn_delay_ms: self.pacing.delay_ms,
            increment_ms: self.pacing.increment_ms,
            decay_ms: self.pacing.decay_ms,
            countdown_ms: u64::try_from(self.countdown.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Resumes from a persisted snapshot taken on the provided wave.
    ///
    /// Variant rolls are reseeded from the run seed and the wave number.
    pub fn restore(&mut self, snapshot: &WaveDirectorSnapshot, wave: u32) {
        self.phase = snapshot.phase;
        self.planned = snapshot.planned;
        self.spawned = snapshot.spawned.min(snapshot.planned);
        self.boss = snapshot.boss;
        self.pacing = SpawnPacing {
            delay_ms: snapshot.spawn_delay_ms,
            increment_ms: snapshot.increment_ms,
            decay_ms: snapshot.decay_ms,
        };
        self.countdown = Duration::from_millis(snapshot.countdown_ms);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed ^ RNG_SALT ^ u64::from(wave));
        debug!(wave, phase = ?self.phase, "wave director restored");
    }
}
