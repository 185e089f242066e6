//! Design constants that shape the combat simulation.
//!
//! Every struct implements [`Default`] with the reference values and opts into
//! `#[serde(default)]`, so a configuration file only needs to name the knobs it
//! overrides. Durations are stored as whole milliseconds to keep configuration
//! files readable and are exposed as [`Duration`] through accessor methods.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{EnemyKind, TowerKind};

/// Aggregated tuning knobs controlling every adjustable aspect of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Seed for every random roll made by the world and the wave director.
    pub seed: u64,
    /// Money, lives, combo timing and wave bonuses.
    pub economy: EconomyTuning,
    /// Enemy movement and status effect parameters.
    pub enemies: EnemyTuning,
    /// Projectile flight, critical hits and splash.
    pub projectiles: ProjectileTuning,
    /// Tower aiming, stat bounds, upgrades and experience.
    pub towers: TowerTuning,
    /// Wave sizing, boss cadence, spawn pacing and variant rolls.
    pub waves: WaveTuning,
    /// Placement validation.
    pub placement: PlacementTuning,
    /// Path enemies walk along.
    pub level: LevelLayout,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_d3f3_u64,
            economy: EconomyTuning::default(),
            enemies: EnemyTuning::default(),
            projectiles: ProjectileTuning::default(),
            towers: TowerTuning::default(),
            waves: WaveTuning::default(),
            placement: PlacementTuning::default(),
            level: LevelLayout::default(),
        }
    }
}

/// Economy and game state parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    /// Balance at the start of a run.
    pub starting_money: u32,
    /// Lives at the start of a run.
    pub starting_lives: u32,
    /// Fixed money multiplier; when absent one is rolled uniformly from the range below.
    pub money_multiplier: Option<f32>,
    /// Lower bound of the rolled money multiplier.
    pub money_multiplier_min: f32,
    /// Upper bound of the rolled money multiplier.
    pub money_multiplier_max: f32,
    /// Time without a kill after which the streak resets, in milliseconds.
    pub combo_timeout_ms: u64,
    /// Score awarded per reward unit before the combo multiplier.
    pub score_per_reward: u32,
    /// Money awarded per wave number when a wave is cleared.
    pub wave_bonus_per_wave: u32,
    /// Factor applied to the wave bonus when adding it to the score.
    pub wave_bonus_score_factor: u32,
    /// Lives at or below which critical mode is active.
    pub critical_lives: u32,
    /// Money multiplier increase granted by the Tower Lord achievement.
    pub tower_lord_bonus: f32,
}

impl EconomyTuning {
    /// Combo timeout as a duration.
    #[must_use]
    pub const fn combo_timeout(&self) -> Duration {
        Duration::from_millis(self.combo_timeout_ms)
    }
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            starting_money: 1_000,
            starting_lives: 20,
            money_multiplier: None,
            money_multiplier_min: 0.66,
            money_multiplier_max: 1.33,
            combo_timeout_ms: 3_000,
            score_per_reward: 10,
            wave_bonus_per_wave: 50,
            wave_bonus_score_factor: 2,
            critical_lives: 5,
            tower_lord_bonus: 0.1,
        }
    }
}

/// How an active poison decides to wear off.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PoisonExpiry {
    /// After every damage tick the poison ends with the provided probability.
    Chance {
        /// Probability in `0.0..=1.0` that the poison ends after a tick.
        probability: f32,
    },
    /// The poison ends after dealing the provided number of damage ticks.
    AfterTicks {
        /// Damage ticks dealt before the poison ends.
        count: u32,
    },
}

/// Enemy movement and status effect parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Distance under which an enemy counts as having reached its waypoint.
    pub waypoint_threshold: f32,
    /// How long a freeze suspends movement, in milliseconds.
    pub freeze_ms: u64,
    /// Damage dealt by each poison tick.
    pub poison_damage: u32,
    /// Time between poison ticks, in milliseconds.
    pub poison_interval_ms: u64,
    /// Rule ending an active poison.
    pub poison_expiry: PoisonExpiry,
}

impl EnemyTuning {
    /// Freeze duration as a duration.
    #[must_use]
    pub const fn freeze_duration(&self) -> Duration {
        Duration::from_millis(self.freeze_ms)
    }

    /// Poison tick interval as a duration.
    #[must_use]
    pub const fn poison_interval(&self) -> Duration {
        Duration::from_millis(self.poison_interval_ms)
    }
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            waypoint_threshold: 5.0,
            freeze_ms: 2_000,
            poison_damage: 3,
            poison_interval_ms: 1_000,
            poison_expiry: PoisonExpiry::Chance { probability: 0.3 },
        }
    }
}

/// Projectile flight and on-hit parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Flight speed in world units per second.
    pub speed: f32,
    /// Distance at or under which a projectile strikes its target.
    pub hit_radius: f32,
    /// Probability of a critical hit.
    pub critical_chance: f32,
    /// Damage multiplier of a critical hit; the result is floored.
    pub critical_multiplier: f32,
    /// Radius around the struck enemy that receives splash damage.
    pub splash_radius: f32,
    /// Fraction of the hit damage dealt as splash; the result is floored.
    pub splash_factor: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 900.0,
            hit_radius: 15.0,
            critical_chance: 0.05,
            critical_multiplier: 2.0,
            splash_radius: 50.0,
            splash_factor: 0.5,
        }
    }
}

/// Tower aiming, stat bounds, upgrades and experience.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerTuning {
    /// Fraction of the remaining angle a tower turns per targeting pass.
    pub aim_smoothing: f32,
    /// Upper bound on tower range.
    pub max_range: f32,
    /// Lower bound on the fire interval, in milliseconds.
    pub min_fire_interval_ms: u64,
    /// Range added by a single-tower range upgrade.
    pub range_upgrade_step: f32,
    /// Fire interval removed by a single-tower speed upgrade, in milliseconds.
    pub speed_upgrade_step_ms: u64,
    /// Damage added by a single-tower damage upgrade.
    pub damage_upgrade_step: u32,
    /// Experience granted by any single-tower upgrade.
    pub upgrade_experience: u32,
    /// Experience granted to a tower for each kill.
    pub kill_experience: u32,
    /// Experience required to leave level one.
    pub initial_experience_to_next: u32,
    /// Growth factor of the experience requirement per level; the result is floored.
    pub experience_growth: f32,
    /// Range gained per level.
    pub level_range_bonus: f32,
    /// Damage gained per level.
    pub level_damage_bonus: u32,
    /// Fire interval removed per level, in milliseconds.
    pub level_interval_bonus_ms: u64,
    /// Range added to every tower by a global range upgrade.
    pub global_range_step: f32,
    /// Fire interval removed from every tower by a global speed upgrade, in milliseconds.
    pub global_speed_step_ms: u64,
    /// Price of the first global upgrade of each kind.
    pub global_initial_price: u32,
    /// Growth factor of the global upgrade price per purchase; the result is floored.
    pub global_price_growth: f32,
}

impl TowerTuning {
    /// Minimum fire interval as a duration.
    #[must_use]
    pub const fn min_fire_interval(&self) -> Duration {
        Duration::from_millis(self.min_fire_interval_ms)
    }
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            aim_smoothing: 0.09,
            max_range: 400.0,
            min_fire_interval_ms: 50,
            range_upgrade_step: 30.0,
            speed_upgrade_step_ms: 50,
            damage_upgrade_step: 3,
            upgrade_experience: 25,
            kill_experience: 10,
            initial_experience_to_next: 100,
            experience_growth: 1.5,
            level_range_bonus: 10.0,
            level_damage_bonus: 1,
            level_interval_bonus_ms: 10,
            global_range_step: 20.0,
            global_speed_step_ms: 25,
            global_initial_price: 100,
            global_price_growth: 1.3,
        }
    }
}

/// Eligibility and probability of a non-basic enemy variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantRule {
    /// Variant spawned when the roll succeeds.
    pub kind: EnemyKind,
    /// First wave on which the variant may be rolled.
    pub min_wave: u32,
    /// Probability of the roll succeeding.
    pub probability: f32,
}

/// Wave sizing, boss cadence and spawn pacing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Enemies in every wave before scaling.
    pub base_enemies: f32,
    /// Enemies added per wave number; the total is floored.
    pub enemies_per_wave: f32,
    /// Every wave divisible by this number ends with a boss; zero disables bosses.
    pub boss_every: u32,
    /// Delay between the first two spawns of a wave, in milliseconds.
    pub initial_spawn_delay_ms: f32,
    /// Amount the delay grows after the first spawn, in milliseconds.
    pub spawn_delay_increment_ms: f32,
    /// Amount the increment shrinks after each spawn, in milliseconds.
    pub spawn_delay_decay_ms: f32,
    /// Factor applied to the decay after each spawn.
    pub spawn_delay_decay_factor: f32,
    /// Delay at which escalation stops, in milliseconds.
    pub spawn_delay_ceiling_ms: f32,
    /// Pause between clearing a wave and starting the next, in milliseconds.
    pub inter_wave_pause_ms: u64,
    /// Variant rolls evaluated in order for each non-boss spawn; the first success wins.
    pub variants: Vec<VariantRule>,
}

impl WaveTuning {
    /// Pause between waves as a duration.
    #[must_use]
    pub const fn inter_wave_pause(&self) -> Duration {
        Duration::from_millis(self.inter_wave_pause_ms)
    }

    /// Number of enemies spawned on the provided wave.
    #[must_use]
    pub fn enemies_on_wave(&self, wave: u32) -> u32 {
        let total = self.base_enemies + wave as f32 * self.enemies_per_wave;
        total.floor().max(0.0) as u32
    }

    /// Reports whether the provided wave ends with a boss.
    #[must_use]
    pub const fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss_every != 0 && wave != 0 && wave % self.boss_every == 0
    }
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_enemies: 5.0,
            enemies_per_wave: 1.5,
            boss_every: 5,
            initial_spawn_delay_ms: 800.0,
            spawn_delay_increment_ms: 200.0,
            spawn_delay_decay_ms: 20.0,
            spawn_delay_decay_factor: 0.9,
            spawn_delay_ceiling_ms: 2_000.0,
            inter_wave_pause_ms: 3_000,
            variants: vec![
                VariantRule {
                    kind: EnemyKind::Tank,
                    min_wave: 11,
                    probability: 0.2,
                },
                VariantRule {
                    kind: EnemyKind::Fast,
                    min_wave: 6,
                    probability: 0.3,
                },
                VariantRule {
                    kind: EnemyKind::Flying,
                    min_wave: 16,
                    probability: 0.15,
                },
            ],
        }
    }
}

/// Circular area where towers may not be placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservedZone {
    /// Centre of the zone.
    pub center: Vec2,
    /// Radius of the zone.
    pub radius: f32,
}

/// Placement validation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    /// Towers closer than this to any path segment are rejected.
    pub path_half_width: f32,
    /// Minimum distance between two tower centres.
    pub tower_spacing: f32,
    /// Areas reserved for interface elements.
    pub reserved: Vec<ReservedZone>,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            path_half_width: 25.0,
            tower_spacing: 30.0,
            reserved: vec![ReservedZone {
                center: Vec2::new(1_050.0, 30.0),
                radius: 50.0,
            }],
        }
    }
}

/// Ordered waypoints of the enemy path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Waypoints enemies walk through in order.
    pub waypoints: Vec<Vec2>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        let points = [
            (0.0, 100.0),
            (850.0, 100.0),
            (850.0, 300.0),
            (1_000.0, 300.0),
            (1_000.0, 450.0),
            (650.0, 450.0),
            (650.0, 240.0),
            (100.0, 240.0),
            (100.0, 550.0),
            (300.0, 550.0),
            (300.0, 400.0),
            (460.0, 400.0),
            (460.0, 650.0),
        ];
        Self {
            waypoints: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        }
    }
}

/// Reports whether the shop sells the provided tower on the provided wave.
#[must_use]
pub const fn is_unlocked(kind: TowerKind, wave: u32) -> bool {
    wave >= kind.stats().unlock_wave
}
