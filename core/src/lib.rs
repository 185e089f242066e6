#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Waypoint Defence combat simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume immutable views such as
//! [`EnemyView`] and [`TowerView`] and respond exclusively with new command
//! batches.

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod tuning;

pub use tuning::{
    is_unlocked, CombatTuning, EconomyTuning, EnemyTuning, LevelLayout, PlacementTuning,
    PoisonExpiry, ProjectileTuning, ReservedZone, TowerTuning, VariantRule, WaveTuning,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock, enemy movement, status effects and tower cooldowns.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new enemy enter the path at its first waypoint.
    SpawnEnemy {
        /// Variant of the enemy to create.
        kind: EnemyKind,
    },
    /// Announces that the wave director began spawning the current wave.
    StartWave {
        /// Number of enemies the director intends to spawn.
        planned: u32,
        /// Whether the final spawn of the wave is a boss.
        boss: bool,
    },
    /// Requests that the current wave be closed out and its bonus paid.
    CompleteWave,
    /// Turns a tower toward the provided bearing using exponential smoothing.
    AimTower {
        /// Tower that acquired a target.
        tower: TowerId,
        /// Bearing from the tower to its target in radians.
        bearing: f32,
    },
    /// Requests that a ready tower launch a projectile at the provided enemy.
    FireProjectile {
        /// Tower that fires the projectile.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves every live projectile and resolves hits, misses and range exhaustion.
    AdvanceProjectiles {
        /// Duration of simulated time the projectiles travel for.
        dt: Duration,
    },
    /// Buys one tower of the provided kind into the inventory.
    PurchaseTower {
        /// Kind of tower being bought.
        kind: TowerKind,
    },
    /// Places a tower from the inventory at the provided position.
    PlaceTower {
        /// Kind of tower to place.
        kind: TowerKind,
        /// World position of the tower's centre.
        position: Vec2,
    },
    /// Buys a stat upgrade for a single tower.
    UpgradeTower {
        /// Tower receiving the upgrade.
        tower: TowerId,
        /// Stat being upgraded.
        upgrade: TowerUpgrade,
    },
    /// Buys a stat upgrade applied to every placed tower.
    UpgradeAllTowers {
        /// Stat being upgraded.
        upgrade: GlobalUpgrade,
    },
    /// Records an achievement and applies its reward.
    UnlockAchievement {
        /// Achievement that was earned.
        achievement: Achievement,
    },
    /// Replaces the persisted ledger and game state with a saved snapshot.
    RestoreProgress {
        /// Snapshot previously captured from a running world.
        snapshot: ProgressSnapshot,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Position the enemy starts from.
        position: Vec2,
        /// Health the enemy spawned with.
        max_health: u32,
    },
    /// Reports damage that landed on an enemy after armor.
    EnemyDamaged {
        /// Enemy that took damage.
        enemy: EnemyId,
        /// Health removed by the hit.
        amount: u32,
        /// Health remaining after the hit.
        remaining: u32,
    },
    /// Reports that an enemy was killed and paid out its reward.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Position the enemy died at.
        position: Vec2,
        /// Money credited for the kill: reward value times money multiplier
        /// times combo, floored after adding 1e-4 so `f32` multipliers such
        /// as 1.1 do not floor a whole-number product one short.
        reward: u32,
        /// Kill streak after counting this kill.
        streak: u32,
        /// Combo multiplier applied to the reward.
        combo_multiplier: f32,
    },
    /// Reports that an enemy walked off the end of the path.
    EnemyReachedEnd {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives left after the loss.
        remaining: u32,
    },
    /// Reports that a status effect was applied or refreshed on an enemy.
    StatusApplied {
        /// Enemy carrying the effect.
        enemy: EnemyId,
        /// Effect that was applied.
        status: StatusKind,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Reports that a projectile struck its target and was consumed.
    ProjectileHit {
        /// Projectile that hit.
        projectile: ProjectileId,
        /// Enemy that was struck.
        target: EnemyId,
        /// Damage carried by the projectile before armor.
        damage: u32,
        /// Whether the hit rolled a critical.
        critical: bool,
    },
    /// Reports that a projectile was removed without hitting anything.
    ProjectileExpired {
        /// Projectile that expired.
        projectile: ProjectileId,
        /// Why the projectile was removed.
        reason: ExpiryReason,
    },
    /// Confirms that a tower was bought into the inventory.
    TowerPurchased {
        /// Kind of tower bought.
        kind: TowerKind,
        /// Money spent.
        cost: u32,
    },
    /// Reports that a purchase was refused.
    PurchaseRejected {
        /// Kind of tower requested.
        kind: TowerKind,
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Position of the tower's centre.
        position: Vec2,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Position provided in the placement request.
        position: Vec2,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower upgrade was bought.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Stat that was upgraded.
        upgrade: TowerUpgrade,
        /// Money spent.
        cost: u32,
    },
    /// Reports that a tower accumulated enough experience to level up.
    TowerLeveledUp {
        /// Tower that levelled up.
        tower: TowerId,
        /// Level reached.
        level: u32,
    },
    /// Reports that a single-tower upgrade was refused.
    UpgradeRejected {
        /// Tower targeted by the upgrade.
        tower: TowerId,
        /// Stat requested.
        upgrade: TowerUpgrade,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a global upgrade was bought.
    GlobalUpgradeApplied {
        /// Stat that was upgraded.
        upgrade: GlobalUpgrade,
        /// Money spent.
        cost: u32,
        /// Price of the next purchase of the same upgrade.
        next_price: u32,
    },
    /// Reports that a global upgrade was refused.
    GlobalUpgradeRejected {
        /// Stat requested.
        upgrade: GlobalUpgrade,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// Wave number that started.
        wave: u32,
        /// Number of enemies planned for the wave.
        planned: u32,
        /// Whether the wave ends with a boss.
        boss: bool,
    },
    /// Announces that a wave was cleared.
    WaveCompleted {
        /// Wave number that was cleared.
        wave: u32,
        /// Money credited as the clear bonus.
        bonus: u32,
        /// Whether the wave was cleared without ever losing a life.
        perfect: bool,
    },
    /// Announces a newly earned achievement.
    AchievementUnlocked {
        /// Achievement that was earned.
        achievement: Achievement,
    },
    /// Announces that critical mode switched on or off.
    CriticalModeChanged {
        /// Whether critical mode is now active.
        active: bool,
    },
    /// Announces that the last life was lost.
    GameOver {
        /// Wave reached when the game ended.
        wave: u32,
        /// Final score.
        score: u64,
    },
    /// Confirms that a saved snapshot replaced the live progress.
    ProgressRestored,
}

/// Reasons a projectile can be removed without landing a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryReason {
    /// The target died or left the arena before the projectile arrived.
    TargetLost,
    /// The projectile travelled further than its range allows.
    RangeExhausted,
}

/// Status effects that can be attached to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Movement is suspended while the effect lasts.
    Frozen,
    /// Damage is applied periodically while the effect lasts.
    Poisoned,
}

/// Generation-checked handle to an enemy.
///
/// Slots are reused after an enemy leaves the arena; the generation makes any
/// handle captured before the removal detectably stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId {
    slot: u32,
    generation: u32,
}

impl EnemyId {
    /// Creates a handle from its slot index and generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index inside the enemy arena.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Generation-checked handle to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId {
    slot: u32,
    generation: u32,
}

impl ProjectileId {
    /// Creates a handle from its slot index and generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index inside the projectile arena.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Variants of enemies that can walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy.
    Basic,
    /// Fragile but quick.
    Fast,
    /// Slow, durable and armored.
    Tank,
    /// Moderately fast airborne variant.
    Flying,
    /// Wave-ending boss with heavy armor.
    Boss,
}

/// Base statistics shared by every enemy of a kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health at wave one; multiplied by the wave number on spawn.
    pub base_health: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Money paid for a kill before multipliers.
    pub reward: u32,
    /// Flat damage reduction applied to every hit.
    pub armor: u32,
}

impl EnemyKind {
    /// Every enemy variant in declaration order.
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Flying,
        EnemyKind::Boss,
    ];

    /// Returns the base statistics for the variant.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Basic => EnemyStats {
                base_health: 20,
                speed: 120.0,
                reward: 10,
                armor: 0,
            },
            Self::Fast => EnemyStats {
                base_health: 15,
                speed: 240.0,
                reward: 15,
                armor: 0,
            },
            Self::Tank => EnemyStats {
                base_health: 80,
                speed: 60.0,
                reward: 25,
                armor: 2,
            },
            Self::Flying => EnemyStats {
                base_health: 25,
                speed: 180.0,
                reward: 20,
                armor: 0,
            },
            Self::Boss => EnemyStats {
                base_health: 200,
                speed: 90.0,
                reward: 100,
                armor: 5,
            },
        }
    }

    /// Health an enemy of this kind spawns with on the provided wave.
    #[must_use]
    pub const fn max_health_on_wave(self, wave: u32) -> u32 {
        let wave = if wave == 0 { 1 } else { wave };
        self.stats().base_health.saturating_mul(wave)
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Reliable single-target tower.
    Bow,
    /// Slow tower whose hits splash onto nearby enemies.
    Cannon,
    /// Long-range, rapid-fire tower with light damage.
    Laser,
    /// Tower whose hits freeze enemies in place.
    Ice,
    /// Tower whose hits poison enemies.
    Poison,
}

/// Base statistics of a freshly placed tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Targeting radius in world units.
    pub range: f32,
    /// Time between shots.
    pub fire_interval: Duration,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Shop price.
    pub cost: u32,
    /// First wave on which the shop sells the tower.
    pub unlock_wave: u32,
}

/// Extra behaviour a projectile applies when it hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnHitEffect {
    /// Plain damage only.
    None,
    /// Part of the damage spills onto enemies around the target.
    Splash,
    /// The target stops moving for a while.
    Freeze,
    /// The target takes periodic damage for a while.
    Poison,
}

impl TowerKind {
    /// Every tower kind in shop order.
    pub const ALL: [TowerKind; 5] = [
        TowerKind::Bow,
        TowerKind::Cannon,
        TowerKind::Laser,
        TowerKind::Ice,
        TowerKind::Poison,
    ];

    /// Returns the base statistics for the tower kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Bow => TowerStats {
                range: 200.0,
                fire_interval: Duration::from_millis(300),
                damage: 5,
                cost: 100,
                unlock_wave: 1,
            },
            Self::Cannon => TowerStats {
                range: 150.0,
                fire_interval: Duration::from_millis(800),
                damage: 25,
                cost: 250,
                unlock_wave: 5,
            },
            Self::Laser => TowerStats {
                range: 300.0,
                fire_interval: Duration::from_millis(100),
                damage: 2,
                cost: 400,
                unlock_wave: 10,
            },
            Self::Ice => TowerStats {
                range: 180.0,
                fire_interval: Duration::from_millis(400),
                damage: 3,
                cost: 200,
                unlock_wave: 15,
            },
            Self::Poison => TowerStats {
                range: 160.0,
                fire_interval: Duration::from_millis(500),
                damage: 4,
                cost: 300,
                unlock_wave: 20,
            },
        }
    }

    /// Effect applied by projectiles fired from this kind of tower.
    #[must_use]
    pub const fn on_hit(self) -> OnHitEffect {
        match self {
            Self::Bow | Self::Laser => OnHitEffect::None,
            Self::Cannon => OnHitEffect::Splash,
            Self::Ice => OnHitEffect::Freeze,
            Self::Poison => OnHitEffect::Poison,
        }
    }
}

/// Per-tower stat upgrades sold from the tower's upgrade menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerUpgrade {
    /// Extends the targeting radius.
    Range,
    /// Shortens the fire interval.
    Speed,
    /// Raises projectile damage.
    Damage,
}

impl TowerUpgrade {
    /// Price at tower level one; the charged price scales with the tower level.
    #[must_use]
    pub const fn base_cost(self) -> u32 {
        match self {
            Self::Range => 50,
            Self::Speed => 75,
            Self::Damage => 100,
        }
    }

    /// Price charged for the upgrade on a tower of the provided level.
    #[must_use]
    pub const fn cost_at_level(self, level: u32) -> u32 {
        self.base_cost().saturating_mul(level)
    }
}

/// Upgrades sold in the shop that apply to every placed tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalUpgrade {
    /// Extends the range of every tower.
    Range,
    /// Shortens the fire interval of every tower.
    Speed,
}

/// Milestones that are tracked across a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Achievement {
    /// One hundred enemies defeated.
    FirstBlood,
    /// Ten thousand money earned in total.
    MoneyMaker,
    /// Wave twenty reached.
    WaveMaster,
    /// Fifty towers constructed; grants a permanent money bonus.
    TowerLord,
    /// A streak of twenty-five kills.
    ComboMaster,
    /// Ten bosses defeated.
    BossSlayer,
}

impl Achievement {
    /// Every achievement in evaluation order.
    pub const ALL: [Achievement; 6] = [
        Achievement::FirstBlood,
        Achievement::MoneyMaker,
        Achievement::WaveMaster,
        Achievement::TowerLord,
        Achievement::ComboMaster,
        Achievement::BossSlayer,
    ];

    /// Short title shown when the achievement unlocks.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstBlood => "First Blood",
            Self::MoneyMaker => "Money Maker",
            Self::WaveMaster => "Wave Master",
            Self::TowerLord => "Tower Lord",
            Self::ComboMaster => "Combo Master",
            Self::BossSlayer => "Boss Slayer",
        }
    }

    /// One-line description of the requirement.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstBlood => "100 enemies defeated!",
            Self::MoneyMaker => "$10,000 total earned!",
            Self::WaveMaster => "Survived 20 waves!",
            Self::TowerLord => "50 towers constructed!",
            Self::ComboMaster => "25 kill streak!",
            Self::BossSlayer => "10 bosses defeated!",
        }
    }

    /// Reports whether the provided progress satisfies the requirement.
    #[must_use]
    pub fn is_earned(self, progress: &ProgressSnapshot) -> bool {
        match self {
            Self::FirstBlood => progress.total_kills >= 100,
            Self::MoneyMaker => progress.total_money_earned >= 10_000,
            Self::WaveMaster => progress.wave >= 20,
            Self::TowerLord => progress.towers_built >= 50,
            Self::ComboMaster => progress.streak_count >= 25,
            Self::BossSlayer => progress.bosses_killed >= 10,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// No tower of the requested kind is waiting in the inventory.
    #[error("no tower of that kind in the inventory")]
    NoInventory,
    /// The position lies on the enemy path.
    #[error("towers cannot be placed on the path")]
    OnPath,
    /// The position is too close to an existing tower.
    #[error("too close to another tower")]
    Occupied,
    /// The position lies inside a zone reserved for interface elements.
    #[error("position is reserved")]
    Reserved,
    /// The position is not a finite point.
    #[error("position is not a finite point")]
    InvalidPosition,
    /// The run has ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a shop purchase may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PurchaseError {
    /// The tower is not sold before the provided wave.
    #[error("unlocks on wave {unlock_wave}")]
    Locked {
        /// First wave on which the tower is sold.
        unlock_wave: u32,
    },
    /// The balance does not cover the price.
    #[error("costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// Price of the purchase.
        cost: u32,
        /// Balance at the time of the request.
        available: u32,
    },
}

/// Reasons an upgrade may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    #[error("unknown tower")]
    UnknownTower,
    /// The balance does not cover the price.
    #[error("costs {cost} but only {available} is available")]
    InsufficientFunds {
        /// Price of the upgrade.
        cost: u32,
        /// Balance at the time of the request.
        available: u32,
    },
}

/// Combo multiplier granted for the provided kill streak.
///
/// The breakpoints are part of the scoring contract: streaks of two, five and
/// ten kills raise the multiplier to 1.5, 2 and 3 respectively.
#[must_use]
pub fn combo_multiplier(streak: u32) -> f32 {
    match streak {
        0..=1 => 1.0,
        2..=4 => 1.5,
        5..=9 => 2.0,
        _ => 3.0,
    }
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle of the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Current world position.
    pub position: Vec2,
    /// Facing in radians.
    pub rotation: f32,
    /// Current health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Index of the waypoint the enemy is walking toward.
    pub path_progress: usize,
    /// Whether the enemy is frozen.
    pub frozen: bool,
    /// Whether the enemy is poisoned.
    pub poisoned: bool,
}

impl EnemySnapshot {
    /// Fraction of health remaining, used for health bars.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

/// Read-only snapshot of the live enemies in arena iteration order.
///
/// Iteration order is the order the world stores enemies in and is the
/// tie-break order used by tower targeting.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view, preserving the provided order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Centre of the tower.
    pub position: Vec2,
    /// Facing in radians.
    pub rotation: f32,
    /// Current targeting radius.
    pub range: f32,
    /// Current time between shots.
    pub fire_interval: Duration,
    /// Current projectile damage.
    pub damage: u32,
    /// Current level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Experience required for the next level.
    pub experience_to_next: u32,
    /// Enemies killed by this tower.
    pub kills: u32,
    /// Damage dealt by this tower's projectiles after armor.
    pub total_damage: u64,
}

impl TowerSnapshot {
    /// Price of the provided upgrade for this tower, used by shop interfaces.
    #[must_use]
    pub const fn upgrade_cost(&self, upgrade: TowerUpgrade) -> u32 {
        upgrade.cost_at_level(self.level)
    }
}

/// Read-only snapshot describing all towers placed in the arena.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Target acquired by a tower during a targeting pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Bearing from the tower to the enemy in radians.
    pub bearing: f32,
}

/// Time remaining before a tower may fire again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// Time left until the tower is ready; zero means ready.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower cooldown, sorted by tower identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Reports whether the provided tower is ready to fire.
    #[must_use]
    pub fn is_ready(&self, tower: TowerId) -> bool {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.tower)
            .map_or(false, |index| self.snapshots[index].ready_in.is_zero())
    }

    /// Iterator over the captured cooldowns.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }
}

/// Number of unplaced towers of one kind held in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Kind of tower.
    pub kind: TowerKind,
    /// Units waiting to be placed.
    pub count: u32,
}

/// Flat, persistable record of the economy ledger and game state.
///
/// Every field is a named number or array so the record can be stored by
/// any key/value persistence layer and fully reconstructed. The streak is
/// captured for reporting but restoring a snapshot always starts a fresh
/// streak, because kill timestamps are relative to the live clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Current balance.
    pub money: u32,
    /// Run-wide multiplier applied to kill rewards.
    pub money_multiplier: f32,
    /// Current score.
    pub score: u64,
    /// Lives remaining.
    pub lives: u32,
    /// Current wave number, starting at one.
    pub wave: u32,
    /// Current kill streak.
    pub streak_count: u32,
    /// Best kill streak of the run.
    pub max_streak: u32,
    /// Enemies killed over the run.
    pub total_kills: u32,
    /// Money earned from kills over the run.
    pub total_money_earned: u64,
    /// Bosses killed over the run.
    pub bosses_killed: u32,
    /// Waves cleared without losing a life.
    pub perfect_waves: u32,
    /// Towers placed over the run.
    pub towers_built: u32,
    /// Money spent on global upgrades.
    pub money_spent_on_upgrades: u64,
    /// Price of the next global range upgrade.
    pub global_range_price: u32,
    /// Price of the next global speed upgrade.
    pub global_speed_price: u32,
    /// Simulated time played in milliseconds.
    pub playtime_ms: u64,
    /// Unplaced towers.
    pub inventory: Vec<InventoryEntry>,
    /// Achievements earned so far.
    pub achievements: Vec<Achievement>,
}

impl ProgressSnapshot {
    /// Units of the provided tower kind waiting in the inventory.
    #[must_use]
    pub fn inventory_count(&self, kind: TowerKind) -> u32 {
        self.inventory
            .iter()
            .find(|entry| entry.kind == kind)
            .map_or(0, |entry| entry.count)
    }

    /// Reports whether the provided achievement was already earned.
    #[must_use]
    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }
}
