#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Waypoint Defence.
//!
//! The world owns every enemy, tower and projectile together with the economy
//! ledger and the game state. It changes only through [`apply`] and reports
//! every observable change as an [`Event`].

mod economy;
mod enemies;
mod path;
mod projectiles;
mod slots;
mod status;
mod towers;

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use waypoint_defence_core::{
    is_unlocked, Achievement, CombatTuning, Command, EconomyTuning, EnemyId, EnemyKind, Event,
    ExpiryReason, GlobalUpgrade, OnHitEffect, PlacementError, ProgressSnapshot, ProjectileId,
    PurchaseError, StatusKind, TowerId, TowerKind, TowerUpgrade, UpgradeError,
};

use economy::{floor_scaled, EconomyLedger};
use enemies::{DamageOutcome, Enemy, Movement};
use projectiles::{Flight, Projectile};
use slots::Slots;
use towers::TowerRegistry;

pub use path::{PathError, PathModel};

/// Lives, wave progress and run flags owned alongside the ledger.
#[derive(Clone, Debug)]
struct GameState {
    lives: u32,
    wave: u32,
    boss_wave: bool,
    critical: bool,
    game_over: bool,
    playtime: Duration,
}

/// Represents the authoritative Waypoint Defence world state.
#[derive(Debug)]
pub struct World {
    tuning: CombatTuning,
    path: PathModel,
    enemies: Slots<EnemyId, Enemy>,
    towers: TowerRegistry,
    projectiles: Slots<ProjectileId, Projectile>,
    ledger: EconomyLedger,
    state: GameState,
    rng: ChaCha8Rng,
    clock: Duration,
}

impl World {
    /// Creates a world for a fresh run described by `tuning`.
    ///
    /// The money multiplier is rolled from the tuning seed unless the tuning
    /// fixes it.
    pub fn new(tuning: CombatTuning) -> Result<Self, PathError> {
        let path = PathModel::new(tuning.level.waypoints.clone())?;
        let mut rng = ChaCha8Rng::seed_from_u64(tuning.seed);
        let money_multiplier = roll_money_multiplier(&tuning.economy, &mut rng);
        let ledger = EconomyLedger::new(&tuning.economy, &tuning.towers, money_multiplier);
        let lives = tuning.economy.starting_lives;
        let state = GameState {
            lives,
            wave: 1,
            boss_wave: false,
            critical: lives <= tuning.economy.critical_lives,
            game_over: lives == 0,
            playtime: Duration::ZERO,
        };
        debug!(money_multiplier, seed = tuning.seed, "world created");

        Ok(Self {
            tuning,
            path,
            enemies: Slots::new(),
            towers: TowerRegistry::new(),
            projectiles: Slots::new(),
            ledger,
            state,
            rng,
            clock: Duration::ZERO,
        })
    }

    fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.state.game_over {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        self.state.playtime = self.state.playtime.saturating_add(dt);
        out.push(Event::TimeAdvanced { dt });

        if self
            .ledger
            .expire_streak(self.clock, self.tuning.economy.combo_timeout())
        {
            debug!("kill streak expired");
        }

        let threshold = self.tuning.enemies.waypoint_threshold;
        for id in self.enemies.handles() {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };

            if enemy.advance(dt, &self.path, threshold) == Movement::ReachedEnd {
                let kind = enemy.kind;
                let _ = self.enemies.remove(id);
                debug!(?id, ?kind, "enemy reached the end of the path");
                out.push(Event::EnemyReachedEnd { enemy: id, kind });
                self.lose_life(out);
                continue;
            }

            let outcomes = enemy.tick_status(dt, &self.tuning.enemies, &mut self.rng);
            for outcome in outcomes {
                self.report_damage(id, outcome, None, out);
            }
        }

        for tower in self.towers.iter_mut() {
            tower.tick_cooldown(dt);
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out: &mut Vec<Event>) {
        if self.state.game_over {
            return;
        }

        let enemy = Enemy::spawn(kind, self.state.wave, &self.path);
        let position = enemy.position;
        let max_health = enemy.max_health;
        let id = self.enemies.insert(enemy);
        debug!(?id, ?kind, max_health, "enemy spawned");
        out.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position,
            max_health,
        });
    }

    fn start_wave(&mut self, planned: u32, boss: bool, out: &mut Vec<Event>) {
        if self.state.game_over {
            return;
        }

        self.state.boss_wave = boss;
        self.ledger.kills_this_wave = 0;
        info!(wave = self.state.wave, planned, boss, "wave started");
        out.push(Event::WaveStarted {
            wave: self.state.wave,
            planned,
            boss,
        });
    }

    fn complete_wave(&mut self, out: &mut Vec<Event>) {
        if self.state.game_over {
            return;
        }

        let wave = self.state.wave;
        let bonus = self.ledger.credit_wave_bonus(wave, &self.tuning.economy);
        let perfect =
            self.ledger.kills_this_wave > 0 && self.state.lives >= self.tuning.economy.starting_lives;
        if perfect {
            self.ledger.perfect_waves = self.ledger.perfect_waves.saturating_add(1);
        }
        self.ledger.kills_this_wave = 0;
        self.state.boss_wave = false;
        self.state.wave = wave.saturating_add(1);
        info!(wave, bonus, perfect, "wave completed");
        out.push(Event::WaveCompleted {
            wave,
            bonus,
            perfect,
        });
    }

    fn aim_tower(&mut self, tower: TowerId, bearing: f32) {
        let smoothing = self.tuning.towers.aim_smoothing;
        if let Some(state) = self.towers.get_mut(tower) {
            state.aim(bearing, smoothing);
        }
    }

    fn fire(&mut self, tower: TowerId, target: EnemyId, out: &mut Vec<Event>) {
        if self.state.game_over {
            return;
        }

        let Some(target_position) = self
            .enemies
            .get(target)
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position)
        else {
            return;
        };
        let Some(state) = self.towers.get_mut(tower) else {
            warn!(?tower, "fire requested for unknown tower");
            return;
        };
        if !state.is_ready() {
            return;
        }

        state.mark_fired();
        let offset = target_position - state.position;
        let projectile = Projectile {
            tower,
            target,
            position: state.position,
            rotation: offset.y.atan2(offset.x),
            damage: state.damage,
            speed: self.tuning.projectiles.speed,
            range: state.range,
            traveled: 0.0,
            effect: state.kind.on_hit(),
        };
        let id = self.projectiles.insert(projectile);
        out.push(Event::ProjectileFired {
            projectile: id,
            tower,
            target,
        });
    }

    fn advance_projectiles(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.state.game_over {
            return;
        }

        let hit_radius = self.tuning.projectiles.hit_radius;
        for id in self.projectiles.handles() {
            let Some(projectile) = self.projectiles.get_mut(id) else {
                continue;
            };

            let Some(target_position) = self
                .enemies
                .get(projectile.target)
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| enemy.position)
            else {
                let _ = self.projectiles.remove(id);
                out.push(Event::ProjectileExpired {
                    projectile: id,
                    reason: ExpiryReason::TargetLost,
                });
                continue;
            };

            match projectile.step(dt, target_position, hit_radius) {
                Flight::Moving => {}
                Flight::Exhausted => {
                    let _ = self.projectiles.remove(id);
                    out.push(Event::ProjectileExpired {
                        projectile: id,
                        reason: ExpiryReason::RangeExhausted,
                    });
                }
                Flight::Hit => {
                    if let Some(projectile) = self.projectiles.remove(id) {
                        self.resolve_hit(id, projectile, out);
                    }
                }
            }
        }
    }

    fn resolve_hit(&mut self, id: ProjectileId, projectile: Projectile, out: &mut Vec<Event>) {
        let tuning = &self.tuning.projectiles;
        let critical = self.rng.gen::<f32>() < tuning.critical_chance;
        let damage = if critical {
            floor_scaled(f64::from(projectile.damage), tuning.critical_multiplier)
        } else {
            projectile.damage
        };
        let splash = floor_scaled(f64::from(projectile.damage), tuning.splash_factor);
        let splash_radius = tuning.splash_radius;
        debug!(?id, target = ?projectile.target, damage, critical, "projectile hit");
        out.push(Event::ProjectileHit {
            projectile: id,
            target: projectile.target,
            damage,
            critical,
        });

        let Some(enemy) = self.enemies.get_mut(projectile.target) else {
            return;
        };
        let impact = enemy.position;
        let outcome = enemy.apply_damage(damage);

        let mut status = None;
        if enemy.is_alive() {
            match projectile.effect {
                OnHitEffect::Freeze => {
                    enemy.status.freeze(self.tuning.enemies.freeze_duration());
                    status = Some(StatusKind::Frozen);
                }
                OnHitEffect::Poison => {
                    enemy.status.poison(
                        self.tuning.enemies.poison_damage,
                        self.tuning.enemies.poison_interval(),
                    );
                    status = Some(StatusKind::Poisoned);
                }
                OnHitEffect::None | OnHitEffect::Splash => {}
            }
        }

        if let Some(outcome) = outcome {
            self.report_damage(projectile.target, outcome, Some(projectile.tower), out);
        }
        if let Some(status) = status {
            out.push(Event::StatusApplied {
                enemy: projectile.target,
                status,
            });
        }

        if projectile.effect == OnHitEffect::Splash {
            let bystanders: Vec<EnemyId> = self
                .enemies
                .iter()
                .filter(|(other, enemy)| {
                    *other != projectile.target
                        && enemy.is_alive()
                        && enemy.position.distance(impact) <= splash_radius
                })
                .map(|(other, _)| other)
                .collect();
            for other in bystanders {
                let outcome = self
                    .enemies
                    .get_mut(other)
                    .and_then(|enemy| enemy.apply_damage(splash));
                if let Some(outcome) = outcome {
                    self.report_damage(other, outcome, Some(projectile.tower), out);
                }
            }
        }
    }

    fn report_damage(
        &mut self,
        enemy: EnemyId,
        outcome: DamageOutcome,
        source: Option<TowerId>,
        out: &mut Vec<Event>,
    ) {
        out.push(Event::EnemyDamaged {
            enemy,
            amount: outcome.dealt,
            remaining: outcome.remaining,
        });
        if let Some(tower) = source.and_then(|tower| self.towers.get_mut(tower)) {
            tower.damage_dealt = tower.damage_dealt.saturating_add(u64::from(outcome.dealt));
        }
        if outcome.killed {
            self.resolve_kill(enemy, source, out);
        }
    }

    fn resolve_kill(&mut self, id: EnemyId, source: Option<TowerId>, out: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.remove(id) else {
            return;
        };
        let payout = self
            .ledger
            .on_kill(enemy.reward, self.clock, &self.tuning.economy);
        if enemy.kind == EnemyKind::Boss {
            self.ledger.bosses_killed = self.ledger.bosses_killed.saturating_add(1);
        }
        debug!(
            ?id,
            kind = ?enemy.kind,
            reward = payout.reward,
            streak = payout.streak,
            "enemy died"
        );
        out.push(Event::EnemyDied {
            enemy: id,
            kind: enemy.kind,
            position: enemy.position,
            reward: payout.reward,
            streak: payout.streak,
            combo_multiplier: payout.combo,
        });

        let tuning = &self.tuning.towers;
        if let Some(tower) = source.and_then(|tower| self.towers.get_mut(tower)) {
            tower.kills = tower.kills.saturating_add(1);
            if let Some(level) = tower.gain_experience(tuning.kill_experience, tuning) {
                out.push(Event::TowerLeveledUp {
                    tower: tower.id,
                    level,
                });
            }
        }
    }

    fn lose_life(&mut self, out: &mut Vec<Event>) {
        if self.state.lives == 0 {
            return;
        }

        self.state.lives -= 1;
        out.push(Event::LifeLost {
            remaining: self.state.lives,
        });
        self.refresh_critical_mode(out);

        if self.state.lives == 0 && !self.state.game_over {
            self.state.game_over = true;
            info!(
                wave = self.state.wave,
                score = self.ledger.score,
                "game over"
            );
            out.push(Event::GameOver {
                wave: self.state.wave,
                score: self.ledger.score,
            });
        }
    }

    fn refresh_critical_mode(&mut self, out: &mut Vec<Event>) {
        let active = self.state.lives <= self.tuning.economy.critical_lives;
        if active == self.state.critical {
            return;
        }
        self.state.critical = active;
        info!(active, lives = self.state.lives, "critical mode changed");
        out.push(Event::CriticalModeChanged { active });
    }

    fn purchase(&mut self, kind: TowerKind, out: &mut Vec<Event>) {
        let stats = kind.stats();
        if !is_unlocked(kind, self.state.wave) {
            out.push(Event::PurchaseRejected {
                kind,
                reason: PurchaseError::Locked {
                    unlock_wave: stats.unlock_wave,
                },
            });
            return;
        }

        match self.ledger.spend(stats.cost) {
            Ok(()) => {
                self.ledger.stock(kind);
                out.push(Event::TowerPurchased {
                    kind,
                    cost: stats.cost,
                });
            }
            Err(shortfall) => out.push(Event::PurchaseRejected {
                kind,
                reason: PurchaseError::InsufficientFunds {
                    cost: shortfall.cost,
                    available: shortfall.available,
                },
            }),
        }
    }

    fn placement_error(&self, kind: TowerKind, position: Vec2) -> Option<PlacementError> {
        let placement = &self.tuning.placement;
        if self.state.game_over {
            return Some(PlacementError::GameOver);
        }
        if !position.is_finite() {
            return Some(PlacementError::InvalidPosition);
        }
        if self.ledger.inventory_count(kind) == 0 {
            return Some(PlacementError::NoInventory);
        }
        if placement
            .reserved
            .iter()
            .any(|zone| zone.center.distance(position) < zone.radius)
        {
            return Some(PlacementError::Reserved);
        }
        if self.path.distance_to(position) < placement.path_half_width {
            return Some(PlacementError::OnPath);
        }
        if self.towers.is_crowded(position, placement.tower_spacing) {
            return Some(PlacementError::Occupied);
        }
        None
    }

    fn place(&mut self, kind: TowerKind, position: Vec2, out: &mut Vec<Event>) {
        if let Some(reason) = self.placement_error(kind, position) {
            out.push(Event::TowerPlacementRejected {
                kind,
                position,
                reason,
            });
            return;
        }

        if !self.ledger.take_from_inventory(kind) {
            return;
        }
        let tower = self.towers.insert(kind, position, &self.tuning.towers);
        self.ledger.towers_built = self.ledger.towers_built.saturating_add(1);
        debug!(?tower, ?kind, x = position.x, y = position.y, "tower placed");
        out.push(Event::TowerPlaced {
            tower,
            kind,
            position,
        });
    }

    fn upgrade_tower(&mut self, tower: TowerId, upgrade: TowerUpgrade, out: &mut Vec<Event>) {
        let Some(level) = self.towers.get(tower).map(|state| state.level) else {
            warn!(?tower, "upgrade requested for unknown tower");
            out.push(Event::UpgradeRejected {
                tower,
                upgrade,
                reason: UpgradeError::UnknownTower,
            });
            return;
        };

        let cost = upgrade.cost_at_level(level);
        if let Err(shortfall) = self.ledger.spend(cost) {
            out.push(Event::UpgradeRejected {
                tower,
                upgrade,
                reason: UpgradeError::InsufficientFunds {
                    cost: shortfall.cost,
                    available: shortfall.available,
                },
            });
            return;
        }

        let tuning = &self.tuning.towers;
        if let Some(state) = self.towers.get_mut(tower) {
            state.apply_upgrade(upgrade, tuning);
            out.push(Event::TowerUpgraded {
                tower,
                upgrade,
                cost,
            });
            if let Some(level) = state.gain_experience(tuning.upgrade_experience, tuning) {
                out.push(Event::TowerLeveledUp { tower, level });
            }
        }
    }

    fn upgrade_all(&mut self, upgrade: GlobalUpgrade, out: &mut Vec<Event>) {
        let price = self.ledger.global_price(upgrade);
        if let Err(shortfall) = self.ledger.spend(price) {
            out.push(Event::GlobalUpgradeRejected {
                upgrade,
                reason: UpgradeError::InsufficientFunds {
                    cost: shortfall.cost,
                    available: shortfall.available,
                },
            });
            return;
        }

        let tuning = &self.tuning.towers;
        for tower in self.towers.iter_mut() {
            tower.apply_global(upgrade, tuning);
        }
        let next_price = self.ledger.record_global_upgrade(upgrade, price, tuning);
        out.push(Event::GlobalUpgradeApplied {
            upgrade,
            cost: price,
            next_price,
        });
    }

    fn unlock(&mut self, achievement: Achievement, out: &mut Vec<Event>) {
        if !self.ledger.unlock(achievement) {
            return;
        }
        if achievement == Achievement::TowerLord {
            self.ledger.money_multiplier += self.tuning.economy.tower_lord_bonus;
        }
        info!(achievement = achievement.title(), "achievement unlocked");
        out.push(Event::AchievementUnlocked { achievement });
    }

    fn restore(&mut self, snapshot: ProgressSnapshot, out: &mut Vec<Event>) {
        self.ledger.restore(&snapshot);
        self.state.lives = snapshot.lives;
        self.state.wave = snapshot.wave.max(1);
        self.state.boss_wave = false;
        self.state.game_over = snapshot.lives == 0;
        self.state.playtime = Duration::from_millis(snapshot.playtime_ms);
        self.enemies.clear();
        self.projectiles.clear();
        self.refresh_critical_mode(out);
        info!(wave = self.state.wave, money = snapshot.money, "progress restored");
        out.push(Event::ProgressRestored);
    }
}

fn roll_money_multiplier(economy: &EconomyTuning, rng: &mut ChaCha8Rng) -> f32 {
    if let Some(fixed) = economy.money_multiplier {
        return fixed;
    }
    if economy.money_multiplier_min < economy.money_multiplier_max {
        rng.gen_range(economy.money_multiplier_min..economy.money_multiplier_max)
    } else {
        economy.money_multiplier_min
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid requests never fail; they are reported as rejection events and
/// leave the world untouched.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::StartWave { planned, boss } => world.start_wave(planned, boss, out_events),
        Command::CompleteWave => world.complete_wave(out_events),
        Command::AimTower { tower, bearing } => world.aim_tower(tower, bearing),
        Command::FireProjectile { tower, target } => world.fire(tower, target, out_events),
        Command::AdvanceProjectiles { dt } => world.advance_projectiles(dt, out_events),
        Command::PurchaseTower { kind } => world.purchase(kind, out_events),
        Command::PlaceTower { kind, position } => world.place(kind, position, out_events),
        Command::UpgradeTower { tower, upgrade } => {
            world.upgrade_tower(tower, upgrade, out_events)
        }
        Command::UpgradeAllTowers { upgrade } => world.upgrade_all(upgrade, out_events),
        Command::UnlockAchievement { achievement } => world.unlock(achievement, out_events),
        Command::RestoreProgress { snapshot } => world.restore(snapshot, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use waypoint_defence_core::{
        Achievement, CombatTuning, EnemyId, EnemySnapshot, EnemyView, GlobalUpgrade,
        ProgressSnapshot, ProjectileId, TowerCooldownSnapshot, TowerCooldownView, TowerId,
        TowerKind, TowerSnapshot, TowerView,
    };

    use super::{enemies::Enemy, PathModel, World};

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &CombatTuning {
        &world.tuning
    }

    /// Path walked by every enemy.
    #[must_use]
    pub fn path(world: &World) -> &PathModel {
        &world.path
    }

    /// Simulated time elapsed since the world was created.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Captures the live enemies in arena iteration order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|(_, enemy)| enemy.is_alive())
                .map(|(id, enemy)| enemy_snapshot(id, enemy))
                .collect(),
        )
    }

    /// Captures a single enemy, if it is still in the arena.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<EnemySnapshot> {
        world
            .enemies
            .get(id)
            .map(|enemy| enemy_snapshot(id, enemy))
    }

    /// Number of enemies currently in the arena.
    #[must_use]
    pub fn live_enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures every placed tower sorted by identifier.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a single tower, if it exists.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(id).map(|tower| tower.snapshot())
    }

    /// Captures the time each tower needs before it may fire again.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    ready_in: tower.ready_in(),
                })
                .collect(),
        )
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|(id, projectile)| ProjectileSnapshot {
                id,
                tower: projectile.tower,
                target: projectile.target,
                position: projectile.position,
                rotation: projectile.rotation,
                damage: projectile.damage,
                traveled: projectile.traveled,
            })
            .collect()
    }

    /// Captures the ledger and game state as a flat persistable record.
    #[must_use]
    pub fn progress(world: &World) -> ProgressSnapshot {
        let ledger = &world.ledger;
        ProgressSnapshot {
            money: ledger.money,
            money_multiplier: ledger.money_multiplier,
            score: ledger.score,
            lives: world.state.lives,
            wave: world.state.wave,
            streak_count: ledger.streak,
            max_streak: ledger.max_streak,
            total_kills: ledger.total_kills,
            total_money_earned: ledger.total_money_earned,
            bosses_killed: ledger.bosses_killed,
            perfect_waves: ledger.perfect_waves,
            towers_built: ledger.towers_built,
            money_spent_on_upgrades: ledger.money_spent_on_upgrades,
            global_range_price: ledger.global_price(GlobalUpgrade::Range),
            global_speed_price: ledger.global_price(GlobalUpgrade::Speed),
            playtime_ms: u64::try_from(world.state.playtime.as_millis()).unwrap_or(u64::MAX),
            inventory: ledger.inventory_entries(),
            achievements: ledger.achievements.iter().copied().collect(),
        }
    }

    /// Current balance.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.ledger.money
    }

    /// Reports whether the balance covers `cost`.
    #[must_use]
    pub fn can_afford(world: &World, cost: u32) -> bool {
        world.ledger.can_afford(cost)
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.ledger.score
    }

    /// Current wave number, starting at one.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.state.wave
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.state.lives
    }

    /// Current kill streak.
    #[must_use]
    pub fn streak(world: &World) -> u32 {
        world.ledger.streak
    }

    /// Combo multiplier earned by the current streak.
    #[must_use]
    pub fn combo_multiplier(world: &World) -> f32 {
        world.ledger.combo
    }

    /// Run-wide multiplier applied to kill rewards.
    #[must_use]
    pub fn money_multiplier(world: &World) -> f32 {
        world.ledger.money_multiplier
    }

    /// Units of `kind` waiting in the inventory.
    #[must_use]
    pub fn inventory_count(world: &World, kind: TowerKind) -> u32 {
        world.ledger.inventory_count(kind)
    }

    /// Price of the next global upgrade of the provided kind.
    #[must_use]
    pub fn global_upgrade_price(world: &World, upgrade: GlobalUpgrade) -> u32 {
        world.ledger.global_price(upgrade)
    }

    /// Reports whether the provided achievement was earned.
    #[must_use]
    pub fn has_achievement(world: &World, achievement: Achievement) -> bool {
        world.ledger.achievements.contains(&achievement)
    }

    /// Reports whether the current wave ends with a boss.
    #[must_use]
    pub fn is_boss_wave(world: &World) -> bool {
        world.state.boss_wave
    }

    /// Reports whether critical mode is active.
    #[must_use]
    pub fn is_critical_mode(world: &World) -> bool {
        world.state.critical
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.state.game_over
    }

    /// Simulated time played, including time restored from a snapshot.
    #[must_use]
    pub fn playtime(world: &World) -> Duration {
        world.state.playtime
    }

    fn enemy_snapshot(id: EnemyId, enemy: &Enemy) -> EnemySnapshot {
        EnemySnapshot {
            id,
            kind: enemy.kind,
            position: enemy.position,
            rotation: enemy.rotation,
            health: enemy.health,
            max_health: enemy.max_health,
            path_progress: enemy.path_progress,
            frozen: enemy.status.is_frozen(),
            poisoned: enemy.status.is_poisoned(),
        }
    }

    /// Immutable representation of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Handle of the projectile.
        pub id: ProjectileId,
        /// Tower that fired it.
        pub tower: TowerId,
        /// Enemy it homes in on.
        pub target: EnemyId,
        /// Current position.
        pub position: Vec2,
        /// Facing in radians.
        pub rotation: f32,
        /// Damage captured when it was fired.
        pub damage: u32,
        /// Distance flown so far.
        pub traveled: f32,
    }
}
