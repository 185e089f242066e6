//! Currency, scoring, streaks and run-wide counters.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use waypoint_defence_core::{
    combo_multiplier, Achievement, EconomyTuning, GlobalUpgrade, InventoryEntry,
    ProgressSnapshot, TowerKind, TowerTuning,
};

/// Money credited for a kill together with the streak state it produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct KillPayout {
    pub(crate) reward: u32,
    pub(crate) streak: u32,
    pub(crate) combo: f32,
}

/// Price of a purchase that the balance could not cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Shortfall {
    pub(crate) cost: u32,
    pub(crate) available: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct EconomyLedger {
    pub(crate) money: u32,
    pub(crate) money_multiplier: f32,
    pub(crate) score: u64,
    pub(crate) streak: u32,
    pub(crate) max_streak: u32,
    pub(crate) combo: f32,
    last_kill_at: Option<Duration>,
    pub(crate) total_kills: u32,
    pub(crate) total_money_earned: u64,
    pub(crate) kills_this_wave: u32,
    pub(crate) bosses_killed: u32,
    pub(crate) perfect_waves: u32,
    pub(crate) towers_built: u32,
    pub(crate) money_spent_on_upgrades: u64,
    global_range_price: u32,
    global_speed_price: u32,
    inventory: BTreeMap<TowerKind, u32>,
    pub(crate) achievements: BTreeSet<Achievement>,
}

impl EconomyLedger {
    pub(crate) fn new(economy: &EconomyTuning, towers: &TowerTuning, money_multiplier: f32) -> Self {
        Self {
            money: economy.starting_money,
            money_multiplier,
            score: 0,
            streak: 0,
            max_streak: 0,
            combo: 1.0,
            last_kill_at: None,
            total_kills: 0,
            total_money_earned: 0,
            kills_this_wave: 0,
            bosses_killed: 0,
            perfect_waves: 0,
            towers_built: 0,
            money_spent_on_upgrades: 0,
            global_range_price: towers.global_initial_price,
            global_speed_price: towers.global_initial_price,
            inventory: BTreeMap::new(),
            achievements: BTreeSet::new(),
        }
    }

    /// Resets the streak when more than `timeout` passed since the last kill.
    pub(crate) fn expire_streak(&mut self, now: Duration, timeout: Duration) -> bool {
        let Some(last) = self.last_kill_at else {
            return false;
        };
        if self.streak == 0 || now.saturating_sub(last) <= timeout {
            return false;
        }
        self.streak = 0;
        self.combo = 1.0;
        true
    }

    /// Credits a kill worth `reward_value` at time `now`.
    pub(crate) fn on_kill(
        &mut self,
        reward_value: u32,
        now: Duration,
        economy: &EconomyTuning,
    ) -> KillPayout {
        let _ = self.expire_streak(now, economy.combo_timeout());

        self.streak = self.streak.saturating_add(1);
        self.max_streak = self.max_streak.max(self.streak);
        self.combo = combo_multiplier(self.streak);

        let reward = floor_scaled(
            f64::from(reward_value) * f64::from(self.money_multiplier),
            self.combo,
        );
        self.money = self.money.saturating_add(reward);
        let score = (reward_value as f32 * economy.score_per_reward as f32 * self.combo).round();
        self.score = self.score.saturating_add(score as u64);
        self.total_kills = self.total_kills.saturating_add(1);
        self.kills_this_wave = self.kills_this_wave.saturating_add(1);
        self.total_money_earned = self.total_money_earned.saturating_add(u64::from(reward));
        self.last_kill_at = Some(now);

        KillPayout {
            reward,
            streak: self.streak,
            combo: self.combo,
        }
    }

    pub(crate) fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }

    /// Deducts `cost`, or leaves the balance untouched when it does not cover it.
    pub(crate) fn spend(&mut self, cost: u32) -> Result<(), Shortfall> {
        if !self.can_afford(cost) {
            return Err(Shortfall {
                cost,
                available: self.money,
            });
        }
        self.money -= cost;
        Ok(())
    }

    /// Pays the wave clear bonus and returns it.
    pub(crate) fn credit_wave_bonus(&mut self, wave: u32, economy: &EconomyTuning) -> u32 {
        let bonus = wave.saturating_mul(economy.wave_bonus_per_wave);
        self.money = self.money.saturating_add(bonus);
        self.score = self
            .score
            .saturating_add(u64::from(bonus) * u64::from(economy.wave_bonus_score_factor));
        bonus
    }

    pub(crate) fn inventory_count(&self, kind: TowerKind) -> u32 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }

    pub(crate) fn stock(&mut self, kind: TowerKind) {
        *self.inventory.entry(kind).or_insert(0) += 1;
    }

    /// Removes one unit of `kind`, reporting whether one was available.
    pub(crate) fn take_from_inventory(&mut self, kind: TowerKind) -> bool {
        match self.inventory.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn global_price(&self, upgrade: GlobalUpgrade) -> u32 {
        match upgrade {
            GlobalUpgrade::Range => self.global_range_price,
            GlobalUpgrade::Speed => self.global_speed_price,
        }
    }

    /// Records a paid global upgrade and returns the next price.
    pub(crate) fn record_global_upgrade(
        &mut self,
        upgrade: GlobalUpgrade,
        paid: u32,
        towers: &TowerTuning,
    ) -> u32 {
        self.money_spent_on_upgrades = self.money_spent_on_upgrades.saturating_add(u64::from(paid));
        let price = match upgrade {
            GlobalUpgrade::Range => &mut self.global_range_price,
            GlobalUpgrade::Speed => &mut self.global_speed_price,
        };
        *price = floor_scaled(f64::from(*price), towers.global_price_growth);
        *price
    }

    /// Records an achievement, reporting whether it was new.
    pub(crate) fn unlock(&mut self, achievement: Achievement) -> bool {
        self.achievements.insert(achievement)
    }

    pub(crate) fn inventory_entries(&self) -> Vec<InventoryEntry> {
        self.inventory
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| InventoryEntry {
                kind: *kind,
                count: *count,
            })
            .collect()
    }

    /// Overwrites the ledger from a snapshot; the streak always restarts.
    pub(crate) fn restore(&mut self, snapshot: &ProgressSnapshot) {
        self.money = snapshot.money;
        self.money_multiplier = snapshot.money_multiplier;
        self.score = snapshot.score;
        self.streak = 0;
        self.combo = 1.0;
        self.last_kill_at = None;
        self.max_streak = snapshot.max_streak;
        self.total_kills = snapshot.total_kills;
        self.total_money_earned = snapshot.total_money_earned;
        self.kills_this_wave = 0;
        self.bosses_killed = snapshot.bosses_killed;
        self.perfect_waves = snapshot.perfect_waves;
        self.towers_built = snapshot.towers_built;
        self.money_spent_on_upgrades = snapshot.money_spent_on_upgrades;
        self.global_range_price = snapshot.global_range_price;
        self.global_speed_price = snapshot.global_speed_price;
        self.inventory = snapshot
            .inventory
            .iter()
            .map(|entry| (entry.kind, entry.count))
            .collect();
        self.achievements = snapshot.achievements.iter().copied().collect();
    }
}

/// Multiplies and floors, absorbing the representation error of `f32` factors
/// such as 1.3 so that whole-number products are not floored one short.
pub(crate) fn floor_scaled(value: f64, factor: f32) -> u32 {
    let product = value * f64::from(factor);
    (product + 1e-4).floor().clamp(0.0, f64::from(u32::MAX)) as u32
}
