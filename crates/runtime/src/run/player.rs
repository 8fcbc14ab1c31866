use delve_core::{PlayerStat, StatBlock, Vec2};
use serde::{Deserialize, Serialize};

/// Mutable player state; every capacity comes from the derived stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub health: f64,
    pub dash_charges: u32,
}

impl Player {
    pub fn spawn(position: Vec2, stats: &StatBlock<PlayerStat>) -> Self {
        Self {
            position,
            health: max_health(stats),
            dash_charges: max_dashes(stats),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn hurt(&mut self, amount: f64) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    pub fn heal(&mut self, amount: f64, stats: &StatBlock<PlayerStat>) {
        self.health = (self.health + amount.max(0.0)).min(max_health(stats));
    }

    /// Uses one dash charge. False when none are left.
    pub fn spend_dash(&mut self) -> bool {
        if self.dash_charges == 0 {
            return false;
        }
        self.dash_charges -= 1;
        true
    }

    pub fn refund_dash(&mut self, stats: &StatBlock<PlayerStat>) {
        self.dash_charges = (self.dash_charges + 1).min(max_dashes(stats));
    }

    /// Keeps health and charges inside the current capacities.
    pub fn clamp_to(&mut self, stats: &StatBlock<PlayerStat>) {
        self.health = self.health.min(max_health(stats));
        self.dash_charges = self.dash_charges.min(max_dashes(stats));
    }
}

fn max_health(stats: &StatBlock<PlayerStat>) -> f64 {
    stats[PlayerStat::MaxHp].max(1.0)
}

fn max_dashes(stats: &StatBlock<PlayerStat>) -> u32 {
    stats[PlayerStat::DashCharges].max(0.0).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_follow_stats() {
        let mut stats = StatBlock::new();
        let mut player = Player::spawn(Vec2::ZERO, &stats);
        assert_eq!(player.health, 6.0);
        assert_eq!(player.dash_charges, 1);

        player.hurt(4.0);
        player.heal(10.0, &stats);
        assert_eq!(player.health, 6.0);

        assert!(player.spend_dash());
        assert!(!player.spend_dash());
        player.refund_dash(&stats);
        player.refund_dash(&stats);
        assert_eq!(player.dash_charges, 1);

        stats[PlayerStat::MaxHp] = 4.0;
        player.clamp_to(&stats);
        assert_eq!(player.health, 4.0);
    }
}
