use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// 圈数（等级）允许手动切换的范围。
pub const MIN_CIRCLE: u32 = 1;
pub const MAX_CIRCLE: u32 = 10;

/// 数值经济与计时参数。宿主可以只传需要覆盖的字段。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub starting_max_xp: u32,
    pub starting_max_hp: u32,
    pub starting_max_mana: u32,
    /// 训练场获得经验的倍率，结果向下取整。
    pub training_xp_multiplier: f64,
    pub level_up_xp_growth: f64,
    /// 一次获得大量经验时是否连续升级（保留溢出经验）。
    pub cascade_level_ups: bool,
    pub kill_xp: u32,
    pub hit_xp: u32,
    pub base_spell_damage: u32,
    pub damage_per_circle: u32,
    pub backfire_damage: u32,
    pub hint_after_failures: u32,
    pub respawn_delay_ms: u32,
    pub next_problem_delay_ms: u32,
    pub damage_flash_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_max_xp: 100,
            starting_max_hp: 100,
            starting_max_mana: 100,
            training_xp_multiplier: 0.5,
            level_up_xp_growth: 1.5,
            cascade_level_ups: false,
            kill_xp: 50,
            hit_xp: 10,
            base_spell_damage: 20,
            damage_per_circle: 5,
            backfire_damage: 10,
            hint_after_failures: 5,
            respawn_delay_ms: 1500,
            next_problem_delay_ms: 1200,
            damage_flash_ms: 100,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, CommandError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|error| CommandError::InvalidConfig {
                message: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        let invalid = |message: &str| -> Result<(), CommandError> {
            Err(CommandError::InvalidConfig {
                message: message.to_string(),
            })
        };
        if self.starting_max_xp == 0 {
            return invalid("starting_max_xp must be positive");
        }
        if !self.training_xp_multiplier.is_finite() || self.training_xp_multiplier < 0.0 {
            return invalid("training_xp_multiplier must be a finite, non-negative number");
        }
        if !self.level_up_xp_growth.is_finite() || self.level_up_xp_growth <= 1.0 {
            return invalid("level_up_xp_growth must be greater than 1");
        }
        if self.hint_after_failures == 0 {
            return invalid("hint_after_failures must be positive");
        }
        Ok(())
    }

    /// 施法成功时对怪物造成的伤害。
    pub fn spell_damage(&self, circle: u32) -> u32 {
        self.base_spell_damage
            .saturating_add(circle.saturating_mul(self.damage_per_circle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "kill_xp": 75 }"#).expect("valid config");
        assert_eq!(config.kill_xp, 75);
        assert_eq!(config.hit_xp, 10);
        assert_eq!(config.respawn_delay_ms, 1500);
    }

    #[test]
    fn rejects_zero_xp_threshold() {
        let result = GameConfig::from_json(r#"{ "starting_max_xp": 0 }"#);
        assert!(matches!(result, Err(CommandError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_shrinking_level_curve() {
        let config = GameConfig {
            level_up_xp_growth: 0.9,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_flat_level_curve() {
        let result = GameConfig::from_json(
            r#"{ "starting_max_xp": 1, "level_up_xp_growth": 1.0, "cascade_level_ups": true }"#,
        );
        assert!(matches!(result, Err(CommandError::InvalidConfig { .. })));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            GameConfig::from_json("{ nope"),
            Err(CommandError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn spell_damage_scales_with_circle() {
        let config = GameConfig::default();
        assert_eq!(config.spell_damage(1), 25);
        assert_eq!(config.spell_damage(10), 70);
    }
}
