use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::{GameConfig, MAX_CIRCLE, MIN_CIRCLE};
use crate::error::CommandError;
use crate::magic::MagicType;

/// 怪物模板：名称、基础生命值、展示用表情。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub base_hp: u32,
    pub emoji: &'static str,
}

/// 按强度排列，每两圈提升一档，最高为巨龙。
pub const MONSTER_TEMPLATES: [MonsterTemplate; 6] = [
    MonsterTemplate {
        name: "Slime",
        base_hp: 50,
        emoji: "🦠",
    },
    MonsterTemplate {
        name: "Goblin",
        base_hp: 80,
        emoji: "👺",
    },
    MonsterTemplate {
        name: "Orc",
        base_hp: 120,
        emoji: "👹",
    },
    MonsterTemplate {
        name: "Troll",
        base_hp: 200,
        emoji: "🧟",
    },
    MonsterTemplate {
        name: "Golem",
        base_hp: 300,
        emoji: "🗿",
    },
    MonsterTemplate {
        name: "Dragon",
        base_hp: 1000,
        emoji: "🐲",
    },
];

impl MonsterTemplate {
    pub fn for_circle(circle: u32) -> &'static MonsterTemplate {
        let index = (circle.saturating_sub(1) / 2) as usize;
        &MONSTER_TEMPLATES[index.min(MONSTER_TEMPLATES.len() - 1)]
    }
}

/// 玩家所在地点。只有地牢里可以攻击怪物，训练场经验减半。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Home,
    Training,
    Dungeon,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Training => "training",
            Location::Dungeon => "dungeon",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Location::Home),
            "training" => Ok(Location::Training),
            "dungeon" => Ok(Location::Dungeon),
            _ => Err(CommandError::UnknownLocation {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Monster {
    pub name: String,
    pub emoji: String,
    pub max_hp: u32,
    pub current_hp: u32,
}

impl Monster {
    pub fn from_template(template: &MonsterTemplate, circle: u32) -> Self {
        let max_hp = template.base_hp.saturating_mul(circle.max(1));
        Self {
            name: template.name.to_string(),
            emoji: template.emoji.to_string(),
            max_hp,
            current_hp: max_hp,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }
}

/// 玩家进度与资源。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerState {
    pub circle: u32,
    pub xp: u32,
    pub max_xp: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub magic_type: MagicType,
    pub location: Location,
}

impl PlayerState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            circle: MIN_CIRCLE,
            xp: 0,
            max_xp: config.starting_max_xp.max(1),
            hp: config.starting_max_hp,
            max_hp: config.starting_max_hp,
            mana: config.starting_max_mana,
            max_mana: config.starting_max_mana,
            magic_type: MagicType::default(),
            location: Location::default(),
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// 渲染层关心的状态变化。核心只负责产出，由宿主取走。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GameEvent {
    LocationChanged {
        location: Location,
    },
    MonsterSpawned {
        name: String,
        emoji: String,
        circle: u32,
        max_hp: u32,
    },
    MonsterDamaged {
        amount: u32,
        remaining_hp: u32,
        killed: bool,
    },
    DamageFlashEnded,
    XpGained {
        amount: u32,
        xp: u32,
        max_xp: u32,
    },
    LeveledUp {
        circle: u32,
        max_xp: u32,
    },
    CircleChanged {
        circle: u32,
    },
    MagicTypeChanged {
        magic_type: MagicType,
    },
    Rested,
    ManaSpent {
        amount: u32,
        remaining: u32,
    },
    PlayerDamaged {
        amount: u32,
        remaining_hp: u32,
    },
    ProblemPresented {
        text: String,
    },
    HintRevealed {
        hint: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    CircleOutOfRange { value: u32 },
    ZeroXpThreshold,
    XpOverflow { xp: u32, max_xp: u32 },
    HealthOutOfRange { value: u32, max: u32 },
    ManaOutOfRange { value: u32, max: u32 },
    MonsterHealthOutOfRange { value: u32, max: u32 },
}

/// 开启连续升级时，单次获得经验最多连升的级数。
pub const MAX_CASCADE_LEVELS: u32 = 100;

/// 一次获得经验的结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpGain {
    pub applied: u32,
    pub levels_gained: u32,
}

impl XpGain {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// 游戏整体状态：玩家进度、当前怪物以及待取走的事件。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub player: PlayerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster: Option<Monster>,
    #[serde(skip)]
    config: GameConfig,
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            player: PlayerState::new(&config),
            monster: None,
            config,
            pending_events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn set_location(&mut self, location: Location) {
        self.player.location = location;
        self.record_event(GameEvent::LocationChanged { location });
        if location == Location::Dungeon && self.monster.is_none() {
            self.spawn_monster();
        }
    }

    pub fn rest(&mut self) {
        self.player.hp = self.player.max_hp;
        self.player.mana = self.player.max_mana;
        self.record_event(GameEvent::Rested);
    }

    /// 获得经验。连续升级时单次最多升 [`MAX_CASCADE_LEVELS`] 级，余下的经验丢弃。
    pub fn gain_xp(&mut self, amount: u32) -> XpGain {
        let applied = if self.player.location == Location::Training {
            (amount as f64 * self.config.training_xp_multiplier).floor() as u32
        } else {
            amount
        };

        self.player.xp = self.player.xp.saturating_add(applied);
        self.record_event(GameEvent::XpGained {
            amount: applied,
            xp: self.player.xp,
            max_xp: self.player.max_xp,
        });

        let mut levels_gained = 0;
        if self.player.xp >= self.player.max_xp {
            if self.config.cascade_level_ups {
                while self.player.xp >= self.player.max_xp && levels_gained < MAX_CASCADE_LEVELS {
                    let overflow = self.player.xp - self.player.max_xp;
                    self.level_up();
                    self.player.xp = overflow;
                    levels_gained += 1;
                }
                if self.player.xp >= self.player.max_xp {
                    tracing::warn!(
                        discarded = self.player.xp,
                        levels_gained,
                        "cascade limit reached, overflow discarded"
                    );
                    self.player.xp = 0;
                }
            } else {
                self.level_up();
                levels_gained = 1;
            }
        }

        XpGain {
            applied,
            levels_gained,
        }
    }

    /// 升级：溢出的经验直接丢弃，生命与法力回满。门槛至少上涨 1。
    pub fn level_up(&mut self) -> bool {
        let player = &mut self.player;
        player.circle = player.circle.saturating_add(1);
        player.xp = 0;
        player.max_xp = ((player.max_xp as f64 * self.config.level_up_xp_growth).floor() as u32)
            .max(player.max_xp.saturating_add(1));
        player.hp = player.max_hp;
        player.mana = player.max_mana;

        let (circle, max_xp) = (player.circle, player.max_xp);
        tracing::info!(circle, max_xp, "level up");
        self.record_event(GameEvent::LeveledUp { circle, max_xp });
        true
    }

    pub fn spawn_monster(&mut self) {
        let circle = self.player.circle;
        let monster = Monster::from_template(MonsterTemplate::for_circle(circle), circle);
        tracing::debug!(name = %monster.name, max_hp = monster.max_hp, circle, "monster spawned");
        self.record_event(GameEvent::MonsterSpawned {
            name: monster.name.clone(),
            emoji: monster.emoji.clone(),
            circle,
            max_hp: monster.max_hp,
        });
        self.monster = Some(monster);
    }

    /// 返回怪物是否被击杀。不在地牢或没有怪物时不做任何事。
    pub fn damage_monster(&mut self, amount: u32) -> bool {
        if self.player.location != Location::Dungeon {
            return false;
        }
        let Some(monster) = self.monster.as_mut() else {
            return false;
        };

        monster.current_hp = monster.current_hp.saturating_sub(amount);
        let killed = monster.is_defeated();
        let remaining_hp = monster.current_hp;
        self.record_event(GameEvent::MonsterDamaged {
            amount,
            remaining_hp,
            killed,
        });
        killed
    }

    pub fn use_mana(&mut self, amount: u32) -> bool {
        if self.player.mana < amount {
            return false;
        }
        self.player.mana -= amount;
        self.record_event(GameEvent::ManaSpent {
            amount,
            remaining: self.player.mana,
        });
        true
    }

    /// 施法失败的反噬，生命值最低降到 0。返回实际损失。
    pub fn backfire(&mut self, amount: u32) -> u32 {
        let before = self.player.hp;
        self.player.hp = before.saturating_sub(amount);
        let lost = before - self.player.hp;
        self.record_event(GameEvent::PlayerDamaged {
            amount: lost,
            remaining_hp: self.player.hp,
        });
        lost
    }

    /// 手动切换圈数，超出 [1, 10] 时拒绝且不改变状态。成功后重新生成怪物。
    pub fn change_circle(&mut self, delta: i32) -> bool {
        let target = i64::from(self.player.circle) + i64::from(delta);
        if target < i64::from(MIN_CIRCLE) || target > i64::from(MAX_CIRCLE) {
            tracing::warn!(circle = self.player.circle, delta, "circle change rejected");
            return false;
        }

        self.player.circle = target as u32;
        tracing::info!(circle = self.player.circle, "circle changed");
        self.record_event(GameEvent::CircleChanged {
            circle: self.player.circle,
        });
        self.spawn_monster();
        true
    }

    pub fn set_magic_type(&mut self, magic_type: MagicType) {
        self.player.magic_type = magic_type;
        self.record_event(GameEvent::MagicTypeChanged { magic_type });
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let player = &self.player;
        if player.circle < MIN_CIRCLE {
            return Err(IntegrityError::CircleOutOfRange {
                value: player.circle,
            });
        }
        if player.max_xp == 0 {
            return Err(IntegrityError::ZeroXpThreshold);
        }
        if player.xp >= player.max_xp {
            return Err(IntegrityError::XpOverflow {
                xp: player.xp,
                max_xp: player.max_xp,
            });
        }
        if player.hp > player.max_hp {
            return Err(IntegrityError::HealthOutOfRange {
                value: player.hp,
                max: player.max_hp,
            });
        }
        if player.mana > player.max_mana {
            return Err(IntegrityError::ManaOutOfRange {
                value: player.mana,
                max: player.max_mana,
            });
        }
        if let Some(monster) = &self.monster {
            if monster.max_hp == 0 || monster.current_hp > monster.max_hp {
                return Err(IntegrityError::MonsterHealthOutOfRange {
                    value: monster.current_hp,
                    max: monster.max_hp,
                });
            }
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
