//! 游戏核心逻辑模块（进度、战斗与资源经济）。

pub mod config;
pub mod state;

pub use config::{GameConfig, MAX_CIRCLE, MIN_CIRCLE};
pub use state::{
    GameEvent,
    GameState,
    IntegrityError,
    Location,
    Monster,
    MonsterTemplate,
    PlayerState,
    XpGain,
    MAX_CASCADE_LEVELS,
    MONSTER_TEMPLATES,
};
