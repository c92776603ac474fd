use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// 魔法系别，同时决定题目类别：奥术 = 纯数学，闪电 = 电学，冰霜 = 热学。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MagicType {
    #[default]
    Arcane,
    Lightning,
    Ice,
}

impl MagicType {
    pub const ALL: [MagicType; 3] = [MagicType::Arcane, MagicType::Lightning, MagicType::Ice];

    pub fn as_str(&self) -> &'static str {
        match self {
            MagicType::Arcane => "arcane",
            MagicType::Lightning => "lightning",
            MagicType::Ice => "ice",
        }
    }
}

impl fmt::Display for MagicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MagicType {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arcane" => Ok(MagicType::Arcane),
            "lightning" => Ok(MagicType::Lightning),
            "ice" => Ok(MagicType::Ice),
            _ => Err(CommandError::UnknownMagicType {
                value: s.to_string(),
            }),
        }
    }
}
