use serde::{Deserialize, Serialize};

use crate::game::IntegrityError;

/// 宿主传入的命令无法执行时返回的错误。领域操作本身不会报错，只在边界上出现。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[serde(tag = "type")]
pub enum CommandError {
    #[error("unknown magic type `{value}`")]
    UnknownMagicType { value: String },
    #[error("unknown location `{value}`")]
    UnknownLocation { value: String },
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
    #[error("state integrity violated: {error:?}")]
    IntegrityViolation { error: IntegrityError },
}
