//! 出题引擎：按等级与魔法系别生成题目，并记住当前题目用于判题。

pub mod dice;
pub mod kinds;

use serde::{Deserialize, Serialize};

pub use dice::{Dice, RngDice};
pub use kinds::{physics_tier, ProblemKind};

use crate::magic::MagicType;

/// 判题容差。物理 / 微积分题存在浮点舍入，因此使用固定的绝对容差。
pub const ANSWER_TOLERANCE: f64 = 0.1;

/// 一道题目。`text` 可能包含 HTML 排版标记。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub text: String,
    pub answer: f64,
    pub hint: String,
}

impl Problem {
    pub fn matches(&self, submitted: f64) -> bool {
        (submitted - self.answer).abs() < ANSWER_TOLERANCE
    }
}

/// 一次提交的判定结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerCheck {
    /// 输入不是数字，或者当前没有题目。
    Ignored,
    Correct,
    Incorrect,
}

/// 按 JavaScript `parseFloat` 的方式解析：跳过前导空白，取最长的数字前缀。
pub fn parse_answer(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if trimmed[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

/// 题目生成器。除了"当前题目"之外不保留历史。
pub struct ProblemGenerator<D: Dice = RngDice> {
    dice: D,
    current: Option<Problem>,
}

impl ProblemGenerator<RngDice> {
    pub fn from_entropy() -> Self {
        Self::new(RngDice::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(RngDice::with_seed(seed))
    }
}

impl<D: Dice> ProblemGenerator<D> {
    pub fn new(dice: D) -> Self {
        Self {
            dice,
            current: None,
        }
    }

    pub fn generate(&mut self, circle: u32, category: MagicType) -> &Problem {
        let kind = ProblemKind::select(circle, category);
        let problem = kind.build(&mut self.dice);
        tracing::debug!(circle, %category, ?kind, "problem generated");
        self.current.insert(problem)
    }

    pub fn current(&self) -> Option<&Problem> {
        self.current.as_ref()
    }

    pub fn check_answer(&self, input: &str) -> AnswerCheck {
        let Some(problem) = &self.current else {
            return AnswerCheck::Ignored;
        };
        match parse_answer(input) {
            None => AnswerCheck::Ignored,
            Some(value) if problem.matches(value) => AnswerCheck::Correct,
            Some(_) => AnswerCheck::Incorrect,
        }
    }
}
