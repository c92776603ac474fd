use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 出题用的随机源。所有区间均为闭区间。
pub trait Dice {
    fn roll(&mut self, min: i64, max: i64) -> i64;

    /// 五五开的二选一。
    fn coin(&mut self) -> bool;
}

/// 基于 `rand` 的随机源，默认使用 `SmallRng`。
#[derive(Debug, Clone)]
pub struct RngDice<R = SmallRng> {
    rng: R,
}

impl RngDice<SmallRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn roll(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;

    use super::Dice;

    /// 测试用：按顺序吐出预设的值，耗尽后退回区间下界 / 正面。
    #[derive(Debug, Default)]
    pub struct ScriptedDice {
        rolls: VecDeque<i64>,
        coins: VecDeque<bool>,
    }

    impl ScriptedDice {
        pub fn new(rolls: &[i64], coins: &[bool]) -> Self {
            Self {
                rolls: rolls.iter().copied().collect(),
                coins: coins.iter().copied().collect(),
            }
        }
    }

    impl Dice for ScriptedDice {
        fn roll(&mut self, min: i64, max: i64) -> i64 {
            let value = self.rolls.pop_front().unwrap_or(min);
            assert!(
                (min..=max).contains(&value),
                "scripted roll {value} outside [{min}, {max}]"
            );
            value
        }

        fn coin(&mut self) -> bool {
            self.coins.pop_front().unwrap_or(true)
        }
    }
}
