//! 编排层：把出题器与游戏状态串起来，处理施法判定、提示与延迟动作。

pub mod scheduler;

use serde::{Deserialize, Serialize};

pub use scheduler::{DeferredAction, ScheduledTimer, Scheduler, TimerId};

use crate::game::{GameConfig, GameEvent, GameState, Location, XpGain};
use crate::magic::MagicType;
use crate::problems::{AnswerCheck, Dice, Problem, ProblemGenerator, RngDice};

const FALLBACK_HINT: &str = "Concentrate on the arcane symbols...";

/// 一次提交答案的结果。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CastOutcome {
    /// 输入不是数字：不计失败、不换题。
    Ignored,
    Success {
        damage: u32,
        killed: bool,
        xp: XpGain,
    },
    Failure {
        hp_lost: u32,
        consecutive_failures: u32,
        hint_revealed: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    pub outcome: CastOutcome,
    pub events: Vec<GameEvent>,
}

/// 一局游戏。由宿主显式创建并持有，没有全局状态。
pub struct Session<D: Dice = RngDice> {
    state: GameState,
    generator: ProblemGenerator<D>,
    scheduler: Scheduler,
    consecutive_failures: u32,
    hint: Option<String>,
}

impl Session<RngDice> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RngDice::with_seed(seed))
    }

    pub fn from_entropy(config: GameConfig) -> Self {
        Self::new(config, RngDice::from_entropy())
    }
}

impl<D: Dice> Session<D> {
    pub fn new(config: GameConfig, dice: D) -> Self {
        let mut session = Self {
            state: GameState::new(config),
            generator: ProblemGenerator::new(dice),
            scheduler: Scheduler::new(),
            consecutive_failures: 0,
            hint: None,
        };
        session.state.spawn_monster();
        session.state.set_location(Location::Home);
        session.present_problem();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.state.config()
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.generator.current()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// 按当前圈数与魔法系别出一道新题，清零失败计数并隐藏提示。
    pub fn present_problem(&mut self) {
        let player = &self.state.player;
        let text = self
            .generator
            .generate(player.circle, player.magic_type)
            .text
            .clone();
        self.consecutive_failures = 0;
        self.hint = None;
        self.state.record_event(GameEvent::ProblemPresented { text });
    }

    pub fn submit_answer(&mut self, input: &str) -> CastOutcome {
        match self.generator.check_answer(input) {
            AnswerCheck::Ignored => CastOutcome::Ignored,
            AnswerCheck::Correct => self.cast_succeeded(),
            AnswerCheck::Incorrect => self.cast_failed(),
        }
    }

    pub fn submit_answer_resolved(&mut self, input: &str) -> Resolution {
        let outcome = self.submit_answer(input);
        Resolution {
            outcome,
            events: self.drain_events(),
        }
    }

    fn cast_succeeded(&mut self) -> CastOutcome {
        let config = self.state.config();
        let damage = config.spell_damage(self.state.player.circle);
        let (flash_ms, respawn_ms, next_ms) = (
            config.damage_flash_ms,
            config.respawn_delay_ms,
            config.next_problem_delay_ms,
        );
        let (kill_xp, hit_xp) = (config.kill_xp, config.hit_xp);
        let can_hit =
            self.state.player.location == Location::Dungeon && self.state.monster.is_some();

        let killed = self.state.damage_monster(damage);
        if can_hit {
            self.scheduler.schedule(flash_ms, DeferredAction::EndDamageFlash);
        }

        let xp = if killed {
            if let Some(monster) = &self.state.monster {
                tracing::debug!(name = %monster.name, "monster defeated");
            }
            if !self.scheduler.is_pending(DeferredAction::RespawnMonster) {
                self.scheduler.schedule(respawn_ms, DeferredAction::RespawnMonster);
            }
            self.state.gain_xp(kill_xp)
        } else {
            self.state.gain_xp(hit_xp)
        };

        self.scheduler.cancel_where(|action| *action == DeferredAction::NextProblem);
        self.scheduler.schedule(next_ms, DeferredAction::NextProblem);

        CastOutcome::Success { damage, killed, xp }
    }

    fn cast_failed(&mut self) -> CastOutcome {
        let config = self.state.config();
        let (backfire, threshold) = (config.backfire_damage, config.hint_after_failures);

        self.consecutive_failures += 1;
        let hp_lost = self.state.backfire(backfire);

        let mut hint_revealed = false;
        if self.consecutive_failures >= threshold && self.hint.is_none() {
            let hint = self
                .generator
                .current()
                .map(|problem| problem.hint.clone())
                .filter(|hint| !hint.is_empty())
                .unwrap_or_else(|| FALLBACK_HINT.to_string());
            self.state
                .record_event(GameEvent::HintRevealed { hint: hint.clone() });
            self.hint = Some(hint);
            hint_revealed = true;
        }

        CastOutcome::Failure {
            hp_lost,
            consecutive_failures: self.consecutive_failures,
            hint_revealed,
        }
    }

    /// 切换圈数。成功时作废待执行的重生与换题，并立即换题。
    pub fn change_circle(&mut self, delta: i32) -> bool {
        if !self.state.change_circle(delta) {
            return false;
        }
        self.scheduler.cancel_where(|action| {
            matches!(
                action,
                DeferredAction::RespawnMonster | DeferredAction::NextProblem
            )
        });
        self.present_problem();
        true
    }

    pub fn select_magic(&mut self, magic_type: MagicType) {
        self.state.set_magic_type(magic_type);
        self.scheduler
            .cancel_where(|action| *action == DeferredAction::NextProblem);
        self.present_problem();
    }

    pub fn change_location(&mut self, location: Location) {
        self.state.set_location(location);
    }

    pub fn rest(&mut self) {
        self.state.rest();
    }

    pub fn use_mana(&mut self, amount: u32) -> bool {
        self.state.use_mana(amount)
    }

    /// 推进时钟，执行所有到期的延迟动作，返回期间产生的事件。
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<GameEvent> {
        for action in self.scheduler.advance(elapsed_ms) {
            self.apply(action);
        }
        self.drain_events()
    }

    fn apply(&mut self, action: DeferredAction) {
        tracing::debug!(?action, now = self.scheduler.now(), "deferred action due");
        match action {
            DeferredAction::RespawnMonster => self.state.spawn_monster(),
            DeferredAction::NextProblem => self.present_problem(),
            DeferredAction::EndDamageFlash => self.state.record_event(GameEvent::DamageFlashEnded),
        }
    }
}
