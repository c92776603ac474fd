pub mod error;
pub mod game;
pub mod magic;
pub mod problems;
pub mod session;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use error::CommandError;
pub use game::{
    GameConfig, GameEvent, GameState, IntegrityError, Location, Monster, MonsterTemplate,
    PlayerState, XpGain, MAX_CASCADE_LEVELS, MAX_CIRCLE, MIN_CIRCLE, MONSTER_TEMPLATES,
};
pub use magic::MagicType;
pub use problems::{
    parse_answer, AnswerCheck, Dice, Problem, ProblemGenerator, ProblemKind, RngDice,
    ANSWER_TOLERANCE,
};
pub use session::{CastOutcome, DeferredAction, Resolution, Scheduler, Session, TimerId};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    web_sys::console::log_1(&"spell_circle core loaded".into());
}

fn to_js_error(error: CommandError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(serde_to_js_error)
}

/// 暴露给 JavaScript 的游戏引擎。宿主负责渲染、输入与推进时钟。
#[wasm_bindgen]
pub struct GameEngine {
    session: Session,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: Option<u32>) -> Result<GameEngine, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(to_js_error)?,
            None => GameConfig::default(),
        };
        let session = match seed {
            Some(seed) => Session::with_seed(config, u64::from(seed)),
            None => Session::from_entropy(config),
        };
        Ok(GameEngine { session })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.session.state())
    }

    pub fn problem_json(&self) -> Result<String, JsValue> {
        to_json(&self.session.problem())
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        to_json(self.session.config())
    }

    pub fn hint(&self) -> Option<String> {
        self.session.hint().map(str::to_string)
    }

    /// 返回 `{ outcome, events }`。
    pub fn submit_answer(&mut self, input: &str) -> Result<String, JsValue> {
        to_json(&self.session.submit_answer_resolved(input))
    }

    pub fn change_circle(&mut self, delta: i32) -> bool {
        self.session.change_circle(delta)
    }

    pub fn select_magic(&mut self, magic_type: &str) -> Result<(), JsValue> {
        let magic_type: MagicType = magic_type.parse().map_err(to_js_error)?;
        self.session.select_magic(magic_type);
        Ok(())
    }

    pub fn change_location(&mut self, location: &str) -> Result<(), JsValue> {
        let location: Location = location.parse().map_err(to_js_error)?;
        self.session.change_location(location);
        Ok(())
    }

    pub fn rest(&mut self) {
        self.session.rest();
    }

    pub fn use_mana(&mut self, amount: u32) -> bool {
        self.session.use_mana(amount)
    }

    /// 推进时钟，执行到期的延迟动作，返回事件 JSON。
    pub fn advance(&mut self, elapsed_ms: u32) -> Result<String, JsValue> {
        let events = self.session.advance(elapsed_ms);
        to_json(&events)
    }

    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.drain_events())
    }

    pub fn next_timer_in(&self) -> Option<u32> {
        self.session.scheduler().next_due_in()
    }

    /// 在 JS 事件循环上等待到下一个定时器到期，resolve 为等待的毫秒数。
    /// 只负责等待，状态仍需调用 `advance` 推进。
    pub fn sleep_until_next_timer(&self) -> Promise {
        let delay = self.session.scheduler().next_due_in().unwrap_or(0);
        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            Ok(JsValue::from(delay))
        })
    }

    pub fn validate_state(&self) -> Result<(), JsValue> {
        self.session
            .state()
            .integrity_check()
            .map_err(|error| to_js_error(CommandError::IntegrityViolation { error }))
    }
}

/// 返回默认配置，方便前端调试或作为覆盖的起点。
#[wasm_bindgen(js_name = "createDefaultConfig")]
pub fn create_default_config() -> Result<JsValue, JsValue> {
    to_value(&GameConfig::default()).map_err(JsValue::from)
}

/// 不依赖引擎实例的出题预览。
#[wasm_bindgen(js_name = "generateProblem")]
pub fn generate_problem(
    circle: u32,
    magic_type: &str,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let magic_type: MagicType = magic_type.parse().map_err(to_js_error)?;
    let mut generator = match seed {
        Some(seed) => ProblemGenerator::with_seed(u64::from(seed)),
        None => ProblemGenerator::from_entropy(),
    };
    let problem = generator.generate(circle, magic_type);
    to_value(problem).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
