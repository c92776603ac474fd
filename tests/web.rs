//! 浏览器环境下的冒烟测试，使用 `wasm-pack test --headless --firefox` 运行。

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use spell_circle::{generate_problem, GameEngine};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn engine_round_trips_state_json() {
    let engine = GameEngine::new(None, Some(7)).expect("engine should construct");
    let state: serde_json::Value =
        serde_json::from_str(&engine.state_json().expect("state json")).expect("valid json");
    assert_eq!(state["player"]["circle"], 1);
    assert_eq!(state["player"]["location"], "home");
    assert!(engine.validate_state().is_ok());
}

#[wasm_bindgen_test]
fn unknown_location_is_rejected() {
    let mut engine = GameEngine::new(None, Some(7)).expect("engine should construct");
    assert!(engine.change_location("tavern").is_err());
    assert!(engine.change_location("dungeon").is_ok());
}

#[wasm_bindgen_test]
fn submit_answer_reports_outcome() {
    let mut engine = GameEngine::new(None, Some(11)).expect("engine should construct");
    let resolution: serde_json::Value =
        serde_json::from_str(&engine.submit_answer("not a number").expect("json"))
            .expect("valid json");
    assert_eq!(resolution["outcome"]["type"], "Ignored");
}

#[wasm_bindgen_test]
fn preview_problem_is_generated() {
    assert!(generate_problem(4, "ice", Some(1)).is_ok());
    assert!(generate_problem(4, "fire", Some(1)).is_err());
}
