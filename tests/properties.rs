//! 对任意输入都必须成立的不变量。

use proptest::prelude::*;

use spell_circle::{
    GameConfig, GameState, Location, MagicType, ProblemGenerator, ProblemKind, MAX_CASCADE_LEVELS,
    MAX_CIRCLE, MIN_CIRCLE,
};

fn magic_type() -> impl Strategy<Value = MagicType> {
    prop_oneof![
        Just(MagicType::Arcane),
        Just(MagicType::Lightning),
        Just(MagicType::Ice),
    ]
}

fn location() -> impl Strategy<Value = Location> {
    prop_oneof![
        Just(Location::Home),
        Just(Location::Training),
        Just(Location::Dungeon),
    ]
}

// ============================================================
// Problem generation
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_arcane_answers_are_finite_with_hints(seed in any::<u64>(), circle in 1u32..=60) {
        let mut generator = ProblemGenerator::with_seed(seed);
        let problem = generator.generate(circle, MagicType::Arcane);
        prop_assert!(problem.answer.is_finite());
        prop_assert!(!problem.hint.is_empty());
        prop_assert!(!problem.text.is_empty());
    }

    #[test]
    fn prop_same_inputs_hit_same_branch(
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        circle in 1u32..=30,
        category in magic_type(),
    ) {
        let first = ProblemGenerator::with_seed(seed_a).generate(circle, category).kind;
        let second = ProblemGenerator::with_seed(seed_b).generate(circle, category).kind;
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, ProblemKind::select(circle, category));
        prop_assert_eq!(first.category(), category);
    }

    #[test]
    fn prop_generated_answer_is_accepted(
        seed in any::<u64>(),
        circle in 1u32..=12,
        category in magic_type()
    ) {
        let mut generator = ProblemGenerator::with_seed(seed);
        let answer = generator.generate(circle, category).answer;
        prop_assert!(generator.current().is_some_and(|p| p.matches(answer)));
        prop_assert!(generator.current().is_some_and(|p| !p.matches(answer + 0.2)));
    }

    #[test]
    fn prop_division_answers_are_whole(seed in any::<u64>()) {
        let mut generator = ProblemGenerator::with_seed(seed);
        let problem = generator.generate(2, MagicType::Arcane);
        prop_assert_eq!(problem.answer.fract(), 0.0);
        prop_assert!(problem.answer >= 11.0);
    }

    #[test]
    fn prop_subtraction_never_negative(seed in any::<u64>()) {
        let mut generator = ProblemGenerator::with_seed(seed);
        let problem = generator.generate(1, MagicType::Arcane);
        prop_assert!(problem.answer >= 0.0);
    }
}

// ============================================================
// Game state economy
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_monster_hp_never_negative(
        circle in 1u32..=20,
        hits in prop::collection::vec(0u32..2000, 1..20)
    ) {
        let mut state = GameState::default();
        state.player.circle = circle;
        state.set_location(Location::Dungeon);
        for hit in hits {
            let killed = state.damage_monster(hit);
            let monster = state.monster.as_ref().expect("monster exists in dungeon");
            prop_assert!(monster.current_hp <= monster.max_hp);
            prop_assert_eq!(killed, monster.current_hp == 0);
        }
    }

    #[test]
    fn prop_use_mana_never_overdraws(spends in prop::collection::vec(0u32..150, 1..20)) {
        let mut state = GameState::default();
        for amount in spends {
            let before = state.player.mana;
            let spent = state.use_mana(amount);
            if amount > before {
                prop_assert!(!spent);
                prop_assert_eq!(state.player.mana, before);
            } else {
                prop_assert!(spent);
                prop_assert_eq!(state.player.mana, before - amount);
            }
        }
    }

    #[test]
    fn prop_level_up_restores_and_resets(
        levels in 1usize..15,
        hp in 0u32..=100,
        mana in 0u32..=100
    ) {
        let mut state = GameState::default();
        for _ in 0..levels {
            state.player.hp = hp;
            state.player.mana = mana;
            let old_max = state.player.max_xp;
            prop_assert!(state.level_up());
            prop_assert_eq!(state.player.xp, 0);
            prop_assert!(state.player.xp < state.player.max_xp);
            prop_assert!(state.player.max_xp >= old_max);
            prop_assert_eq!(state.player.hp, state.player.max_hp);
            prop_assert_eq!(state.player.mana, state.player.max_mana);
        }
        prop_assert!(state.integrity_check().is_ok());
    }

    #[test]
    fn prop_xp_gains_keep_invariants(
        gains in prop::collection::vec(0u32..500, 1..30),
        place in location()
    ) {
        let mut state = GameState::default();
        state.set_location(place);
        for amount in gains {
            let gain = state.gain_xp(amount);
            prop_assert!(gain.levels_gained <= 1);
            if place == Location::Training {
                prop_assert_eq!(gain.applied, amount / 2);
            } else {
                prop_assert_eq!(gain.applied, amount);
            }
            prop_assert!(state.integrity_check().is_ok());
        }
    }

    #[test]
    fn prop_cascading_always_settles_below_threshold(
        amount in any::<u32>(),
        growth in 1.0f64..3.0,
        starting_max_xp in 1u32..200
    ) {
        let mut state = GameState::new(GameConfig {
            cascade_level_ups: true,
            level_up_xp_growth: growth,
            starting_max_xp,
            ..GameConfig::default()
        });
        let gain = state.gain_xp(amount);
        prop_assert!(gain.levels_gained <= MAX_CASCADE_LEVELS);
        prop_assert!(state.player.xp < state.player.max_xp);
        prop_assert!(state.drain_events().len() as u32 <= 1 + MAX_CASCADE_LEVELS);
    }

    #[test]
    fn prop_change_circle_stays_in_bounds(deltas in prop::collection::vec(-12i32..12, 1..25)) {
        let mut state = GameState::default();
        for delta in deltas {
            let before = state.player.circle;
            let target = i64::from(before) + i64::from(delta);
            let accepted = state.change_circle(delta);
            prop_assert_eq!(accepted, (1..=10).contains(&target));
            if !accepted {
                prop_assert_eq!(state.player.circle, before);
            }
            prop_assert!((MIN_CIRCLE..=MAX_CIRCLE).contains(&state.player.circle));
        }
    }
}
