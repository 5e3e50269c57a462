//! Integration tests driving full turns against the mock game engine.

use skirm_core::{Action, AgentClass, Cell, GameEngine, Side, Turn};
use skirm_engine::{EngineConfig, TurnEngine};
use skirm_test_utils::MockEngine;

fn engine(width: u32, height: u32, seed: u64) -> TurnEngine {
    TurnEngine::new(
        EngineConfig {
            seed,
            ..Default::default()
        },
        width,
        height,
    )
    .unwrap()
}

fn run_turns(eng: &mut TurnEngine, game: &mut MockEngine, turns: u32) {
    for _ in 0..turns {
        eng.run_turn(game);
        game.end_turn();
    }
}

#[test]
fn knight_hunts_down_a_lone_enemy() {
    let mut game = MockEngine::new(12, 12);
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(0, 0));
    game.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(8, 8));

    let mut eng = engine(12, 12, 1);
    run_turns(&mut eng, &mut game, 40);

    assert_eq!(game.count(Side::Enemy), 0, "the mage should be dead");
    assert!(game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Attack { .. })));
}

#[test]
fn healer_decides_before_damage_dealers() {
    let mut game = MockEngine::new(10, 10);
    let knight = game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(3, 2));
    game.add_agent(AgentClass::Healer, Side::Friendly, Cell::new(2, 2));
    game.add_agent(AgentClass::Ranger, Side::Enemy, Cell::new(9, 9));
    game.hurt(knight, 100);

    let mut eng = engine(10, 10, 2);
    eng.run_turn(&mut game);

    let first = game.executed().first().expect("something happened");
    assert!(
        matches!(first, Action::Heal { target, .. } if *target == knight),
        "the very first committed action is the heal, got {first:?}",
    );
}

#[test]
fn factory_production_goes_through_the_auction() {
    let mut game = MockEngine::new(8, 8);
    game.add_agent(AgentClass::Factory, Side::Friendly, Cell::new(4, 4));
    game.set_resources(100);

    let mut eng = engine(8, 8, 3);
    let metrics = eng.run_turn(&mut game);

    let produced: Vec<_> = game
        .executed()
        .iter()
        .filter(|a| matches!(a, Action::Produce { .. }))
        .collect();
    assert_eq!(
        produced.len(),
        1,
        "one production per factory per turn; the rest lapse on the cooldown re-check",
    );
    // With a dead economy, the worker bootstrap outranks the ranger line.
    assert!(
        matches!(produced[0], Action::Produce { class: AgentClass::Worker, .. }),
        "the highest-scoring candidate wins",
    );
    assert!(metrics.dropped > 0, "lapsed candidates are dropped silently");
}

#[test]
fn dry_pool_defers_and_sets_the_cutoff() {
    let mut game = MockEngine::new(8, 8);
    game.add_agent(AgentClass::Factory, Side::Friendly, Cell::new(4, 4));
    game.set_resources(0);

    let mut eng = engine(8, 8, 4);
    let metrics = eng.run_turn(&mut game);

    assert!(!game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Produce { .. })));
    assert!(metrics.deferred > 0);
    assert!(eng.cutoff_score() > 0.0, "cutoff records the thwarted score");
}

#[test]
fn identical_seeds_replay_identical_turns() {
    let build = || {
        let mut game = MockEngine::new(10, 10);
        game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(1, 1));
        game.add_agent(AgentClass::Ranger, Side::Friendly, Cell::new(2, 1));
        game.add_agent(AgentClass::Worker, Side::Friendly, Cell::new(1, 2));
        game.add_agent(AgentClass::Knight, Side::Enemy, Cell::new(8, 8));
        game.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(7, 8));
        game.set_ore(Cell::new(3, 3), 40);
        game.set_resources(60);
        game
    };

    let mut game_a = build();
    let mut game_b = build();
    let mut eng_a = engine(10, 10, 42);
    let mut eng_b = engine(10, 10, 42);
    run_turns(&mut eng_a, &mut game_a, 5);
    run_turns(&mut eng_b, &mut game_b, 5);

    assert_eq!(game_a.executed(), game_b.executed());
}

#[test]
fn decision_loop_reaches_a_fixed_point_under_the_cap() {
    let mut game = MockEngine::new(10, 10);
    game.add_agent(AgentClass::Worker, Side::Friendly, Cell::new(2, 2));
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(5, 5));
    game.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(9, 9));
    game.set_ore(Cell::new(2, 3), 50);
    game.set_resources(30);

    let mut eng = engine(10, 10, 5);
    let metrics = eng.run_turn(&mut game);
    assert!(metrics.passes <= eng.config().max_decision_passes);
    assert!(metrics.passes >= 2, "a committing pass forces one more look");
}

#[test]
fn build_beats_harvest_and_lapses_it() {
    // The worker queues both a build (tier 1) and a harvest (tier 0).
    // The build executes first and spends the worker's action; the
    // harvest's legality lapses and it is dropped, not retried.
    let mut game = MockEngine::new(8, 8);
    let worker = game.add_agent(AgentClass::Worker, Side::Friendly, Cell::new(2, 2));
    game.add_blueprint(AgentClass::Factory, Side::Friendly, Cell::new(3, 2));
    game.set_ore(Cell::new(2, 3), 40);
    game.set_time_remaining(1500); // keep the worker from wandering off

    let mut eng = engine(8, 8, 6);
    eng.run_turn(&mut game);

    assert!(game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Build { agent, .. } if *agent == worker)));
    assert!(!game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Harvest { .. })));
}

#[test]
fn boxed_in_agent_holds_position() {
    let mut game = MockEngine::new(5, 5);
    let center = Cell::new(2, 2);
    game.add_agent(AgentClass::Knight, Side::Friendly, center);
    for nb in center.neighbours() {
        game.set_rock(nb);
    }
    game.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(0, 0));

    let mut eng = engine(5, 5, 7);
    eng.run_turn(&mut game);

    assert!(!game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Move { .. })));
}

#[test]
fn low_time_skips_movement_but_not_attacks() {
    let mut game = MockEngine::new(8, 8);
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(2, 2));
    game.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(3, 3));
    game.set_time_remaining(1500); // below low, above critical

    let mut eng = engine(8, 8, 8);
    eng.run_turn(&mut game);

    assert!(!game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Move { .. })));
    assert!(game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Attack { .. })));
}

#[test]
fn critical_time_leaves_only_structure_candidates() {
    let mut game = MockEngine::new(8, 8);
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(2, 2));
    game.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(3, 3));
    game.add_agent(AgentClass::Factory, Side::Friendly, Cell::new(6, 6));
    game.set_resources(100);
    game.set_time_remaining(100); // below critical

    let mut eng = engine(8, 8, 9);
    eng.run_turn(&mut game);

    assert!(game
        .executed()
        .iter()
        .all(|a| matches!(a, Action::Produce { .. })));
    assert!(!game.executed().is_empty());
}

#[test]
fn transport_boards_launches_and_delivers() {
    let mut game = MockEngine::new(14, 14);
    let knight = game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(10, 10));
    let transport = game.add_agent(AgentClass::Transport, Side::Friendly, Cell::new(12, 12));

    let mut eng = TurnEngine::new(
        EngineConfig {
            seed: 10,
            transport_capacity: 1,
            ..Default::default()
        },
        14,
        14,
    )
    .unwrap();
    run_turns(&mut eng, &mut game, 12);

    let log = game.executed();
    let board_at = log
        .iter()
        .position(|a| matches!(a, Action::Board { agent, .. } if *agent == knight))
        .expect("the knight boards the waiting transport");
    let launch_at = log
        .iter()
        .position(|a| matches!(a, Action::Launch { agent, .. } if *agent == transport))
        .expect("the full transport departs");
    let unload_at = log
        .iter()
        .position(|a| matches!(a, Action::Unload { agent, .. } if *agent == transport))
        .expect("the garrison is delivered after landing");
    assert!(board_at < launch_at && launch_at < unload_at);

    let knight_pos = game.agent(knight).unwrap().pos.expect("delivered");
    let transport_pos = game.agent(transport).unwrap().pos.unwrap();
    assert!(knight_pos.is_adjacent(transport_pos));
    assert_ne!(transport_pos, Cell::new(12, 12), "the transport flew");
}

#[test]
fn transport_departs_at_the_deadline_when_not_full() {
    let mut game = MockEngine::new(10, 10);
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(4, 4));
    let transport = game.add_agent(AgentClass::Transport, Side::Friendly, Cell::new(5, 5));

    let mut eng = TurnEngine::new(
        EngineConfig {
            seed: 11,
            departure_deadline: Turn(3),
            ..Default::default()
        },
        10,
        10,
    )
    .unwrap();
    run_turns(&mut eng, &mut game, 8);

    assert!(game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Launch { agent, .. } if *agent == transport)));
}

#[test]
fn class_fields_are_computed_once_and_shared() {
    let mut game = MockEngine::new(12, 12);
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(1, 1));
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(3, 1));
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(1, 3));
    game.add_agent(AgentClass::Ranger, Side::Enemy, Cell::new(10, 10));

    let mut eng = engine(12, 12, 12);
    let metrics = eng.run_turn(&mut game);

    assert_eq!(
        metrics.cache_misses, 2,
        "one target and one cost field for the whole knight class"
    );
    assert_eq!(
        metrics.cache_hits, 4,
        "the second and third knight reuse both fields"
    );
}

#[test]
fn walled_map_probes_zero_connectivity() {
    let mut game = MockEngine::new(9, 9);
    for y in 0..9 {
        game.set_rock(Cell::new(4, y));
    }
    game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(1, 1));
    game.add_agent(AgentClass::Knight, Side::Enemy, Cell::new(7, 7));

    let mut eng = engine(9, 9, 13);
    eng.run_turn(&mut game);
    assert_eq!(eng.connectivity(), Some(0));

    let mut open_game = MockEngine::new(9, 9);
    open_game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(1, 1));
    open_game.add_agent(AgentClass::Knight, Side::Enemy, Cell::new(7, 7));
    let mut open_eng = engine(9, 9, 13);
    open_eng.run_turn(&mut open_game);
    assert_eq!(open_eng.connectivity(), Some(1));
}

#[test]
fn boosted_attacker_swings_twice_in_one_turn() {
    let mut game = MockEngine::new(8, 8);
    let knight = game.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(3, 3));
    game.add_agent(AgentClass::Healer, Side::Friendly, Cell::new(2, 3));
    game.add_agent(AgentClass::Factory, Side::Enemy, Cell::new(4, 4));
    game.set_time_remaining(1500); // pin everyone in place

    let mut eng = engine(8, 8, 14);
    eng.run_turn(&mut game);

    let knight_attacks = game
        .executed()
        .iter()
        .filter(|a| matches!(a, Action::Attack { agent, .. } if *agent == knight))
        .count();
    assert!(game
        .executed()
        .iter()
        .any(|a| matches!(a, Action::Boost { target, .. } if *target == knight)));
    assert!(
        knight_attacks >= 2,
        "boost resets the spent attack for a second swing, got {knight_attacks}",
    );
}
