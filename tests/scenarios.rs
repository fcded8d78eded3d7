//! End-to-end runs through `Game` with a manual clock, scripted input and
//! the CPU batch sink.

use glam::Vec2;

use space_shooter::audio::SilentAudio;
use space_shooter::platform::{KeyState, ScriptedInput, SteppedClock};
use space_shooter::renderer::{DrawOp, VertexBatch};
use space_shooter::sim::{MeteorParams, Session, SessionPhase};
use space_shooter::{EndReason, Game, Settings};

type TestGame = Game<SteppedClock, ScriptedInput, VertexBatch, SilentAudio>;

/// Settings with the spawn timer pushed out of reach
fn quiet_settings() -> Settings {
    Settings {
        spawn_interval_ms: 10_000_000,
        ..Default::default()
    }
}

fn game(settings: Settings, script: ScriptedInput) -> TestGame {
    Game::new(
        Session::new(settings, 77),
        SteppedClock::new(16),
        script,
        VertexBatch::new(),
        SilentAudio::default(),
    )
}

#[test]
fn meteor_falling_onto_player_ends_the_run() {
    let mut game = game(quiet_settings(), ScriptedInput::default());
    let above = game.session().player.pos - Vec2::new(0.0, 300.0);
    game.session_mut()
        .spawn_meteor_at(above, MeteorParams::straight_down(450.0));

    let summary = game.run(1_000).unwrap();
    assert_eq!(summary.end_reason, EndReason::Collision);
    assert_eq!(game.session().phase, SessionPhase::Terminated);
    // 300 px at 450 px/s, minus the half-extents of both sprites
    assert!(summary.elapsed_ms < 700);

    // Later frames change nothing
    let time = game.session().time_ms;
    assert_eq!(game.run_frame().unwrap(), SessionPhase::Terminated);
    assert_eq!(game.session().time_ms, time);
}

#[test]
fn single_laser_leaves_through_the_top() {
    let script = ScriptedInput::new(vec![(0, KeyState::FIRE), (20, KeyState::default())]);
    let mut game = game(quiet_settings(), script);

    let mut gone_at = None;
    while game.session().time_ms < 3_000 {
        game.run_frame().unwrap();
        let lasers = game.session().lasers.len();
        if game.session().stats.lasers_fired == 1 && lasers == 0 && gone_at.is_none() {
            gone_at = Some(game.session().time_ms);
        }
    }

    assert_eq!(game.session().stats.lasers_fired, 1);
    assert!(game.session().lasers.is_empty());
    // Starts at the ship's nose (y = 324) and climbs 400 px/s
    let gone_at = gone_at.unwrap();
    assert!(gone_at > 800 && gone_at < 1_000, "laser removed at {gone_at} ms");
    assert_eq!(game.audio().lasers, 1);
}

#[test]
fn laser_destroys_meteor_and_explosion_plays_out() {
    let script = ScriptedInput::new(vec![(0, KeyState::FIRE), (20, KeyState::default())]);
    let mut game = game(quiet_settings(), script);
    // Parked meteor straight above the ship
    let target = game.session().player.pos - Vec2::new(0.0, 250.0);
    game.session_mut()
        .spawn_meteor_at(target, MeteorParams::straight_down(0.0));

    let mut saw_explosion = false;
    for _ in 0..150 {
        game.run_frame().unwrap();
        saw_explosion |= !game.session().explosions.is_empty();
    }

    let session = game.session();
    assert_eq!(session.phase, SessionPhase::Running);
    assert!(saw_explosion);
    assert_eq!(session.stats.meteors_destroyed, 1);
    assert!(session.meteors.is_empty() && session.lasers.is_empty());
    // 21 frames at 20 fps are long finished after 2.4 s
    assert!(session.explosions.is_empty());
    assert_eq!(game.audio().explosions, 1);
}

#[test]
fn quit_from_script() {
    let script = ScriptedInput::new(vec![(0, KeyState::default()), (500, KeyState::QUIT)]);
    let mut game = game(quiet_settings(), script);
    let summary = game.run(1_000).unwrap();
    assert_eq!(summary.end_reason, EndReason::Quit);
    assert_eq!(summary.elapsed_ms, 512);
    assert_eq!(summary.score, 5);
}

#[test]
fn every_frame_is_drawn_with_the_score_first() {
    let mut game = game(Settings::default(), ScriptedInput::default());
    for _ in 0..10 {
        game.run_frame().unwrap();
    }
    let batch = game.sink();
    assert_eq!(batch.frames_presented(), 10);
    let ops = batch.last_frame();
    assert!(matches!(&ops[0], DrawOp::Text { text, .. } if text == "1"));
    assert!(matches!(ops[1], DrawOp::Outline { .. }));
    // Stars and the player at least
    assert!(ops.len() >= 2 + 21);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut game = Game::new(
            Session::new(Settings::default(), 4242),
            SteppedClock::new(16),
            ScriptedInput::constant(KeyState::FIRE),
            VertexBatch::new(),
            SilentAudio::default(),
        );
        game.run(400).unwrap()
    };
    assert_eq!(run(), run());
}
