use serde_json::json;
use std::time::Duration;
use tagbot_core::behaviors::{BehaviorSupervisor, SEEK_ANNOUNCEMENT, TAGGED_ANNOUNCEMENT};
use tagbot_core::common::types::{LedColor, LedGroup, WheelSpeeds};
use tagbot_core::config::TagConfig;
use tagbot_core::events::{EventName, OutboundEvent};
use tagbot_core::lifecycle::{LifecycleNode, State};
use tagbot_core::testing::{MotorCall, ScriptedProximity, TestRig};
use tagbot_core::TagBot;

fn started_bot(rig: &TestRig, config: TagConfig) -> TagBot {
    let mut bot = TagBot::new(config, rig.peripherals()).expect("config is valid");
    bot.init().expect("core starts");
    bot
}

async fn send(bot: &TagBot, command: &str) {
    bot.router()
        .try_handle(&json!({"type": "command", "command": command}))
        .await
        .expect("command is well formed");
}

#[tokio::test(start_paused = true)]
async fn four_close_samples_tag_exactly_once() {
    let rig = TestRig::new(ScriptedProximity::new(&[9.0, 8.0, 7.0, 6.0], 100.0));
    let mut bot = started_bot(&rig, TagConfig::default());

    send(&bot, "tag you're it").await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(!bot.state().is_seeking());
    assert_eq!(
        rig.events.events(),
        vec![
            OutboundEvent::speech(SEEK_ANNOUNCEMENT),
            OutboundEvent::speech(TAGGED_ANNOUNCEMENT),
            OutboundEvent::proximity(6.0),
        ]
    );
    assert_eq!(rig.proximity.reads(), 4);
    assert_eq!(rig.indicators.current(LedGroup::Left), Some(LedColor::Red));
    assert_eq!(rig.indicators.current(LedGroup::Right), Some(LedColor::Red));

    // Every chase step drove straight ahead at the seek speed.
    assert!(rig
        .motors
        .runs()
        .iter()
        .all(|speeds| *speeds == WheelSpeeds::straight(50)));

    bot.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn a_far_sample_before_the_fourth_prevents_the_tag() {
    let rig = TestRig::new(ScriptedProximity::new(&[9.0, 8.0, 7.0, 12.0], 100.0));
    let mut bot = started_bot(&rig, TagConfig::default());

    send(&bot, "tag you're it").await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(bot.state().is_seeking());
    assert!(rig.events.named(EventName::Proximity).is_empty());
    assert_eq!(rig.events.named(EventName::Speech).len(), 1);

    bot.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn sensor_faults_are_skipped_without_resetting_the_count() {
    let rig = TestRig::new(ScriptedProximity::with_faults(
        &[Some(9.0), Some(8.0), None, Some(7.0), Some(6.0)],
        100.0,
    ));
    let mut bot = started_bot(&rig, TagConfig::default());

    send(&bot, "tag you're it").await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert!(!bot.state().is_seeking());
    assert_eq!(
        rig.events.named(EventName::Proximity),
        vec![OutboundEvent::proximity(6.0)]
    );

    bot.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn seeking_can_be_rearmed_after_a_tag() {
    let rig = TestRig::new(ScriptedProximity::new(
        &[5.0, 5.0, 5.0, 5.0, 50.0, 4.0, 4.0, 4.0, 4.0],
        100.0,
    ));
    let mut bot = started_bot(&rig, TagConfig::default());

    send(&bot, "tag you're it").await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!bot.state().is_seeking());

    send(&bot, "tag you're it").await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    // The counter starts fresh on the second chase, so the far sample is
    // followed by four close ones before the next tag.
    assert_eq!(
        rig.events.named(EventName::Proximity),
        vec![OutboundEvent::proximity(5.0), OutboundEvent::proximity(4.0)]
    );

    bot.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn evading_keeps_wandering_indefinitely() {
    let rig = TestRig::far_away();
    let mut config = TagConfig::default();
    config.wander.seed = Some(3);
    let mut bot = started_bot(&rig, config);

    send(&bot, "tag i'm it").await;
    tokio::time::sleep(Duration::from_secs(600)).await;

    assert!(bot.state().is_evading(), "nothing clears the evade flag");

    let shimmy = [WheelSpeeds::new(80, -80), WheelSpeeds::new(-40, 40)];
    let runs = rig.motors.runs();
    let wander_moves: Vec<WheelSpeeds> = runs
        .iter()
        .copied()
        .filter(|speeds| !shimmy.contains(speeds))
        .collect();
    assert_eq!(runs.len() - wander_moves.len(), 2);
    assert!(wander_moves.len() > 80, "only {} wander moves", wander_moves.len());
    assert!(wander_moves.iter().all(|speeds| {
        *speeds != WheelSpeeds::STOPPED
            && [speeds.left, speeds.right]
                .iter()
                .all(|speed| [0, 25, 50, 75, 100, -25, -50, -75, -100].contains(speed))
    }));

    bot.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn both_modes_can_run_at_once() {
    let rig = TestRig::new(ScriptedProximity::new(&[9.0, 8.0, 7.0, 6.0], 100.0));
    let mut bot = started_bot(&rig, TagConfig::default());

    send(&bot, "tag i am it").await;
    send(&bot, "tag you're it").await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    let state = bot.state();
    assert!(state.is_evading());
    assert!(!state.is_seeking());
    assert_eq!(rig.events.named(EventName::Proximity).len(), 1);

    bot.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loops_and_the_motors() {
    let rig = TestRig::far_away();
    let mut bot = started_bot(&rig, TagConfig::default());

    let supervisor = bot.component_mut::<BehaviorSupervisor>().unwrap();
    assert_eq!(supervisor.state(), State::Active);
    assert_eq!(supervisor.running_loops(), 2);

    send(&bot, "tag i'm it").await;
    tokio::time::sleep(Duration::from_secs(20)).await;
    bot.shutdown().await.unwrap();

    assert_eq!(rig.motors.calls().last(), Some(&MotorCall::Stop));
    let calls_at_shutdown = rig.motors.calls().len();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(rig.motors.calls().len(), calls_at_shutdown);

    let supervisor = bot.component_mut::<BehaviorSupervisor>().unwrap();
    assert_eq!(supervisor.state(), State::Unconfigured);
    assert_eq!(supervisor.running_loops(), 0);
}

#[tokio::test(start_paused = true)]
async fn startup_and_shutdown_play_their_tunes() {
    let rig = TestRig::far_away();
    let mut bot = started_bot(&rig, TagConfig::default());
    assert_eq!(rig.sound.songs().len(), 1);
    assert_eq!(rig.indicators.current(LedGroup::Left), Some(LedColor::Green));

    bot.on_disconnected("echo");
    assert_eq!(rig.indicators.current(LedGroup::Left), Some(LedColor::Black));
    bot.on_connected("echo");
    assert_eq!(rig.indicators.current(LedGroup::Right), Some(LedColor::Green));

    bot.shutdown().await.unwrap();
    assert_eq!(rig.sound.songs().len(), 2);
    assert_eq!(rig.indicators.current(LedGroup::Right), Some(LedColor::Black));
}
