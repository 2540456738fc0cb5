use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tagbot_core::config::TagConfig;
use tagbot_core::logging::init_tracing;
use tagbot_core::sim::{self, LoggingEventSink};
use tagbot_core::TagBot;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = TagConfig::default();
    config.logging.filter = "tagbot_core=debug,info".to_string();
    config.wander.seed = Some(7);
    init_tracing(&config.logging)?;

    info!("initializing tagbot core against simulated hardware");
    let peripherals = sim::peripherals(&config.drive, Arc::new(LoggingEventSink));
    let mut bot = TagBot::new(config, peripherals)?;
    bot.init()?;
    bot.on_connected("simulator");

    let router = bot.router();
    let script = [
        json!({"type": "move", "direction": "forward", "duration": 1, "speed": 50}),
        json!({"type": "move", "direction": "go left", "duration": 1, "speed": 75}),
        json!({"type": "move", "direction": "sideways", "duration": 1, "speed": 75}),
        json!({"type": "move", "direction": "back"}),
        json!({"type": "move", "direction": "stop", "duration": 1, "speed": 0}),
        json!({"type": "command", "command": "tag you're it"}),
    ];
    for payload in &script {
        router.handle(payload).await;
    }

    let state = bot.state();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    while state.is_seeking() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    info!(tagged = !state.is_seeking(), "seek phase finished");

    router
        .handle(&json!({"type": "command", "command": "tag i'm it"}))
        .await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    bot.on_disconnected("simulator");
    bot.shutdown().await?;
    Ok(())
}
