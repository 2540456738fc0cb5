//! Seek and tag: chase the target until it is close enough to tag

use super::{pause, BehaviorContext, BehaviorState, TAGGED_ANNOUNCEMENT};
use crate::common::types::LedColor;
use crate::config::SeekConfig;
use crate::control::MotionExecutor;
use crate::directive::Direction;
use crate::events::{emit, EventSink, OutboundEvent};
use crate::feedback::{set_all, Indicators};
use crate::perception::{ProximityBreachCounter, ProximitySensor};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The robot is "it". While `seeking` is set it drives ahead and samples
/// proximity; a confirmed breach tags the player and ends the chase.
pub struct SeekLoop {
    state: Arc<BehaviorState>,
    motion: Arc<MotionExecutor>,
    sensor: Arc<dyn ProximitySensor>,
    indicators: Arc<dyn Indicators>,
    events: Arc<dyn EventSink>,
    config: SeekConfig,
    idle_poll: Duration,
}

impl SeekLoop {
    pub fn new(context: &BehaviorContext) -> Self {
        SeekLoop {
            state: Arc::clone(&context.state),
            motion: Arc::clone(&context.motion),
            sensor: Arc::clone(&context.peripherals.proximity),
            indicators: Arc::clone(&context.peripherals.indicators),
            events: Arc::clone(&context.peripherals.events),
            config: context.config.seek.clone(),
            idle_poll: context.config.behaviors.idle_poll_interval(),
        }
    }

    /// Run until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        debug!(sensor = self.sensor.name(), "seek loop started");
        loop {
            if self.state.is_seeking() && !self.chase(&cancel).await {
                break;
            }
            if !pause(&cancel, self.idle_poll).await {
                break;
            }
        }
        debug!("seek loop stopped");
    }

    /// One SEEKING episode; `false` if cancelled mid-chase
    async fn chase(&self, cancel: &CancellationToken) -> bool {
        info!("seeking target");
        let mut counter =
            ProximityBreachCounter::new(self.config.proximity_threshold_cm, self.config.breach_count_threshold);

        while self.state.is_seeking() {
            self.motion
                .move_direction(Direction::Forward, self.config.drive_duration(), self.config.speed, false)
                .await;

            match self.sensor.distance_cm() {
                Ok(distance) => {
                    let breached = counter.observe(distance);
                    debug!(distance, count = counter.count(), "proximity");
                    if breached {
                        self.tag(distance);
                    }
                }
                Err(err) => warn!(error = %err, "proximity read failed, skipping sample"),
            }

            if !pause(cancel, self.config.poll_interval()).await {
                return false;
            }
        }
        true
    }

    fn tag(&self, distance: f64) {
        info!(distance, "proximity breached, sending event to skill");
        set_all(self.indicators.as_ref(), LedColor::Red, 1.0);
        emit(self.events.as_ref(), OutboundEvent::speech(TAGGED_ANNOUNCEMENT));
        emit(self.events.as_ref(), OutboundEvent::proximity(distance));
        self.state.set_seeking(false);
    }
}
