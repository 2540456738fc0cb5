//! Evade: wander along a random path while the player is "it"

use super::{pause, BehaviorContext, BehaviorState};
use crate::config::WanderConfig;
use crate::control::{MotionExecutor, MotionRequest};
use crate::directive::Direction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Picks random evasive moves
#[derive(Debug, Clone)]
pub struct WanderPlanner {
    durations_secs: RangeInclusive<u64>,
    speeds: Vec<u8>,
}

impl WanderPlanner {
    pub fn new(config: &WanderConfig) -> Self {
        let speeds = if config.speeds.is_empty() {
            WanderConfig::default().speeds
        } else {
            config.speeds.clone()
        };
        let min = config.min_duration_secs.max(1);
        let max = config.max_duration_secs.max(min);
        WanderPlanner {
            durations_secs: min..=max,
            speeds,
        }
    }

    /// Any direction except stop, a whole number of seconds, and one of
    /// the configured speeds
    pub fn next_move<R: Rng + ?Sized>(&self, rng: &mut R) -> MotionRequest {
        let direction = Direction::MOVING[rng.gen_range(0..Direction::MOVING.len())];
        let duration = Duration::from_secs(rng.gen_range(self.durations_secs.clone()));
        let speed = self.speeds[rng.gen_range(0..self.speeds.len())];
        MotionRequest {
            direction,
            duration,
            speed,
            blocking: false,
        }
    }
}

/// While `evading` is set, keeps picking and executing random moves.
/// Nothing in here clears the flag.
pub struct WanderLoop {
    state: Arc<BehaviorState>,
    motion: Arc<MotionExecutor>,
    planner: WanderPlanner,
    rng: StdRng,
    idle_poll: Duration,
}

impl WanderLoop {
    pub fn new(context: &BehaviorContext) -> Self {
        let wander = &context.config.wander;
        let rng = match wander.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        WanderLoop {
            state: Arc::clone(&context.state),
            motion: Arc::clone(&context.motion),
            planner: WanderPlanner::new(wander),
            rng,
            idle_poll: context.config.behaviors.idle_poll_interval(),
        }
    }

    /// Run until `cancel` fires
    pub async fn run(mut self, cancel: CancellationToken) {
        debug!("wander loop started");
        'outer: loop {
            while self.state.is_evading() {
                let request = self.planner.next_move(&mut self.rng);
                info!(
                    direction = %request.direction,
                    speed = request.speed,
                    duration = ?request.duration,
                    "evade mode active, randomly picking a path"
                );
                self.motion.execute(request).await;
                if !pause(&cancel, request.duration).await {
                    break 'outer;
                }
            }
            if !pause(&cancel, self.idle_poll).await {
                break;
            }
        }
        debug!("wander loop stopped");
    }
}
