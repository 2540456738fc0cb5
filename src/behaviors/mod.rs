//! Behaviors module for the Tagbot robot
//!
//! Two long-running loops, seek and wander, are gated by flags in the
//! shared [`BehaviorState`]. Preset commands raise the flags through the
//! [`ModeController`]; only the seek loop ever lowers one again.
pub mod modes;
pub mod seek;
pub mod wander;

pub use self::modes::ModeController;
pub use self::seek::SeekLoop;
pub use self::wander::{WanderLoop, WanderPlanner};

use crate::config::TagConfig;
use crate::control::MotionExecutor;
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::Peripherals;
use anyhow::{Context, Result};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const SEEK_ANNOUNCEMENT: &str = "Oh no. I am it! Here I come!";
pub const EVADE_ANNOUNCEMENT: &str = "Yikes! You are it! I am out of here!";
pub const TAGGED_ANNOUNCEMENT: &str = "Tag you are it!";

/// Mode flags shared by the directive handler and both behavior loops.
///
/// Each flag has a single writer that raises it (the mode controller) and
/// at most one that lowers it (its own loop), so plain atomics suffice.
#[derive(Debug, Default)]
pub struct BehaviorState {
    seeking: AtomicBool,
    evading: AtomicBool,
    // Legacy patrol flag, only ever cleared by a stop.
    patrolling: AtomicBool,
}

impl BehaviorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking.load(Ordering::SeqCst)
    }

    pub fn set_seeking(&self, active: bool) {
        self.seeking.store(active, Ordering::SeqCst);
    }

    pub fn is_evading(&self) -> bool {
        self.evading.load(Ordering::SeqCst)
    }

    pub fn set_evading(&self, active: bool) {
        self.evading.store(active, Ordering::SeqCst);
    }

    pub fn is_patrolling(&self) -> bool {
        self.patrolling.load(Ordering::SeqCst)
    }

    pub fn set_patrolling(&self, active: bool) {
        self.patrolling.store(active, Ordering::SeqCst);
    }

    pub fn clear_patrolling(&self) {
        self.set_patrolling(false);
    }
}

/// Everything a behavior loop needs to run
#[derive(Clone)]
pub struct BehaviorContext {
    pub state: Arc<BehaviorState>,
    pub motion: Arc<MotionExecutor>,
    pub peripherals: Peripherals,
    pub config: TagConfig,
}

/// Sleep for `duration`; `false` if the token was cancelled first
pub(crate) async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Owns the seek and wander loop tasks
pub struct BehaviorSupervisor {
    base: LifecycleNodeBase,
    context: BehaviorContext,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl BehaviorSupervisor {
    pub fn new(context: BehaviorContext) -> Self {
        BehaviorSupervisor {
            base: LifecycleNodeBase::new("behavior_supervisor"),
            context,
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    /// Number of loop tasks still running
    pub fn running_loops(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Wait for the loop tasks to exit after deactivation
    pub async fn join(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                warn!(error = %err, "behavior loop ended abnormally");
            }
        }
    }
}

impl LifecycleNode for BehaviorSupervisor {
    fn on_configure(&mut self) -> Result<()> {
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("behavior loops must be started inside a tokio runtime")?;

        self.cancel = CancellationToken::new();
        let seek = SeekLoop::new(&self.context);
        let wander = WanderLoop::new(&self.context);
        self.tasks.push(runtime.spawn(seek.run(self.cancel.clone())));
        self.tasks.push(runtime.spawn(wander.run(self.cancel.clone())));

        info!("behavior loops started");
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.cancel.cancel();
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.tasks.clear();
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn state(&self) -> State {
        self.base.get_state()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
