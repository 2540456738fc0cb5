pub mod behaviors;
pub mod common;
pub mod config;
pub mod control;
pub mod directive;
pub mod events;
pub mod feedback;
pub mod lifecycle;
pub mod logging;
pub mod perception;
pub mod sim;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use crate::behaviors::{BehaviorContext, BehaviorState, BehaviorSupervisor, ModeController};
use crate::config::TagConfig;
use crate::control::{MotionExecutor, MotorPair};
use crate::directive::DirectiveRouter;
use crate::events::EventSink;
use crate::feedback::{Indicators, Sound, StatusFeedback};
use crate::lifecycle::LifecycleNode;
use crate::perception::ProximitySensor;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Drivers and transport the core talks to
#[derive(Clone)]
pub struct Peripherals {
    pub motors: Arc<dyn MotorPair>,
    pub indicators: Arc<dyn Indicators>,
    pub sound: Arc<dyn Sound>,
    pub proximity: Arc<dyn ProximitySensor>,
    pub events: Arc<dyn EventSink>,
}

/// Core functionality for the Tagbot robot
pub struct TagBot {
    components: Vec<Box<dyn LifecycleNode>>,
    state: Arc<BehaviorState>,
    motion: Arc<MotionExecutor>,
    router: Arc<DirectiveRouter>,
}

impl TagBot {
    /// Wire the core together. Loops do not start until [`TagBot::init`].
    pub fn new(config: TagConfig, peripherals: Peripherals) -> Result<Self> {
        config.validate().context("invalid tagbot configuration")?;

        let state = Arc::new(BehaviorState::new());
        let motion = Arc::new(MotionExecutor::new(
            Arc::clone(&peripherals.motors),
            Arc::clone(&state),
            config.drive.turn_duration(),
        ));
        let modes = Arc::new(ModeController::new(
            Arc::clone(&state),
            Arc::clone(&motion),
            Arc::clone(&peripherals.indicators),
            Arc::clone(&peripherals.events),
        ));
        let router = Arc::new(DirectiveRouter::new(
            Arc::clone(&motion),
            modes,
            config.behaviors.default_command_speed,
        ));

        let feedback = StatusFeedback::new(
            Arc::clone(&peripherals.indicators),
            Arc::clone(&peripherals.sound),
        );
        let supervisor = BehaviorSupervisor::new(BehaviorContext {
            state: Arc::clone(&state),
            motion: Arc::clone(&motion),
            peripherals,
            config,
        });

        let mut bot = TagBot {
            components: Vec::new(),
            state,
            motion,
            router,
        };
        bot.register(feedback);
        bot.register(supervisor);
        Ok(bot)
    }

    /// Register a component with the core
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Configure and activate all registered components.
    ///
    /// Must run inside a tokio runtime since it spawns the behavior loops.
    pub fn init(&mut self) -> Result<()> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        tracing::info!("tagbot core initialized");
        Ok(())
    }

    /// Stop the behavior loops, halt the motors and clean up
    pub async fn shutdown(&mut self) -> Result<()> {
        for component in self.components.iter_mut().rev() {
            component.on_deactivate()?;
        }
        if let Some(supervisor) = self.component_mut::<BehaviorSupervisor>() {
            supervisor.join().await;
        }
        self.motion.halt();
        for component in self.components.iter_mut().rev() {
            component.on_cleanup()?;
        }
        tracing::info!("tagbot core shut down");
        Ok(())
    }

    pub fn router(&self) -> Arc<DirectiveRouter> {
        Arc::clone(&self.router)
    }

    pub fn state(&self) -> Arc<BehaviorState> {
        Arc::clone(&self.state)
    }

    /// Gadget connected to the paired voice device
    pub fn on_connected(&mut self, device_addr: &str) {
        if let Some(feedback) = self.component_mut::<StatusFeedback>() {
            feedback.connected(device_addr);
        }
    }

    /// Gadget disconnected from the paired voice device
    pub fn on_disconnected(&mut self, device_addr: &str) {
        if let Some(feedback) = self.component_mut::<StatusFeedback>() {
            feedback.disconnected(device_addr);
        }
    }

    /// Get a mutable reference to a registered component by type
    pub fn component_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<T>())
    }
}
