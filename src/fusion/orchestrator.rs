//! Event sequencing and snapshot publication
//!
//! The orchestrator owns the filter, the solver, and the anchor registry, and
//! serializes every mutation through `&mut self`; the borrow checker enforces
//! the at-most-one-in-flight-mutation contract. Hosts bridging concurrent
//! producers put the orchestrator behind their own mutex or event loop; there
//! are no locks, no async, and no blocking inside.

use std::collections::HashMap;

use crate::algorithms::multilateration::MultilaterationSolver;
use crate::core::registry::AnchorRegistry;
use crate::core::types::{DisplacementEvent, PositionFix, RangeReading};
use crate::fusion::{FusionConfig, FusionState, FusionUpdate};
use crate::processing::kalman::ConstantVelocityFilter;
use crate::validation::data::MeasurementValidator;
use crate::validation::error::FusionResult;

/// Observer callback receiving published snapshots
pub type FixCallback = Box<dyn Fn(&FusionUpdate) + Send>;

/// Opaque registration handle for observer callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Sequences displacement and ranging events into the filter and broadcasts
/// the fused estimate
pub struct FusionOrchestrator {
    registry: AnchorRegistry,
    solver: MultilaterationSolver,
    filter: ConstantVelocityFilter,
    validator: MeasurementValidator,
    state: FusionState,
    /// Last published fix, if any
    latest: Option<PositionFix>,
    /// Timestamp of the last accepted event, bookkeeping only
    last_update_ms: Option<u64>,
    callbacks: HashMap<CallbackHandle, FixCallback>,
    callback_counter: u32,
}

impl Default for FusionOrchestrator {
    fn default() -> Self {
        Self::new(FusionConfig::default())
    }
}

impl FusionOrchestrator {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            registry: AnchorRegistry::new(),
            solver: MultilaterationSolver::new(),
            filter: ConstantVelocityFilter::new(config.filter),
            validator: MeasurementValidator::new(),
            state: FusionState::Uninitialized,
            latest: None,
            last_update_ms: None,
            callbacks: HashMap::new(),
            callback_counter: 0,
        }
    }

    pub fn state(&self) -> FusionState {
        self.state
    }

    /// Last published fused fix, `None` before initialization or after reset.
    pub fn latest(&self) -> Option<PositionFix> {
        self.latest
    }

    pub fn last_update_ms(&self) -> Option<u64> {
        self.last_update_ms
    }

    /// Read-only anchor lookup for the fusion core.
    pub fn registry(&self) -> &AnchorRegistry {
        &self.registry
    }

    /// Anchor configuration is the host's responsibility; mutation happens
    /// between fusion calls, serialized by the same `&mut self` discipline.
    pub fn registry_mut(&mut self) -> &mut AnchorRegistry {
        &mut self.registry
    }

    /// Register an observer; snapshots are broadcast to every registered
    /// callback, last-value-wins, no acknowledgment.
    pub fn register_callback(&mut self, callback: FixCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.callbacks.insert(handle, callback);
        handle
    }

    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.callbacks.remove(&handle).is_some()
    }

    /// Feed one dead-reckoning displacement event.
    ///
    /// Dropped silently while uninitialized: without a first absolute fix
    /// there is no position to displace.
    pub fn handle_displacement(&mut self, event: DisplacementEvent) -> FusionResult<()> {
        if self.state == FusionState::Uninitialized {
            log::debug!(
                "dropping displacement ({:.2}, {:.2}) before first fix",
                event.dx_m,
                event.dy_m
            );
            return Ok(());
        }

        self.filter.predict(event.dx_m, event.dy_m).map_err(|err| {
            log::warn!("displacement rejected: {}", err);
            err
        })?;
        self.last_update_ms = Some(event.timestamp_ms);
        self.publish_current();
        Ok(())
    }

    /// Feed one ranging cycle: join against the registry, solve, correct.
    ///
    /// The raw fix sigma is the RMS of the participating readings' stddevs.
    /// Any failure leaves the filter state and the last published snapshot
    /// untouched; the host keeps the prior estimate and retries next cycle.
    pub fn handle_ranging(
        &mut self,
        readings: &[RangeReading],
        timestamp_ms: u64,
    ) -> FusionResult<PositionFix> {
        let resolved = self.registry.resolve(readings);
        let (x, y) = self.solver.solve(&resolved).map_err(|err| {
            log::warn!("ranging batch rejected: {}", err);
            err
        })?;

        let mean_variance = resolved
            .iter()
            .map(|r| r.stddev_m * r.stddev_m)
            .sum::<f64>()
            / resolved.len() as f64;
        let raw = PositionFix::new(x, y, mean_variance.sqrt());

        self.apply_fix(raw, timestamp_ms)
    }

    /// Correction entry point for hosts running their own solver.
    ///
    /// The first valid fix seeds the filter at the fix location with zero
    /// velocity and the default high-uncertainty prior; later fixes run the
    /// standard Kalman update. Returns the fused snapshot.
    pub fn apply_fix(&mut self, fix: PositionFix, timestamp_ms: u64) -> FusionResult<PositionFix> {
        self.validator.check_fix(&fix).map_err(|err| {
            log::warn!("fix rejected: {}", err);
            err
        })?;

        match self.state {
            FusionState::Uninitialized => {
                self.filter.initialize(fix.x, fix.y);
                self.state = FusionState::Initialized;
                log::info!("fusion seeded at ({:.2}, {:.2})", fix.x, fix.y);
            }
            FusionState::Initialized => {
                self.filter.correct(&fix).map_err(|err| {
                    log::warn!("correction rejected: {}", err);
                    err
                })?;
            }
        }

        self.last_update_ms = Some(timestamp_ms);
        self.publish_current();
        Ok(self.filter.fix())
    }

    /// Return to the uninitialized default from any state.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.state = FusionState::Uninitialized;
        self.latest = None;
        self.last_update_ms = None;
        log::info!("fusion reset");
        self.broadcast(&FusionUpdate::Reset);
    }

    fn publish_current(&mut self) {
        let snapshot = self.filter.fix();
        self.latest = Some(snapshot);
        self.broadcast(&FusionUpdate::Fix(snapshot));
    }

    fn broadcast(&self, update: &FusionUpdate) {
        for callback in self.callbacks.values() {
            callback(update);
        }
    }
}
