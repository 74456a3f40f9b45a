use crate::prelude::{AlertConfig, RadarError, RadarResult, SweepConfig};
use crate::sweep::intensity::derive_aux_intensity;
use crate::sweep::ranging::RangingDriver;
use crate::sweep::servo::Actuator;
use crate::sweep::state::SweepState;
use crate::telemetry::{Counters, LinkMetrics, LogManager};
use crate::transport::LineSink;
use crate::wire::{encode, Distance, TelemetryRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Proximity buzzer (or any level-driven auxiliary output).
pub trait AuxOutput {
    fn set_intensity(&mut self, level: u16);
}

/// Small status screen on the sweep head. Failures are the driver's problem.
pub trait StatusDisplay {
    fn show_text(&mut self, text: &str);
}

/// Hardware handles owned once at start-up and lent to the sweep loop.
pub struct SweepContext<R, A, X, D, L> {
    pub ranging: R,
    pub actuator: A,
    pub aux: X,
    pub display: D,
    pub link: L,
}

/// Drives the servo across the arc and emits one record per angle step.
pub struct SweepController {
    state: SweepState,
    sweep: SweepConfig,
    alert: AlertConfig,
    metrics: LinkMetrics,
    logger: LogManager,
}

impl SweepController {
    pub fn new(sweep: SweepConfig, alert: AlertConfig) -> RadarResult<Self> {
        sweep.validate()?;
        alert.validate()?;
        Ok(Self {
            state: SweepState::new(sweep.step_degrees)?,
            sweep,
            alert,
            metrics: LinkMetrics::new(),
            logger: LogManager::new("sweep"),
        })
    }

    pub fn state(&self) -> &SweepState {
        &self.state
    }

    pub fn metrics(&self) -> Counters {
        self.metrics.snapshot()
    }

    /// Samples the current angle, then advances the sweep.
    ///
    /// Ranging failures never surface here: they are reported as
    /// [`Distance::NoEcho`]. Only a failing link is returned.
    pub fn step<R, A, X, D, L>(
        &mut self,
        ctx: &mut SweepContext<R, A, X, D, L>,
    ) -> RadarResult<TelemetryRecord>
    where
        R: RangingDriver,
        A: Actuator,
        X: AuxOutput,
        D: StatusDisplay,
        L: LineSink,
    {
        let angle = self.state.current_angle();
        ctx.actuator.set_angle(angle);
        pause(self.sweep.settle());

        let distance = match ctx.ranging.measure() {
            Ok(cm) => Distance::Echo(cm),
            Err(RadarError::RangingTimeout { waited }) => {
                self.metrics.record_timeout();
                self.logger
                    .trace_step(&format!("no echo at {}° after {:?}", angle, waited));
                Distance::NoEcho
            }
            Err(err) => {
                self.metrics.record_timeout();
                self.logger
                    .warn(&format!("ranging failed at {}°: {}", angle, err));
                Distance::NoEcho
            }
        };

        ctx.aux
            .set_intensity(derive_aux_intensity(distance, &self.alert));

        let record = TelemetryRecord::new(angle, distance);
        let line = encode(&record);
        ctx.display.show_text(line.trim_end());
        ctx.link.write_line(&line)?;
        self.metrics.record_accepted();

        pause(self.sweep.dwell());
        self.state.advance();
        Ok(record)
    }

    /// Steps until `stop` is raised or `max_steps` records were emitted.
    /// Returns the number of records emitted.
    pub fn run<R, A, X, D, L>(
        &mut self,
        ctx: &mut SweepContext<R, A, X, D, L>,
        stop: &AtomicBool,
        max_steps: Option<u64>,
    ) -> RadarResult<u64>
    where
        R: RangingDriver,
        A: Actuator,
        X: AuxOutput,
        D: StatusDisplay,
        L: LineSink,
    {
        let mut emitted = 0u64;
        while !stop.load(Ordering::Relaxed) && max_steps.map_or(true, |max| emitted < max) {
            self.step(ctx)?;
            emitted += 1;
        }
        let counters = self.metrics.snapshot();
        self.logger.record(&format!(
            "sweep stopped after {} steps ({} without echo)",
            emitted, counters.timeouts
        ));
        Ok(emitted)
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
