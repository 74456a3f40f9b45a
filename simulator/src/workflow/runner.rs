use crate::devices::simulated::{LoggedBuzzer, LoggedScreen, SimulatedServo};
use crate::generator::profile::SimulatedSonar;
use crate::workflow::config::SimulatorConfig;
use anyhow::Context;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use sweepcore::transport::LineSink;
use sweepcore::{SweepContext, SweepController};

pub struct SweepSummary {
    pub steps: u64,
    pub echoes: usize,
    pub timeouts: usize,
}

pub type SimulatedContext<L> =
    SweepContext<SimulatedSonar, SimulatedServo, LoggedBuzzer, LoggedScreen, L>;

#[derive(Clone)]
pub struct Runner {
    config: SimulatorConfig,
}

impl Runner {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Wires the simulated devices around one shared servo shaft.
    pub fn build_context<L: LineSink>(&self, link: L) -> SimulatedContext<L> {
        let shaft = Rc::new(Cell::new(0.0));
        SweepContext {
            ranging: SimulatedSonar::new(self.config.scene.clone(), shaft.clone()),
            actuator: SimulatedServo::new(shaft),
            aux: LoggedBuzzer::default(),
            display: LoggedScreen::default(),
            link,
        }
    }

    pub fn execute<L: LineSink>(
        &self,
        ctx: &mut SimulatedContext<L>,
        stop: &AtomicBool,
        max_steps: Option<u64>,
    ) -> anyhow::Result<SweepSummary> {
        let mut controller =
            SweepController::new(self.config.sweep.clone(), self.config.alert.clone())
                .context("initializing sweep controller")?;
        let steps = controller
            .run(ctx, stop, max_steps)
            .context("writing telemetry")?;
        let counters = controller.metrics();

        Ok(SweepSummary {
            steps,
            echoes: counters.accepted.saturating_sub(counters.timeouts),
            timeouts: counters.timeouts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::SceneConfig;
    use sweepcore::transport::WriterSink;
    use sweepcore::wire::{decode, Distance};
    use sweepcore::SweepConfig;

    fn fast_config() -> SimulatorConfig {
        SimulatorConfig {
            sweep: SweepConfig {
                step_degrees: 5.0,
                settle_ms: 0,
                dwell_ms: 0,
            },
            scene: SceneConfig {
                noise_cm: 0.0,
                realtime: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn runner_streams_one_line_per_step() {
        let runner = Runner::new(fast_config());
        let mut ctx = runner.build_context(WriterSink::new(Vec::new()));
        let summary = runner
            .execute(&mut ctx, &AtomicBool::new(false), Some(37))
            .unwrap();
        assert_eq!(summary.steps, 37);
        assert_eq!(summary.echoes + summary.timeouts, 37);

        let wire = String::from_utf8(ctx.link.into_inner()).unwrap();
        let records: Vec<_> = wire.lines().map(|line| decode(line).unwrap()).collect();
        assert_eq!(records.len(), 37);
        assert_eq!(records[36].angle_degrees, 180.0);

        let at_hundred = records
            .iter()
            .find(|r| r.angle_degrees == 100.0)
            .unwrap();
        assert_eq!(at_hundred.distance, Distance::Echo(6.5));
        let at_zero = &records[0];
        assert_eq!(at_zero.distance, Distance::NoEcho);
    }

    #[test]
    fn close_obstacle_raises_buzzer() {
        let runner = Runner::new(fast_config());
        let mut ctx = runner.build_context(WriterSink::new(Vec::new()));
        // 0..=100 in steps of 5 ends on the 6.5 cm obstacle
        runner
            .execute(&mut ctx, &AtomicBool::new(false), Some(21))
            .unwrap();
        assert!((6_749..=6_750).contains(&ctx.aux.level()));
        assert_eq!(ctx.display.text(), "100,6.50");
    }
}
