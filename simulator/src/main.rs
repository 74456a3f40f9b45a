use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use sweepcore::transport::{open_sink_port, WriterSink};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{Overrides, SimulatorConfig};
use workflow::runner::Runner;

mod devices;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Sweep head driver streaming angle,distance lines")]
struct Args {
    /// Load sweep, alert, scene and link settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Serial device to write telemetry to (stdout when omitted)
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    baud: Option<u32>,
    /// Angle increment in degrees
    #[arg(long)]
    step: Option<f64>,
    /// Servo settle time before ranging
    #[arg(long)]
    settle_ms: Option<u64>,
    /// Pause after each emitted sample
    #[arg(long)]
    dwell_ms: Option<u64>,
    /// Buzzer level at zero distance (16-bit duty)
    #[arg(long)]
    max_intensity: Option<u16>,
    /// Seed for the simulated echo jitter
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many samples instead of sweeping until Ctrl+C
    #[arg(long)]
    steps: Option<u64>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port.clone(),
            baud_rate: self.baud,
            step_degrees: self.step,
            settle_ms: self.settle_ms,
            dwell_ms: self.dwell_ms,
            max_intensity: self.max_intensity,
            seed: self.seed,
        }
    }
}

/// Raises `stop` on Ctrl+C so the sweep finishes its current step and exits.
fn install_stop_handler(stop: Arc<AtomicBool>) -> anyhow::Result<()> {
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    thread::Builder::new()
        .name("signal".into())
        .spawn(move || {
            runtime.block_on(async {
                match signal::ctrl_c().await {
                    Ok(()) => {
                        info!("stop requested");
                        stop.store(true, Ordering::Relaxed);
                    }
                    Err(err) => warn!("cannot listen for Ctrl+C: {}", err),
                }
            });
        })
        .context("spawning signal thread")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    }
    .apply(args.overrides());
    config.validate()?;

    let writer: Box<dyn Write> = match &config.link.port {
        Some(port_name) => {
            let port = open_sink_port(port_name, config.link.baud_rate)
                .with_context(|| format!("opening serial port {}", port_name))?;
            info!("streaming to {} at {} baud", port_name, config.link.baud_rate);
            Box::new(port)
        }
        None => Box::new(io::stdout()),
    };

    let stop = Arc::new(AtomicBool::new(false));
    install_stop_handler(stop.clone())?;

    let runner = Runner::new(config);
    let mut ctx = runner.build_context(WriterSink::new(writer));
    let summary = runner.execute(&mut ctx, &stop, args.steps)?;

    info!(
        "sweep finished: {} samples, {} echoes, {} without echo",
        summary.steps, summary.echoes, summary.timeouts
    );
    Ok(())
}
