use anyhow::Context;
use clap::Parser;
use iced::{
    time,
    widget::{canvas::Canvas, column, text, Container},
    Element, Length, Subscription, Task, Theme,
};
use link::Link;
use log::{error, info};
use radar::RadarView;
use std::sync::Mutex;
use std::time::Instant;
use sweepcore::transport::DEFAULT_BAUD_RATE;
use sweepcore::{
    DrainReport, RadarLayout, RadarResult, TelemetryReceiver, TelemetryRecord, TrailConfig,
    TrailStore,
};

mod link;
mod radar;

#[derive(Parser)]
#[command(author, version, about = "Polar display for angle,distance telemetry")]
struct Args {
    /// Serial device carrying telemetry (stdin when omitted)
    #[arg(long)]
    port: Option<String>,
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,
    /// Number of recent samples kept on screen
    #[arg(long, default_value_t = 10)]
    capacity: usize,
    /// Drop samples older than this, regardless of capacity
    #[arg(long)]
    lifetime_ms: Option<u64>,
    /// Distance mapped onto the outer ring, in centimetres
    #[arg(long, default_value_t = 20.0)]
    max_range: f64,
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

struct Settings {
    receiver: TelemetryReceiver<Link>,
    trail: TrailStore,
    layout: RadarLayout,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let layout = display_layout(&args)?;
    let trail = TrailStore::new(&TrailConfig {
        capacity: args.capacity,
        lifetime_ms: args.lifetime_ms,
    })
    .context("trail settings")?;

    let link = Link::open(args.port.as_deref(), args.baud).with_context(|| match &args.port {
        Some(port) => format!("opening serial port {}", port),
        None => "reading telemetry from stdin".to_string(),
    })?;
    info!("listening on {}", link.describe());

    let settings = Mutex::new(Some(Settings {
        receiver: TelemetryReceiver::new(link),
        trail,
        layout,
    }));

    iced::application(
        move || Visualizer::boot(&settings),
        Visualizer::update,
        Visualizer::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .window_size((1200.0, 800.0))
    .run()
    .context("running display")
}

fn display_layout(args: &Args) -> anyhow::Result<RadarLayout> {
    let layout = RadarLayout {
        max_range_cm: args.max_range,
        frame_rate_hz: args.fps,
        ..RadarLayout::default()
    };
    layout.validate().context("display settings")?;
    Ok(layout)
}

fn application_title(_: &Visualizer) -> String {
    "Sweep Radar".into()
}

fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    time::every(state.layout.frame_interval()).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    receiver: Option<TelemetryReceiver<Link>>,
    trail: TrailStore,
    layout: RadarLayout,
    /// Last decoded record; outlives trail eviction so the status stays put.
    latest: Option<TelemetryRecord>,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
}

impl Visualizer {
    fn boot(settings: &Mutex<Option<Settings>>) -> (Self, Task<Message>) {
        let taken = settings.lock().ok().and_then(|mut slot| slot.take());
        let state = match taken {
            Some(settings) => Visualizer {
                receiver: Some(settings.receiver),
                trail: settings.trail,
                layout: settings.layout,
                latest: None,
                status: "Waiting for telemetry...".into(),
            },
            None => Visualizer::detached(),
        };
        (state, Task::none())
    }

    /// A display with no link attached; only the grid is drawn.
    fn detached() -> Self {
        Visualizer {
            receiver: None,
            trail: TrailStore::default(),
            layout: RadarLayout::default(),
            latest: None,
            status: "No telemetry link".into(),
        }
    }

    /// One frame worth of work: drain the link, then age out stale points.
    fn poll(&mut self, now: Instant) -> RadarResult<DrainReport> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Ok(DrainReport::default());
        };
        let drained = receiver.drain(&mut self.trail);
        if let Some(point) = self.trail.latest() {
            self.latest = Some(point.record());
        }
        self.trail.expire(now);

        let counters = receiver.metrics();
        self.status = format!(
            "{} received, {} dropped, {} of {} on screen",
            counters.accepted,
            counters.dropped,
            self.trail.len(),
            self.trail.capacity()
        );
        drained
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => match state.poll(Instant::now()) {
                Ok(_) => Task::none(),
                Err(err) => {
                    error!("telemetry link lost: {}", err);
                    iced::exit()
                }
            },
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let radar = Canvas::new(RadarView {
            layout: state.layout.clone(),
            trail: state.trail.snapshot(),
            latest: state.latest,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let content = column![radar, text(&state.status).size(14)]
            .spacing(6)
            .padding(10);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use sweepcore::transport::ReaderThreadSource;
    use sweepcore::{Distance, RadarError};

    fn visualizer_over(input: &'static str) -> Visualizer {
        let source = ReaderThreadSource::spawn(Cursor::new(input)).unwrap();
        Visualizer {
            receiver: Some(TelemetryReceiver::new(Link::Stream(source))),
            ..Visualizer::detached()
        }
    }

    /// Polls until the reader thread hangs up.
    fn poll_to_end(viz: &mut Visualizer) -> RadarError {
        loop {
            match viz.poll(Instant::now()) {
                Ok(_) => std::thread::yield_now(),
                Err(err) => return err,
            }
        }
    }

    #[test]
    fn frames_fill_trail_until_link_closes() {
        let mut viz = visualizer_over("10,5.00\n20,25.00\n\n30,abc\n40,-1.00\n");
        let err = poll_to_end(&mut viz);
        assert!(matches!(err, RadarError::TransportClosed(_)));

        let angles: Vec<f64> = viz.trail.iter().map(|p| p.angle_degrees).collect();
        assert_eq!(angles, vec![10.0, 20.0, 40.0]);
        assert_eq!(viz.latest.map(|r| r.distance), Some(Distance::NoEcho));
        assert_eq!(viz.status, "3 received, 1 dropped, 3 of 10 on screen");
    }

    #[test]
    fn display_settings_reject_unbounded_range() {
        let args = Args::parse_from(["visualizer", "--max-range", "40", "--fps", "30"]);
        let layout = display_layout(&args).unwrap();
        assert_eq!(layout.max_range_cm, 40.0);
        assert_eq!(layout.frame_rate_hz, 30);

        for bad in [["--max-range", "inf"], ["--max-range", "1e9"], ["--fps", "0"]] {
            let args = Args::parse_from(["visualizer", bad[0], bad[1]]);
            assert!(display_layout(&args).is_err(), "{:?} accepted", bad);
        }
    }

    #[test]
    fn detached_display_never_fails() {
        let mut viz = Visualizer::detached();
        let report = viz.poll(Instant::now()).unwrap();
        assert_eq!(report, DrainReport::default());
        assert!(viz.trail.is_empty());
    }
}
