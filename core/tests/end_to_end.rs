use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;

use sweepcore::render::RadarLayout;
use sweepcore::sweep::{Actuator, AuxOutput, RangingDriver, StatusDisplay};
use sweepcore::transport::{LineSource, WriterSink};
use sweepcore::{
    AlertConfig, RadarResult, RadarScene, SweepConfig, SweepContext, SweepController,
    TelemetryReceiver, TrailConfig, TrailStore,
};

struct QueueSource {
    lines: VecDeque<String>,
}

impl QueueSource {
    fn new<I: IntoIterator<Item = S>, S: Into<String>>(lines: I) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for QueueSource {
    fn try_read_line(&mut self) -> RadarResult<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[test]
fn malformed_line_is_dropped_and_scene_clips_far_echo() {
    let mut store = TrailStore::new(&TrailConfig::default()).unwrap();
    let mut receiver = TelemetryReceiver::new(QueueSource::new(["10,5.00", "20,25.00", "30,abc"]));

    let report = receiver.drain(&mut store).unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.dropped, 1);

    let points = store.snapshot();
    let angles: Vec<f64> = points.iter().map(|p| p.angle_degrees).collect();
    assert_eq!(angles, vec![10.0, 20.0]);

    let layout = RadarLayout::default();
    let latest = store.latest().map(|p| p.record());
    let scene = RadarScene::compose(&layout, &points, latest.as_ref());

    let near = scene.beams[0].marker.as_ref().expect("marker for 5 cm echo");
    assert_eq!(near.range_fraction, 5.0 / 20.0);
    assert!((near.position.distance_to(layout.center) - layout.radius * 0.25).abs() < 1e-3);
    assert!(scene.beams[1].marker.is_none());
    assert!(scene.beams[0].alpha < scene.beams[1].alpha);
    assert_eq!(scene.status.distance, "---");
}

struct Wall {
    distance_cm: f64,
}

impl RangingDriver for Wall {
    fn measure(&mut self) -> RadarResult<f64> {
        Ok(self.distance_cm)
    }
}

struct Quiet;

impl Actuator for Quiet {
    fn set_angle(&mut self, _angle_degrees: f64) {}
}

impl AuxOutput for Quiet {
    fn set_intensity(&mut self, _level: u16) {}
}

impl StatusDisplay for Quiet {
    fn show_text(&mut self, _text: &str) {}
}

#[test]
fn sweep_output_feeds_the_trail() {
    let sweep = SweepConfig {
        step_degrees: 10.0,
        settle_ms: 0,
        dwell_ms: 0,
    };
    let mut controller = SweepController::new(sweep, AlertConfig::default()).unwrap();
    let mut ctx = SweepContext {
        ranging: Wall { distance_cm: 12.5 },
        actuator: Quiet,
        aux: Quiet,
        display: Quiet,
        link: WriterSink::new(Vec::new()),
    };
    controller
        .run(&mut ctx, &AtomicBool::new(false), Some(25))
        .unwrap();

    let wire = String::from_utf8(ctx.link.into_inner()).unwrap();
    let mut store = TrailStore::new(&TrailConfig::default()).unwrap();
    let mut receiver = TelemetryReceiver::new(QueueSource::new(wire.lines()));
    let report = receiver.drain(&mut store).unwrap();

    assert_eq!(report.accepted, 25);
    assert_eq!(store.len(), 10);
    // 25 steps of 10° turn at 180 and end on the way down at 120
    let angles: Vec<f64> = store.iter().map(|p| p.angle_degrees).collect();
    assert_eq!(
        angles,
        vec![150.0, 160.0, 170.0, 180.0, 170.0, 160.0, 150.0, 140.0, 130.0, 120.0]
    );
    assert_eq!(
        store.latest().unwrap().distance.centimetres(),
        Some(12.5)
    );
}
