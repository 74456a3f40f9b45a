use crate::render::layout::{RadarLayout, ScreenPoint, MAX_RANGE_RINGS};
use crate::trail::TrailPoint;
use crate::wire::{Distance, TelemetryRecord};

/// Text anchored at its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: ScreenPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeRing {
    pub distance_cm: f64,
    pub radius: f32,
    /// The zero ring carries no label.
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gridline {
    pub angle_degrees: f64,
    pub end: ScreenPoint,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: ScreenPoint,
    /// Marker radius as a fraction of the outer ring radius.
    pub range_fraction: f64,
}

/// One trail sample: a beam from the centre plus an optional echo marker,
/// both drawn with the same opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBeam {
    pub angle_degrees: f64,
    pub end: ScreenPoint,
    pub alpha: u8,
    pub marker: Option<Marker>,
}

/// Status lines, left-anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusText {
    pub angle: String,
    pub distance: String,
    pub angle_position: ScreenPoint,
    pub distance_position: ScreenPoint,
}

/// Everything needed to draw one frame. Rebuilt every frame, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarScene {
    pub center: ScreenPoint,
    pub radius: f32,
    pub rings: Vec<RangeRing>,
    pub gridlines: Vec<Gridline>,
    pub beams: Vec<TrailBeam>,
    pub status: StatusText,
}

/// Opacity of the point at rank `idx` (0 = oldest) in a trail of `len`.
/// Strictly increasing with recency while `len <= 255`.
pub fn trail_alpha(idx: usize, len: usize) -> u8 {
    if len == 0 {
        return 0;
    }
    (255 * (idx.min(len - 1) + 1) / len) as u8
}

impl RadarScene {
    pub fn compose(
        layout: &RadarLayout,
        trail: &[TrailPoint],
        latest: Option<&TelemetryRecord>,
    ) -> Self {
        Self {
            center: layout.center,
            radius: layout.radius,
            rings: range_rings(layout),
            gridlines: gridlines(layout),
            beams: trail_beams(layout, trail),
            status: status_text(layout, latest),
        }
    }
}

fn range_rings(layout: &RadarLayout) -> Vec<RangeRing> {
    let step = layout.ring_step_cm;
    let max = layout.max_range_cm;
    if !(step.is_finite() && step > 0.0 && max.is_finite() && max > 0.0) {
        return Vec::new();
    }
    let count = ((max / step + 1e-9).floor() as usize).min(MAX_RANGE_RINGS);
    (0..=count)
        .map(|i| {
            let distance_cm = i as f64 * step;
            let radius = (distance_cm / layout.max_range_cm) as f32 * layout.radius;
            let label = (i > 0).then(|| Label {
                text: format!("{}cm", distance_cm),
                position: ScreenPoint::new(
                    layout.center.x + radius,
                    layout.center.y + layout.ring_label_drop,
                ),
            });
            RangeRing {
                distance_cm,
                radius,
                label,
            }
        })
        .collect()
}

fn gridlines(layout: &RadarLayout) -> Vec<Gridline> {
    let step = layout.grid_step_degrees.max(1) as usize;
    (0..=180u32)
        .step_by(step)
        .map(|degrees| {
            let angle_degrees = f64::from(degrees);
            Gridline {
                angle_degrees,
                end: layout.polar(angle_degrees, layout.radius),
                label: Label {
                    text: format!("{}°", degrees),
                    position: layout
                        .polar(angle_degrees, layout.radius + layout.angle_label_offset),
                },
            }
        })
        .collect()
}

fn trail_beams(layout: &RadarLayout, trail: &[TrailPoint]) -> Vec<TrailBeam> {
    let len = trail.len();
    trail
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let marker = point
                .distance
                .centimetres()
                .and_then(|cm| layout.range_to_radius(cm).map(|r| (cm, r)))
                .map(|(cm, r)| Marker {
                    position: layout.polar(point.angle_degrees, r),
                    range_fraction: cm / layout.max_range_cm,
                });
            TrailBeam {
                angle_degrees: point.angle_degrees,
                end: layout.polar(point.angle_degrees, layout.radius),
                alpha: trail_alpha(idx, len),
                marker,
            }
        })
        .collect()
}

fn status_text(layout: &RadarLayout, latest: Option<&TelemetryRecord>) -> StatusText {
    let angle = match latest {
        Some(record) => format!("Angle: {:.1}°", record.angle_degrees),
        None => "Angle: ---".to_string(),
    };
    let distance = match latest.map(|record| record.distance) {
        Some(Distance::Echo(cm)) if cm <= layout.max_range_cm => {
            format!("Distance: {:.2} cm", cm)
        }
        _ => "---".to_string(),
    };
    StatusText {
        angle,
        distance,
        angle_position: layout.status_origin,
        distance_position: ScreenPoint::new(
            layout.status_origin.x,
            layout.status_origin.y + layout.status_line_height,
        ),
    }
}
