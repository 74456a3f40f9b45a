use iced::{
    mouse,
    widget::canvas::{self, path::Builder, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Theme,
};
use sweepcore::render::{Label, RadarLayout, ScreenPoint};
use sweepcore::{RadarScene, TelemetryRecord, TrailPoint};

const GRID_GREEN: Color = Color::from_rgb(0.0, 100.0 / 255.0, 0.0);
const LABEL_SIZE: f32 = 24.0;
const STATUS_SIZE: f32 = 32.0;
const BEAM_WIDTH: f32 = 4.0;
const MARKER_RADIUS: f32 = 10.0;

/// Canvas program drawing one radar frame from the trail.
pub struct RadarView {
    pub layout: RadarLayout,
    pub trail: Vec<TrailPoint>,
    pub latest: Option<TelemetryRecord>,
}

fn point(p: ScreenPoint) -> Point {
    Point::new(p.x, p.y)
}

/// Upper half circle traced through the layout's polar mapping.
fn half_circle(builder: &mut Builder, layout: &RadarLayout, radius: f32) {
    builder.move_to(point(layout.polar(0.0, radius)));
    for degrees in 1..=180 {
        builder.line_to(point(layout.polar(f64::from(degrees), radius)));
    }
}

fn draw_label(frame: &mut Frame, label: &Label, size: f32) {
    // fill_text anchors at the top-left corner; shift to centre the label
    let width = label.text.chars().count() as f32 * size * 0.5;
    frame.fill_text(canvas::Text {
        content: label.text.clone(),
        position: Point::new(label.position.x - width / 2.0, label.position.y - size / 2.0),
        color: Color::WHITE,
        size: Pixels(size),
        ..canvas::Text::default()
    });
}

fn draw_status(frame: &mut Frame, text: &str, at: ScreenPoint) {
    frame.fill_text(canvas::Text {
        content: text.to_string(),
        position: point(at),
        color: Color::WHITE,
        size: Pixels(STATUS_SIZE),
        ..canvas::Text::default()
    });
}

impl<Message> canvas::Program<Message> for RadarView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let layout = self.layout.resized(bounds.width, bounds.height);
        let scene = RadarScene::compose(&layout, &self.trail, self.latest.as_ref());

        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::BLACK);

        let outer = Path::new(|builder| half_circle(builder, &layout, scene.radius));
        frame.stroke(
            &outer,
            Stroke::default().with_width(4.0).with_color(GRID_GREEN),
        );

        for ring in &scene.rings {
            let path = Path::new(|builder| half_circle(builder, &layout, ring.radius));
            frame.stroke(
                &path,
                Stroke::default().with_width(2.0).with_color(GRID_GREEN),
            );
            if let Some(label) = &ring.label {
                draw_label(&mut frame, label, LABEL_SIZE);
            }
        }

        for gridline in &scene.gridlines {
            let path = Path::line(point(scene.center), point(gridline.end));
            frame.stroke(
                &path,
                Stroke::default().with_width(2.0).with_color(GRID_GREEN),
            );
            draw_label(&mut frame, &gridline.label, LABEL_SIZE);
        }

        // oldest first, so fresher beams blend over older ones
        for beam in &scene.beams {
            let alpha = f32::from(beam.alpha) / 255.0;
            let path = Path::line(point(scene.center), point(beam.end));
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(BEAM_WIDTH)
                    .with_color(Color::from_rgba8(0, 255, 0, alpha)),
            );
            if let Some(marker) = &beam.marker {
                let dot = Path::circle(point(marker.position), MARKER_RADIUS);
                frame.fill(&dot, Color::from_rgba8(255, 0, 0, alpha));
            }
        }

        draw_status(&mut frame, &scene.status.angle, scene.status.angle_position);
        draw_status(
            &mut frame,
            &scene.status.distance,
            scene.status.distance_position,
        );

        vec![frame.into_geometry()]
    }
}
