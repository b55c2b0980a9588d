//! Debug overlay.
//!
//! Frame rate, smoothed particle speeds and session timing in a corner box.

use breathe_core::{BreathingSession, CueBackend, ParticleField};
use nannou::prelude::*;
use std::time::Instant;

pub struct DebugViz {
    /// Last frame time for FPS calculation
    last_frame_time: Instant,
    /// Smoothed FPS display value
    display_fps: f32,
    lines: Vec<String>,
}

impl DebugViz {
    pub fn new() -> Self {
        Self {
            last_frame_time: Instant::now(),
            display_fps: 0.0,
            lines: Vec::new(),
        }
    }

    pub fn update<B: CueBackend>(&mut self, session: &BreathingSession<B>, field: &ParticleField) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        self.display_fps = smooth_fps(self.display_fps, delta);
        self.last_frame_time = now;

        let (radial, drift) = field.speeds();
        let cues = session.cues().map_or(0, |c| c.cached());

        self.lines = vec![
            format!("fps      {:.1}", self.display_fps),
            format!("phase    {:?}", session.phase()),
            format!(
                "elapsed  {:.0} / {:.0} ms",
                session.elapsed_ms(),
                session.elapsed_ms() + session.remaining_ms()
            ),
            format!("radial   {:+.3}", radial),
            format!("drift    {:.3}", drift),
            format!("pool     {}", field.len()),
            format!("cues     {}", cues),
        ];
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect) {
        let line_height = 18.0;
        let width = 220.0;
        let height = line_height * self.lines.len() as f32 + 16.0;
        let x = bounds.right() - width / 2.0 - 10.0;
        let y = bounds.bottom() + height / 2.0 + 10.0;

        draw.rect()
            .x_y(x, y)
            .w_h(width, height)
            .color(rgba(0.0, 0.0, 0.0, 0.7));

        let top = y + height / 2.0 - 8.0 - line_height / 2.0;
        for (i, line) in self.lines.iter().enumerate() {
            draw.text(line)
                .x_y(x, top - i as f32 * line_height)
                .w_h(width - 16.0, line_height)
                .left_justify()
                .color(rgb(0.3, 1.0, 0.5))
                .font_size(13);
        }
    }
}

/// Exponential moving average of the instantaneous frame rate
fn smooth_fps(previous: f32, delta_secs: f32) -> f32 {
    let current = if delta_secs > 0.0 { 1.0 / delta_secs } else { 0.0 };
    previous * 0.9 + current * 0.1
}
