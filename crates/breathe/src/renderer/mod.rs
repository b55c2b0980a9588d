mod debug;
mod hud;
mod orb;
mod particles;

use breathe_core::{BreathingSession, CueBackend, ParticleField};
use nannou::prelude::*;

pub use debug::DebugViz;

/// Resolution settings for the window
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Resolution {
    pub fn debug() -> Self {
        Self {
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }

    pub fn release() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: true,
        }
    }

    pub fn current(windowed: bool) -> Self {
        if cfg!(debug_assertions) || windowed {
            Self::debug()
        } else {
            Self::release()
        }
    }
}

const NOTIFICATION_FRAMES: u32 = 180; // ~3 seconds at 60fps

/// Draws the scene and owns the transient overlays.
pub struct Renderer {
    notification_text: Option<String>,
    notification_frames: u32,
    debug_viz: Option<DebugViz>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            notification_text: None,
            notification_frames: 0,
            debug_viz: None,
        }
    }

    /// Shows a notification message for 3 seconds
    pub fn show_notification(&mut self, text: String) {
        self.notification_text = Some(text);
        self.notification_frames = NOTIFICATION_FRAMES;
    }

    pub fn toggle_debug_viz(&mut self) {
        self.debug_viz = match self.debug_viz {
            Some(_) => None,
            None => Some(DebugViz::new()),
        };
    }

    pub fn update<B: CueBackend>(&mut self, session: &BreathingSession<B>, field: &ParticleField) {
        if self.notification_frames > 0 {
            self.notification_frames -= 1;
            if self.notification_frames == 0 {
                self.notification_text = None;
            }
        }

        if let Some(debug) = self.debug_viz.as_mut() {
            debug.update(session, field);
        }
    }

    pub fn draw<B: CueBackend>(
        &self,
        draw: &Draw,
        bounds: Rect,
        session: &BreathingSession<B>,
        field: &ParticleField,
    ) {
        draw.background().color(rgb(0.02, 0.02, 0.05));

        let color = session.pattern().color;
        particles::draw_field(draw, field, color);
        orb::draw_orb(draw, bounds, session.visual_state().scale, color);
        hud::draw_hud(draw, bounds, session);

        if let Some(debug) = self.debug_viz.as_ref() {
            debug.draw(draw, bounds);
        }

        // Draw notification text at middle top
        if let Some(ref text) = self.notification_text {
            let alpha = (self.notification_frames as f32 / 60.0).min(1.0);
            draw.text(text)
                .x_y(0.0, bounds.top() - 30.0)
                .w(bounds.w())
                .color(rgba(1.0, 1.0, 1.0, alpha))
                .font_size(24);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
