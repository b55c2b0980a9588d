//! Help overlay showing keyboard shortcuts.

use breathe_core::Rgb;
use nannou::prelude::*;

const ROW_HEIGHT: f32 = 30.0;
const PANEL_WIDTH: f32 = 440.0;
const CHIP_WIDTH: f32 = 96.0;
const PADDING: f32 = 22.0;

/// Manages help overlay visibility
pub struct HelpOverlay {
    pub visible: bool,
}

/// Key label and what it does right now
pub fn shortcuts(running: bool, muted: bool) -> Vec<(&'static str, &'static str)> {
    vec![
        ("Space", if running { "Stop session" } else { "Start session" }),
        ("Up / Down", "Slower / faster"),
        ("Tab / Right", "Next pattern"),
        ("Left", "Previous pattern"),
        ("m", if muted { "Unmute cues" } else { "Mute cues" }),
        ("d", "Debug overlay"),
        ("h / Esc", "Close help"),
        ("q", "Quit"),
    ]
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Panel to the left of the orb, tinted with the active pattern
    pub fn draw(&self, draw: &Draw, bounds: Rect, color: Rgb, running: bool, muted: bool) {
        if !self.visible {
            return;
        }

        let rows = shortcuts(running, muted);
        let [r, g, b] = color.to_f32();
        let height = ROW_HEIGHT * (rows.len() as f32 + 1.0) + PADDING * 2.0;
        let panel = Rect::from_w_h(PANEL_WIDTH, height)
            .mid_left_of(bounds.pad_left(PADDING));

        draw.rect()
            .xy(panel.xy())
            .wh(panel.wh())
            .color(rgba(0.0, 0.0, 0.0, 0.85));
        draw.rect()
            .x_y(panel.left() + 2.0, panel.y())
            .w_h(4.0, panel.h())
            .color(rgba(r, g, b, 0.9));

        let title_y = panel.top() - PADDING - ROW_HEIGHT / 2.0;
        draw.text("Keys")
            .x_y(panel.x(), title_y)
            .w_h(panel.w() - PADDING * 2.0, ROW_HEIGHT)
            .left_justify()
            .color(rgba(r, g, b, 1.0))
            .font_size(20);

        let chip_x = panel.left() + PADDING + CHIP_WIDTH / 2.0;
        let desc_w = panel.w() - CHIP_WIDTH - PADDING * 3.0;
        let desc_x = chip_x + CHIP_WIDTH / 2.0 + PADDING + desc_w / 2.0;

        for (i, (key, desc)) in rows.iter().enumerate() {
            let y = title_y - (i as f32 + 1.0) * ROW_HEIGHT;

            draw.rect()
                .x_y(chip_x, y)
                .w_h(CHIP_WIDTH, ROW_HEIGHT - 8.0)
                .color(rgba(r, g, b, 0.25));
            draw.text(key)
                .x_y(chip_x, y)
                .w_h(CHIP_WIDTH, ROW_HEIGHT)
                .center_justify()
                .color(WHITE)
                .font_size(15);
            draw.text(desc)
                .x_y(desc_x, y)
                .w_h(desc_w, ROW_HEIGHT)
                .left_justify()
                .color(rgba(1.0, 1.0, 1.0, 0.8))
                .font_size(16);
        }
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
