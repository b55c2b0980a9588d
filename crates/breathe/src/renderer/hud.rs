//! Session status text.

use breathe_core::{BreathingSession, CueBackend, Phase};
use nannou::prelude::*;

/// Whole seconds left in the phase, rounded up so "1" shows until the boundary
pub fn countdown_secs(remaining_ms: f64) -> u64 {
    (remaining_ms.max(0.0) / 1000.0).ceil() as u64
}

pub fn draw_hud<B: CueBackend>(draw: &Draw, bounds: Rect, session: &BreathingSession<B>) {
    let pattern = session.pattern();
    let phase = session.phase();

    // Phase label and countdown under the orb
    let (label, detail) = if phase == Phase::Idle {
        ("Press Space to begin".to_string(), pattern.description.clone())
    } else {
        (
            phase.label().to_string(),
            format!("{}", countdown_secs(session.remaining_ms())),
        )
    };

    draw.text(&label)
        .x_y(0.0, bounds.bottom() + 110.0)
        .w(bounds.w())
        .color(rgba(1.0, 1.0, 1.0, 0.9))
        .font_size(32);

    draw.text(&detail)
        .x_y(0.0, bounds.bottom() + 70.0)
        .w(bounds.w() - 40.0)
        .color(rgba(1.0, 1.0, 1.0, 0.6))
        .font_size(20);

    // Pattern and speed in the top-left corner
    let mute = if session.is_muted() { "  [muted]" } else { "" };
    let bpm = if session.speed() > 0.0 {
        pattern.breaths_per_minute() / session.speed()
    } else {
        0.0
    };
    let status = format!("{}  x{:.2}  {:.1} bpm{}", pattern.name, session.speed(), bpm, mute);
    draw.text(&status)
        .x_y(bounds.left() + 210.0, bounds.top() - 20.0)
        .w_h(400.0, 24.0)
        .left_justify()
        .color(rgba(1.0, 1.0, 1.0, 0.5))
        .font_size(16);

    if session.is_running() {
        draw.text(&format!("cycles: {}", session.cycles_completed()))
            .x_y(bounds.right() - 110.0, bounds.top() - 20.0)
            .w_h(200.0, 24.0)
            .right_justify()
            .color(rgba(1.0, 1.0, 1.0, 0.5))
            .font_size(16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_rounds_up() {
        assert_eq!(countdown_secs(4000.0), 4);
        assert_eq!(countdown_secs(3999.0), 4);
        assert_eq!(countdown_secs(1.0), 1);
        assert_eq!(countdown_secs(0.0), 0);
        assert_eq!(countdown_secs(-5.0), 0);
    }
}
