//! The breathing orb.

use breathe_core::Rgb;
use nannou::prelude::*;

/// Orb radius at scale 0, as a fraction of the half-extent
const MIN_RADIUS: f32 = 0.18;
/// Orb radius at scale 1, as a fraction of the half-extent
const MAX_RADIUS: f32 = 0.7;
const GLOW_LAYERS: usize = 10;

pub fn orb_radius(bounds: Rect, scale: f32) -> f32 {
    let half = bounds.w().min(bounds.h()) / 2.0;
    let scale = scale.clamp(0.0, 1.0);
    half * (MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * scale)
}

pub fn draw_orb(draw: &Draw, bounds: Rect, scale: f32, color: Rgb) {
    let center = bounds.xy();
    let radius = orb_radius(bounds, scale);
    let [r, g, b] = color.to_f32();

    // Soft halo, outermost first
    for i in 0..GLOW_LAYERS {
        let t = i as f32 / GLOW_LAYERS as f32;
        let layer_radius = radius * (1.6 - t * 0.6);
        let alpha = 0.02 + t * 0.04;
        draw.ellipse()
            .xy(center)
            .radius(layer_radius)
            .color(rgba(r, g, b, alpha));
    }

    draw.ellipse()
        .xy(center)
        .radius(radius)
        .color(rgba(r, g, b, 0.35 + scale * 0.35));

    draw.ellipse()
        .xy(center)
        .radius(radius)
        .no_fill()
        .stroke(rgba(r, g, b, 0.9))
        .stroke_weight(2.0);
}
