use breathe_core::{ParticleField, Rgb};
use nannou::prelude::*;

/// Field coordinates have a top-left origin; nannou is centered, y up.
pub fn to_screen(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    vec2(x - width / 2.0, height / 2.0 - y)
}

pub fn draw_field(draw: &Draw, field: &ParticleField, color: Rgb) {
    let (width, height) = field.size();

    for particle in field.particles() {
        let [r, g, b, a] = particle.rgba(color);
        if a <= 0.0 {
            continue;
        }
        draw.ellipse()
            .xy(to_screen(particle.x, particle.y, width, height))
            .w_h(particle.size * 2.0, particle.size * 2.0)
            .color(rgba(r, g, b, a));
    }
}
