//! Reactive particle field.
//!
//! A fixed pool of drifting points that is pulled toward the center while
//! breathing in and pushed out while breathing out. Two scalars drive the
//! whole field: a radial speed and a drift speed, both eased toward
//! per-phase targets every frame so phase changes never jolt the motion.
//!
//! Coordinates are surface pixels with the origin at the top-left corner.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pattern::Rgb;
use crate::phase::Phase;

/// Number of particles in a freshly sized field
pub const DEFAULT_POPULATION: usize = 80;

/// Per-frame exponential smoothing factor toward the phase targets
pub const SMOOTHING: f32 = 0.05;

/// Opacity ceiling reached by fade-in
pub const MAX_ALPHA: f32 = 0.7;

/// Opacity added per frame while fading in
pub const FADE_STEP: f32 = 0.01;

/// Smoothed radial speed beyond which respawning replaces wrap-around
const STRONG_RADIAL: f32 = 1.0;

/// While breathing in, particles this close to the center are recycled
const CORE_RADIUS: f32 = 30.0;

/// While breathing out, recycled particles reappear within this radius
const CENTER_SPAWN_RADIUS: f32 = 50.0;

/// Per-particle drift speed range, per axis
const DRIFT_RANGE: std::ops::Range<f32> = -0.5..0.5;

/// Particle size range in pixels
const SIZE_RANGE: std::ops::Range<f32> = 1.0..3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Fixed random drift direction, drawn once at creation
    pub vx: f32,
    pub vy: f32,
    pub alpha: f32,
}

impl Particle {
    /// Fresh particle anywhere on a `width` x `height` surface
    pub fn spawn<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Self {
        Self {
            x: rng.random_range(0.0..width),
            y: rng.random_range(0.0..height),
            size: rng.random_range(SIZE_RANGE),
            vx: rng.random_range(DRIFT_RANGE),
            vy: rng.random_range(DRIFT_RANGE),
            alpha: rng.random_range(0.1..MAX_ALPHA),
        }
    }

    /// Draw color: pattern color with this particle's opacity
    pub fn rgba(&self, color: Rgb) -> [f32; 4] {
        let [r, g, b] = color.to_f32();
        [r, g, b, self.alpha]
    }
}

/// Target (radial, drift) speeds for a phase.
///
/// Only the radial target follows the session speed multiplier.
pub fn targets_for_phase(phase: Phase, speed_multiplier: f32) -> (f32, f32) {
    let (radial, drift) = match phase {
        p if p.is_inhale() => (-3.5, 0.5),
        p if p.is_hold() => (0.0, 0.6),
        Phase::Exhale => (1.2, 0.5),
        _ => (0.0, 0.3),
    };
    (radial * speed_multiplier, drift)
}

/// Snapshot shared by every particle within one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Smoothed radial speed (negative pulls inward)
    pub radial_speed: f32,
    /// Smoothed drift speed
    pub drift_speed: f32,
    pub width: f32,
    pub height: f32,
}

impl FrameParams {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// Random point on one of the four surface edges
pub fn random_edge_point<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> (f32, f32) {
    // 0=left, 1=right, 2=top, 3=bottom
    match rng.random_range(0..4) {
        0 => (0.0, rng.random_range(0.0..=height)),
        1 => (width, rng.random_range(0.0..=height)),
        2 => (rng.random_range(0.0..=width), 0.0),
        _ => (rng.random_range(0.0..=width), height),
    }
}

/// Advance one particle by one frame.
///
/// Moves along the radial and drift components, fades in, then applies the
/// boundary policy using the smoothed radial speed from `params`.
pub fn step_particle<R: Rng + ?Sized>(
    particle: Particle,
    params: &FrameParams,
    rng: &mut R,
) -> Particle {
    let mut p = particle;
    let (cx, cy) = params.center();

    let dx = p.x - cx;
    let dy = p.y - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if dist > 0.0 {
        (dx / dist, dy / dist)
    } else {
        (0.0, 0.0)
    };

    p.x += ux * params.radial_speed + p.vx * params.drift_speed;
    p.y += uy * params.radial_speed + p.vy * params.drift_speed;

    if p.alpha < MAX_ALPHA {
        p.alpha = (p.alpha + FADE_STEP).min(MAX_ALPHA);
    }

    let dist = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();

    if params.radial_speed < -STRONG_RADIAL && dist < CORE_RADIUS {
        let (x, y) = random_edge_point(params.width, params.height, rng);
        p.x = x;
        p.y = y;
        p.alpha = 0.0;
    } else if params.radial_speed > STRONG_RADIAL && !params.contains(p.x, p.y) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let radius = rng.random_range(0.0..CENTER_SPAWN_RADIUS);
        p.x = cx + radius * angle.cos();
        p.y = cy + radius * angle.sin();
        p.alpha = 0.0;
    } else {
        if p.x < 0.0 {
            p.x = params.width;
        } else if p.x > params.width {
            p.x = 0.0;
        }
        if p.y < 0.0 {
            p.y = params.height;
        } else if p.y > params.height {
            p.y = 0.0;
        }
    }

    p
}

/// The particle pool plus the two smoothed speeds driving it
pub struct ParticleField {
    particles: Vec<Particle>,
    population: usize,
    width: f32,
    height: f32,
    radial_speed: f32,
    drift_speed: f32,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(population: usize, width: f32, height: f32) -> Self {
        Self::with_rng(population, width, height, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic field for tests and reproducible runs
    pub fn with_seed(population: usize, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(population, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(population: usize, width: f32, height: f32, rng: StdRng) -> Self {
        let mut field = Self {
            particles: Vec::with_capacity(population),
            population,
            width: 0.0,
            height: 0.0,
            radial_speed: 0.0,
            drift_speed: targets_for_phase(Phase::Idle, 1.0).1,
            rng,
        };
        field.resize(width, height);
        field
    }

    /// Discard the pool and recreate it for the new surface size.
    ///
    /// A zero-sized surface keeps the old pool; frames are skipped until a
    /// usable size arrives.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;

        if !self.is_ready() {
            return;
        }

        let rng = &mut self.rng;
        self.particles = (0..self.population)
            .map(|_| Particle::spawn(width, height, &mut *rng))
            .collect();
    }

    /// Change the population; takes effect immediately by reseeding the pool
    pub fn set_population(&mut self, population: usize) {
        self.population = population;
        self.particles.clear();
        self.resize(self.width, self.height);
    }

    /// Whether the surface has a drawable size
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Ease both speeds toward the phase targets, then move every particle
    /// with the same snapshot.
    pub fn update(&mut self, phase: Phase, speed_multiplier: f32) {
        let (radial_target, drift_target) = targets_for_phase(phase, speed_multiplier);
        self.radial_speed += (radial_target - self.radial_speed) * SMOOTHING;
        self.drift_speed += (drift_target - self.drift_speed) * SMOOTHING;

        if !self.is_ready() {
            return;
        }

        let params = self.frame_params();
        for particle in self.particles.iter_mut() {
            *particle = step_particle(*particle, &params, &mut self.rng);
        }
    }

    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            radial_speed: self.radial_speed,
            drift_speed: self.drift_speed,
            width: self.width,
            height: self.height,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Current (radial, drift) smoothed speeds
    pub fn speeds(&self) -> (f32, f32) {
        (self.radial_speed, self.drift_speed)
    }
}
