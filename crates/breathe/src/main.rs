mod audio;
mod renderer;
mod ui;
mod utils;

use audio::CpalCueBackend;
use breathe_core::{BreathingSession, ParticleField, PatternRegistry, SpeedRange, DEFAULT_MODE};
use nannou::prelude::*;
use renderer::{Renderer, Resolution};
use std::env;
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use ui::bindings::{parse_key, Action};
use ui::help_overlay::HelpOverlay;
use utils::{Args, Config, ScreensaverInhibitor};

const USAGE: &str = "usage: breathe [--windowed|-w] [--debug|-d] [--mode <id>] \
                     [--speed <x>] [--mute] [--list-patterns]";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    if args.list_patterns {
        list_patterns(&Config::load().registry());
        return;
    }

    nannou::app(model).update(update).run();
}

fn list_patterns(registry: &PatternRegistry) {
    for mode in registry.modes() {
        if let Some(pattern) = registry.get(mode) {
            println!(
                "{:<10} {:>4.1}-{:.1}-{:.1}-{:.1}-{:.1}  {}",
                mode,
                pattern.inhale_secs,
                pattern.inhale2_secs,
                pattern.hold_in_secs,
                pattern.exhale_secs,
                pattern.hold_out_secs,
                pattern.description
            );
        }
    }
}

struct Model {
    session: BreathingSession<CpalCueBackend>,
    field: ParticleField,
    registry: PatternRegistry,
    /// Registry key of the active pattern
    mode: String,
    speed_range: SpeedRange,
    config: Config,
    renderer: Renderer,
    help_overlay: HelpOverlay,
    screensaver: ScreensaverInhibitor,
}

fn model(app: &App) -> Model {
    // Parsed once in main already; failures exited there
    let args = Args::parse(env::args().skip(1)).unwrap_or_default();
    let resolution = Resolution::current(args.windowed);
    app.set_exit_on_escape(false);

    let mut win = app
        .new_window()
        .title("breathe")
        .view(view)
        .key_pressed(key_pressed)
        .resized(resized)
        .size(resolution.width, resolution.height)
        .min_size(320, 240);

    if resolution.fullscreen {
        win = win.fullscreen();
    }

    let window_id = match win.build() {
        Ok(id) => id,
        Err(e) => {
            error!("Could not open window: {:?}", e);
            process::exit(1);
        }
    };

    if resolution.fullscreen {
        if let Some(window) = app.window(window_id) {
            window.set_cursor_visible(false);
        }
    }

    let config = Config::load();
    let registry = config.registry();
    let speed_range = config.speed_range();

    let requested = args.mode.clone().unwrap_or_else(|| config.mode().to_string());
    let mode = if registry.contains(&requested) {
        requested
    } else {
        warn!("Unknown mode '{}', falling back to {}", requested, DEFAULT_MODE);
        DEFAULT_MODE.to_string()
    };

    let pattern = match registry.require(&mode) {
        Ok(pattern) => pattern,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let speed = speed_range.clamp(args.speed.unwrap_or_else(|| config.speed()));
    let mut session = BreathingSession::new(pattern, speed);
    session.set_muted(args.mute || config.muted());

    let bounds = app.window_rect();
    let field = ParticleField::new(config.particle_count(), bounds.w(), bounds.h());

    info!(
        "Loaded {} patterns, starting with {} at x{:.2}",
        registry.len(),
        mode,
        speed
    );

    let mut renderer = Renderer::new();
    if args.debug {
        renderer.toggle_debug_viz();
    }

    Model {
        session,
        field,
        registry,
        mode,
        speed_range,
        config,
        renderer,
        help_overlay: HelpOverlay::new(),
        // Inhibit screensaver in release mode only
        screensaver: ScreensaverInhibitor::new(!cfg!(debug_assertions)),
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    let delta_ms = update.since_last.as_secs_f64() * 1000.0;
    model.session.tick(delta_ms);
    model
        .field
        .update(model.session.phase(), model.session.speed() as f32);
    model.renderer.update(&model.session, &model.field);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();

    model
        .renderer
        .draw(&draw, bounds, &model.session, &model.field);

    if model.help_overlay.visible {
        model.help_overlay.draw(
            &draw,
            bounds,
            model.session.pattern().color,
            model.session.is_running(),
            model.session.is_muted(),
        );
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        error!("Frame render failed: {:?}", e);
    }
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.field.resize(size.x, size.y);
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match parse_key(key, model.help_overlay.visible) {
        Some(Action::Quit) => app.quit(),
        Some(Action::ShowHelp) => model.help_overlay.toggle(),
        Some(Action::HideHelp) => model.help_overlay.hide(),

        Some(Action::ToggleSession) => {
            if model.session.is_running() {
                model.session.stop();
                model.renderer.show_notification("Session stopped".to_string());
            } else {
                let backend =
                    CpalCueBackend::new(model.config.cue_dir(), model.config.cue_volume());
                model.session.start(backend);
                model
                    .renderer
                    .show_notification(format!("{} started", model.session.pattern().name));
            }
            model.screensaver.set_active(model.session.is_running());
        }
        Some(Action::SpeedUp) => change_speed(model, true),
        Some(Action::SpeedDown) => change_speed(model, false),
        Some(Action::NextPattern) => {
            let next = model.registry.next_mode(&model.mode).map(str::to_string);
            switch_pattern(model, next);
        }
        Some(Action::PrevPattern) => {
            let prev = model.registry.prev_mode(&model.mode).map(str::to_string);
            switch_pattern(model, prev);
        }
        Some(Action::ToggleMute) => {
            let muted = !model.session.is_muted();
            model.session.set_muted(muted);
            model.config.set_muted(muted);
            let status = if muted { "muted" } else { "on" };
            model
                .renderer
                .show_notification(format!("Audio cues: {}", status));
        }
        Some(Action::ToggleDebugViz) => model.renderer.toggle_debug_viz(),

        None => {} // Unhandled key
    }
}

fn change_speed(model: &mut Model, up: bool) {
    let current = model.session.speed();
    let speed = if up {
        model.speed_range.step_up(current)
    } else {
        model.speed_range.step_down(current)
    };
    if speed == current {
        return;
    }

    model.session.set_speed(speed);
    model.config.set_speed(speed);
    model
        .renderer
        .show_notification(format!("Speed x{:.2}", speed));
}

fn switch_pattern(model: &mut Model, mode: Option<String>) {
    let Some(mode) = mode else {
        return;
    };
    let Some(pattern) = model.registry.get(&mode) else {
        return;
    };

    let label = if pattern.description.is_empty() {
        pattern.name.clone()
    } else {
        format!("{}: {}", pattern.name, pattern.description)
    };

    model.session.set_pattern(pattern);
    model.config.set_mode(&mode);
    model.mode = mode;
    model.renderer.show_notification(label);
}
