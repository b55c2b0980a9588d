mod args;
mod config;
mod screensaver;

pub use args::Args;
pub use config::Config;
pub use screensaver::ScreensaverInhibitor;
