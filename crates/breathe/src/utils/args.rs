//! Command-line flags.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ArgError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("invalid speed {0:?}")]
    InvalidSpeed(String),

    #[error("unknown argument {0:?}")]
    Unknown(String),
}

#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub windowed: bool,
    pub debug: bool,
    pub mute: bool,
    pub list_patterns: bool,
    pub mode: Option<String>,
    pub speed: Option<f64>,
}

impl Args {
    /// Parse everything after the program name
    pub fn parse<I, S>(args: I) -> Result<Self, ArgError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut iter = args.into_iter().map(Into::into);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--windowed" | "-w" => parsed.windowed = true,
                "--debug" | "-d" => parsed.debug = true,
                "--mute" => parsed.mute = true,
                "--list-patterns" => parsed.list_patterns = true,
                "--mode" => {
                    parsed.mode = Some(iter.next().ok_or(ArgError::MissingValue("--mode"))?);
                }
                "--speed" => {
                    let value = iter.next().ok_or(ArgError::MissingValue("--speed"))?;
                    let speed = value
                        .parse::<f64>()
                        .ok()
                        .filter(|s| s.is_finite() && *s > 0.0)
                        .ok_or(ArgError::InvalidSpeed(value))?;
                    parsed.speed = Some(speed);
                }
                _ => return Err(ArgError::Unknown(arg)),
            }
        }

        Ok(parsed)
    }
}
