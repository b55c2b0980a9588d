//! Keeps the display awake while a breathing session runs.

#[cfg(target_os = "linux")]
mod platform {
    use std::process::{Child, Command, Stdio};
    use tracing::{debug, info};

    /// Holds a `systemd-inhibit` child for as long as it lives.
    pub struct Inhibit {
        child: Child,
    }

    impl Inhibit {
        pub fn acquire() -> Option<Self> {
            let child = Command::new("systemd-inhibit")
                .args([
                    "--what=idle",
                    "--who=breathe",
                    "--why=Guided breathing session",
                    "--mode=block",
                    "sleep",
                    "infinity",
                ])
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            match child {
                Ok(child) => {
                    info!("Screensaver inhibited via systemd-inhibit");
                    Some(Self { child })
                }
                Err(e) => {
                    debug!("systemd-inhibit unavailable: {}", e);
                    None
                }
            }
        }
    }

    impl Drop for Inhibit {
        fn drop(&mut self) {
            let _ = self.child.kill();
            let _ = self.child.wait();
            info!("Screensaver released");
        }
    }
}

#[cfg(windows)]
mod platform {
    use tracing::info;
    use windows::Win32::System::Power::{
        SetThreadExecutionState, ES_CONTINUOUS, ES_DISPLAY_REQUIRED,
    };

    pub struct Inhibit;

    impl Inhibit {
        pub fn acquire() -> Option<Self> {
            unsafe {
                SetThreadExecutionState(ES_CONTINUOUS | ES_DISPLAY_REQUIRED);
            }
            info!("Screensaver inhibited via SetThreadExecutionState");
            Some(Self)
        }
    }

    impl Drop for Inhibit {
        fn drop(&mut self) {
            unsafe {
                SetThreadExecutionState(ES_CONTINUOUS);
            }
            info!("Screensaver released");
        }
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
mod platform {
    pub struct Inhibit;

    impl Inhibit {
        pub fn acquire() -> Option<Self> {
            None
        }
    }
}

/// Screensaver inhibition that follows the session's running state.
pub struct ScreensaverInhibitor {
    held: Option<platform::Inhibit>,
    /// Disabled in debug builds so development runs don't pin the display
    enabled: bool,
}

impl ScreensaverInhibitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            held: None,
            enabled,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match (active && self.enabled, self.held.is_some()) {
            (true, false) => self.held = platform::Inhibit::acquire(),
            (false, true) => self.held = None,
            _ => {}
        }
    }
}
