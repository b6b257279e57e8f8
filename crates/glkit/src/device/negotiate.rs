use std::fmt::{self, Display, Write as _};

use crate::config::GlVersion;

/// Failures while choosing a monitor or creating the GL context.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ContextError {
    #[error("no OpenGL versions were requested")]
    NoVersions,

    #[error("failed to create window:\n{}", format_attempts(.attempts))]
    Exhausted { attempts: Vec<VersionAttempt> },

    #[error("invalid monitor {screen}, please select from the following:\n{choices}")]
    InvalidMonitor { screen: usize, choices: String },
}

/// One rejected context version and the driver's reason.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VersionAttempt {
    pub version: GlVersion,
    pub reason: String,
}

impl Display for VersionAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trying to set GL version {}: {}", self.version, self.reason)
    }
}

fn format_attempts(attempts: &[VersionAttempt]) -> String {
    let mut out = String::new();
    for attempt in attempts {
        let _ = writeln!(out, "{attempt}");
    }
    out
}

/// Tries `create` for each version in order and returns the first success.
pub fn negotiate<T, E, F>(versions: &[GlVersion], mut create: F) -> Result<(GlVersion, T), ContextError>
where
    E: Display,
    F: FnMut(GlVersion) -> Result<T, E>,
{
    if versions.is_empty() {
        return Err(ContextError::NoVersions);
    }

    let mut attempts = Vec::new();
    for &version in versions {
        match create(version) {
            Ok(value) => {
                log::debug!("created OpenGL {version} context");
                return Ok((version, value));
            }
            Err(err) => {
                log::debug!("OpenGL {version} context rejected: {err}");
                attempts.push(VersionAttempt {
                    version,
                    reason: err.to_string(),
                });
            }
        }
    }

    Err(ContextError::Exhausted { attempts })
}

/// Picks the monitor for `screen` (1-based; 0 means windowed).
pub fn select_monitor<T>(
    monitors: Vec<(Option<String>, T)>,
    screen: usize,
) -> Result<Option<T>, ContextError> {
    if screen == 0 {
        return Ok(None);
    }

    let count = monitors.len();
    if screen > count {
        let mut choices = String::from("0 - windowed mode\n");
        for (i, (name, _)) in monitors.iter().enumerate() {
            let _ = writeln!(choices, "{} - {}", i + 1, name.as_deref().unwrap_or("unnamed"));
        }
        return Err(ContextError::InvalidMonitor { screen, choices });
    }

    Ok(monitors.into_iter().nth(screen - 1).map(|(_, monitor)| monitor))
}
