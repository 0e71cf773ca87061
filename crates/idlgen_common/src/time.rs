//! Millisecond file timestamps.
//!
//! Staleness decisions compare modification times at millisecond
//! granularity, the resolution archive tools and most filesystems agree on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// `Millis::ZERO` stands for "no file" when taking the newest timestamp
/// of an empty set. Times before the epoch clamp to zero.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Millis(u64);

impl Millis {
    /// The epoch itself.
    pub const ZERO: Millis = Millis(0);

    /// Creates a timestamp from raw milliseconds.
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// Returns the raw millisecond count.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Adds a grace delta, saturating at `u64::MAX`.
    pub fn saturating_add(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Converts a `SystemTime` to milliseconds, clamping pre-epoch times.
    pub fn from_system_time(t: SystemTime) -> Self {
        let ms = t
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    /// Converts back to a `SystemTime`.
    pub fn to_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.0)
    }

    /// Returns the newest of `times`, or `ZERO` if empty.
    pub fn newest(times: impl IntoIterator<Item = Millis>) -> Self {
        times.into_iter().max().unwrap_or(Self::ZERO)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Millis({})", self.0)
    }
}

/// Reads the modification time of `path`.
pub fn modified_millis(path: &Path) -> io::Result<Millis> {
    let meta = std::fs::metadata(path)?;
    Ok(Millis::from_system_time(meta.modified()?))
}

/// Sets the modification time of an existing file.
pub fn set_modified_millis(path: &Path, time: Millis) -> io::Result<()> {
    let file = std::fs::File::options().write(true).open(path)?;
    file.set_modified(time.to_system_time())
}
