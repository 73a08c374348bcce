use std::str::FromStr;

/// How much diagnostic output the engine prints.
///
/// Levels are ordered; each includes all effects of the lower levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output at all, including the final summary.
    Silent = 0,
    /// Compact per-test OK/FAIL lines. The default.
    Status = 1,
    /// Also print a "GO" line before each test starts.
    Begin = 2,
    /// Also print full failure detail (file, line, description) for
    /// failed assertions.
    Failure = 3,
    /// Also echo captured stdout for every test, passing or not.
    Stdout = 4,
    /// Also echo captured stderr for every test, passing or not.
    Stderr = 5,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Status
    }
}

impl Verbosity {
    /// Convert a raw level as given on the command line.
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            0 => Some(Verbosity::Silent),
            1 => Some(Verbosity::Status),
            2 => Some(Verbosity::Begin),
            3 => Some(Verbosity::Failure),
            4 => Some(Verbosity::Stdout),
            5 => Some(Verbosity::Stderr),
            _ => None,
        }
    }
}

impl FromStr for Verbosity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: i32 = s.parse()?;
        Self::from_level(level).ok_or_else(|| {
            anyhow::anyhow!("verbosity level must lie within 0..=5 (was {})", level)
        })
    }
}
