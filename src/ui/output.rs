//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also show per-file details and resolved variables.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show warnings and errors only.
    Quiet,
}

impl OutputMode {
    /// Pick the mode from the global `--verbose`/`--quiet` flags.
    ///
    /// `--quiet` wins when both are given.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Per-file details and resolved variables.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Progress lines and successes; warnings and errors always show.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// `tracing` filter directive matching this mode.
    pub fn log_directive(&self) -> &'static str {
        match self {
            Self::Verbose | Self::Normal => "tsync=info",
            Self::Quiet => "tsync=warn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_flag_wins() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::Verbose);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Normal);
    }

    #[test]
    fn visibility_rules() {
        assert!(OutputMode::Verbose.shows_details());
        assert!(!OutputMode::Normal.shows_details());
        assert!(OutputMode::Normal.shows_status());
        assert!(!OutputMode::Quiet.shows_status());
    }

    #[test]
    fn quiet_logs_warnings_only() {
        assert_eq!(OutputMode::Quiet.log_directive(), "tsync=warn");
        assert_eq!(OutputMode::Normal.log_directive(), "tsync=info");
    }
}
