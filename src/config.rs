use anyhow::{Result, ensure};

/// Tuning knobs for the suggestion engine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Maximum number of suggestions promoted into the displayed view.
    pub max_promoted: usize,
    /// Maximum number of suggestions requested from each corpus.
    pub max_results_per_corpus: usize,
    /// Number of promoted slots reserved for shortcut-cache entries.
    pub max_promoted_shortcuts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_promoted: 8,
            max_results_per_corpus: 50,
            max_promoted_shortcuts: 2,
        }
    }
}

impl Config {
    /// Check that the configured limits are usable.
    ///
    /// # Errors
    ///
    /// Returns an error when any cap is zero or the shortcut reservation
    /// exceeds the promoted cap.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_promoted > 0, "max-promoted must be greater than zero");
        ensure!(
            self.max_results_per_corpus > 0,
            "max-results-per-corpus must be greater than zero"
        );
        ensure!(
            self.max_promoted_shortcuts <= self.max_promoted,
            "max-promoted-shortcuts must not exceed max-promoted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_caps() {
        let config = Config {
            max_promoted: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_shortcut_reservation() {
        let config = Config {
            max_promoted: 2,
            max_promoted_shortcuts: 3,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
