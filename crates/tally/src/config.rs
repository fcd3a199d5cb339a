//! Configuration for the whole pipeline.

use crate::error::Result;
use crate::stitch::StitchConfig;
use serde::{Deserialize, Serialize};
use tally_standard::StandardizerConfig;
use tally_statements::{NormalizerConfig, SelectorConfig, SplitConfig, StatementOptions};

/// Every tunable of parsing, building, standardizing and stitching.
///
/// Missing sections fall back to their defaults, so a JSON file only needs
/// the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sign and scale normalization
    pub normalizer: NormalizerConfig,
    /// Split detection
    pub splits: SplitConfig,
    /// Period selection thresholds
    pub selector: SelectorConfig,
    /// Statement options; cadence and column count come from the form type
    pub statements: StatementOptions,
    /// Canonical mapping
    pub standardizer: StandardizerConfig,
    /// Cross-filing merge
    pub stitch: StitchConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        self.selector.validate()?;
        Ok(())
    }
}
