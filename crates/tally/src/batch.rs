//! Parallel parsing of many filings.

use crate::config::Config;
use crate::entity::Entity;
use crate::error::{Result, TallyError};
use crate::filing::{Filing, FilingSource};
use rayon::prelude::*;
use tally_xbrl::TaxonomyCache;

/// A filing that could not be parsed.
#[derive(Debug)]
pub struct BatchFailure {
    /// Accession number of the filing
    pub accession: String,
    /// Why it failed
    pub error: TallyError,
}

/// Result of parsing a batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Parsed filings, in input order
    pub filings: Vec<Filing>,
    /// Filings that failed, in input order
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Groups the parsed filings into an entity; failures are dropped.
    pub fn into_entity(self) -> Result<Entity> {
        Entity::new(self.filings)
    }
}

/// Parses every source on the rayon pool.
///
/// Filings are independent; they share only the taxonomy cache. One bad
/// filing does not stop the others.
pub fn parse_filings(sources: &[FilingSource<'_>], config: &Config, cache: &TaxonomyCache) -> BatchOutcome {
    let results: Vec<Result<Filing>> = sources
        .par_iter()
        .map(|source| Filing::parse(source, config, cache))
        .collect();

    let mut outcome = BatchOutcome::default();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(filing) => outcome.filings.push(filing),
            Err(error) => {
                tracing::warn!(accession = %source.accession, %error, "failed to parse filing");
                outcome.failures.push(BatchFailure {
                    accession: source.accession.clone(),
                    error,
                });
            }
        }
    }
    tracing::info!(
        parsed = outcome.filings.len(),
        failed = outcome.failures.len(),
        cached_taxonomies = cache.len(),
        "parsed filing batch"
    );
    outcome
}
