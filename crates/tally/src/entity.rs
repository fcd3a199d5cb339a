//! All filings of one company, restated for every known split and stitched.

use crate::config::Config;
use crate::error::{Result, TallyError};
use crate::filing::Filing;
use crate::stitch::{StitchInput, Stitched, Stitcher};
use tally_statements::periods::ttm;
use tally_statements::{Cadence, FactTable, SplitDetection, Statement};
use tally_xbrl::StatementKind;

/// Filings of one entity.
///
/// Splits found in any filing are merged and applied to every filing, so an
/// old report's per-share values line up with the restated comparatives of
/// newer ones.
#[derive(Debug, Clone)]
pub struct Entity {
    id: String,
    filings: Vec<Filing>,
    splits: SplitDetection,
    config: Config,
}

impl Entity {
    /// Groups filings and restates them for every split any of them reports.
    ///
    /// Fails when `filings` is empty or mixes entities. Filings are kept
    /// newest first.
    pub fn new(mut filings: Vec<Filing>) -> Result<Self> {
        let first = filings.first().ok_or(TallyError::NoFilings)?;
        let id = first.entity().to_string();
        let config = first.config().clone();
        if let Some(other) = filings.iter().find(|f| f.entity() != id) {
            return Err(TallyError::MixedEntities {
                expected: id,
                found: other.entity().to_string(),
                accession: other.accession().to_string(),
            });
        }

        filings.sort_by(|a, b| {
            b.filing_date()
                .cmp(&a.filing_date())
                .then_with(|| b.accession().cmp(a.accession()))
        });
        let splits = SplitDetection::merge(filings.iter().map(Filing::detected_splits));
        for filing in &mut filings {
            if filing.applied_splits() != &splits {
                filing.apply_splits(&splits);
            }
        }

        tracing::info!(
            entity = %id,
            filings = filings.len(),
            splits = splits.events.len(),
            ambiguous = splits.ambiguous_dates.len(),
            "assembled entity"
        );
        Ok(Self {
            id,
            filings,
            splits,
            config,
        })
    }

    /// Entity identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Filings, newest first.
    pub fn filings(&self) -> &[Filing] {
        &self.filings
    }

    /// Filing by accession number.
    pub fn filing(&self, accession: &str) -> Option<&Filing> {
        self.filings.iter().find(|f| f.accession() == accession)
    }

    /// Splits applied to every filing.
    pub const fn splits(&self) -> &SplitDetection {
        &self.splits
    }

    /// Stitches `kind` at `cadence` across the filings that present it.
    ///
    /// Annual statements come from annual forms and quarterly statements from
    /// quarterly forms; trailing-twelve-month statements use every filing.
    /// Quarterly flow statements also take the fourth quarters an annual
    /// report yields against the nine-month YTD of the quarterly reports.
    pub fn stitch(&self, kind: StatementKind, cadence: Cadence) -> Stitched {
        let mut built: Vec<(&Filing, Statement)> = self
            .filings
            .iter()
            .filter(|f| cadence == Cadence::Ttm || f.form().strategy().cadence == cadence)
            .map(|f| (f, f.statement_at(kind, cadence)))
            .collect();
        if cadence == Cadence::Quarterly && !kind.uses_instants() {
            built.extend(self.fourth_quarter_statements(kind));
        }
        let inputs: Vec<StitchInput<'_>> = built
            .iter()
            .map(|(filing, statement)| filing.stitch_input(statement))
            .collect();
        Stitcher::new(self.config.selector.clone(), self.config.stitch.clone()).stitch(kind, &inputs)
    }

    /// Quarterly statements of annual reports, holding only the fourth
    /// quarters derived across filings.
    fn fourth_quarter_statements(&self, kind: StatementKind) -> Vec<(&Filing, Statement)> {
        let interim: Vec<&FactTable> = self
            .filings
            .iter()
            .filter(|f| f.form().strategy().cadence == Cadence::Quarterly)
            .map(Filing::facts)
            .collect();
        self.filings
            .iter()
            .filter(|f| f.form().strategy().cadence == Cadence::Annual)
            .filter_map(|filing| {
                let quarters = ttm::derive_fourth_quarters_across(filing.facts(), interim.iter().copied());
                if quarters.is_empty() {
                    return None;
                }
                tracing::debug!(
                    accession = filing.accession(),
                    facts = quarters.len(),
                    "derived fourth quarters across filings"
                );
                let statement = filing.statement_with(kind, Cadence::Quarterly, quarters);
                (!statement.periods.is_empty()).then_some((filing, statement))
            })
            .collect()
    }

    /// Annual statements across all annual reports.
    pub fn annual(&self, kind: StatementKind) -> Stitched {
        self.stitch(kind, Cadence::Annual)
    }

    /// Quarterly statements across all quarterly reports, with fourth
    /// quarters derived from the annual reports.
    pub fn quarterly(&self, kind: StatementKind) -> Stitched {
        self.stitch(kind, Cadence::Quarterly)
    }
}
