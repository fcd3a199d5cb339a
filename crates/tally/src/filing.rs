//! One filing, from taxonomy and instance bytes to standardized statements.

use crate::config::Config;
use crate::error::Result;
use crate::form::{FormType, StatementStrategy};
use crate::stitch::StitchInput;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tally_standard::Standardizer;
use tally_statements::periods::ttm;
use tally_statements::{
    BuildContext, Cadence, CorporateActionAdjuster, FactTable, FiscalCalendar, NormalizedFact,
    Normalizer, PeriodSelector, SplitDetection, Statement, StatementBuilder, StatementOptions,
};
use tally_xbrl::{Diagnostics, DocumentInfo, Instance, StatementKind, Taxonomy, TaxonomyBundle, TaxonomyCache};

/// Inputs describing one filing.
#[derive(Debug, Clone)]
pub struct FilingSource<'a> {
    /// Schema and linkbases
    pub taxonomy: &'a TaxonomyBundle,
    /// Instance document bytes
    pub instance: &'a [u8],
    /// Accession number; opaque, used for ordering ties and provenance
    pub accession: String,
    /// Date the filing was accepted
    pub filing_date: NaiveDate,
    /// Form type; read from the document when `None`
    pub form: Option<FormType>,
    /// Document period end; read from the document when `None`
    pub document_period_end: Option<NaiveDate>,
}

/// A parsed filing with its four statements.
///
/// Facts are kept both as normalized and as split-adjusted, so the filing can
/// be restated when splits reported by later filings of the same entity
/// become known.
#[derive(Debug, Clone)]
pub struct Filing {
    accession: String,
    form: FormType,
    filing_date: NaiveDate,
    entity: String,
    document_info: DocumentInfo,
    document_period_end: Option<NaiveDate>,
    taxonomy: Arc<Taxonomy>,
    diagnostics: Diagnostics,
    calendar: FiscalCalendar,
    normalized: FactTable,
    facts: FactTable,
    detected: SplitDetection,
    applied: SplitDetection,
    statements: Vec<Statement>,
    config: Config,
}

/// The entity identifier reported by most facts.
fn dominant_entity(facts: &FactTable) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for fact in facts.facts() {
        *counts.entry(fact.entity.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(entity, _)| entity.to_string())
}

impl Filing {
    /// Parses a filing and builds its statements.
    ///
    /// The taxonomy comes from `cache` when an identical bundle was parsed
    /// before. Only a missing schema or an instance without facts fails;
    /// everything else is recorded in diagnostics and statement warnings.
    pub fn parse(source: &FilingSource<'_>, config: &Config, cache: &TaxonomyCache) -> Result<Self> {
        let taxonomy = cache.get_or_parse(source.taxonomy)?;
        let instance = Instance::parse(source.instance, &taxonomy)?;
        let info = instance.document_info().clone();

        let form = source
            .form
            .clone()
            .or_else(|| info.document_type.as_deref().map(FormType::parse))
            .unwrap_or(FormType::TenK);
        let document_period_end = source.document_period_end.or(info.period_end);

        let normalized = Normalizer::new(config.normalizer.clone()).normalize(
            &instance,
            &taxonomy,
            Some(source.filing_date),
        );
        let detected = CorporateActionAdjuster::new(config.splits.clone())
            .detect(&normalized, Some(source.filing_date));
        let calendar = FiscalCalendar::detect(&info, &normalized);
        let entity = info
            .cik
            .clone()
            .or_else(|| dominant_entity(&normalized))
            .unwrap_or_default();

        tracing::debug!(
            accession = %source.accession,
            %form,
            %entity,
            facts = normalized.len(),
            issues = taxonomy.diagnostics().issues.len() + instance.diagnostics().issues.len(),
            "parsed filing"
        );

        let mut diagnostics = taxonomy.diagnostics().clone();
        diagnostics.extend(instance.diagnostics().clone());

        let mut filing = Self {
            accession: source.accession.clone(),
            form,
            filing_date: source.filing_date,
            entity,
            document_info: info,
            document_period_end,
            taxonomy,
            diagnostics,
            calendar,
            normalized,
            facts: FactTable::default(),
            detected: detected.clone(),
            applied: SplitDetection::default(),
            statements: Vec::new(),
            config: config.clone(),
        };
        filing.apply_splits(&detected);
        Ok(filing)
    }

    /// Restates the filing for `splits` and rebuilds its statements.
    ///
    /// Adjustment always starts from the normalized facts, so calling this
    /// again with a wider set of splits never compounds an earlier one.
    pub fn apply_splits(&mut self, splits: &SplitDetection) {
        let mut facts = self.normalized.clone();
        CorporateActionAdjuster::new(self.config.splits.clone()).adjust(&mut facts, splits);
        let quarters = ttm::derive_fourth_quarters(&facts);
        facts.extend(quarters);
        let trailing = ttm::derive_trailing_twelve_months(&facts);
        facts.extend(trailing);

        self.facts = facts;
        self.applied = splits.clone();
        let strategy = self.form.strategy();
        self.statements = StatementKind::ALL
            .iter()
            .map(|kind| self.build(*kind, &strategy.options(*kind, &self.config.statements)))
            .collect();
    }

    /// Builds and standardizes one statement with explicit options.
    pub fn build(&self, kind: StatementKind, options: &StatementOptions) -> Statement {
        self.build_over(&self.facts, kind, options)
    }

    /// Builds one statement at `cadence` over this filing's facts plus
    /// `extra` facts derived from other filings of the entity.
    pub fn statement_with(&self, kind: StatementKind, cadence: Cadence, extra: Vec<NormalizedFact>) -> Statement {
        let options = StatementStrategy::for_cadence(cadence).options(kind, &self.config.statements);
        if extra.is_empty() {
            return self.build(kind, &options);
        }
        let mut facts = self.facts.clone();
        facts.extend(extra);
        self.build_over(&facts, kind, &options)
    }

    fn build_over(&self, facts: &FactTable, kind: StatementKind, options: &StatementOptions) -> Statement {
        let ctx = BuildContext {
            taxonomy: &self.taxonomy,
            facts,
            calendar: &self.calendar,
            document_period_end: self.document_period_end,
        };
        let builder = StatementBuilder::new(PeriodSelector::new(self.config.selector.clone()));
        let mut statement = builder.build(&ctx, kind, options);
        Standardizer::new(self.config.standardizer.clone()).standardize(&mut statement);
        for warning in &self.applied.warnings {
            if !statement.warnings.contains(warning) {
                statement.warnings.push(warning.clone());
            }
        }
        statement
    }

    /// Builds one statement at `cadence` with that cadence's default layout.
    pub fn statement_at(&self, kind: StatementKind, cadence: Cadence) -> Statement {
        let options = StatementStrategy::for_cadence(cadence).options(kind, &self.config.statements);
        self.build(kind, &options)
    }

    /// The statement of `kind` in the form's own layout.
    pub fn statement(&self, kind: StatementKind) -> Option<&Statement> {
        self.statements.iter().find(|s| s.kind == kind)
    }

    /// All four statements in presentation order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Pairs `statement` with this filing's identity for stitching.
    pub fn stitch_input<'a>(&'a self, statement: &'a Statement) -> StitchInput<'a> {
        StitchInput {
            statement,
            entity: &self.entity,
            filing_date: self.filing_date,
            accession: &self.accession,
        }
    }

    /// Accession number.
    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Form type.
    pub const fn form(&self) -> &FormType {
        &self.form
    }

    /// Filing date.
    pub const fn filing_date(&self) -> NaiveDate {
        self.filing_date
    }

    /// Entity identifier (CIK when the cover page reports one).
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Cover-page information.
    pub const fn document_info(&self) -> &DocumentInfo {
        &self.document_info
    }

    /// Document period end used to exclude later periods.
    pub const fn document_period_end(&self) -> Option<NaiveDate> {
        self.document_period_end
    }

    /// The filing's taxonomy.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Non-fatal problems found while parsing.
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Fiscal calendar of the filer.
    pub const fn calendar(&self) -> &FiscalCalendar {
        &self.calendar
    }

    /// Split-adjusted facts with derived quarters and trailing years.
    pub const fn facts(&self) -> &FactTable {
        &self.facts
    }

    /// Splits found in this filing alone.
    pub const fn detected_splits(&self) -> &SplitDetection {
        &self.detected
    }

    /// Splits the facts are currently adjusted for.
    pub const fn applied_splits(&self) -> &SplitDetection {
        &self.applied
    }

    /// Configuration the filing was parsed with.
    pub const fn config(&self) -> &Config {
        &self.config
    }
}
