//! Sign and scale normalization.
//!
//! Calculation weights give a roll-up-consistent sign, but filers disagree on
//! weights for economically identical expense lines. Those categories are
//! pinned to the reported positive convention, except for a second list that
//! keeps the weight-derived sign regardless. Scaling touches monetary values
//! only, decided from unit and name tables.

use crate::config::NormalizerConfig;
use crate::facts::{FactOrigin, FactTable, NormalizedFact, ValueKind};
use chrono::NaiveDate;
use tally_xbrl::{Decimals, Fact, Instance, Taxonomy, Unit};

/// Name fragments of expense categories pinned to a positive sign.
pub const POSITIVE_PINNED: &[&str] = &[
    "ResearchAndDevelopment",
    "SellingGeneralAndAdministrative",
    "GeneralAndAdministrative",
    "SellingAndMarketing",
    "MarketingExpense",
    "SellingExpense",
    "AdvertisingExpense",
    "ShareBasedCompensation",
    "AllocatedShareBasedCompensation",
    "DepreciationDepletionAndAmortization",
    "DepreciationAndAmortization",
    "AmortizationOfIntangibleAssets",
    "RestructuringCharges",
];

/// Name fragments that keep the weight-derived sign even when pinned.
pub const PIN_EXEMPT: &[&str] = &[
    "IncomeTaxExpenseBenefit",
    "IncomeTaxBenefit",
    "DeferredIncomeTax",
    "ForeignCurrencyTransactionGainLoss",
    "ForeignCurrencyGainLoss",
    "EffectOfExchangeRate",
    "RepaymentsOf",
    "PaymentsForRepurchase",
    "PaymentsOfDividends",
    "PaymentsOfFinancingCosts",
    "PaymentsRelatedToTaxWithholdingForShareBasedCompensation",
];

/// Name fragments of per-share and price concepts.
pub const PER_SHARE_NAMES: &[&str] = &[
    "PerShare",
    "PerUnit",
    "SharePrice",
    "StockPrice",
    "ExercisePrice",
    "SalePriceOfStock",
    "PerDilutedShare",
    "PerBasicShare",
];

/// Name fragments of share-count concepts.
pub const SHARE_COUNT_NAMES: &[&str] = &[
    "NumberOfShares",
    "SharesOutstanding",
    "SharesIssued",
    "WeightedAverageNumberOf",
    "SharesAuthorized",
    "StockRepurchasedDuringPeriodShares",
    "TreasuryStockShares",
];

/// Name fragments of dimensionless concepts.
pub const PURE_NAMES: &[&str] = &["Percentage", "Rate", "Ratio"];

/// Classifies a numeric fact, unit table first, then name table.
pub fn classify(name: &str, unit: Option<&Unit>) -> ValueKind {
    if let Some(unit) = unit {
        if unit.is_per_share() {
            return ValueKind::PerShare;
        }
        if unit.is_shares() {
            return ValueKind::Shares;
        }
        if unit.is_pure() {
            return ValueKind::Pure;
        }
        if unit.is_monetary() {
            return if PER_SHARE_NAMES.iter().any(|p| name.contains(p)) {
                ValueKind::PerShare
            } else {
                ValueKind::Monetary
            };
        }
    }
    if PER_SHARE_NAMES.iter().any(|p| name.contains(p)) {
        ValueKind::PerShare
    } else if SHARE_COUNT_NAMES.iter().any(|p| name.contains(p)) {
        ValueKind::Shares
    } else if PURE_NAMES.iter().any(|p| name.ends_with(p)) {
        ValueKind::Pure
    } else {
        ValueKind::Other
    }
}

/// Returns true if the concept keeps a positive sign regardless of weight.
pub fn is_positive_pinned(name: &str) -> bool {
    !PIN_EXEMPT.iter().any(|p| name.contains(p))
        && POSITIVE_PINNED.iter().any(|p| name.contains(p))
}

/// Applies calculation weights, sign pins and presentation scale.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Creates a normalizer with the given configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes every numeric fact of an instance.
    ///
    /// Text and nil facts are not carried over. The raw facts are untouched.
    pub fn normalize(
        &self,
        instance: &Instance,
        taxonomy: &Taxonomy,
        filing_date: Option<NaiveDate>,
    ) -> FactTable {
        let facts: Vec<NormalizedFact> = instance
            .facts()
            .iter()
            .filter_map(|fact| self.normalize_fact(fact, taxonomy, filing_date))
            .collect();
        tracing::debug!(
            facts = facts.len(),
            scale = %self.config.scale,
            "normalized facts"
        );
        FactTable::new(facts)
    }

    fn normalize_fact(
        &self,
        fact: &Fact,
        taxonomy: &Taxonomy,
        filing_date: Option<NaiveDate>,
    ) -> Option<NormalizedFact> {
        let reported = fact.numeric()?;
        let name = fact.concept.name.as_str();
        let kind = classify(name, fact.unit.as_ref());

        let weight = taxonomy.calculation_weight(&fact.concept);
        let preferred_sign: i8 = match weight {
            Some(w) if self.config.apply_weights && w < 0.0 && !is_positive_pinned(name) => -1,
            _ => 1,
        };

        let scaled = if kind.is_scaled() {
            reported / self.config.scale.divisor()
        } else {
            reported
        };

        Some(NormalizedFact {
            source_index: fact.index,
            concept: fact.concept.clone(),
            entity: fact.entity.clone(),
            period: fact.period,
            dimensions: fact.dimensions.clone(),
            unit: fact.unit.as_ref().map(Unit::measure),
            value: scaled * f64::from(preferred_sign),
            reported: scaled,
            weight,
            preferred_sign,
            kind,
            balance: taxonomy.concept(&fact.concept).and_then(|c| c.balance()),
            decimals: match fact.decimals {
                Some(Decimals::Places(p)) => Some(p),
                _ => None,
            },
            origin: FactOrigin::Reported,
            split_factor: 1.0,
            filing_date,
        })
    }
}
