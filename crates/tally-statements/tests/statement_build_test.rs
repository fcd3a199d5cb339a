//! Integration tests for building statements from parsed filings

use approx::assert_relative_eq;
use chrono::NaiveDate;
use std::collections::HashSet;
use tally_statements::periods::ttm;
use tally_statements::{
    BuildContext, Cadence, Confidence, CorporateActionAdjuster, FactOrigin, FactTable,
    FiscalCalendar, Normalizer, PeriodSelector, SelectorConfig, Statement, StatementBuilder,
    StatementOptions,
};
use tally_xbrl::{Instance, StatementKind, Taxonomy, TaxonomyBundle};

const SCHEMA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:xbrli="http://www.xbrl.org/2003/instance"
           xmlns:link="http://www.xbrl.org/2003/linkbase"
           xmlns:acme="http://acme.com/20241231"
           targetNamespace="http://acme.com/20241231">
  <xs:annotation><xs:appinfo>
    <link:roleType roleURI="http://acme.com/role/BalanceSheets" id="Role2">
      <link:definition>0000002 - Statement - Consolidated Balance Sheets</link:definition>
    </link:roleType>
    <link:roleType roleURI="http://acme.com/role/Operations" id="Role4">
      <link:definition>0000004 - Statement - Consolidated Statements of Operations</link:definition>
    </link:roleType>
    <link:roleType roleURI="http://acme.com/role/Equity" id="Role6">
      <link:definition>0000006 - Statement - Consolidated Statements of Stockholders Equity</link:definition>
    </link:roleType>
  </xs:appinfo></xs:annotation>
  <xs:element id="us-gaap_CashAndCashEquivalentsAtCarryingValue" name="CashAndCashEquivalentsAtCarryingValue" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="debit" xbrli:periodType="instant"/>
  <xs:element id="us-gaap_AccountsReceivableNetCurrent" name="AccountsReceivableNetCurrent" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="debit" xbrli:periodType="instant"/>
  <xs:element id="us-gaap_Assets" name="Assets" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="debit" xbrli:periodType="instant"/>
  <xs:element id="us-gaap_Liabilities" name="Liabilities" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="instant"/>
  <xs:element id="us-gaap_StockholdersEquity" name="StockholdersEquity" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="instant"/>
  <xs:element id="us-gaap_LiabilitiesAndStockholdersEquity" name="LiabilitiesAndStockholdersEquity" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="instant"/>
  <xs:element id="us-gaap_Revenues" name="Revenues" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_CostOfRevenue" name="CostOfRevenue" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="debit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_GrossProfit" name="GrossProfit" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_ResearchAndDevelopmentExpense" name="ResearchAndDevelopmentExpense" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="debit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_OperatingIncomeLoss" name="OperatingIncomeLoss" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_NetIncomeLoss" name="NetIncomeLoss" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="credit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_EarningsPerShareBasic" name="EarningsPerShareBasic" type="us-types:perShareItemType" substitutionGroup="xbrli:item" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_DividendsCommonStock" name="DividendsCommonStock" type="xbrli:monetaryItemType" substitutionGroup="xbrli:item" xbrli:balance="debit" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_StatementTable" name="StatementTable" type="xbrli:stringItemType" substitutionGroup="xbrldt:hypercubeItem" abstract="true" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_StatementEquityComponentsAxis" name="StatementEquityComponentsAxis" type="xbrli:stringItemType" substitutionGroup="xbrldt:dimensionItem" abstract="true" xbrli:periodType="duration"/>
  <xs:element id="us-gaap_StatementLineItems" name="StatementLineItems" type="xbrli:stringItemType" substitutionGroup="xbrli:item" abstract="true" xbrli:periodType="duration"/>
</xs:schema>"#;

const PRESENTATION: &str = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:presentationLink xlink:type="extended" xlink:role="http://acme.com/role/BalanceSheets">
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementOfFinancialPositionAbstract" xlink:label="root"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_AssetsAbstract" xlink:label="assetsAbs"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_CashAndCashEquivalentsAtCarryingValue" xlink:label="cash"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_AccountsReceivableNetCurrent" xlink:label="ar"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_Assets" xlink:label="assets"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_LiabilitiesAndStockholdersEquityAbstract" xlink:label="leAbs"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_Liabilities" xlink:label="liabilities"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StockholdersEquity" xlink:label="equity"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_LiabilitiesAndStockholdersEquity" xlink:label="le"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="assetsAbs" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="assetsAbs" xlink:to="cash" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="assetsAbs" xlink:to="ar" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="assetsAbs" xlink:to="assets" order="3" preferredLabel="http://www.xbrl.org/2003/role/totalLabel"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="leAbs" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="leAbs" xlink:to="liabilities" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="leAbs" xlink:to="equity" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="leAbs" xlink:to="le" order="3"/>
  </link:presentationLink>
  <link:presentationLink xlink:type="extended" xlink:role="http://acme.com/role/Operations">
    <link:loc xlink:href="us-gaap.xsd#us-gaap_IncomeStatementAbstract" xlink:label="root"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementTable" xlink:label="table"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementLineItems" xlink:label="items"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_Revenues" xlink:label="rev"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_CostOfRevenue" xlink:label="cor"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_GrossProfit" xlink:label="gp"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_ResearchAndDevelopmentExpense" xlink:label="rd"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_OperatingIncomeLoss" xlink:label="oi"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_NetIncomeLoss" xlink:label="ni"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_EarningsPerShareBasic" xlink:label="eps"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="table" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="table" xlink:to="items" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="rev" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="cor" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="gp" order="3"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="rd" order="4"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="oi" order="5"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="ni" order="6"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="eps" order="7"/>
  </link:presentationLink>
  <link:presentationLink xlink:type="extended" xlink:role="http://acme.com/role/Equity">
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementOfStockholdersEquityAbstract" xlink:label="root"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementTable" xlink:label="table"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementEquityComponentsAxis" xlink:label="axis"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_RetainedEarningsMember" xlink:label="re"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StatementLineItems" xlink:label="items"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_StockholdersEquity" xlink:label="equity"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_NetIncomeLoss" xlink:label="ni"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_DividendsCommonStock" xlink:label="div"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="table" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="table" xlink:to="axis" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="axis" xlink:to="re" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="table" xlink:to="items" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="equity" order="1" preferredLabel="http://www.xbrl.org/2003/role/periodStartLabel"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="ni" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="div" order="3"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="items" xlink:to="equity" order="4" preferredLabel="http://www.xbrl.org/2003/role/periodEndLabel"/>
  </link:presentationLink>
</link:linkbase>"#;

const CALCULATION: &str = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:calculationLink xlink:role="http://acme.com/role/Operations">
    <link:loc xlink:href="us-gaap.xsd#us-gaap_GrossProfit" xlink:label="gp"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_Revenues" xlink:label="rev"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_CostOfRevenue" xlink:label="cor"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_OperatingIncomeLoss" xlink:label="oi"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_ResearchAndDevelopmentExpense" xlink:label="rd"/>
    <link:calculationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="gp" xlink:to="rev" weight="1" order="1"/>
    <link:calculationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="gp" xlink:to="cor" weight="-1" order="2"/>
    <link:calculationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="oi" xlink:to="gp" weight="1" order="1"/>
    <link:calculationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="oi" xlink:to="rd" weight="-1" order="2"/>
  </link:calculationLink>
</link:linkbase>"#;

fn instant(id: &str, date: &str) -> String {
    format!(
        r#"<xbrli:context id="{id}"><xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000000001</xbrli:identifier></xbrli:entity><xbrli:period><xbrli:instant>{date}</xbrli:instant></xbrli:period></xbrli:context>"#
    )
}

fn duration(id: &str, start: &str, end: &str) -> String {
    format!(
        r#"<xbrli:context id="{id}"><xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000000001</xbrli:identifier></xbrli:entity><xbrli:period><xbrli:startDate>{start}</xbrli:startDate><xbrli:endDate>{end}</xbrli:endDate></xbrli:period></xbrli:context>"#
    )
}

fn segment(id: &str, start: &str, end: &str, member: &str) -> String {
    format!(
        r#"<xbrli:context id="{id}"><xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000000001</xbrli:identifier><xbrli:segment><xbrldi:explicitMember dimension="srt:ProductOrServiceAxis">{member}</xbrldi:explicitMember></xbrli:segment></xbrli:entity><xbrli:period><xbrli:startDate>{start}</xbrli:startDate><xbrli:endDate>{end}</xbrli:endDate></xbrli:period></xbrli:context>"#
    )
}

fn usd(concept: &str, context: &str, value: i64) -> String {
    format!(r#"<us-gaap:{concept} contextRef="{context}" unitRef="usd" decimals="-6">{value}</us-gaap:{concept}>"#)
}

fn eps(context: &str, value: &str) -> String {
    format!(r#"<us-gaap:EarningsPerShareBasic contextRef="{context}" unitRef="usdPerShare" decimals="2">{value}</us-gaap:EarningsPerShareBasic>"#)
}

fn document(contexts: &[String], facts: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance" xmlns:us-gaap="http://fasb.org/us-gaap/2024" xmlns:dei="http://xbrl.sec.gov/dei/2024" xmlns:iso4217="http://www.xbrl.org/2003/iso4217" xmlns:xbrldi="http://xbrl.org/2006/xbrldi">
{}
<xbrli:unit id="usd"><xbrli:measure>iso4217:USD</xbrli:measure></xbrli:unit>
<xbrli:unit id="usdPerShare"><xbrli:divide><xbrli:unitNumerator><xbrli:measure>iso4217:USD</xbrli:measure></xbrli:unitNumerator><xbrli:unitDenominator><xbrli:measure>xbrli:shares</xbrli:measure></xbrli:unitDenominator></xbrli:divide></xbrli:unit>
<xbrli:unit id="pure"><xbrli:measure>xbrli:pure</xbrli:measure></xbrli:unit>
{}
</xbrli:xbrl>"#,
        contexts.join("\n"),
        facts.join("\n")
    )
}

fn annual_report() -> String {
    let contexts = vec![
        duration("FY2024", "2024-01-01", "2024-12-31"),
        duration("FY2023", "2023-01-01", "2023-12-31"),
        duration("FY2022", "2022-01-01", "2022-12-31"),
        instant("I2024", "2024-12-31"),
        instant("I2023", "2023-12-31"),
        instant("I2022", "2022-12-31"),
        instant("I2025Q1", "2025-03-31"),
        instant("Split", "2025-01-15"),
        segment("FY2024_Widgets", "2024-01-01", "2024-12-31", "acme:WidgetsMember"),
    ];
    let mut facts = vec![
        r#"<dei:DocumentType contextRef="FY2024">10-K</dei:DocumentType>"#.to_string(),
        r#"<dei:DocumentPeriodEndDate contextRef="FY2024">2024-12-31</dei:DocumentPeriodEndDate>"#.to_string(),
        r#"<dei:CurrentFiscalYearEndDate contextRef="FY2024">--12-31</dei:CurrentFiscalYearEndDate>"#.to_string(),
        r#"<us-gaap:StockholdersEquityNoteStockSplitConversionRatio1 contextRef="Split" unitRef="pure" decimals="INF">10</us-gaap:StockholdersEquityNoteStockSplitConversionRatio1>"#.to_string(),
    ];
    for (ctx, cash, ar, liabilities, equity) in [("I2024", 100, 50, 200, 300), ("I2023", 80, 40, 180, 240)] {
        facts.push(usd("CashAndCashEquivalentsAtCarryingValue", ctx, cash));
        facts.push(usd("AccountsReceivableNetCurrent", ctx, ar));
        facts.push(usd("Assets", ctx, liabilities + equity));
        facts.push(usd("Liabilities", ctx, liabilities));
        facts.push(usd("StockholdersEquity", ctx, equity));
        facts.push(usd("LiabilitiesAndStockholdersEquity", ctx, liabilities + equity));
    }
    facts.push(usd("StockholdersEquity", "I2022", 200));
    // subsequent-event balances after the document period end
    for concept in ["CashAndCashEquivalentsAtCarryingValue", "Assets", "Liabilities", "StockholdersEquity"] {
        facts.push(usd(concept, "I2025Q1", 999));
    }
    for (ctx, revenue, cost, rd, net, per_share) in [
        ("FY2024", 1000, 600, 100, 250, "12.05"),
        ("FY2023", 900, 540, 90, 220, "11.00"),
        ("FY2022", 800, 480, 80, 200, "10.00"),
    ] {
        facts.push(usd("Revenues", ctx, revenue));
        facts.push(usd("CostOfRevenue", ctx, cost));
        facts.push(usd("GrossProfit", ctx, revenue - cost));
        facts.push(usd("ResearchAndDevelopmentExpense", ctx, rd));
        facts.push(usd("OperatingIncomeLoss", ctx, revenue - cost - rd));
        facts.push(usd("NetIncomeLoss", ctx, net));
        facts.push(eps(ctx, per_share));
    }
    facts.push(usd("DividendsCommonStock", "FY2024", 190));
    facts.push(usd("DividendsCommonStock", "FY2023", 180));
    facts.push(usd("Revenues", "FY2024_Widgets", 600));
    document(&contexts, &facts)
}

fn quarterly_report() -> String {
    let contexts = vec![
        duration("Q2_2024", "2024-04-01", "2024-06-30"),
        duration("YTD_2024", "2024-01-01", "2024-06-30"),
        duration("Q2_2023", "2023-04-01", "2023-06-30"),
        duration("YTD_2023", "2023-01-01", "2023-06-30"),
        duration("FY2023", "2023-01-01", "2023-12-31"),
    ];
    let mut facts = vec![
        r#"<dei:DocumentType contextRef="Q2_2024">10-Q</dei:DocumentType>"#.to_string(),
        r#"<dei:DocumentPeriodEndDate contextRef="Q2_2024">2024-06-30</dei:DocumentPeriodEndDate>"#.to_string(),
        // filers sometimes tag the wrong fiscal period; labels ignore it
        r#"<dei:DocumentFiscalPeriodFocus contextRef="Q2_2024">Q3</dei:DocumentFiscalPeriodFocus>"#.to_string(),
    ];
    for (ctx, revenue, net) in [
        ("Q2_2024", 260, 60),
        ("YTD_2024", 500, 110),
        ("Q2_2023", 230, 50),
        ("YTD_2023", 450, 100),
        ("FY2023", 900, 220),
    ] {
        facts.push(usd("Revenues", ctx, revenue));
        facts.push(usd("CostOfRevenue", ctx, revenue / 2));
        facts.push(usd("NetIncomeLoss", ctx, net));
    }
    document(&contexts, &facts)
}

fn taxonomy() -> Taxonomy {
    let bundle = TaxonomyBundle {
        schemas: vec![SCHEMA.as_bytes().to_vec()],
        labels: vec![],
        presentation: vec![PRESENTATION.as_bytes().to_vec()],
        calculation: vec![CALCULATION.as_bytes().to_vec()],
        definition: vec![],
    };
    Taxonomy::parse(&bundle).unwrap()
}

fn builder() -> StatementBuilder {
    // fixture filings are far smaller than real ones
    StatementBuilder::new(PeriodSelector::new(SelectorConfig {
        min_floor: 1,
        ..Default::default()
    }))
}

struct Prepared {
    taxonomy: Taxonomy,
    facts: FactTable,
    calendar: FiscalCalendar,
    period_end: Option<NaiveDate>,
}

fn prepare(xml: &str) -> Prepared {
    let taxonomy = taxonomy();
    let instance = Instance::parse(xml.as_bytes(), &taxonomy).unwrap();
    let mut facts = Normalizer::default().normalize(&instance, &taxonomy, None);
    let adjuster = CorporateActionAdjuster::default();
    let detection = adjuster.detect(&facts, None);
    adjuster.adjust(&mut facts, &detection);
    let q4 = ttm::derive_fourth_quarters(&facts);
    facts.extend(q4);
    let trailing = ttm::derive_trailing_twelve_months(&facts);
    facts.extend(trailing);
    let calendar = FiscalCalendar::detect(instance.document_info(), &facts);
    Prepared {
        taxonomy,
        facts,
        calendar,
        period_end: instance.document_info().period_end,
    }
}

fn build(prepared: &Prepared, kind: StatementKind, options: &StatementOptions) -> Statement {
    let ctx = BuildContext {
        taxonomy: &prepared.taxonomy,
        facts: &prepared.facts,
        calendar: &prepared.calendar,
        document_period_end: prepared.period_end,
    };
    builder().build(&ctx, kind, options)
}

fn annual(max_periods: usize) -> StatementOptions {
    StatementOptions {
        max_periods,
        ..Default::default()
    }
}

#[test]
fn test_balance_sheet_columns_and_rows() {
    let prepared = prepare(&annual_report());
    let bs = build(&prepared, StatementKind::BalanceSheet, &annual(3));

    // the 2022 instant only carries an opening equity balance; 2025 is after the period end
    assert_eq!(bs.period_labels(), vec!["2024-12-31", "2023-12-31"]);
    assert_eq!(bs.confidence, Confidence::High);
    assert_eq!(bs.value("Assets", "2024-12-31"), Some(500.0));
    assert_eq!(bs.value("CashAndCashEquivalentsAtCarryingValue", "2023-12-31"), Some(80.0));

    let assets = bs.row("Assets").unwrap();
    assert!(assets.is_total);
    assert_eq!(assets.depth, 2);
    assert_eq!(assets.section.as_deref(), Some("Assets Abstract"));
    let heading = &bs.rows[1];
    assert!(heading.is_abstract);
    // no label linkbase, so labels fall back to the split concept name
    assert_eq!(heading.label, "Assets Abstract");
    assert!(bs.cell(2, 0).is_some_and(|c| c.is_instant));
}

#[test]
fn test_income_statement_signs_and_structure() {
    let prepared = prepare(&annual_report());
    let is = build(&prepared, StatementKind::IncomeStatement, &annual(3));

    assert_eq!(is.period_labels(), vec!["FY 2024", "FY 2023", "FY 2022"]);
    // hypercube scaffolding never becomes a row
    assert!(is.rows.iter().all(|r| !r.concept.name.ends_with("Table")));
    assert!(is.rows.iter().all(|r| !r.concept.name.ends_with("LineItems")));
    assert_eq!(is.row("Revenues").unwrap().depth, 1);

    assert_eq!(is.value("CostOfRevenue", "FY 2024"), Some(-600.0));
    // pinned expense keeps the reported sign despite its negative weight
    assert_eq!(is.value("ResearchAndDevelopmentExpense", "FY 2024"), Some(100.0));
    let cost = is.row("CostOfRevenue").unwrap();
    assert_eq!(cost.cells[0].as_ref().unwrap().weight, Some(-1.0));
    assert_eq!(cost.cells[0].as_ref().unwrap().preferred_sign, -1);
}

#[test]
fn test_split_restates_earnings_per_share() {
    let prepared = prepare(&annual_report());
    let is = build(&prepared, StatementKind::IncomeStatement, &annual(3));

    let eps = is.value("EarningsPerShareBasic", "FY 2024").unwrap();
    assert_relative_eq!(eps, 1.205, epsilon = 1e-9);
    let cell = is.row("EarningsPerShareBasic").unwrap().cells[0].clone().unwrap();
    assert_relative_eq!(cell.split_factor, 10.0);
    // monetary values are untouched
    assert_eq!(is.value("Revenues", "FY 2024"), Some(1000.0));
}

#[test]
fn test_equity_roll_forward() {
    let prepared = prepare(&annual_report());
    let equity = build(&prepared, StatementKind::Equity, &annual(3));

    assert_eq!(equity.period_labels(), vec!["FY 2024", "FY 2023", "FY 2022"]);
    let balances: Vec<_> = equity
        .rows
        .iter()
        .filter(|r| r.concept.name == "StockholdersEquity")
        .collect();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].value(0), Some(240.0));
    assert_eq!(balances[1].value(0), Some(300.0));
    assert_eq!(balances[0].value(1), Some(200.0));
    assert_eq!(balances[1].value(1), Some(240.0));
    // no 2021 balance exists for the 2022 opening line
    assert_eq!(balances[0].value(2), None);
    // the equity component axis stays a column header, not a row
    assert!(equity.rows.iter().all(|r| !r.concept.name.ends_with("Member")));
}

#[test]
fn test_each_fact_backs_at_most_one_cell_per_column() {
    let prepared = prepare(&annual_report());
    let options = StatementOptions {
        include_dimensions: true,
        ..annual(3)
    };
    for kind in StatementKind::ALL {
        let statement = build(&prepared, kind, &options);
        for column in 0..statement.periods.len() {
            let mut seen = HashSet::new();
            for row in &statement.rows {
                if let Some(Some(cell)) = row.cells.get(column) {
                    assert!(seen.insert(cell.fact_index), "{kind} reuses a fact in column {column}");
                    assert!(cell.fact_index < prepared.facts.len());
                }
            }
        }
    }
}

#[test]
fn test_dimension_rows_sit_beneath_their_total() {
    let prepared = prepare(&annual_report());
    let options = StatementOptions {
        include_dimensions: true,
        ..annual(3)
    };
    let is = build(&prepared, StatementKind::IncomeStatement, &options);

    let total = is.rows.iter().position(|r| r.concept.name == "Revenues").unwrap();
    assert_eq!(is.rows[total].value(0), Some(1000.0));
    let widgets = &is.rows[total + 1];
    assert_eq!(widgets.concept.name, "Revenues");
    assert!(widgets.dimension.is_some());
    assert_eq!(widgets.depth, is.rows[total].depth + 1);
    assert_eq!(widgets.value(0), Some(600.0));
    assert_eq!(widgets.value(1), None);
}

#[test]
fn test_quarter_and_year_to_date_columns() {
    let prepared = prepare(&quarterly_report());
    let options = StatementOptions {
        cadence: Cadence::Quarterly,
        max_periods: 4,
        ..Default::default()
    };
    let is = build(&prepared, StatementKind::IncomeStatement, &options);

    assert_eq!(
        is.period_labels(),
        vec!["Q2 2024", "Q2 YTD 2024", "Q2 2023", "Q2 YTD 2023"]
    );
    assert_eq!(is.value("Revenues", "Q2 2024"), Some(260.0));
    assert_eq!(is.value("Revenues", "Q2 YTD 2024"), Some(500.0));
}

#[test]
fn test_trailing_twelve_months() {
    let prepared = prepare(&quarterly_report());
    let options = StatementOptions {
        cadence: Cadence::Ttm,
        max_periods: 2,
        ..Default::default()
    };
    let is = build(&prepared, StatementKind::IncomeStatement, &options);

    assert_eq!(is.period_labels(), vec!["TTM 2024-06-30", "FY 2023"]);
    // 900 + 500 - 450
    assert_eq!(is.value("Revenues", "TTM 2024-06-30"), Some(950.0));
    let cell = is.row("Revenues").unwrap().cells[0].clone().unwrap();
    assert_eq!(cell.origin, FactOrigin::Ttm);
    assert!(is.periods[0].derived);
    assert_eq!(is.confidence, Confidence::Medium);
}

#[test]
fn test_missing_role_falls_back_to_standard_concepts() {
    let prepared = prepare(&annual_report());
    let cash_flow = build(&prepared, StatementKind::CashFlow, &annual(3));

    assert!(cash_flow.fallback);
    assert!(cash_flow.role.is_none());
    assert!(!cash_flow.warnings.is_empty());
    assert_eq!(cash_flow.value("NetIncomeLoss", "FY 2024"), Some(250.0));
    assert_eq!(cash_flow.confidence, Confidence::Medium);

    let strict = StatementOptions {
        use_fallback: false,
        ..annual(3)
    };
    let empty = build(&prepared, StatementKind::CashFlow, &strict);
    assert!(empty.is_empty());
    assert_eq!(empty.confidence, Confidence::Low);
}

#[test]
fn test_table_round_trip_keeps_every_cell() {
    let prepared = prepare(&annual_report());
    let is = build(&prepared, StatementKind::IncomeStatement, &annual(3));
    let table = is.to_table();

    assert_eq!(table.row_count(), is.rows.len());
    assert_eq!(table.columns, is.period_labels());
    for (row_index, row) in is.rows.iter().enumerate() {
        for (column, period) in is.periods.iter().enumerate() {
            assert_eq!(table.value(row_index, &period.label), row.value(column));
        }
    }
}
