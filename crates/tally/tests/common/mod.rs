//! Filing fixtures shared by the integration tests.
//!
//! One small company, Acme, files three annual reports and two quarterly
//! reports. A 10:1 split takes effect on 2024-06-10 and a 4:1 split on
//! 2025-09-01.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tally::{Config, FilingSource};
use tally::statements::SelectorConfig;
use tally::xbrl::TaxonomyBundle;

pub const CIK: &str = "0000000001";

pub const ACCESSION_2023: &str = "0000000001-24-000010";
pub const ACCESSION_2024Q2: &str = "0000000001-24-000030";
pub const ACCESSION_2024Q3: &str = "0000000001-24-000045";
pub const ACCESSION_2024: &str = "0000000001-25-000008";
pub const ACCESSION_2025: &str = "0000000001-26-000006";

const SCHEMA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:xbrli="http://www.xbrl.org/2003/instance"
           xmlns:link="http://www.xbrl.org/2003/linkbase"
           targetNamespace="http://acme.com/2024">
  <xs:annotation><xs:appinfo>
    <link:roleType roleURI="http://acme.com/role/BalanceSheets" id="Role2">
      <link:definition>0000002 - Statement - Consolidated Balance Sheets</link:definition>
    </link:roleType>
    <link:roleType roleURI="http://acme.com/role/Operations" id="Role4">
      <link:definition>0000004 - Statement - Consolidated Statements of Operations</link:definition>
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
    <link:loc xlink:href="us-gaap.xsd#us-gaap_Revenues" xlink:label="rev"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_CostOfRevenue" xlink:label="cor"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_GrossProfit" xlink:label="gp"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_ResearchAndDevelopmentExpense" xlink:label="rd"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_OperatingIncomeLoss" xlink:label="oi"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_NetIncomeLoss" xlink:label="ni"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_EarningsPerShareBasic" xlink:label="eps"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="rev" order="1"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="cor" order="2"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="gp" order="3"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="rd" order="4"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="oi" order="5"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="ni" order="6"/>
    <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="root" xlink:to="eps" order="7"/>
  </link:presentationLink>
</link:linkbase>"#;

const CALCULATION: &str = r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:calculationLink xlink:role="http://acme.com/role/Operations">
    <link:loc xlink:href="us-gaap.xsd#us-gaap_GrossProfit" xlink:label="gp"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_Revenues" xlink:label="rev"/>
    <link:loc xlink:href="us-gaap.xsd#us-gaap_CostOfRevenue" xlink:label="cor"/>
    <link:calculationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="gp" xlink:to="rev" weight="1" order="1"/>
    <link:calculationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/summation-item" xlink:from="gp" xlink:to="cor" weight="-1" order="2"/>
  </link:calculationLink>
</link:linkbase>"#;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bundle() -> TaxonomyBundle {
    TaxonomyBundle {
        schemas: vec![SCHEMA.as_bytes().to_vec()],
        labels: vec![],
        presentation: vec![PRESENTATION.as_bytes().to_vec()],
        calculation: vec![CALCULATION.as_bytes().to_vec()],
        definition: vec![],
    }
}

/// Fixture filings are far smaller than real ones.
pub fn config() -> Config {
    Config {
        selector: SelectorConfig {
            min_floor: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn source<'a>(
    bundle: &'a TaxonomyBundle,
    instance: &'a [u8],
    accession: &str,
    filed: NaiveDate,
) -> FilingSource<'a> {
    FilingSource {
        taxonomy: bundle,
        instance,
        accession: accession.to_string(),
        filing_date: filed,
        form: None,
        document_period_end: None,
    }
}

/// Lines of one income statement period.
pub struct Income {
    pub revenue: f64,
    pub cost: f64,
    pub rd: f64,
    pub net: f64,
    pub eps: f64,
}

pub const fn income(revenue: f64, cost: f64, rd: f64, net: f64, eps: f64) -> Income {
    Income {
        revenue,
        cost,
        rd,
        net,
        eps,
    }
}

/// Writes an instance document one fact at a time.
pub struct InstanceWriter {
    cik: String,
    contexts: BTreeMap<String, String>,
    facts: Vec<String>,
}

impl InstanceWriter {
    pub fn new(cik: &str, document_type: &str, start: &str, end: &str) -> Self {
        let mut writer = Self {
            cik: cik.to_string(),
            contexts: BTreeMap::new(),
            facts: Vec::new(),
        };
        let ctx = writer.duration(start, end);
        writer.facts.push(format!(r#"<dei:DocumentType contextRef="{ctx}">{document_type}</dei:DocumentType>"#));
        writer.facts.push(format!(r#"<dei:DocumentPeriodEndDate contextRef="{ctx}">{end}</dei:DocumentPeriodEndDate>"#));
        writer.facts.push(format!(r#"<dei:CurrentFiscalYearEndDate contextRef="{ctx}">--12-31</dei:CurrentFiscalYearEndDate>"#));
        writer
    }

    fn entity(&self) -> String {
        format!(
            r#"<xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">{}</xbrli:identifier></xbrli:entity>"#,
            self.cik
        )
    }

    pub fn duration(&mut self, start: &str, end: &str) -> String {
        let id = format!("D{start}_{end}");
        let xml = format!(
            r#"<xbrli:context id="{id}">{}<xbrli:period><xbrli:startDate>{start}</xbrli:startDate><xbrli:endDate>{end}</xbrli:endDate></xbrli:period></xbrli:context>"#,
            self.entity()
        );
        self.contexts.entry(id.clone()).or_insert(xml);
        id
    }

    pub fn instant(&mut self, date: &str) -> String {
        let id = format!("I{date}");
        let xml = format!(
            r#"<xbrli:context id="{id}">{}<xbrli:period><xbrli:instant>{date}</xbrli:instant></xbrli:period></xbrli:context>"#,
            self.entity()
        );
        self.contexts.entry(id.clone()).or_insert(xml);
        id
    }

    pub fn usd(&mut self, concept: &str, ctx: &str, value: f64) -> &mut Self {
        self.facts.push(format!(
            r#"<us-gaap:{concept} contextRef="{ctx}" unitRef="usd" decimals="-6">{value}</us-gaap:{concept}>"#
        ));
        self
    }

    pub fn income(&mut self, start: &str, end: &str, lines: &Income) -> &mut Self {
        let ctx = self.duration(start, end);
        self.usd("Revenues", &ctx, lines.revenue)
            .usd("CostOfRevenue", &ctx, lines.cost)
            .usd("GrossProfit", &ctx, lines.revenue - lines.cost)
            .usd("ResearchAndDevelopmentExpense", &ctx, lines.rd)
            .usd("OperatingIncomeLoss", &ctx, lines.revenue - lines.cost - lines.rd)
            .usd("NetIncomeLoss", &ctx, lines.net);
        self.facts.push(format!(
            r#"<us-gaap:EarningsPerShareBasic contextRef="{ctx}" unitRef="usdPerShare" decimals="INF">{}</us-gaap:EarningsPerShareBasic>"#,
            lines.eps
        ));
        self
    }

    pub fn fiscal_year(&mut self, year: i32, lines: &Income) -> &mut Self {
        self.income(&format!("{year}-01-01"), &format!("{year}-12-31"), lines)
    }

    pub fn balance(&mut self, date: &str, cash: f64, receivables: f64, liabilities: f64, equity: f64) -> &mut Self {
        let ctx = self.instant(date);
        self.usd("CashAndCashEquivalentsAtCarryingValue", &ctx, cash)
            .usd("AccountsReceivableNetCurrent", &ctx, receivables)
            .usd("Assets", &ctx, liabilities + equity)
            .usd("Liabilities", &ctx, liabilities)
            .usd("StockholdersEquity", &ctx, equity)
            .usd("LiabilitiesAndStockholdersEquity", &ctx, liabilities + equity)
    }

    pub fn split(&mut self, date: &str, ratio: f64) -> &mut Self {
        let ctx = self.instant(date);
        self.facts.push(format!(
            r#"<us-gaap:StockholdersEquityNoteStockSplitConversionRatio1 contextRef="{ctx}" unitRef="pure" decimals="INF">{ratio}</us-gaap:StockholdersEquityNoteStockSplitConversionRatio1>"#
        ));
        self
    }

    pub fn finish(&self) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance" xmlns:us-gaap="http://fasb.org/us-gaap/2024" xmlns:dei="http://xbrl.sec.gov/dei/2024" xmlns:iso4217="http://www.xbrl.org/2003/iso4217" xmlns:xbrldi="http://xbrl.org/2006/xbrldi">
{}
<xbrli:unit id="usd"><xbrli:measure>iso4217:USD</xbrli:measure></xbrli:unit>
<xbrli:unit id="usdPerShare"><xbrli:divide><xbrli:unitNumerator><xbrli:measure>iso4217:USD</xbrli:measure></xbrli:unitNumerator><xbrli:unitDenominator><xbrli:measure>xbrli:shares</xbrli:measure></xbrli:unitDenominator></xbrli:divide></xbrli:unit>
<xbrli:unit id="pure"><xbrli:measure>xbrli:pure</xbrli:measure></xbrli:unit>
{}
</xbrli:xbrl>"#,
            self.contexts.values().cloned().collect::<Vec<_>>().join("\n"),
            self.facts.join("\n")
        )
        .into_bytes()
    }
}

/// FY2023 10-K, filed before the first split.
pub fn annual_report_2023(cik: &str) -> Vec<u8> {
    let mut w = InstanceWriter::new(cik, "10-K", "2023-01-01", "2023-12-31");
    w.fiscal_year(2023, &income(900.0, 540.0, 90.0, 220.0, 12.05))
        .fiscal_year(2022, &income(800.0, 480.0, 80.0, 200.0, 11.0))
        .fiscal_year(2021, &income(700.0, 420.0, 70.0, 180.0, 10.0))
        .balance("2023-12-31", 80.0, 40.0, 180.0, 240.0)
        .balance("2022-12-31", 70.0, 35.0, 160.0, 200.0);
    w.finish()
}

/// Q2 2024 10-Q, filed after the 10:1 split; comparatives are restated.
pub fn quarterly_report_2024q2(cik: &str) -> Vec<u8> {
    let mut w = InstanceWriter::new(cik, "10-Q", "2024-04-01", "2024-06-30");
    w.income("2024-04-01", "2024-06-30", &income(260.0, 130.0, 26.0, 60.0, 0.33))
        .income("2024-01-01", "2024-06-30", &income(500.0, 250.0, 50.0, 110.0, 0.61))
        .income("2023-04-01", "2023-06-30", &income(230.0, 115.0, 23.0, 50.0, 0.28))
        .income("2023-01-01", "2023-06-30", &income(450.0, 225.0, 45.0, 100.0, 0.55))
        .fiscal_year(2023, &income(900.0, 540.0, 90.0, 225.0, 1.205))
        .balance("2024-06-30", 90.0, 45.0, 190.0, 270.0)
        .balance("2023-12-31", 80.0, 40.0, 180.0, 240.0)
        .split("2024-06-10", 10.0);
    w.finish()
}

/// Q3 2024 10-Q with nine-month year-to-date columns.
pub fn quarterly_report_2024q3(cik: &str) -> Vec<u8> {
    let mut w = InstanceWriter::new(cik, "10-Q", "2024-07-01", "2024-09-30");
    w.income("2024-07-01", "2024-09-30", &income(270.0, 135.0, 27.0, 65.0, 0.36))
        .income("2024-01-01", "2024-09-30", &income(770.0, 385.0, 77.0, 175.0, 0.97))
        .income("2023-07-01", "2023-09-30", &income(240.0, 120.0, 24.0, 55.0, 0.3))
        .income("2023-01-01", "2023-09-30", &income(690.0, 345.0, 69.0, 155.0, 0.85))
        .balance("2024-09-30", 95.0, 48.0, 195.0, 285.0)
        .balance("2023-12-31", 80.0, 40.0, 180.0, 240.0)
        .split("2024-06-10", 10.0);
    w.finish()
}

/// FY2024 10-K; FY2023 net income restated to 225.
pub fn annual_report_2024(cik: &str) -> Vec<u8> {
    let mut w = InstanceWriter::new(cik, "10-K", "2024-01-01", "2024-12-31");
    w.fiscal_year(2024, &income(1000.0, 600.0, 100.0, 250.0, 1.3))
        .fiscal_year(2023, &income(900.0, 540.0, 90.0, 225.0, 1.205))
        .fiscal_year(2022, &income(800.0, 480.0, 80.0, 200.0, 1.1))
        .balance("2024-12-31", 100.0, 50.0, 200.0, 300.0)
        .balance("2023-12-31", 80.0, 40.0, 180.0, 240.0)
        .split("2024-06-10", 10.0);
    w.finish()
}

/// FY2025 10-K after a 4:1 split; it still mentions the 2024 split.
pub fn annual_report_2025(cik: &str) -> Vec<u8> {
    let mut w = InstanceWriter::new(cik, "10-K", "2025-01-01", "2025-12-31");
    w.fiscal_year(2025, &income(1100.0, 650.0, 110.0, 280.0, 0.35))
        .fiscal_year(2024, &income(1000.0, 600.0, 100.0, 250.0, 0.325))
        .fiscal_year(2023, &income(900.0, 540.0, 90.0, 225.0, 0.30125))
        .balance("2025-12-31", 120.0, 60.0, 220.0, 330.0)
        .balance("2024-12-31", 100.0, 50.0, 200.0, 300.0)
        .split("2025-09-01", 4.0)
        .split("2024-06-10", 10.0);
    w.finish()
}
