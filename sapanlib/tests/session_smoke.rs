use chrono::NaiveDate;
use rust_decimal::Decimal;
use sapanlib::{
    config::{AnalysisConfig, GeneratorConfig},
    files, generator,
    model::{DocumentType, Ledger, Record},
    session::{ReportKind, Session, Tab, LOAD_FIRST, NO_FILE},
};
use std::path::PathBuf;
use std::str::FromStr;

fn write_ledger(dir: &tempfile::TempDir, records: usize) -> PathBuf {
    let cfg = GeneratorConfig {
        records,
        seed: Some(5),
        end_date: NaiveDate::from_ymd_opt(2025, 7, 5),
        ..Default::default()
    };
    let path = dir.path().join("sap_data.csv");
    generator::save(&generator::generate(&cfg).expect("generate"), &path).expect("save");
    path
}

fn rec(company_code: &str, plant: &str, doc: DocumentType, amount: Decimal) -> Record {
    Record {
        company_code: company_code.into(),
        plant: plant.into(),
        material: "MAT_00001".into(),
        quantity: Decimal::ONE,
        amount,
        currency: "EUR".into(),
        document_type: doc,
        posting_date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        cost_center: "CC_1001".into(),
        profit_center: "PC_101".into(),
        gl_account: "G/L_40000".into(),
        vendor: None,
        customer: None,
        fiscal_year: 2024,
        fiscal_period: 5,
        document_number: "DOC_00000001".into(),
    }
}

fn write_records(dir: &tempfile::TempDir, records: Vec<Record>) -> PathBuf {
    let path = dir.path().join("fixture.csv");
    files::save_path(&path, &Ledger::new(records)).expect("save");
    path
}

#[test]
fn analyze_before_load_asks_for_data() {
    let mut s = Session::new(AnalysisConfig::default());
    assert_eq!(s.file_label(), NO_FILE);
    assert!(!s.analyze());
    assert_eq!(s.summary_text(), LOAD_FIRST);
    assert_eq!(s.tab(), Tab::Summary);
}

#[test]
fn load_error_lands_in_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut s = Session::new(AnalysisConfig::default());
    assert!(!s.load(&dir.path().join("missing.csv")));
    assert!(s.summary_text().starts_with("Error loading data:"));
    assert!(!s.is_loaded());
}

#[test]
fn load_shows_preview_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_ledger(&dir, 50);
    let mut s = Session::new(AnalysisConfig::default());
    assert!(s.load(&path));
    assert_eq!(s.file_label(), path.display().to_string());
    assert_eq!(s.table().rows.len(), 20);
    assert_eq!(s.table().headers.len(), 16);
}

#[test]
fn analyze_fills_summary_and_charts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_ledger(&dir, 400);
    let mut s = Session::new(AnalysisConfig::default());
    assert!(s.load(&path));
    assert!(s.analyze());

    assert!(s.summary_text().starts_with("=== BASIC STATISTICS ==="));
    assert!(s.summary_text().contains("Total records: 400"));
    assert!(s.summary_text().contains("=== CATEGORICAL FIELDS ==="));
    let charts = s.charts().expect("charts");
    assert!(charts.time_series.contains("<svg"));
    assert!(s.reports().is_some());
}

#[test]
fn report_selector_switches_tabs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_ledger(&dir, 200);
    let mut s = Session::new(AnalysisConfig::default());

    // Selecting before analysis does nothing.
    s.select_report(ReportKind::CostCenters);
    assert_eq!(s.tab(), Tab::Summary);

    assert!(s.load(&path));
    assert!(s.analyze());

    s.select_report(ReportKind::TimeSeries);
    assert_eq!(s.tab(), Tab::TimeSeries);
    s.select_report(ReportKind::Materials);
    assert_eq!(s.tab(), Tab::Materials);
    assert!(s.render_current().contains("ABC_Class"));
    assert!(s.charts().expect("charts").materials.contains("<svg"));

    s.select_report(ReportKind::DocumentTypes);
    assert_eq!(s.tab(), Tab::Table);
    assert_eq!(s.table().headers[0], "DocumentType");
    assert_eq!(s.table().rows.len(), 5);
    assert!(s.render_current().contains("percentage"));

    s.select_tab(Tab::Summary);
    assert_eq!(s.render_current(), s.summary_text());
}

#[test]
fn empty_file_reports_analysis_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_ledger(&dir, 0);
    let mut s = Session::new(AnalysisConfig::default());
    assert!(s.load(&path));
    assert!(!s.analyze());
    assert_eq!(s.summary_text(), "Analysis error: empty dataset");
}

#[test]
fn names_parse_leniently() {
    assert_eq!("time series".parse::<ReportKind>().expect("kind"), ReportKind::TimeSeries);
    assert_eq!("Document_Types".parse::<ReportKind>().expect("kind"), ReportKind::DocumentTypes);
    assert_eq!("table".parse::<Tab>().expect("tab"), Tab::Table);
    assert!("nope".parse::<Tab>().is_err());
}

#[test]
fn summary_lists_category_shares() {
    // 1,250 rows: COMP_A 1,000 / COMP_B 250, doc types cycle INV, PO, SO.
    let records = (0..1250)
        .map(|i| {
            let company = if i < 1000 { "COMP_A" } else { "COMP_B" };
            let plant = if i % 5 == 0 { "PLANT_2" } else { "PLANT_1" };
            let doc = [DocumentType::Inv, DocumentType::Po, DocumentType::So][i % 3];
            rec(company, plant, doc, Decimal::new(10_000 + i as i64, 2))
        })
        .collect();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_records(&dir, records);
    let mut s = Session::new(AnalysisConfig::default());
    assert!(s.load(&path));
    assert!(s.analyze());

    let text = s.summary_text();
    let lines: Vec<&str> = text.lines().collect();
    let section = |title: &str| {
        let start = lines.iter().position(|l| *l == title).expect(title);
        lines[start + 1..]
            .iter()
            .take_while(|l| !l.is_empty())
            .copied()
            .collect::<Vec<_>>()
    };

    assert!(text.contains("Total records: 1,250"));
    assert_eq!(
        section("CompanyCode distribution:"),
        ["  COMP_A: 1,000 (80.0%)", "  COMP_B: 250 (20.0%)"]
    );
    assert_eq!(
        section("DocumentType distribution:"),
        ["  INV: 417 (33.4%)", "  PO: 417 (33.4%)", "  SO: 416 (33.3%)"]
    );
    assert_eq!(
        section("Plant distribution:"),
        ["  PLANT_1: 1,000 (80.0%)", "  PLANT_2: 250 (20.0%)"]
    );
}

#[test]
fn amount_overflow_is_reported_as_text() {
    let huge = Decimal::from_str("50000000000000000000000000000").unwrap();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_records(
        &dir,
        vec![
            rec("COMP_A", "PLANT_1", DocumentType::Inv, huge),
            rec("COMP_A", "PLANT_1", DocumentType::Inv, huge),
        ],
    );
    let mut s = Session::new(AnalysisConfig::default());
    assert!(s.load(&path));
    assert!(!s.analyze());
    assert!(
        s.summary_text().starts_with("Analysis error: amount overflow"),
        "{}",
        s.summary_text()
    );
    assert!(s.reports().is_none());
}
