use chrono::NaiveDate;
use sapanlib::{
    analysis::Analyzer,
    charts::{self, Charts},
    config::{AnalysisConfig, GeneratorConfig},
    generator,
};

fn reports() -> sapanlib::analysis::Reports {
    let cfg = GeneratorConfig {
        records: 300,
        seed: Some(77),
        end_date: NaiveDate::from_ymd_opt(2025, 7, 5),
        ..Default::default()
    };
    let ledger = generator::generate(&cfg).expect("generate");
    Analyzer::new(ledger, AnalysisConfig::default())
        .generate_all_reports()
        .expect("reports")
}

#[test]
fn each_chart_is_an_svg_with_its_title() {
    let r = reports();
    let ts = charts::time_series_svg(&r.time_series, "EUR").expect("time series");
    assert!(ts.contains("<svg"));
    assert!(ts.contains("Monthly amounts over time"));

    let cc = charts::cost_centers_svg(&r.cost_centers, 10, "EUR").expect("cost centers");
    assert!(cc.contains("Top 10 cost centers"));
    assert!(cc.contains(&r.cost_centers[0].key));

    let mats = charts::materials_svg(&r.material_analysis, "EUR").expect("materials");
    assert!(mats.contains("Material ABC analysis"));
    assert!(mats.contains("Class A"));
}

#[test]
fn top_n_larger_than_groups_is_clamped() {
    let r = reports();
    let cc = charts::cost_centers_svg(&r.cost_centers, 500, "EUR").expect("cost centers");
    assert!(cc.contains(&format!("Top {} cost centers", r.cost_centers.len())));
}

#[test]
fn save_writes_three_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let charts = Charts::render(&reports(), 10, "EUR").expect("render");
    let written = charts.save(&dir.path().join("out")).expect("save");
    assert_eq!(written.len(), 3);
    for path in written {
        let text = std::fs::read_to_string(&path).expect("read svg");
        assert!(text.contains("<svg"), "{}", path.display());
    }
}
