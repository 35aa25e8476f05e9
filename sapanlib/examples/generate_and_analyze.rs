use sapanlib::{
    analysis::Analyzer,
    config::{AnalysisConfig, GeneratorConfig},
    generator,
    summary::render_summary,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: 1000 seeded records -> summary text on stdout
    let cfg = GeneratorConfig { seed: Some(1), ..Default::default() };
    let ledger = generator::generate(&cfg)?;
    let stats = Analyzer::new(ledger, AnalysisConfig::default()).basic_statistics()?;
    print!("{}", render_summary(&stats));
    Ok(())
}
