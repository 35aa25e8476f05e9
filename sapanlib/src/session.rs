//! Состояние интерактивного просмотрщика: выбранный файл, результаты анализа,
//! активная вкладка и её содержимое. Любая ошибка попадает текстом в панель сводки.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{
    analysis::{Analyzer, Reports},
    charts::Charts,
    config::AnalysisConfig,
    error::{Result, SapanError},
    summary::render_summary,
    table::TableView,
};

pub const NO_FILE: &str = "No file selected";
pub const LOAD_FIRST: &str = "Please load data first!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Summary,
    TimeSeries,
    CostCenters,
    Materials,
    Table,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Summary => "Summary",
            Tab::TimeSeries => "Time series",
            Tab::CostCenters => "Cost centers",
            Tab::Materials => "Material analysis",
            Tab::Table => "Table view",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Tab {
    type Err = SapanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "summary" => Ok(Tab::Summary),
            "time-series" | "timeseries" => Ok(Tab::TimeSeries),
            "cost-centers" | "costcenters" => Ok(Tab::CostCenters),
            "materials" | "material-analysis" => Ok(Tab::Materials),
            "table" | "table-view" => Ok(Tab::Table),
            other => Err(SapanError::Parse(format!("unknown tab: {other}"))),
        }
    }
}

/// Entries of the report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TimeSeries,
    CostCenters,
    Materials,
    DocumentTypes,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::TimeSeries => "Time series analysis",
            ReportKind::CostCenters => "Cost center analysis",
            ReportKind::Materials => "Material analysis",
            ReportKind::DocumentTypes => "Document type analysis",
        }
    }
}

impl FromStr for ReportKind {
    type Err = SapanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "time-series" | "timeseries" => Ok(ReportKind::TimeSeries),
            "cost-centers" | "costcenters" => Ok(ReportKind::CostCenters),
            "materials" | "material-analysis" => Ok(ReportKind::Materials),
            "document-types" | "doctypes" => Ok(ReportKind::DocumentTypes),
            other => Err(SapanError::Parse(format!("unknown report: {other}"))),
        }
    }
}

pub struct Session {
    config: AnalysisConfig,
    file: Option<PathBuf>,
    analyzer: Option<Analyzer>,
    reports: Option<Reports>,
    charts: Option<Charts>,
    tab: Tab,
    summary_text: String,
    table: TableView,
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            file: None,
            analyzer: None,
            reports: None,
            charts: None,
            tab: Tab::Summary,
            summary_text: String::new(),
            table: TableView::default(),
        }
    }

    /// Label next to the file chooser.
    pub fn file_label(&self) -> String {
        self.file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| NO_FILE.to_string())
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn reports(&self) -> Option<&Reports> {
        self.reports.as_ref()
    }

    pub fn charts(&self) -> Option<&Charts> {
        self.charts.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Load a ledger file and preview its first rows in the table.
    /// Returns whether loading succeeded; on failure the error is in the summary text.
    pub fn load(&mut self, path: &Path) -> bool {
        self.file = Some(path.to_path_buf());
        match Analyzer::from_path(path, self.config.clone()) {
            Ok(analyzer) => {
                self.table = TableView::from_records(analyzer.ledger().head(self.config.preview_rows));
                self.analyzer = Some(analyzer);
                self.reports = None;
                self.charts = None;
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "load failed");
                self.summary_text = format!("Error loading data: {e}");
                false
            }
        }
    }

    fn run_analysis(&self) -> Result<(Reports, Charts)> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| SapanError::Analysis(LOAD_FIRST.into()))?;
        let reports = analyzer.generate_all_reports()?;
        let currency = analyzer.ledger().currency().unwrap_or("EUR");
        let charts = Charts::render(&reports, self.config.top_cost_centers, currency)?;
        Ok((reports, charts))
    }

    /// Run every report, fill the summary pane and render the three charts.
    pub fn analyze(&mut self) -> bool {
        if self.analyzer.is_none() {
            self.summary_text = LOAD_FIRST.to_string();
            return false;
        }
        match self.run_analysis() {
            Ok((reports, charts)) => {
                self.summary_text = render_summary(&reports.basic_statistics);
                self.reports = Some(reports);
                self.charts = Some(charts);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "analysis failed");
                self.summary_text = match e {
                    SapanError::Analysis(msg) => format!("Analysis error: {msg}"),
                    other => format!("Analysis error: {other}"),
                };
                false
            }
        }
    }

    /// Switch the view to the selected report. Does nothing before an analysis has run.
    pub fn select_report(&mut self, kind: ReportKind) {
        let Some(reports) = &self.reports else {
            return;
        };
        match kind {
            ReportKind::TimeSeries => self.tab = Tab::TimeSeries,
            ReportKind::CostCenters => self.tab = Tab::CostCenters,
            ReportKind::Materials => self.tab = Tab::Materials,
            ReportKind::DocumentTypes => {
                self.table = TableView::from_groups("DocumentType", &reports.document_types);
                self.tab = Tab::Table;
            }
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Text of the active tab. Chart tabs show the data behind the chart;
    /// the SVG documents themselves come from [`Session::charts`].
    pub fn render_current(&self) -> String {
        let from_reports = |view: fn(&Reports, usize) -> TableView| {
            self.reports
                .as_ref()
                .map(|r| view(r, self.config.top_cost_centers).render())
                .unwrap_or_else(|| LOAD_FIRST.to_string())
        };
        match self.tab {
            Tab::Summary => self.summary_text.clone(),
            Tab::TimeSeries => from_reports(|r, _| TableView::from_time_series(&r.time_series)),
            Tab::CostCenters => from_reports(|r, top| {
                TableView::from_groups("CostCenter", &r.cost_centers[..top.min(r.cost_centers.len())])
            }),
            Tab::Materials => from_reports(|r, _| TableView::from_materials(&r.material_analysis)),
            Tab::Table => self.table.render(),
        }
    }
}
