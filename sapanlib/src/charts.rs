//! Три графика, отрисованные в SVG через plotters.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::{
    analysis::{to_f64, AbcClass, GroupSummary, MaterialValue, MonthlyBucket, Reports},
    error::{Result, SapanError},
};

pub const SIZE: (u32, u32) = (1000, 600);

const ORANGE: RGBColor = RGBColor(255, 165, 0);

type DrawResult = std::result::Result<(), Box<dyn Error>>;

fn chart_err(e: impl std::fmt::Display) -> SapanError {
    SapanError::Chart(e.to_string())
}

/// Y range that always includes zero, padded by 10% of the span.
fn y_bounds(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((hi - lo) * 0.1).max(1.0);
    let lo = if lo < 0.0 { lo - pad } else { 0.0 };
    lo..hi + pad
}

fn label_at<T>(items: &[T], idx: i32, name: impl Fn(&T) -> String) -> String {
    usize::try_from(idx)
        .ok()
        .and_then(|i| items.get(i))
        .map(name)
        .unwrap_or_default()
}

fn class_color(class: AbcClass) -> RGBColor {
    match class {
        AbcClass::A => GREEN,
        AbcClass::B => ORANGE,
        AbcClass::C => RED,
    }
}

fn draw_time_series(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    buckets: &[MonthlyBucket],
    currency: &str,
) -> DrawResult {
    root.fill(&WHITE)?;
    let n = buckets.len().max(1) as i32;
    let month = |x: &i32| label_at(buckets, *x, |b| b.month_end.format("%Y-%m").to_string());

    let mut chart = ChartBuilder::on(root)
        .caption("Monthly amounts over time", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..n, y_bounds(buckets.iter().map(|b| to_f64(b.sum))))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(format!("Amount ({currency})"))
        .x_label_formatter(&month)
        .draw()?;

    let sums: Vec<(i32, f64)> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (i as i32, to_f64(b.sum)))
        .collect();
    chart
        .draw_series(LineSeries::new(sums, &BLUE))?
        .label("Monthly total amount")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    let rolling: Vec<(i32, f64)> = buckets
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.rolling_avg.map(|v| (i as i32, v)))
        .collect();
    chart
        .draw_series(LineSeries::new(rolling, &RED))?
        .label("Rolling average")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_cost_centers(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    top: &[GroupSummary],
    currency: &str,
) -> DrawResult {
    root.fill(&WHITE)?;
    let k = top.len().max(1) as i32;
    let name = |v: &SegmentValue<i32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => label_at(top, *i, |g| g.key.clone()),
        SegmentValue::Last => String::new(),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Top {} cost centers by total amount", top.len()), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0i32..k).into_segmented(),
            y_bounds(top.iter().map(|g| to_f64(g.sum))),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(top.len().max(1))
        .x_desc("Cost center")
        .y_desc(format!("Total amount ({currency})"))
        .x_label_formatter(&name)
        .draw()?;

    chart.draw_series(top.iter().enumerate().map(|(i, g)| {
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), to_f64(g.sum))],
            BLUE.filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;
    Ok(())
}

fn draw_materials(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    materials: &[MaterialValue],
    currency: &str,
) -> DrawResult {
    root.fill(&WHITE)?;
    let n = materials.len().max(1) as i32;
    let material = |x: &i32| label_at(materials, *x, |m| m.material.clone());

    let mut chart = ChartBuilder::on(root)
        .caption("Material ABC analysis", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(-1i32..n, y_bounds(materials.iter().map(|m| to_f64(m.amount))))?;

    chart
        .configure_mesh()
        .x_desc("Material")
        .y_desc(format!("Total amount ({currency})"))
        .x_label_formatter(&material)
        .draw()?;

    for class in AbcClass::ALL {
        let color = class_color(class);
        let points: Vec<(i32, f64)> = materials
            .iter()
            .enumerate()
            .filter(|(_, m)| m.class == class)
            .map(|(i, m)| (i as i32, to_f64(m.amount)))
            .collect();
        chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))?
            .label(format!("Class {class}"))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn render_svg<F>(draw: F) -> Result<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        draw(&root).map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

pub fn time_series_svg(buckets: &[MonthlyBucket], currency: &str) -> Result<String> {
    render_svg(|root| draw_time_series(root, buckets, currency))
}

/// Bars for the first `top_n` entries; `cost_centers` is expected sorted by sum, descending.
pub fn cost_centers_svg(cost_centers: &[GroupSummary], top_n: usize, currency: &str) -> Result<String> {
    let top = &cost_centers[..top_n.min(cost_centers.len())];
    render_svg(|root| draw_cost_centers(root, top, currency))
}

pub fn materials_svg(materials: &[MaterialValue], currency: &str) -> Result<String> {
    render_svg(|root| draw_materials(root, materials, currency))
}

/// Rendered SVG documents for the three chart tabs.
#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub time_series: String,
    pub cost_centers: String,
    pub materials: String,
}

impl Charts {
    pub fn render(reports: &Reports, top_n: usize, currency: &str) -> Result<Self> {
        Ok(Self {
            time_series: time_series_svg(&reports.time_series, currency)?,
            cost_centers: cost_centers_svg(&reports.cost_centers, top_n, currency)?,
            materials: materials_svg(&reports.material_analysis, currency)?,
        })
    }

    /// Writes `time_series.svg`, `cost_centers.svg` and `materials.svg` into `dir`.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(3);
        for (name, svg) in [
            ("time_series.svg", &self.time_series),
            ("cost_centers.svg", &self.cost_centers),
            ("materials.svg", &self.materials),
        ] {
            let path = dir.join(name);
            std::fs::write(&path, svg)?;
            tracing::debug!(path = %path.display(), "chart written");
            written.push(path);
        }
        Ok(written)
    }
}
