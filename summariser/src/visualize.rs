//! SVG charts for an aggregated sweep.
//!
//! A bar chart of total build time per level and, for every run, a pie chart of how that time
//! splits across the other categories.

use crate::table::{AggregateRow, AggregateTable};
use anyhow::Context;
use build_sweep_report_model::{Level, TOTAL_WALL_TIME};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

/// Folder inside the sweep root that receives the charts
pub const CHARTS_DIR: &str = "charts";

/// File name of the total time bar chart
pub const BAR_CHART_FILE: &str = "total_time.svg";

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Write the bar chart and one pie chart per row into `out_dir`. Returns the files written.
///
/// Charts that can't be drawn from the table are skipped with a warning: the bar chart when
/// there is no `Total wall time` column, a pie chart when the row has nothing to split.
pub fn render(table: &AggregateTable, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::new();

    match table.column_values(TOTAL_WALL_TIME) {
        Ok(totals) if !totals.is_empty() => {
            let svg = bar_chart_svg(&table.levels(), &totals)?;
            written.push(write_chart(out_dir, BAR_CHART_FILE, &svg)?);
        }
        _ => log::warn!("No '{TOTAL_WALL_TIME}' values to chart, skipping bar chart"),
    }

    let mut charts_per_level: HashMap<Level, usize> = HashMap::new();
    for row in table.rows() {
        let slices = pie_slices(table, row);
        let Some(percentages) = slice_percentages(&slices) else {
            log::warn!(
                "Level {} has no time outside '{TOTAL_WALL_TIME}', skipping pie chart",
                row.level
            );
            continue;
        };

        let seen = charts_per_level.entry(row.level).or_insert(0);
        *seen += 1;
        let title = match *seen {
            1 => pie_chart_title(row.level),
            n => format!("{}-{n}", pie_chart_title(row.level)),
        };
        let svg = pie_chart_svg(&title, &slices, &percentages)?;
        written.push(write_chart(out_dir, &format!("{title}.svg"), &svg)?);
    }

    log::info!("Wrote {} charts to {}", written.len(), out_dir.display());
    Ok(written)
}

pub fn pie_chart_title(level: Level) -> String {
    format!("cores-{level}")
}

/// Every category of the row except the total, paired with the row's value for it.
pub fn pie_slices<'a>(table: &'a AggregateTable, row: &AggregateRow) -> Vec<(&'a str, f64)> {
    table
        .columns()
        .iter()
        .zip(&row.values)
        .filter(|(name, _)| name.as_str() != TOTAL_WALL_TIME)
        .map(|(name, value)| (name.as_str(), *value))
        .collect()
}

/// Each slice's share of the total in percent, or `None` when the slices sum to 0.
///
/// Negative values can't be drawn and count as 0.
pub fn slice_percentages(slices: &[(&str, f64)]) -> Option<Vec<f64>> {
    let total: f64 = slices.iter().map(|(_, value)| value.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    Some(
        slices
            .iter()
            .map(|(_, value)| value.max(0.0) / total * 100.0)
            .collect(),
    )
}

fn write_chart(out_dir: &Path, name: &str, svg: &str) -> anyhow::Result<PathBuf> {
    let path = out_dir.join(name);
    std::fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote chart {}", path.display());
    Ok(path)
}

fn bar_chart_svg(levels: &[Level], totals: &[f64]) -> Result<String, fmt::Error> {
    const WIDTH: f64 = 1000.0;
    const HEIGHT: f64 = 1000.0;
    const MARGIN: f64 = 100.0;

    let plot_width = WIDTH - 2.0 * MARGIN;
    let plot_height = HEIGHT - 2.0 * MARGIN;
    let max = totals.iter().cloned().fold(0.0, f64::max);
    let scale = if max > 0.0 { plot_height / max } else { 0.0 };
    let slot = plot_width / totals.len().max(1) as f64;
    let bar_width = slot * 0.8;
    let baseline = HEIGHT - MARGIN;

    let mut svg = String::new();
    svg_open(&mut svg, WIDTH, HEIGHT)?;
    writeln!(
        svg,
        r#"<text x="{:.1}" y="50" text-anchor="middle" font-size="20">Total time</text>"#,
        WIDTH / 2.0
    )?;
    writeln!(
        svg,
        r#"<line x1="{MARGIN}" y1="{baseline}" x2="{:.1}" y2="{baseline}" stroke="black"/>"#,
        WIDTH - MARGIN
    )?;
    writeln!(
        svg,
        r#"<line x1="{MARGIN}" y1="{MARGIN}" x2="{MARGIN}" y2="{baseline}" stroke="black"/>"#
    )?;

    for (index, (level, total)) in levels.iter().zip(totals).enumerate() {
        let height = total.max(0.0) * scale;
        let x = MARGIN + index as f64 * slot + (slot - bar_width) / 2.0;
        let centre = x + bar_width / 2.0;
        writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{}"/>"#,
            baseline - height,
            PALETTE[0]
        )?;
        writeln!(
            svg,
            r#"<text x="{centre:.1}" y="{:.1}" text-anchor="middle" font-size="14">{total}</text>"#,
            baseline - height - 6.0
        )?;
        writeln!(
            svg,
            r#"<text x="{centre:.1}" y="{:.1}" text-anchor="middle" font-size="16">{level}</text>"#,
            baseline + 24.0
        )?;
    }

    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="20">cores</text>"#,
        WIDTH / 2.0,
        HEIGHT - 40.0
    )?;
    writeln!(
        svg,
        r#"<text x="30" y="{:.1}" text-anchor="middle" font-size="20" transform="rotate(-90 30 {:.1})">Total wall time(sec)</text>"#,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    )?;
    svg.push_str("</svg>\n");
    Ok(svg)
}

fn pie_chart_svg(
    title: &str,
    slices: &[(&str, f64)],
    percentages: &[f64],
) -> Result<String, fmt::Error> {
    const WIDTH: f64 = 1400.0;
    const HEIGHT: f64 = 900.0;
    const CX: f64 = 450.0;
    const CY: f64 = 470.0;
    const RADIUS: f64 = 300.0;

    let mut svg = String::new();
    svg_open(&mut svg, WIDTH, HEIGHT)?;
    writeln!(
        svg,
        r#"<text x="{CX}" y="60" text-anchor="middle" font-size="20">{}</text>"#,
        escape(title)
    )?;

    // Angles start at 9 o'clock and run counter-clockwise
    let mut angle = PI;
    for (index, ((name, _), pct)) in slices.iter().zip(percentages).enumerate() {
        if *pct <= 0.0 {
            continue;
        }
        let colour = PALETTE[index % PALETTE.len()];
        let sweep = pct / 100.0 * 2.0 * PI;

        if *pct >= 100.0 {
            writeln!(
                svg,
                r#"<circle cx="{CX}" cy="{CY}" r="{RADIUS}" fill="{colour}" stroke="white" stroke-width="5"/>"#
            )?;
        } else {
            let (x1, y1) = point(CX, CY, RADIUS, angle);
            let (x2, y2) = point(CX, CY, RADIUS, angle + sweep);
            let large_arc = u8::from(sweep > PI);
            writeln!(
                svg,
                r#"<path d="M {CX} {CY} L {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 {large_arc} 0 {x2:.2} {y2:.2} Z" fill="{colour}" stroke="white" stroke-width="5"/>"#
            )?;
        }

        let (lx, ly) = point(CX, CY, RADIUS * 1.1, angle + sweep / 2.0);
        let anchor = if lx < CX { "end" } else { "start" };
        writeln!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}" font-size="16">{}</text>"#,
            escape(name)
        )?;
        let (px, py) = point(CX, CY, RADIUS * 0.6, angle + sweep / 2.0);
        writeln!(
            svg,
            r#"<text x="{px:.2}" y="{py:.2}" text-anchor="middle" font-size="16">{pct:.1}%</text>"#
        )?;

        angle += sweep;
    }

    // Legend
    for (index, (name, value)) in slices.iter().enumerate() {
        let y = 120.0 + index as f64 * 28.0;
        writeln!(
            svg,
            r#"<rect x="900" y="{:.1}" width="18" height="18" fill="{}"/>"#,
            y - 14.0,
            PALETTE[index % PALETTE.len()]
        )?;
        writeln!(
            svg,
            r#"<text x="928" y="{y:.1}" font-size="16">{} ({value})</text>"#,
            escape(name)
        )?;
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn svg_open(svg: &mut String, width: f64, height: f64) -> fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)
}

// SVG y grows downwards, so a counter-clockwise angle subtracts from y.
fn point(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy - radius * angle.sin())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
