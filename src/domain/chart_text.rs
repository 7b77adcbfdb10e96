//! Plain-text rendering of coverage and bucket series.

use crate::domain::aggregator::{month_name, BucketSeries, CoverageSummary};

const BAR_WIDTH: usize = 40;

/// One line per bucket: label, total and a bar scaled to the largest total.
pub fn render_series(series: &BucketSeries) -> String {
    let label_width = series
        .buckets
        .iter()
        .map(|b| b.label.len())
        .max()
        .unwrap_or(0)
        .max(series.axis_label.len());
    let total_width = series
        .buckets
        .iter()
        .map(|b| b.total_units.to_string().len())
        .max()
        .unwrap_or(1)
        .max(5);
    let peak = series
        .buckets
        .iter()
        .map(|b| b.total_units)
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<label_width$}  {:>total_width$}\n",
        series.axis_label, "Sales"
    );
    for bucket in &series.buckets {
        let bar = "#".repeat(bar_len(bucket.total_units, peak));
        out.push_str(
            format!(
                "{:<label_width$}  {:>total_width$}  {}",
                bucket.label, bucket.total_units, bar
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Coverage sentence followed by the selectable years and their months.
pub fn render_ranges(coverage: &CoverageSummary, years: &[(i32, Vec<u32>)]) -> String {
    let mut out = coverage.describe();
    out.push('\n');
    for (year, months) in years {
        let names: Vec<&str> = months.iter().map(|m| month_name(*m)).collect();
        out.push_str(&format!("  {}: {}\n", year, names.join(", ")));
    }
    out
}

fn bar_len(total: i64, peak: i64) -> usize {
    if total <= 0 || peak <= 0 {
        return 0;
    }
    ((total as f64 / peak as f64) * BAR_WIDTH as f64).ceil() as usize
}
