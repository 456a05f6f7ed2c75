//! Terminal bar chart for the cohort age histogram.

use cohortlens_core::models::age_bin::AgeBin;

const BAR: &str = "█";

/// Render one horizontal bar per bin, keyed by range label, with the integer
/// count after each bar and a `0 .. max` axis underneath.
///
/// Bars are scaled so the largest count spans `max_width` cells; any
/// non-zero count gets at least one cell. Returns `None` when there are no
/// bins, so callers draw nothing at all.
pub fn render_age_chart(bins: &[AgeBin], max_width: usize) -> Option<String> {
    let max_count = bins.iter().map(|b| b.count).max()?;
    if max_count == 0 {
        return None;
    }

    let max_width = max_width.max(1);
    let label_width = bins.iter().map(|b| b.range_label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for bin in bins {
        let len = (bin.count as usize * max_width).div_ceil(max_count as usize);
        out.push_str(&format!(
            "{:>label_width$} | {} {}\n",
            bin.range_label,
            BAR.repeat(len),
            bin.count
        ));
    }

    out.push_str(&format!("{:>label_width$} +{}\n", "", "-".repeat(max_width + 1)));
    out.push_str(&format!("{:>label_width$}  0{:>max_width$}", "", max_count));

    Some(out)
}
