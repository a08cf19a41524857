use crate::domain::models::{DatasetOutcome, FileEntry, SelectedFile, Selection, SizeBounds};

pub const MB: u64 = 1024 * 1024;
pub const GB: u64 = 1024 * MB;
const RULE_WIDTH: usize = 100;

impl SizeBounds {
    /// Bounds given in MB, 1024-based.
    pub fn from_mb(min: Option<f64>, max: Option<f64>) -> Self {
        let to_bytes = |mb: f64| mb * MB as f64;
        SizeBounds {
            min_bytes: min.map(to_bytes),
            max_bytes: max.map(to_bytes),
        }
    }

    /// Bounds from `--min`/`--max`. Both must be finite, non-negative and ordered.
    pub fn checked_mb(min: f64, max: f64) -> anyhow::Result<Self> {
        for (flag, v) in [("--min", min), ("--max", max)] {
            anyhow::ensure!(
                v.is_finite() && v >= 0.0,
                "{} must be a non-negative number of MB, got {}",
                flag,
                v
            );
        }
        anyhow::ensure!(
            min <= max,
            "--min ({}) must not exceed --max ({})",
            min,
            max
        );
        Ok(Self::from_mb(Some(min), Some(max)))
    }

    pub fn contains(&self, size_bytes: u64) -> bool {
        let size = size_bytes as f64;
        if self.min_bytes.map(|m| size < m).unwrap_or(false) {
            return false;
        }
        if self.max_bytes.map(|m| size > m).unwrap_or(false) {
            return false;
        }
        true
    }
}

/// Accumulates selected files across datasets. Global indices keep counting
/// from one dataset to the next.
#[derive(Debug, Default)]
pub struct Selector {
    bounds: SizeBounds,
    per_dataset: Option<usize>,
    selection: Selection,
}

impl Selector {
    pub fn new(bounds: SizeBounds, per_dataset: Option<usize>) -> Self {
        Self {
            bounds,
            per_dataset,
            selection: Selection::default(),
        }
    }

    /// Filters one dataset's entries in catalog order and returns the rows
    /// added by it.
    pub fn add_dataset(&mut self, dataset: &str, entries: &[FileEntry]) -> &[SelectedFile] {
        let start = self.selection.files.len();
        let mut kept = 0usize;
        for e in entries {
            if self.per_dataset.map(|cap| kept >= cap).unwrap_or(false) {
                break;
            }
            if !self.bounds.contains(e.size_bytes) {
                continue;
            }
            kept += 1;
            self.selection.files.push(SelectedFile {
                ind0: self.selection.files.len() + 1,
                ind1: kept,
                dataset: dataset.to_string(),
                name: e.name.clone(),
                size_bytes: e.size_bytes,
                events: e.events,
            });
            self.selection.total_bytes += e.size_bytes;
            self.selection.total_events += e.events;
        }
        self.selection.datasets.push(DatasetOutcome {
            dataset: dataset.to_string(),
            status: "ok".to_string(),
            selected: kept,
            error: None,
        });
        &self.selection.files[start..]
    }

    pub fn skip_dataset(&mut self, dataset: &str, error: String) {
        self.selection.datasets.push(DatasetOutcome {
            dataset: dataset.to_string(),
            status: "failed".to_string(),
            selected: 0,
            error: Some(error),
        });
    }

    pub fn finish(self) -> Selection {
        self.selection
    }
}

pub fn render_header() -> String {
    format!(
        "\n{:>5} {:>5}  {:>10}  {:>10}  File\n{}",
        "ind0",
        "ind1",
        "Size (MB)",
        "Events",
        "-".repeat(RULE_WIDTH)
    )
}

pub fn render_row(f: &SelectedFile) -> String {
    let size_mb = f.size_bytes as f64 / MB as f64;
    format!(
        "{:>5} {:>5} {:10.1} {:10}  {}",
        f.ind0, f.ind1, size_mb, f.events, f.name
    )
}

/// `(whole GB, remaining whole MB)`.
pub fn split_size(total_bytes: u64) -> (u64, u64) {
    (total_bytes / GB, (total_bytes % GB) / MB)
}

pub fn render_totals(s: &Selection) -> String {
    let (gb, mb) = split_size(s.total_bytes);
    format!(
        "Total size: {} GB + {} MB\nTotal events = {}",
        gb, mb, s.total_events
    )
}

/// Plain-text `info.txt` body: header, rows, footer.
pub fn render_info(s: &Selection) -> String {
    let mut out = render_header();
    out.push('\n');
    for f in &s.files {
        out.push_str(&render_row(f));
        out.push('\n');
    }
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&render_totals(s));
    out.push_str("\n\n");
    out
}

pub fn render_list(s: &Selection) -> String {
    s.files.iter().map(|f| format!("{}\n", f.name)).collect()
}

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}
