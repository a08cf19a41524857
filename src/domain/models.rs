use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Optional `~/.config/cmsfed/config.toml`. Every field falls back to a
/// built-in default when absent.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub xsec_redirector: Option<String>,
    #[serde(default)]
    pub copy_redirector: Option<String>,
    #[serde(default)]
    pub xsec_cfg_url: Option<String>,
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// One `(name, size, events)` triple as reported by the catalog.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size_bytes: u64,
    pub events: u64,
}

/// Inclusive size bounds in bytes. `None` leaves that side open.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq)]
pub struct SizeBounds {
    pub min_bytes: Option<f64>,
    pub max_bytes: Option<f64>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SelectedFile {
    pub ind0: usize,
    pub ind1: usize,
    pub dataset: String,
    pub name: String,
    pub size_bytes: u64,
    pub events: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DatasetOutcome {
    pub dataset: String,
    pub status: String,
    pub selected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct Selection {
    pub files: Vec<SelectedFile>,
    pub datasets: Vec<DatasetOutcome>,
    pub total_bytes: u64,
    pub total_events: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct XsecValue {
    pub value: f64,
    pub uncertainty: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct XsecReport {
    pub dataset: String,
    pub status: String,
    pub parent: Option<String>,
    pub file: Option<String>,
    pub xsec: Option<String>,
    pub parsed: Option<XsecValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CopyItem {
    pub source: String,
    pub destination: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CopyReport {
    pub redirector: String,
    pub dry_run: bool,
    pub copied: usize,
    pub failed: usize,
    pub items: Vec<CopyItem>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CheckItem {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct DoctorReport {
    pub overall: String,
    pub checks: Vec<CheckItem>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ProxyTimeLeft {
    pub seconds: u64,
}

impl ProxyTimeLeft {
    pub fn hms(&self) -> (u64, u64, u64) {
        let hours = self.seconds / 3600;
        let rem = self.seconds % 3600;
        (hours, rem / 60, rem % 60)
    }
}

impl std::fmt::Display for ProxyTimeLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{} hours, {} minutes, {} seconds", h, m, s)
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ListReport {
    pub list_file: String,
    pub info_file: String,
    pub bounds: SizeBounds,
    pub per_dataset: Option<usize>,
    #[serde(flatten)]
    pub selection: Selection,
}
