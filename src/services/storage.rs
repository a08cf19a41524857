use crate::domain::models::Config;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "CMSFED_CONFIG";

pub const DEFAULT_DATASETS: &[&str] = &[
    "/DYto2L-2Jets_MLL-50_TuneCP5_13p6TeV_amcatnloFXFX-pythia8/Run3Summer22NanoAODv12-130X_mcRun3_2022_realistic_v5_ext1-v1/NANOAODSIM",
];

const DOWNLOAD_TIMEOUT_MS: u64 = 30_000;

fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/cmsfed/config.toml"))
}

/// Loads the config file. An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

/// One dataset per line; blank lines and `#` comments are ignored.
pub fn parse_dataset_names(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|l| l.split('#').next().unwrap_or("").trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Datasets for `list`: arguments, else file, else config, else built-in default.
pub fn resolve_datasets(
    args: &[String],
    file: Option<&Path>,
    cfg: &Config,
) -> anyhow::Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args.to_vec());
    }
    if let Some(f) = file {
        let raw = std::fs::read_to_string(f)
            .with_context(|| format!("cannot read dataset list {}", f.display()))?;
        let names = parse_dataset_names(&raw);
        if names.is_empty() {
            anyhow::bail!("no datasets in {}", f.display());
        }
        return Ok(names);
    }
    if !cfg.datasets.is_empty() {
        return Ok(cfg.datasets.clone());
    }
    Ok(DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect())
}

pub fn write_text(path: &Path, body: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn fetch_text(url: &str, timeout_ms: u64) -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let resp = client.get(url).send()?.error_for_status()?;
    Ok(resp.text()?)
}

/// Downloads the analyzer config to `path` unless it already exists.
/// Returns `true` when a download happened.
pub fn ensure_downloaded(path: &Path, url: &str) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let body = fetch_text(url, DOWNLOAD_TIMEOUT_MS)
        .with_context(|| format!("cannot download {}", url))?;
    write_text(path, &body)?;
    Ok(true)
}
