//! Dataset catalog (DAS) access through `dasgoclient`.

use crate::domain::models::FileEntry;
use crate::services::exec::CommandRunner;

pub const DAS_CLIENT: &str = "dasgoclient";

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("no parent dataset found for {0}")]
    NoParent(String),
    #[error("no file found for {0}")]
    NoFiles(String),
    #[error("catalog query failed for {dataset}: {reason}")]
    QueryFailed { dataset: String, reason: String },
}

/// First path segment of a dataset name, e.g. the sample name of
/// `/Sample/Campaign/TIER`.
pub fn short_name(dataset: &str) -> &str {
    dataset
        .split('/')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or(dataset)
}

fn query(
    runner: &dyn CommandRunner,
    dataset: &str,
    args: Vec<String>,
) -> Result<String, CatalogError> {
    let out = runner
        .capture(DAS_CLIENT, &args)
        .map_err(|e| CatalogError::QueryFailed {
            dataset: dataset.to_string(),
            reason: e.to_string(),
        })?;
    if !out.success {
        let reason = match out.stderr.trim() {
            "" => format!("{} exited with code {:?}", DAS_CLIENT, out.code),
            msg => msg.to_string(),
        };
        return Err(CatalogError::QueryFailed {
            dataset: dataset.to_string(),
            reason,
        });
    }
    Ok(out.stdout)
}

fn first_line(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

pub fn parent_query(dataset: &str) -> Vec<String> {
    vec![format!("--query=parent dataset={}", dataset)]
}

pub fn file_query(dataset: &str) -> Vec<String> {
    vec![format!("--query=file dataset={}", dataset)]
}

pub fn triples_query(dataset: &str) -> Vec<String> {
    vec![
        "-query".to_string(),
        format!(
            "file dataset={} | grep file.name,file.size,file.nevents",
            dataset
        ),
    ]
}

pub fn parent_dataset(runner: &dyn CommandRunner, dataset: &str) -> Result<String, CatalogError> {
    let raw = query(runner, dataset, parent_query(dataset))?;
    first_line(&raw).ok_or_else(|| CatalogError::NoParent(dataset.to_string()))
}

pub fn first_file(runner: &dyn CommandRunner, dataset: &str) -> Result<String, CatalogError> {
    let raw = query(runner, dataset, file_query(dataset))?;
    first_line(&raw).ok_or_else(|| CatalogError::NoFiles(dataset.to_string()))
}

/// All files of a dataset with their size and event count, in catalog order.
pub fn list_files(
    runner: &dyn CommandRunner,
    dataset: &str,
) -> Result<Vec<FileEntry>, CatalogError> {
    let raw = query(runner, dataset, triples_query(dataset))?;
    Ok(parse_file_triples(&raw))
}

pub fn parse_file_triples(raw: &str) -> Vec<FileEntry> {
    let mut out = Vec::new();
    for line in raw.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 3 {
            continue;
        }
        match (parts[1].parse::<u64>(), parts[2].parse::<u64>()) {
            (Ok(size_bytes), Ok(events)) => out.push(FileEntry {
                name: parts[0].to_string(),
                size_bytes,
                events,
            }),
            _ => tracing::debug!(line, "skipping catalog line with non-numeric fields"),
        }
    }
    out
}
