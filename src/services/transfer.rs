use crate::domain::models::{CopyItem, CopyReport};
use crate::services::exec::{render, CommandRunner};
use std::path::{Path, PathBuf};

pub const XRDCP: &str = "xrdcp";
pub const DEFAULT_COPY_REDIRECTOR: &str = "cmsxrootd.fnal.gov";

#[derive(thiserror::Error, Debug)]
pub enum TransferError {
    #[error("path has too few segments to derive a destination: {0}")]
    ShortPath(String),
    #[error("cannot create {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("xrdcp failed for {0}")]
    CopyFailed(String),
}

/// `<era>/<sample>` taken from segments 3 and 4 of a `/store/<kind>/<era>/<sample>/...` path.
pub fn destination_folder(path: &str) -> Result<PathBuf, TransferError> {
    let segments: Vec<&str> = path.split('/').collect();
    match (segments.get(3), segments.get(4)) {
        (Some(era), Some(sample)) if !era.is_empty() && !sample.is_empty() => {
            Ok(Path::new(era).join(sample))
        }
        _ => Err(TransferError::ShortPath(path.to_string())),
    }
}

pub fn xrdcp_args(redirector: &str, path: &str, folder: &Path) -> Vec<String> {
    vec![
        format!("root://{}//{}", redirector, path),
        format!("{}/", folder.to_string_lossy()),
    ]
}

pub fn parse_file_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct CopyPlan<'a> {
    pub dest: &'a Path,
    pub redirector: &'a str,
    pub dry_run: bool,
    /// Capture xrdcp output instead of attaching it to the terminal.
    pub quiet: bool,
}

fn copy_one(
    runner: &dyn CommandRunner,
    plan: &CopyPlan<'_>,
    path: &str,
    announce: &mut dyn FnMut(&str),
) -> Result<PathBuf, TransferError> {
    let relative = destination_folder(path)?;
    let folder = if plan.dest == Path::new(".") {
        relative
    } else {
        plan.dest.join(relative)
    };
    let args = xrdcp_args(plan.redirector, path, &folder);
    announce(&render(XRDCP, &args));
    if plan.dry_run {
        return Ok(folder);
    }
    if !folder.exists() {
        std::fs::create_dir_all(&folder).map_err(|source| TransferError::CreateDir {
            path: folder.to_string_lossy().into_owned(),
            source,
        })?;
    }
    let result = if plan.quiet {
        runner.capture(XRDCP, &args).map(|o| o.success)
    } else {
        runner.status(XRDCP, &args)
    };
    match result {
        Ok(true) => Ok(folder),
        Ok(false) => Err(TransferError::CopyFailed(path.to_string())),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "xrdcp could not be started");
            Err(TransferError::CopyFailed(path.to_string()))
        }
    }
}

/// Copies each path in order. A failing line is recorded and the run moves on.
pub fn copy_all(
    runner: &dyn CommandRunner,
    plan: &CopyPlan<'_>,
    paths: &[String],
    announce: &mut dyn FnMut(&str),
) -> CopyReport {
    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        match copy_one(runner, plan, path, announce) {
            Ok(folder) => items.push(CopyItem {
                source: path.clone(),
                destination: Some(folder.to_string_lossy().into_owned()),
                status: if plan.dry_run { "planned" } else { "copied" }.to_string(),
                error: None,
            }),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "copy failed");
                items.push(CopyItem {
                    source: path.clone(),
                    destination: None,
                    status: "failed".to_string(),
                    error: Some(e.to_string()),
                })
            }
        }
    }
    let failed = items.iter().filter(|i| i.status == "failed").count();
    CopyReport {
        redirector: plan.redirector.to_string(),
        dry_run: plan.dry_run,
        copied: items.len() - failed,
        failed,
        items,
    }
}
