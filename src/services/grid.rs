use crate::domain::models::{CheckItem, DoctorReport, ProxyTimeLeft};
use crate::services::exec::CommandRunner;
use std::ffi::OsString;
use std::path::PathBuf;

pub const VOMS_PROXY_INFO: &str = "voms-proxy-info";
pub const VOMS_PROXY_INIT: &str = "voms-proxy-init";
pub const CMSSW_BASE: &str = "CMSSW_BASE";

pub const REQUIRED_TOOLS: &[&str] = &[
    crate::catalog::DAS_CLIENT,
    crate::services::xsec::CMSRUN,
    crate::services::transfer::XRDCP,
    VOMS_PROXY_INFO,
    VOMS_PROXY_INIT,
];

#[derive(thiserror::Error, Debug)]
pub enum EnvError {
    #[error("CMS VOMS proxy not found or expired, run: voms-proxy-init -voms cms")]
    ProxyMissing,
    #[error("voms-proxy-init --voms cms did not produce a proxy")]
    ProxyInitFailed,
    #[error("no CMSSW environment detected, set up CMSSW (cmsenv) before running")]
    NoCmssw,
}

pub fn check_cmssw(value: Option<String>) -> Result<String, EnvError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(EnvError::NoCmssw),
    }
}

pub fn cmssw_from_env() -> Result<String, EnvError> {
    check_cmssw(std::env::var(CMSSW_BASE).ok())
}

/// Seconds left on the proxy according to `voms-proxy-info --timeleft`.
pub fn proxy_time_left(runner: &dyn CommandRunner) -> Result<ProxyTimeLeft, EnvError> {
    let out = runner
        .capture(VOMS_PROXY_INFO, &["--timeleft".to_string()])
        .map_err(|e| {
            tracing::debug!(error = %e, "voms-proxy-info unavailable");
            EnvError::ProxyMissing
        })?;
    if !out.success {
        return Err(EnvError::ProxyMissing);
    }
    let raw = out.stdout.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(EnvError::ProxyMissing);
    }
    match raw.parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(ProxyTimeLeft { seconds }),
        _ => Err(EnvError::ProxyMissing),
    }
}

pub fn proxy_exists(runner: &dyn CommandRunner) -> bool {
    runner
        .capture(VOMS_PROXY_INFO, &["-exists".to_string()])
        .map(|o| o.success)
        .unwrap_or(false)
}

/// Returns `true` when a new proxy had to be generated.
pub fn ensure_proxy(runner: &dyn CommandRunner) -> Result<bool, EnvError> {
    if proxy_exists(runner) {
        return Ok(false);
    }
    let args = vec!["--voms".to_string(), "cms".to_string()];
    match runner.status(VOMS_PROXY_INIT, &args) {
        Ok(true) => Ok(true),
        Ok(false) => Err(EnvError::ProxyInitFailed),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "voms-proxy-init could not be started");
            Err(EnvError::ProxyInitFailed)
        }
    }
}

pub fn find_on_path(tool: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file())
}

pub fn doctor(runner: &dyn CommandRunner) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match cmssw_from_env() {
        Ok(base) => CheckItem {
            name: "cmssw_base".to_string(),
            status: "ok".to_string(),
            detail: Some(base),
        },
        Err(_) => CheckItem {
            name: "cmssw_base".to_string(),
            status: "missing".to_string(),
            detail: None,
        },
    });

    checks.push(match proxy_time_left(runner) {
        Ok(left) => CheckItem {
            name: "voms_proxy".to_string(),
            status: "ok".to_string(),
            detail: Some(left.to_string()),
        },
        Err(_) => CheckItem {
            name: "voms_proxy".to_string(),
            status: "missing".to_string(),
            detail: Some("run: voms-proxy-init -voms cms".to_string()),
        },
    });

    for tool in REQUIRED_TOOLS {
        let found = find_on_path(tool, std::env::var_os("PATH"));
        checks.push(CheckItem {
            name: format!("tool:{}", tool),
            status: if found.is_some() { "ok" } else { "missing" }.to_string(),
            detail: found.map(|p| p.to_string_lossy().into_owned()),
        });
    }

    let overall = if checks.iter().all(|c| c.status == "ok") {
        "ok"
    } else {
        "needs_attention"
    }
    .to_string();

    DoctorReport { overall, checks }
}
