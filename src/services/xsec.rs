use crate::catalog;
use crate::domain::models::{XsecReport, XsecValue};
use crate::services::exec::{render, CommandRunner};
use std::path::Path;

pub const XSEC_MARKER: &str = "After matching: total cross section";
pub const XSEC_NOT_FOUND: &str = "No cross-section found.";
pub const CMSRUN: &str = "cmsRun";
pub const DEFAULT_XSEC_REDIRECTOR: &str = "cms-xrd-global.cern.ch";
pub const DEFAULT_XSEC_CFG_URL: &str = "https://raw.githubusercontent.com/cms-sw/genproductions/master/Utilities/calculateXSectionAndFilterEfficiency/genXsec_cfg.py";

/// Value reported on the first marker line that carries an `=`.
pub fn find_xsec(output: &str) -> Option<&str> {
    output
        .lines()
        .filter(|l| l.contains(XSEC_MARKER))
        .find_map(|l| l.split_once('=').map(|(_, rhs)| rhs.trim()))
}

pub fn extract_xsec(output: &str) -> String {
    find_xsec(output).unwrap_or(XSEC_NOT_FOUND).to_string()
}

impl XsecValue {
    /// Parses `12.34 +- 0.05 pb` style text. The uncertainty and unit are optional.
    /// `nan` and `inf` do not count as numbers.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split_whitespace().peekable();
        let value = finite(tokens.next()?)?;
        let mut uncertainty = None;
        if matches!(tokens.peek(), Some(&"+-") | Some(&"±")) {
            tokens.next();
            uncertainty = Some(finite(tokens.next()?)?);
        }
        let rest: Vec<&str> = tokens.collect();
        let unit = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };
        Some(XsecValue {
            value,
            uncertainty,
            unit,
        })
    }
}

fn finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn cmsrun_args(cfg: &Path, redirector: &str, file: &str) -> Vec<String> {
    vec![
        cfg.to_string_lossy().into_owned(),
        format!("inputFiles=file:root://{}//{}", redirector, file),
    ]
}

/// Hooks for progress reporting while a dataset is processed.
pub trait XsecProgress {
    /// Called with the rendered command line before each external call.
    fn command_started(&mut self, _command: &str) {}
    fn parent_found(&mut self, _parent: &str) {}
    fn file_found(&mut self, _file: &str) {}
    fn simulator_started(&mut self, _command: &str) {}
    fn simulator_output(&mut self, _output: &str) {}
}

impl XsecProgress for () {}

/// Resolves the sample file for `dataset` through its parent, runs the
/// analyzer on it and scans the output.
pub fn process_dataset(
    runner: &dyn CommandRunner,
    dataset: &str,
    cfg: &Path,
    redirector: &str,
    progress: &mut dyn XsecProgress,
) -> XsecReport {
    let mut report = XsecReport {
        dataset: dataset.to_string(),
        status: "failed".to_string(),
        parent: None,
        file: None,
        xsec: None,
        parsed: None,
        error: None,
    };

    progress.command_started(&render(catalog::DAS_CLIENT, &catalog::parent_query(dataset)));
    let parent = match catalog::parent_dataset(runner, dataset) {
        Ok(p) => p,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };
    progress.parent_found(&parent);
    report.parent = Some(parent.clone());

    progress.command_started(&render(catalog::DAS_CLIENT, &catalog::file_query(&parent)));
    let file = match catalog::first_file(runner, &parent) {
        Ok(f) => f,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };
    progress.file_found(&file);
    report.file = Some(file.clone());

    let args = cmsrun_args(cfg, redirector, &file);
    let command = render(CMSRUN, &args);
    progress.simulator_started(&command);
    progress.command_started(&command);
    let out = match runner.capture(CMSRUN, &args) {
        Ok(o) => o,
        Err(e) => {
            report.error = Some(format!("{:#}", e));
            return report;
        }
    };
    let combined = out.combined();
    progress.simulator_output(combined.trim());
    if !out.success {
        tracing::warn!(code = ?out.code, "cmsRun exited with failure, scanning output anyway");
    }

    let value = extract_xsec(&combined);
    if value == XSEC_NOT_FOUND {
        report.status = "not_found".to_string();
    } else {
        report.status = "ok".to_string();
        report.parsed = XsecValue::parse(&value);
    }
    report.xsec = Some(value);
    report
}
