//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `exec.rs` — external process seam (`CommandRunner`).
//! - `xsec.rs` — cross-section scan and the cmsRun pipeline.
//! - `selection.rs` — size/count filter, totals, `info.txt` rendering.
//! - `transfer.rs` — destination derivation and xrdcp loop.
//! - `grid.rs` — VOMS proxy, CMSSW environment, doctor checks.
//! - `storage.rs` — config file, text file IO, analyzer config download.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - External processes only go through `CommandRunner`.
//! - Keep command handlers thin; delegate to services.

pub mod exec;
pub mod grid;
pub mod output;
pub mod selection;
pub mod storage;
pub mod transfer;
pub mod xsec;
