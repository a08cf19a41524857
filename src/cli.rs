use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_XSEC_CFG: &str = "genXsec_cfg.py";
pub const DEFAULT_LIST_FILE: &str = "list.txt";
pub const DEFAULT_INFO_FILE: &str = "info.txt";

#[derive(Parser, Debug)]
#[command(
    name = "cmsfed",
    version,
    about = "CMS data federation helpers: cross sections, file lists, bulk copy"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Echo full external tool output and enable debug logging"
    )]
    pub debug: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: $CMSFED_CONFIG or ~/.config/cmsfed/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the generator cross section of a dataset via its parent sample.
    Xsec(XsecArgs),
    /// Query the catalog and select files by size and count.
    List(ListArgs),
    /// Copy every file in a list through an XRootD redirector.
    Copy(CopyArgs),
    /// Report proxy, CMSSW and tool availability.
    Doctor,
}

#[derive(Args, Debug)]
pub struct XsecArgs {
    #[arg(long, required = true, help = "Dataset to process (repeatable)")]
    pub dataset: Vec<String>,
    #[arg(long, default_value = DEFAULT_XSEC_CFG, help = "cmsRun config for the cross section analyzer")]
    pub cfg: PathBuf,
    #[arg(long, help = "Download location used when the cmsRun config is missing")]
    pub cfg_url: Option<String>,
    #[arg(long, help = "Redirector used to open the sample file")]
    pub redirector: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(help = "Datasets to investigate")]
    pub datasets: Vec<String>,
    #[arg(long, help = "File with one dataset name per line")]
    pub datasets_file: Option<PathBuf>,
    #[arg(long, default_value_t = 10.0, help = "Minimum file size in MB")]
    pub min: f64,
    #[arg(long, default_value_t = 100.0, help = "Maximum file size in MB")]
    pub max: f64,
    #[arg(long, default_value_t = false, help = "Ignore --min and --max")]
    pub no_size_limit: bool,
    #[arg(short = 'n', help = "Number of files to keep per dataset")]
    pub n: Option<usize>,
    #[arg(long, default_value = DEFAULT_LIST_FILE)]
    pub list_out: PathBuf,
    #[arg(long, default_value = DEFAULT_INFO_FILE)]
    pub info_out: PathBuf,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    #[arg(long, default_value = DEFAULT_LIST_FILE, help = "File list written by `cmsfed list`")]
    pub list: PathBuf,
    #[arg(long, default_value = ".", help = "Base directory for copied files")]
    pub dest: PathBuf,
    #[arg(long, help = "Redirector used by xrdcp")]
    pub redirector: Option<String>,
    #[arg(long, default_value_t = false, help = "Print xrdcp commands without running them")]
    pub dry_run: bool,
}
