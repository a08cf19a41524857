#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

pub const CHILD: &str = "/Child/Run3Summer22NanoAODv12-130X-v1/NANOAODSIM";
pub const PARENT: &str = "/Parent/Run3Summer22MiniAODv4-130X-v1/MINIAODSIM";
pub const SAMPLE_A: &str = "/store/mc/Run3Summer22NanoAODv12/Sample/NANOAODSIM/130X/a.root";
pub const SAMPLE_B: &str = "/store/mc/Run3Summer22NanoAODv12/Sample/NANOAODSIM/130X/b.root";
pub const SAMPLE_C: &str = "/store/mc/Run3Summer22NanoAODv12/Sample/NANOAODSIM/130X/c.root";

const VOMS_PROXY_INFO: &str = r#"#!/bin/sh
case "$1" in
  --timeleft) echo 43200 ;;
  -exists) exit 0 ;;
esac
"#;

const VOMS_PROXY_INIT: &str = "#!/bin/sh\nexit 0\n";

// a.root 50 MB, b.root 150 MB, c.root 20 MB
const DASGOCLIENT: &str = r#"#!/bin/sh
q="$*"
case "$q" in
  *"dataset=/Broken/"*) echo "DAS query error" >&2; exit 2 ;;
  *"parent dataset=/Orphan/"*) exit 0 ;;
  *"parent dataset="*) echo "/Parent/Run3Summer22MiniAODv4-130X-v1/MINIAODSIM" ;;
  *"grep file.name"*)
    echo "/store/mc/Run3Summer22NanoAODv12/Sample/NANOAODSIM/130X/a.root 52428800 1000"
    echo "/store/mc/Run3Summer22NanoAODv12/Sample/NANOAODSIM/130X/b.root 157286400 500"
    echo "/store/mc/Run3Summer22NanoAODv12/Sample/NANOAODSIM/130X/c.root 20971520 300"
    ;;
  *"file dataset="*)
    echo "/store/mc/Run3Summer22MiniAODv4/Parent/MINIAODSIM/130X/first.root"
    echo "/store/mc/Run3Summer22MiniAODv4/Parent/MINIAODSIM/130X/second.root"
    ;;
esac
"#;

const CMSRUN: &str = r#"#!/bin/sh
echo "Begin processing the 1st record"
echo "args: $*"
echo "Before matching: total cross section = 13.10 +- 0.06 pb" >&2
echo "After matching: total cross section = 12.34 +- 0.05 pb" >&2
"#;

const XRDCP: &str = r#"#!/bin/sh
echo "$1" >> xrdcp.log
case "$1" in
  *fail*) echo "[ERROR] Server responded with an error" >&2; exit 54 ;;
esac
touch "$2$(basename "$1")"
"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub bin: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let bin = tmp.path().join("bin");
        let work = tmp.path().join("work");
        for d in [&home, &bin, &work] {
            fs::create_dir_all(d).expect("create test dir");
        }
        fs::write(work.join("genXsec_cfg.py"), "# analyzer config\n").expect("write cfg");

        let env = Self {
            _tmp: tmp,
            home,
            bin,
            work,
        };
        env.tool("voms-proxy-info", VOMS_PROXY_INFO);
        env.tool("voms-proxy-init", VOMS_PROXY_INIT);
        env.tool("dasgoclient", DASGOCLIENT);
        env.tool("cmsRun", CMSRUN);
        env.tool("xrdcp", XRDCP);
        env
    }

    /// Installs (or replaces) a fake external tool.
    pub fn tool(&self, name: &str, script: &str) {
        let p = self.bin.join(name);
        fs::write(&p, script).expect("write fake tool");
        fs::set_permissions(&p, fs::Permissions::from_mode(0o755)).expect("chmod fake tool");
    }

    pub fn cmd(&self) -> Command {
        let orig_path = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.bin.clone()];
        paths.extend(std::env::split_paths(&orig_path));
        let path = std::env::join_paths(paths).expect("join PATH");

        let mut cmd = cargo_bin_cmd!("cmsfed");
        cmd.current_dir(&self.work)
            .env("HOME", &self.home)
            .env("PATH", path)
            .env("CMSSW_BASE", "/cvmfs/cms.cern.ch/el9_amd64_gcc11/cms/cmssw/CMSSW_13_0_13")
            .env_remove("CMSFED_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn work_file(&self, name: &str) -> PathBuf {
        self.work.join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.work.join(name)).expect("read work file")
    }

    pub fn write(&self, name: &str, body: &str) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, body).expect("write work file");
        p
    }
}
