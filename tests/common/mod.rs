#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_COC: &str = r#"#!/bin/sh
log="$BERRYGEN_FAKE_LOG"
pwd -P > "$log"
for a in "$@"; do printf '%s\n' "$a" >> "$log"; done
ls -A generate > "$log.listing" 2>/dev/null
mkdir -p generate
: > generate/be_fixed_map.h
exit "${BERRYGEN_FAKE_EXIT:-0}"
"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub project: PathBuf,
    pub python: PathBuf,
    pub log: PathBuf,
    pub workdir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let project = make_fixture_project(tmp.path());
        let python = write_fake_interpreter(tmp.path());
        let workdir = tmp.path().join("caller");
        fs::create_dir_all(&workdir).expect("create caller dir");

        Self {
            log: tmp.path().join("coc.log"),
            _tmp: tmp,
            project,
            python,
            workdir,
        }
    }

    /// Command with a scrubbed environment pointing at the fixture project.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("berrygen");
        cmd.current_dir(&self.workdir)
            .env_remove("BERRYGEN_CONFIG_PATH")
            .env_remove("BERRYGEN_PROJECT_DIR")
            .env_remove("BERRYGEN_PYTHON")
            .env_remove("BERRYGEN_BUILD_FLAGS")
            .env_remove("PLATFORMIO_BUILD_FLAGS")
            .env("BERRYGEN_LOG", "off")
            .env("BERRYGEN_FAKE_LOG", &self.log)
            .arg("--project-dir")
            .arg(&self.project)
            .arg("--python")
            .arg(&self.python);
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

    pub fn generate_dir(&self) -> PathBuf {
        self.project.join("lib/berry/generate")
    }

    pub fn berry_dir(&self) -> PathBuf {
        self.project.join("lib/berry")
    }

    /// First line is the tool's working directory, the rest its arguments.
    pub fn recorded_call(&self) -> Option<(PathBuf, Vec<String>)> {
        let raw = fs::read_to_string(&self.log).ok()?;
        let mut lines = raw.lines();
        let cwd = PathBuf::from(lines.next()?);
        Some((cwd, lines.map(str::to_string).collect()))
    }

    /// Contents of the generate directory as seen by the tool on startup.
    pub fn listing_at_invocation(&self) -> String {
        let mut path = self.log.clone().into_os_string();
        path.push(".listing");
        fs::read_to_string(path).unwrap_or_default()
    }
}

fn make_fixture_project(base: &Path) -> PathBuf {
    let project = base.join("firmware");
    let berry = project.join("lib/berry");

    fs::create_dir_all(berry.join("generate")).expect("create generate dir");
    fs::create_dir_all(berry.join("src")).expect("create berry src");
    fs::create_dir_all(berry.join("tools/coc")).expect("create coc dir");
    fs::create_dir_all(project.join("lib/berry_port")).expect("create port dir");
    fs::create_dir_all(project.join("lib/berry_mapping/src")).expect("create mapping dir");

    fs::write(berry.join("tools/coc/coc"), "# generator entry point\n").expect("write coc");
    fs::write(
        project.join("lib/berry_port/berry_conf.h"),
        "#define BE_STACK_START 50\n",
    )
    .expect("write berry_conf.h");
    fs::write(berry.join("generate/a.bin"), "stale").expect("write a.bin");
    fs::write(berry.join("generate/b.bin"), "stale").expect("write b.bin");

    project
}

fn write_fake_interpreter(base: &Path) -> PathBuf {
    let bin = base.join("bin");
    fs::create_dir_all(&bin).expect("create bin dir");
    let path = bin.join("fake-python");
    fs::write(&path, FAKE_COC).expect("write fake interpreter");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).expect("stat").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod fake interpreter");
    }
    path
}
