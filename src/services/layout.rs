use crate::domain::models::Invocation;
use std::path::{Path, PathBuf};

pub const GENERATE_DIR: &str = "generate";
pub const BERRY_CONF_HEADER: &str = "berry_conf.h";

/// Fixed directory layout of the Berry libraries inside a firmware project.
///
/// The generator runs from `lib/berry`, so every path it receives is
/// relative to that directory.
#[derive(Debug, Clone)]
pub struct BerryLayout {
    project_dir: PathBuf,
    include_mapping: bool,
}

fn arg(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

impl BerryLayout {
    pub fn new(project_dir: impl Into<PathBuf>, include_mapping: bool) -> Self {
        Self {
            project_dir: project_dir.into(),
            include_mapping,
        }
    }

    pub fn berry_dir(&self) -> PathBuf {
        self.project_dir.join("lib").join("berry")
    }

    pub fn generate_dir(&self) -> PathBuf {
        self.berry_dir().join(GENERATE_DIR)
    }

    pub fn tool_path(&self) -> PathBuf {
        Path::new("tools").join("coc").join("coc")
    }

    fn port_dir(&self) -> PathBuf {
        Path::new("..").join("berry_port")
    }

    fn mapping_src_dir(&self) -> PathBuf {
        Path::new("..").join("berry_mapping").join("src")
    }

    /// `<interpreter> tools/coc/coc -o generate src ../berry_port
    /// [../berry_mapping/src] -c ../berry_port/berry_conf.h`
    pub fn coc_invocation(&self, interpreter: &str) -> Invocation {
        let mut args = vec![
            arg(self.tool_path()),
            "-o".to_string(),
            GENERATE_DIR.to_string(),
            "src".to_string(),
            arg(self.port_dir()),
        ];
        if self.include_mapping {
            args.push(arg(self.mapping_src_dir()));
        }
        args.push("-c".to_string());
        args.push(arg(self.port_dir().join(BERRY_CONF_HEADER)));

        Invocation {
            program: interpreter.to_string(),
            args,
            cwd: self.berry_dir(),
        }
    }
}
