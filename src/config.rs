use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub renderer: Renderer,
    #[serde(default)]
    pub dispatch: Dispatch,
    #[serde(default)]
    pub report: Report,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

/// Directory names are relative: `build_dir` to `session_root`, the rest to `build_dir`
/// (`comparison_dir` to `visualizations_dir`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub session_root: String,
    pub build_dir: String,
    pub dot_dir: String,
    pub visualizations_dir: String,
    pub comparison_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            session_root: ".".into(),
            build_dir: "build".into(),
            dot_dir: "dot_files".into(),
            visualizations_dir: "visualizations".into(),
            comparison_dir: "comparison".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Renderer {
    pub exe: String,
    pub format: String,
    pub input_extension: String,
}
impl Default for Renderer {
    fn default() -> Self {
        Self {
            exe: "dot".into(),
            format: "svg".into(),
            input_extension: "dot".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispatch {
    /// 0 sizes the pool to the host's available parallelism.
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub collection_id: String,
    pub title: String,
    pub filename: String,
    pub build_on_render_failure: bool,
}
impl Default for Report {
    fn default() -> Self {
        Self {
            collection_id: "test_program".into(),
            title: "Visual Comparison of Control Flow Graphs".into(),
            filename: "index.html".into(),
            build_on_render_failure: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            print_summary: true,
        }
    }
}
