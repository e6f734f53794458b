use crate::{config::Config, job::Group};
use std::path::{Path, PathBuf};

/// Every path the pipeline touches, derived from one explicit session root.
#[derive(Debug, Clone)]
pub struct SessionLayout {
    root: PathBuf,
    build_dir: String,
    dot_dir: String,
    visualizations_dir: String,
    comparison_dir: String,
    report_filename: String,
    image_format: String,
}

impl SessionLayout {
    pub fn new(cfg: &Config, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            build_dir: cfg.paths.build_dir.clone(),
            dot_dir: cfg.paths.dot_dir.clone(),
            visualizations_dir: cfg.paths.visualizations_dir.clone(),
            comparison_dir: cfg.paths.comparison_dir.clone(),
            report_filename: cfg.report.filename.clone(),
            image_format: cfg.renderer.format.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(&self.build_dir)
    }

    pub fn dot_dir(&self) -> PathBuf {
        self.build_dir().join(&self.dot_dir)
    }

    pub fn visualizations_dir(&self) -> PathBuf {
        self.build_dir().join(&self.visualizations_dir)
    }

    pub fn image_dir(&self, group: Group) -> PathBuf {
        self.visualizations_dir().join(group.as_str())
    }

    pub fn image_path(&self, group: Group, base_name: &str) -> PathBuf {
        self.image_dir(group)
            .join(format!("{base_name}.{}", self.image_format))
    }

    pub fn image_format(&self) -> &str {
        &self.image_format
    }

    pub fn comparison_dir(&self) -> PathBuf {
        self.visualizations_dir().join(&self.comparison_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.comparison_dir().join(&self.report_filename)
    }

    pub fn default_log_path(&self) -> PathBuf {
        self.build_dir().join("logs").join("cfg-compare.log")
    }

    /// `/`-separated path of an image relative to the build directory.
    pub fn relative_image_path(&self, group: Group, file_name: &str) -> String {
        let mut parts = split_components(&self.visualizations_dir);
        parts.push(group.as_str().to_string());
        parts.push(file_name.to_string());
        parts.join("/")
    }

    /// Relative hop from the comparison directory back up to the build directory.
    pub fn image_prefix(&self) -> String {
        let depth = split_components(&self.visualizations_dir).len()
            + split_components(&self.comparison_dir).len();
        "../".repeat(depth)
    }
}

fn split_components(raw: &str) -> Vec<String> {
    raw.split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}
