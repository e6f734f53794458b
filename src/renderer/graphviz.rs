use super::{Renderer, locate_renderer, types::RendererDiag};
use crate::{
    config::Config,
    error::{PipelineError, RenderFailure},
};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Shells out to Graphviz: `<exe> -T<format> <input> -o <output>`.
pub struct GraphvizRenderer {
    exe: PathBuf,
    format: String,
}

impl GraphvizRenderer {
    pub fn new(cfg: &Config) -> Result<Self, PipelineError> {
        let exe = locate_renderer(&cfg.renderer.exe)?;
        debug!("renderer resolved to {}", exe.display());
        Ok(Self::with_exe(exe, &cfg.renderer.format))
    }

    pub fn with_exe(exe: impl Into<PathBuf>, format: &str) -> Self {
        Self {
            exe: exe.into(),
            format: format.to_string(),
        }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Runs `<exe> -V`; Graphviz prints its version banner on stderr.
    pub fn doctor(&self) -> RendererDiag {
        let mut diag = RendererDiag {
            exe: self.exe.display().to_string(),
            format: self.format.clone(),
            version: None,
            ok: false,
            error: None,
        };

        match Command::new(&self.exe)
            .arg("-V")
            .stdin(Stdio::null())
            .output()
        {
            Ok(out) => {
                let banner = format!(
                    "{}{}",
                    String::from_utf8_lossy(&out.stderr),
                    String::from_utf8_lossy(&out.stdout)
                );
                diag.version = parse_version(&banner);
                diag.ok = out.status.success();
                if !diag.ok {
                    diag.error = Some(banner.trim().to_string());
                }
            }
            Err(e) => diag.error = Some(format!("spawning {}: {e}", self.exe.display())),
        }
        diag
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderFailure> {
        debug!(
            "{} -T{} {} -o {}",
            self.exe.display(),
            self.format,
            input.display(),
            output.display()
        );
        let out = Command::new(&self.exe)
            .arg(format!("-T{}", self.format))
            .arg(input)
            .arg("-o")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RenderFailure::new(format!("spawning {}: {e}", self.exe.display())))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stderr = stderr.trim();
            return Err(RenderFailure::new(if stderr.is_empty() {
                format!("renderer exited with {}", out.status)
            } else {
                stderr.to_string()
            }));
        }
        Ok(())
    }
}

pub fn parse_version(banner: &str) -> Option<String> {
    let re = Regex::new(r"version\s+([0-9][^\s]*)").ok()?;
    re.captures(banner)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
