pub mod graphviz;
pub mod types;

use crate::error::{PipelineError, RenderFailure};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub use graphviz::GraphvizRenderer;
pub use types::RendererDiag;

/// Turns one graph description into one image file.
pub trait Renderer: Sync {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderFailure>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderFailure> {
        (**self).render(input, output)
    }
}

/// Resolves `name` against `PATH`. Names with a directory part are checked as given.
pub fn locate_renderer(name: &str) -> Result<PathBuf, PipelineError> {
    let search = std::env::var_os("PATH").unwrap_or_default();
    locate_renderer_in(name, &search)
}

pub fn locate_renderer_in(name: &str, search_path: &OsStr) -> Result<PathBuf, PipelineError> {
    let not_found = || PipelineError::ToolNotFound {
        name: name.to_string(),
    };

    let raw = name.trim();
    if raw.is_empty() {
        return Err(not_found());
    }

    let requested = expand_tilde(raw);
    if requested.components().count() > 1 {
        return if is_executable(&requested) {
            Ok(requested)
        } else {
            Err(not_found())
        };
    }

    for dir in std::env::split_paths(search_path) {
        let candidate = dir.join(&requested);
        if is_executable(&candidate) {
            return Ok(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = candidate.with_extension("exe");
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
    }
    Err(not_found())
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
