#![allow(dead_code)]

use cfg_compare::{
    config::Config,
    error::RenderFailure,
    layout::SessionLayout,
    renderer::Renderer,
    report::ReportPayload,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Writes `<svg>` wrapping the input text; refuses inputs that contain `FAIL`.
#[derive(Default)]
pub struct FakeRenderer {
    calls: AtomicUsize,
}

impl FakeRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Renderer for FakeRenderer {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let src = fs::read_to_string(input).map_err(|e| RenderFailure::new(e.to_string()))?;
        if src.contains("FAIL") {
            return Err(RenderFailure::new(format!(
                "Error: {}: syntax error in line 1",
                input.display()
            )));
        }
        fs::write(output, format!("<svg>{}</svg>", src.trim()))
            .map_err(|e| RenderFailure::new(e.to_string()))
    }
}

/// A session root with `build/dot_files/{original,obfuscated}` created and populated.
/// Each entry is `("original/foo.dot", contents)`.
pub fn session_with(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    let dot_dir = tmp.path().join("build").join("dot_files");
    fs::create_dir_all(dot_dir.join("original")).expect("mkdir original");
    fs::create_dir_all(dot_dir.join("obfuscated")).expect("mkdir obfuscated");
    for (rel, contents) in files {
        fs::write(dot_dir.join(rel), contents).expect("write dot");
    }
    tmp
}

pub fn layout(cfg: &Config, root: &Path) -> SessionLayout {
    SessionLayout::new(cfg, root)
}

/// Places finished images straight into the visualizations tree, bypassing rendering.
pub fn put_images(root: &Path, group: &str, names: &[&str]) {
    let dir = root.join("build").join("visualizations").join(group);
    fs::create_dir_all(&dir).expect("mkdir images");
    for name in names {
        fs::write(dir.join(name), format!("<svg>{name}</svg>")).expect("write image");
    }
}

pub fn embedded_payload(html: &str) -> ReportPayload {
    let start_tag = r#"<script type="application/json" id="comparison-data">"#;
    let start = html.find(start_tag).expect("data script") + start_tag.len();
    let end = start + html[start..].find("</script>").expect("script end");
    serde_json::from_str(html[start..end].trim()).expect("payload json")
}
