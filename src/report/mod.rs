pub mod html;
pub mod index;

use crate::{
    config::Config,
    error::PipelineError,
    layout::SessionLayout,
    util::{ensure_dir, sha256_hex, write_atomic},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub use index::{ComparisonIndex, ImageEntry, ImagePair, build_index, scan_images};

/// Everything the emitted page knows about; embedded verbatim as one JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub title: String,
    pub collection: String,
    pub image_prefix: String,
    pub index: ComparisonIndex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub path: PathBuf,
    pub entries: usize,
    pub sha256: String,
}

pub fn ensure_output_layout(layout: &SessionLayout) -> Result<PathBuf, PipelineError> {
    let dir = layout.comparison_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}

pub fn report_payload(
    cfg: &Config,
    layout: &SessionLayout,
    index: ComparisonIndex,
) -> ReportPayload {
    ReportPayload {
        title: cfg.report.title.clone(),
        collection: cfg.report.collection_id.clone(),
        image_prefix: layout.image_prefix(),
        index,
    }
}

/// Serializes `payload` into the static shell and replaces `output_path` atomically.
/// Returns the SHA-256 of the written document.
pub fn render_report(payload: &ReportPayload, output_path: &Path) -> Result<String, PipelineError> {
    let doc = html::render_html(payload)?;
    write_atomic(output_path, doc.as_bytes())?;
    Ok(sha256_hex(doc.as_bytes()))
}

pub fn build_report(cfg: &Config, layout: &SessionLayout) -> Result<ReportOutput, PipelineError> {
    ensure_output_layout(layout)?;

    let index = build_index(layout, &cfg.report.collection_id)?;
    let entries = index.len(&cfg.report.collection_id);
    let payload = report_payload(cfg, layout, index);

    let path = layout.report_path();
    let sha256 = render_report(&payload, &path)?;
    info!("comparison report with {entries} entries at {}", path.display());

    Ok(ReportOutput {
        path,
        entries,
        sha256,
    })
}
