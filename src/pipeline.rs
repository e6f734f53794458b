use crate::{
    config::Config,
    dispatch::{DispatchOutcome, Dispatcher},
    error::PipelineError,
    layout::SessionLayout,
    renderer::Renderer,
    report::{ReportOutput, build_report},
};
use serde::Serialize;
use tracing::{info, warn};

/// Render, then report. The report stage starts only after every render has returned.
pub struct Pipeline<R: Renderer> {
    cfg: Config,
    dispatcher: Dispatcher<R>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub dispatch: DispatchOutcome,
    pub report: Option<ReportOutput>,
}

impl<R: Renderer> Pipeline<R> {
    pub fn new(cfg: &Config, layout: SessionLayout, renderer: R) -> Self {
        Self {
            cfg: cfg.clone(),
            dispatcher: Dispatcher::new(cfg, layout, renderer),
        }
    }

    pub fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        info!("rendering CFG images under {}", self.dispatcher.layout().root().display());
        let dispatch = self.dispatcher.run()?;

        let report = if dispatch.all_succeeded() || self.cfg.report.build_on_render_failure {
            info!("generating interactive HTML report");
            Some(build_report(&self.cfg, self.dispatcher.layout())?)
        } else {
            warn!(
                "some images failed to render; skipping report \
                 (set report.build_on_render_failure to override)"
            );
            None
        };

        Ok(PipelineOutcome { dispatch, report })
    }
}
