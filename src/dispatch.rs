use crate::{
    config::Config,
    error::PipelineError,
    job::{ConversionJob, Group, JobResult, JobStatus, discover_inputs},
    layout::SessionLayout,
    renderer::Renderer,
    util::ensure_dir,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

pub struct Dispatcher<R: Renderer> {
    cfg: Config,
    layout: SessionLayout,
    renderer: R,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub results: Vec<JobResult>,
    pub all_succeeded: bool,
}

impl DispatchSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The input directory exists but holds nothing to render.
    NoInputs,
    Completed(DispatchSummary),
}

impl DispatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        match self {
            DispatchOutcome::NoInputs => true,
            DispatchOutcome::Completed(summary) => summary.all_succeeded,
        }
    }

    pub fn results(&self) -> &[JobResult] {
        match self {
            DispatchOutcome::NoInputs => &[],
            DispatchOutcome::Completed(summary) => &summary.results,
        }
    }

    /// Counts plus one `{source, diagnostic}` entry per failed job, as printed by the CLI.
    pub fn summary_json(&self) -> serde_json::Value {
        let results = self.results();
        let failures: Vec<_> = results
            .iter()
            .filter_map(|r| match &r.status {
                JobStatus::Failed { diagnostic } => Some(serde_json::json!({
                    "source": r.job.source,
                    "diagnostic": diagnostic,
                })),
                JobStatus::Succeeded => None,
            })
            .collect();

        serde_json::json!({
            "no_inputs": matches!(self, DispatchOutcome::NoInputs),
            "jobs": results.len(),
            "succeeded": results.len() - failures.len(),
            "failed": failures.len(),
            "all_succeeded": self.all_succeeded(),
            "failures": failures,
        })
    }
}

impl<R: Renderer> Dispatcher<R> {
    pub fn new(cfg: &Config, layout: SessionLayout, renderer: R) -> Self {
        Self {
            cfg: cfg.clone(),
            layout,
            renderer,
        }
    }

    pub fn layout(&self) -> &SessionLayout {
        &self.layout
    }

    pub fn run(&self) -> Result<DispatchOutcome, PipelineError> {
        let dot_dir = self.layout.dot_dir();
        let jobs = discover_inputs(&dot_dir, &self.cfg.renderer.input_extension)?;

        for group in Group::ALL {
            ensure_dir(&self.layout.image_dir(group))?;
        }

        if jobs.is_empty() {
            warn!(
                "no .{} files found under {}; nothing to render",
                self.cfg.renderer.input_extension,
                dot_dir.display()
            );
            return Ok(DispatchOutcome::NoInputs);
        }

        let summary = self.render_all(jobs)?;
        if summary.all_succeeded {
            info!("rendered {} images", summary.succeeded());
        } else {
            error!(
                "{} of {} images failed to render",
                summary.failed(),
                summary.results.len()
            );
        }
        Ok(DispatchOutcome::Completed(summary))
    }

    /// Renders every job on a pool sized to the host. Results come back in submission
    /// order regardless of completion order.
    pub fn render_all(&self, jobs: Vec<ConversionJob>) -> Result<DispatchSummary, PipelineError> {
        let total = jobs.len();
        let units = self.work_units(jobs);
        let workers = self.worker_count();
        info!("rendering {total} graphs on {workers} workers");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("render-{i}"))
            .build()?;

        let per_unit: Vec<Vec<JobResult>> = pool.install(|| {
            units
                .par_iter()
                .map(|unit| unit.iter().map(|job| self.render_one(job)).collect::<Vec<_>>())
                .collect()
        });

        let mut results: Vec<JobResult> = per_unit.into_iter().flatten().collect();
        results.sort_by_key(|r| r.job.ordinal);
        let all_succeeded = results.iter().all(JobResult::succeeded);

        Ok(DispatchSummary {
            results,
            all_succeeded,
        })
    }

    pub fn render_one(&self, job: &ConversionJob) -> JobResult {
        let output = self.output_path(job);
        debug!("job {} running: {}", job.ordinal, job.source.display());

        let status = match self.renderer.render(&job.source, &output) {
            Ok(()) => {
                debug!("job {} succeeded: {}", job.ordinal, output.display());
                JobStatus::Succeeded
            }
            Err(failure) => {
                error!(
                    "failed to render {}: {}",
                    job.source.display(),
                    failure.diagnostic
                );
                JobStatus::Failed {
                    diagnostic: failure.diagnostic,
                }
            }
        };

        JobResult {
            job: job.clone(),
            output,
            status,
        }
    }

    pub fn output_path(&self, job: &ConversionJob) -> PathBuf {
        self.layout.image_path(job.group, &job.base_name())
    }

    /// Jobs that would write the same image share one unit and run in listing order, so
    /// no two workers touch the same file and the last listed source wins.
    fn work_units(&self, jobs: Vec<ConversionJob>) -> Vec<Vec<ConversionJob>> {
        let mut slots: HashMap<PathBuf, usize> = HashMap::new();
        let mut units: Vec<Vec<ConversionJob>> = Vec::new();

        for job in jobs {
            let output = self.output_path(&job);
            match slots.get(&output) {
                Some(&i) => {
                    warn!(
                        "{} normalizes onto existing output {}; last in listing order wins",
                        job.source.display(),
                        output.display()
                    );
                    units[i].push(job);
                }
                None => {
                    slots.insert(output, units.len());
                    units.push(vec![job]);
                }
            }
        }
        units
    }

    fn worker_count(&self) -> usize {
        if self.cfg.dispatch.workers > 0 {
            return self.cfg.dispatch.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
