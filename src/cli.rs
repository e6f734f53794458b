use crate::{
    config::Config,
    dispatch::Dispatcher,
    layout::SessionLayout,
    pipeline::Pipeline,
    renderer::GraphvizRenderer,
    report::{build_index, build_report},
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::writer::MakeWriterExt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[command(name = "cfg-compare")]
#[command(about = "Render original/obfuscated CFG .dot files and build a side-by-side HTML report")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./cfg-compare.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Session root holding build/dot_files. Overrides paths.session_root.
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the renderer is installed and report its version.
    Doctor {},
    /// Render every .dot file into the visualizations directory.
    Render {},
    /// Print the comparison index built from the images on disk.
    Index {},
    /// Write the HTML comparison report from the images on disk.
    Report {},
    /// Render, then write the report.
    Run {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            // Still need a subscriber so main can report the failure.
            let _ = init_logging(&args, &Config::default(), None);
            return Err(err);
        }
    };
    let layout = SessionLayout::new(&cfg, &session_root(&args, &cfg));

    let log_path = match &args.cmd {
        Command::Doctor {} | Command::Index {} => None,
        _ => resolve_log_path(&cfg, &layout),
    };
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Render {} => render(&cfg, layout),
        Command::Index {} => index(&cfg, &layout),
        Command::Report {} => report(&cfg, &layout),
        Command::Run {} => run(&cfg, layout),
    }
}

fn load_config(user: Option<&Path>) -> Result<Config> {
    match resolve_config_path(user) {
        Some(path) => Config::load(&path),
        None => Ok(Config::default()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("cfg-compare.toml");
    default.exists().then_some(default)
}

fn session_root(args: &Args, cfg: &Config) -> PathBuf {
    args.session
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.session_root))
}

fn init_logging(
    args: &Args,
    cfg: &Config,
    file_path: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Warnings and errors on stderr, progress on stdout.
    let console = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    let console_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(console)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(console)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let renderer = GraphvizRenderer::new(cfg)?;
    let diag = renderer.doctor();
    println!("{}", serde_json::to_string_pretty(&diag)?);
    if !diag.ok {
        return Err(anyhow!(
            "renderer check failed: {}",
            diag.error.unwrap_or_default()
        ));
    }
    Ok(())
}

fn render(cfg: &Config, layout: SessionLayout) -> Result<()> {
    let renderer = GraphvizRenderer::new(cfg)?;
    let root = layout.root().to_path_buf();
    let dispatcher = Dispatcher::new(cfg, layout, renderer);
    let outcome = dispatcher
        .run()
        .with_context(|| format!("rendering session {}", root.display()))?;

    if cfg.output.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "session": root,
                "dispatch": outcome.summary_json(),
            }))?
        );
    }
    Ok(())
}

fn index(cfg: &Config, layout: &SessionLayout) -> Result<()> {
    let index = build_index(layout, &cfg.report.collection_id)?;
    println!("{}", serde_json::to_string_pretty(&index)?);
    Ok(())
}

fn report(cfg: &Config, layout: &SessionLayout) -> Result<()> {
    let out = build_report(cfg, layout).with_context(|| "writing comparison report")?;
    if cfg.output.print_summary {
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    Ok(())
}

fn run(cfg: &Config, layout: SessionLayout) -> Result<()> {
    let started = now_rfc3339();
    let root = layout.root().to_path_buf();

    let renderer = GraphvizRenderer::new(cfg)?;
    info!("using renderer {}", renderer.exe().display());
    let pipeline = Pipeline::new(cfg, layout, renderer);
    let outcome = pipeline
        .run()
        .with_context(|| format!("running session {}", root.display()))?;

    if let Some(report) = &outcome.report {
        info!("created comparison viewer at {}", report.path.display());
    }

    let status = if outcome.dispatch.all_succeeded() {
        "ok"
    } else {
        "partial"
    };

    if cfg.output.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "session": root,
                "started": started,
                "finished": now_rfc3339(),
                "dispatch": outcome.dispatch.summary_json(),
                "report": outcome.report,
                "status": status,
            }))?
        );
    }
    Ok(())
}

fn resolve_log_path(cfg: &Config, layout: &SessionLayout) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    // A mistyped --session must not leave a build/logs tree behind.
    layout
        .build_dir()
        .is_dir()
        .then(|| layout.default_log_path())
}
