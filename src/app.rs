//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - reads curve files or client directories
//! - prints tables/plots and writes optional exports

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{ChartArgs, ClientsArgs, Command, CompareArgs, DriftArgs, ExportArgs, PlotArgs, ShowArgs};
use crate::clients::ClientTimeline;
use crate::domain::LineGrammar;
use crate::error::AppError;
use crate::io::{client_files, client_id, load_client_dir, load_client_window, read_curve_file, write_series_csv};
use crate::plot::{PlotSeries, render_curves, write_svg};
use crate::report::{format_comparison, format_curve_table, format_drift, format_timestamp};
use crate::sample::rejection_sample;

/// Entry point for the `mrc` binary.
pub fn run() -> Result<(), AppError> {
    // A project-local `.env` may carry RUST_LOG.
    dotenvy::dotenv().ok();
    init_logger();

    let cli = crate::cli::Cli::parse();
    let grammar = cli.grammar;

    match cli.command {
        Command::Show(args) => handle_show(args, grammar),
        Command::Plot(args) => handle_plot(args, grammar),
        Command::Compare(args) => handle_compare(args, grammar),
        Command::Drift(args) => handle_drift(args, grammar),
        Command::Clients(args) => handle_clients(args),
        Command::Export(args) => handle_export(args, grammar),
    }
}

/// Log to stderr; `RUST_LOG` overrides the `info` default.
pub fn init_logger() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_show(args: ShowArgs, grammar: LineGrammar) -> Result<(), AppError> {
    let curve = read_curve_file(&args.file, grammar)?;
    let table = format_curve_table(&curve).map_err(|e| AppError::from(e).context(args.file.display()))?;
    print!("{table}");
    Ok(())
}

fn handle_plot(args: PlotArgs, grammar: LineGrammar) -> Result<(), AppError> {
    let mut series = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let curve = read_curve_file(path, grammar)?;
        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let s = PlotSeries::from_curve(label, &curve, args.chart.axis)
            .map_err(|e| AppError::from(e).context(path.display()))?;
        series.push(s);
    }
    emit_chart(&series, &args.chart, args.chart.svg.as_deref())
}

fn handle_compare(args: CompareArgs, grammar: LineGrammar) -> Result<(), AppError> {
    let a = read_curve_file(&args.a, grammar)?;
    let b = read_curve_file(&args.b, grammar)?;
    let mae = a.mean_absolute_error(&b)?;

    let a_name = args.a.display().to_string();
    let b_name = args.b.display().to_string();
    print!("{}", format_comparison(&a_name, &b_name, &a, &b, mae));
    Ok(())
}

fn handle_drift(args: DriftArgs, grammar: LineGrammar) -> Result<(), AppError> {
    let only = match args.sample {
        Some(k) => Some(sample_clients(&args, k)?),
        None if !args.clients.is_empty() => Some(args.clients.clone()),
        None => None,
    };

    let set = load_client_dir(&args.dir, grammar, only.as_deref())?;
    if let Some(wanted) = &only {
        for id in wanted.iter().filter(|id| set.get(id).is_none()) {
            warn!(client = %id, "no client file found");
        }
    }

    for (id, timeline) in set.iter() {
        let drift = timeline.drift().map_err(|e| AppError::from(e).context(format!("client {id}")))?;
        print!("{}", format_drift(id, timeline, &drift));
        if args.plot {
            plot_timeline(id, timeline, &args.chart)?;
        }
        println!();
    }
    Ok(())
}

fn sample_clients(args: &DriftArgs, k: usize) -> Result<Vec<String>, AppError> {
    let ids = client_files(&args.dir)?
        .iter()
        .map(|p| client_id(p))
        .collect::<Result<Vec<_>, _>>()?;

    let span_ok = |id: &String| match load_client_window(&args.dir.join(format!("{id}.json"))) {
        Ok(w) => w.last_ts.saturating_sub(w.first_ts) >= args.min_span,
        Err(e) => {
            warn!(client = %id, error = %e, "skipping unreadable client");
            false
        }
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let chosen = rejection_sample(&ids, span_ok, k, &mut rng)?;
    info!(requested = k, candidates = ids.len(), "sampled clients");
    Ok(chosen.into_iter().collect())
}

fn plot_timeline(id: &str, timeline: &ClientTimeline, chart: &ChartArgs) -> Result<(), AppError> {
    let series = timeline
        .iter()
        .map(|(ts, curve)| PlotSeries::from_curve(format!("t={ts}"), curve, chart.axis))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::from(e).context(format!("client {id}")))?;

    let svg = chart.svg.as_deref().map(|path| per_client_path(path, id));
    emit_chart(&series, chart, svg.as_deref())
}

/// `charts/drift.svg` + client `7` -> `charts/drift-7.svg`.
fn per_client_path(path: &Path, id: &str) -> PathBuf {
    let stem = path.file_stem().map_or(Cow::Borrowed("drift"), |s| s.to_string_lossy());
    path.with_file_name(format!("{stem}-{id}.svg"))
}

fn handle_clients(args: ClientsArgs) -> Result<(), AppError> {
    for path in client_files(&args.dir)? {
        let id = client_id(&path)?;
        let window = load_client_window(&path)?;
        println!(
            "{id:<16} {} .. {}",
            format_timestamp(window.first_ts),
            format_timestamp(window.last_ts)
        );
    }
    Ok(())
}

fn handle_export(args: ExportArgs, grammar: LineGrammar) -> Result<(), AppError> {
    let curve = read_curve_file(&args.file, grammar)?;
    write_series_csv(&args.out, &curve, args.axis).map_err(|e| e.context(args.file.display()))?;
    info!(path = %args.out.display(), points = curve.len(), "wrote series CSV");
    Ok(())
}

fn emit_chart(series: &[PlotSeries], chart: &ChartArgs, svg: Option<&Path>) -> Result<(), AppError> {
    match svg {
        Some(path) => {
            write_svg(path, series, chart.axis, (1024, 768))?;
            info!(path = %path.display(), "wrote chart");
        }
        None => print!("{}", render_curves(series, chart.axis, chart.width, chart.height, chart.log_x)),
    }
    Ok(())
}
