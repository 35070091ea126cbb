use std::env;
use std::error::Error;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, error::ErrorKind};

use crate::config::PipelineConfig;
use crate::constants::export::TOP_DEVELOPERS;
use crate::constants::inputs::{PROJECTS_ENV, TAXONOMY_ENV};
use crate::data::TechnologyType;
use crate::export::{ExportFormat, export_to_path};
use crate::pipeline::Pipeline;
use crate::summary::{ProjectFilter, SnapshotSummary};

#[derive(Debug, Parser)]
#[command(
    name = "re_milestones",
    disable_help_subcommand = true,
    about = "Normalize renewable-energy project sheets and assign demo milestones",
    long_about = "Load an under-construction project sheet and a checkpoint/milestone taxonomy, normalize and classify every project, then attach a seeded synthetic checkpoint, milestone and date to each one.",
    after_help = "Input paths are resolved in order by explicit arg, environment variables (RE_MILESTONES_PROJECTS, RE_MILESTONES_TAXONOMY), then built-in file names. Checkpoint, milestone and date columns are synthetic demo data."
)]
struct PipelineCli {
    #[arg(
        long = "projects",
        value_name = "PATH",
        help = "Project sheet (xlsx/xls/ods/csv/tsv); repeat to give fallbacks tried in order"
    )]
    projects: Vec<PathBuf>,
    #[arg(
        long = "projects-sheet",
        value_name = "SHEET",
        help = "Workbook sheet holding project rows [default: Under Construction Projects]"
    )]
    projects_sheet: Option<String>,
    #[arg(long, value_name = "PATH", help = "Checkpoint/milestone taxonomy sheet")]
    taxonomy: Option<PathBuf>,
    #[arg(
        long = "taxonomy-sheet",
        value_name = "SHEET",
        help = "Workbook sheet holding the taxonomy [default: Sheet1]"
    )]
    taxonomy_sheet: Option<String>,
    #[arg(long, help = "Seed for the synthetic assignment [default: 42]")]
    seed: Option<u64>,
    #[arg(
        long = "window-days",
        value_name = "DAYS",
        help = "Width of the synthetic date window [default: 730]"
    )]
    window_days: Option<u32>,
    #[arg(
        long = "anchor-date",
        value_name = "YYYY-MM-DD",
        help = "Last day of the synthetic date window [default: today]"
    )]
    anchor_date: Option<NaiveDate>,
    #[arg(
        long,
        value_name = "PATH",
        default_value = "-",
        help = "Output file, or - for stdout"
    )]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
    #[arg(
        long,
        help = "Write the snapshot summary as JSON instead of the project rows"
    )]
    summary: bool,
    #[arg(
        long = "top-developers",
        value_name = "N",
        default_value_t = TOP_DEVELOPERS,
        help = "Developers listed in the summary"
    )]
    top_developers: usize,
    #[arg(long, value_name = "TYPE", help = "Keep only this technology type")]
    technology: Option<TechnologyType>,
    #[arg(long, value_name = "NAME", help = "Keep only this checkpoint")]
    checkpoint: Option<String>,
    #[arg(long, value_name = "NAME", help = "Keep only this milestone")]
    milestone: Option<String>,
}

/// Entry point used by the `re_milestones` binary.
pub fn run_cli<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let Some(cli) = parse_cli::<PipelineCli, _>(
        std::iter::once("re_milestones".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };
    run_parsed(cli, |name| env::var_os(name))
}

fn run_parsed<E>(cli: PipelineCli, env_lookup: E) -> Result<(), Box<dyn Error>>
where
    E: Fn(&str) -> Option<OsString>,
{
    let config = build_config(&cli, &env_lookup);
    let outcome = Pipeline::new(config).run();
    for notice in &outcome.notices {
        eprintln!("notice: {notice}");
    }
    if !outcome.assigned.is_empty() && outcome.assigned.provenance.is_synthetic() {
        eprintln!(
            "note: Checkpoint, Milestone and Milestone_Start_Date are synthetic demo data ({:?})",
            outcome.assigned.provenance
        );
    }

    let filter = ProjectFilter {
        technology: cli.technology,
        group: cli.checkpoint.clone(),
        item: cli.milestone.clone(),
    };
    let rows = filter.apply(&outcome.assigned.rows);

    if cli.summary {
        let summary = if outcome.assigned.is_empty() && filter.is_empty() {
            SnapshotSummary::from_projects(&outcome.projects, cli.top_developers)
        } else {
            SnapshotSummary::from_assigned(rows, &outcome.taxonomy, cli.top_developers)
        };
        write_summary(&summary, &cli.output)?;
    } else {
        export_to_path(rows, cli.format, &cli.output)?;
    }
    Ok(())
}

/// Explicit args win, then environment variables, then built-in defaults.
fn build_config<E>(cli: &PipelineCli, env_lookup: &E) -> PipelineConfig
where
    E: Fn(&str) -> Option<OsString>,
{
    let mut config = PipelineConfig::default();

    let project_paths: Vec<PathBuf> = if !cli.projects.is_empty() {
        cli.projects.clone()
    } else {
        env_lookup(PROJECTS_ENV)
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default()
    };
    if !project_paths.is_empty() {
        config = config.with_project_paths(project_paths);
    }
    if let Some(taxonomy) = cli
        .taxonomy
        .clone()
        .or_else(|| env_lookup(TAXONOMY_ENV).map(PathBuf::from))
    {
        config = config.with_taxonomy_path(taxonomy);
    }

    if let Some(sheet) = &cli.projects_sheet {
        config = config.with_project_sheet(Some(sheet.clone()));
    }
    if let Some(sheet) = &cli.taxonomy_sheet {
        config = config.with_taxonomy_sheet(Some(sheet.clone()));
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(window_days) = cli.window_days {
        config = config.with_window_days(window_days);
    }
    if let Some(anchor_date) = cli.anchor_date {
        config = config.with_anchor_date(anchor_date);
    }
    config
}

fn write_summary(summary: &SnapshotSummary, output: &Path) -> Result<(), Box<dyn Error>> {
    if output == Path::new("-") {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, summary)?;
        writeln!(stdout)?;
    } else {
        let mut writer = BufWriter::new(File::create(output)?);
        serde_json::to_writer_pretty(&mut writer, summary)?;
        writeln!(writer)?;
        writer.flush()?;
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
