//! pdfdesk - Arrange and merge the PDF files of a working directory.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::io::Write;
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pdfdesk::cli::{Cli, Command, MergeArgs, PathsCommand};
use pdfdesk::config::Config;
use pdfdesk::document::DocumentSet;
use pdfdesk::error::PdfDeskError;
use pdfdesk::output::{
    OutputFormatter, create_formatter, display_documents, display_merge_summary, display_outcome,
    display_paths, display_plan, named_path_line,
};
use pdfdesk::registry::{PathRegistry, default_filename};
use pdfdesk::session::{Action, Outcome, Session, expand_selection};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        let code = err
            .downcast_ref::<PdfDeskError>()
            .map(PdfDeskError::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    init_tracing(&config)?;

    let formatter = create_formatter(&config);
    debug!(?config, "starting {} v{}", pdfdesk::NAME, pdfdesk::VERSION);
    formatter.debug(&format!("Working directory: {}", config.working_dir.display()));
    formatter.debug(&format!("Output directory: {}", config.output_dir.display()));

    match cli.command.unwrap_or(Command::List) {
        Command::List => {
            let set = DocumentSet::open(&config).await?;
            display_documents(&formatter, set.records());
        }
        Command::Rotate { file, ccw } => {
            let mut set = DocumentSet::open(&config).await?;
            let direction = Command::rotation(ccw);
            set.rotate(&file, direction).await?;
            formatter.success(&format!("Rotated {file} {direction}"));
        }
        Command::Split { file } => {
            let mut set = DocumentSet::open(&config).await?;
            let pages = set.split(&file).await?;
            if pages.is_empty() {
                formatter.warning(&format!("{file} is not in the working set"));
            } else {
                formatter.success(&format!("Split {file} into {} file(s)", pages.len()));
                for page in &pages {
                    formatter.detail("created", page);
                }
            }
        }
        Command::Delete { file } => {
            let mut set = DocumentSet::open(&config).await?;
            if set.delete(&file).await? {
                formatter.success(&format!("Deleted {file}"));
            } else {
                formatter.warning(&format!("{file} is not in the working set"));
            }
        }
        Command::Merge(args) => merge(&config, &formatter, args).await?,
        Command::Clean => {
            let mut set = DocumentSet::open(&config).await?;
            let deleted = set.delete_all().await?;
            formatter.success(&format!("Deleted {deleted} document(s)"));
        }
        Command::Session => run_session(&config, &formatter).await?,
        Command::Paths { action } => paths(&config, &formatter, action)?,
    }

    Ok(())
}

/// Initialize tracing; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_directive())
            .context("invalid default log directive")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

async fn open_session(config: &Config) -> anyhow::Result<Session> {
    let set = DocumentSet::open(config).await?;
    let registry = PathRegistry::open(&config.registry_file)?;
    Ok(Session::new(set, registry, &config.output_dir))
}

/// Merge the working set, or a selection of it, once.
async fn merge(config: &Config, formatter: &OutputFormatter, args: MergeArgs) -> anyhow::Result<()> {
    let session = open_session(config).await?;

    if !args.only.is_empty() {
        let documents = session.documents();
        let mut set = documents.lock().await;
        let selected = expand_selection(&args.only, &set.filenames())?;
        set.select(&selected);
    }

    if args.dry_run {
        let output = session
            .resolve_destination(args.dest.as_deref(), args.name.as_deref())
            .await?;
        let plan = session.documents().lock().await.plan();

        formatter.info("DRY RUN MODE - No files will be created");
        display_plan(formatter, &plan);
        formatter.info(&format!("Output would be: {}", output.display()));
        return Ok(());
    }

    let filename = args
        .name
        .unwrap_or_else(|| default_filename(Local::now()));
    let outcome = session
        .apply(Action::Merge {
            named: args.dest,
            filename: Some(filename),
        })
        .await?;
    if let Outcome::Merged(summary) = &outcome {
        display_merge_summary(formatter, summary);
    }

    if args.clean {
        let outcome = session.apply(Action::Clean).await?;
        display_outcome(formatter, &outcome);
    }

    Ok(())
}

/// Read actions from stdin until `quit` or end of input.
async fn run_session(config: &Config, formatter: &OutputFormatter) -> anyhow::Result<()> {
    let session = open_session(config).await?;

    formatter.info(&format!(
        "{} v{} - working on {} (type 'help' for actions)",
        pdfdesk::NAME,
        pdfdesk::VERSION,
        config.working_dir.display()
    ));
    display_outcome(formatter, &session.apply(Action::List).await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !formatter.is_quiet() {
            print!("pdfdesk> ");
            std::io::stdout().flush().ok();
        }

        let Some(line) = lines.next_line().await.context("cannot read from stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match session.apply_line(&line).await {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => display_outcome(formatter, &outcome),
            Err(err) => formatter.error(&err.to_string()),
        }
    }

    Ok(())
}

/// Manage the named save paths.
fn paths(
    config: &Config,
    formatter: &OutputFormatter,
    action: Option<PathsCommand>,
) -> anyhow::Result<()> {
    let mut registry = PathRegistry::open(&config.registry_file)?;

    match action.unwrap_or(PathsCommand::List) {
        PathsCommand::List => display_paths(formatter, registry.list()),
        PathsCommand::Add { name, description } => {
            let path = registry.create(&name, &description)?;
            formatter.success(&format!("Created {}", named_path_line(&path)));
        }
        PathsCommand::Edit {
            id,
            name,
            description,
        } => {
            if registry.update(id, &name, &description)? {
                formatter.success(&format!("Updated save path {id}"));
            } else {
                return Err(PdfDeskError::NamedPathNotFound {
                    name: id.to_string(),
                }
                .into());
            }
        }
        PathsCommand::Remove { id } => {
            if registry.delete(id)? {
                formatter.success(&format!("Deleted save path {id}"));
            } else {
                return Err(PdfDeskError::NamedPathNotFound {
                    name: id.to_string(),
                }
                .into());
            }
        }
    }

    Ok(())
}
