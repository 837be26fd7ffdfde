mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{CheckArgs, Cli, Commands, RangeToken, SplitArgs};
use pdf_range_splitter::{
    HttpSplitService, JobBuilder, PdfSplitterError, RangeField, RangeId, ResultDelivery, Result,
    ServiceConfig, SourceFile, SplitSession,
};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = ServiceConfig::new(&cli.service_url)
        .with_context(|| format!("Invalid service URL '{}'", cli.service_url))?;
    config.timeout = Duration::from_secs(cli.timeout);

    let result = match &cli.command {
        Commands::Split(args) => handle_split_command(args, &config, &cli.output).await,
        Commands::Check(args) => handle_check_command(args, &config).await,
        Commands::Health => handle_health_command(&config).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn open_session(file: &Path, tokens: &[RangeToken], config: &ServiceConfig) -> Result<SplitSession> {
    let source = SourceFile::open(file).await?;
    let mut session = SplitSession::new(source, config.reset_delay);

    for (idx, token) in tokens.iter().enumerate() {
        let id = if idx == 0 {
            session.ranges()[0].id
        } else {
            session.create_range()?
        };

        if let Some(start) = &token.start {
            apply_field(&mut session, id, RangeField::Start, start)?;
        }
        if let Some(end) = &token.end {
            apply_field(&mut session, id, RangeField::End, end)?;
        }
    }

    Ok(session)
}

fn apply_field(session: &mut SplitSession, id: RangeId, field: RangeField, value: &str) -> Result<()> {
    if !session.update_range_field(id, field, value)? {
        warn!("Range {}: ignored non-numeric value '{}'", id, value);
    }
    Ok(())
}

async fn handle_split_command(args: &SplitArgs, config: &ServiceConfig, output_dir: &Path) -> Result<()> {
    let mut session = open_session(&args.file, &args.ranges, config).await?;
    session.set_merge(args.merge)?;

    let service = HttpSplitService::new(config)?;
    let job = session.submit(&service).await?;
    info!(
        "Split '{}' into ranges {}{}",
        job.source.name,
        job.range_spec(),
        if job.merge { " (merged)" } else { "" }
    );

    let artifact = match session.take_artifact() {
        Some(artifact) => artifact,
        None => return Err(PdfSplitterError::SplitService),
    };
    let size = artifact.bytes.len();

    let output_file = ResultDelivery::deliver(artifact, &session.source().name, output_dir).await?;
    if args.report {
        ResultDelivery::write_report(&job, &output_file, size).await?;
    }

    info!("Split completed: {} ({} bytes)", output_file.display(), size);
    Ok(())
}

async fn handle_check_command(args: &CheckArgs, config: &ServiceConfig) -> Result<()> {
    let session = open_session(&args.file, &args.ranges, config).await?;

    println!("\n=== Ranges for '{}' ===", session.source().name);
    for (idx, range) in session.ranges().iter().enumerate() {
        let caption = if range.is_complete() {
            format!("Pages {} - {}", range.start, range.end)
        } else {
            "incomplete, will be skipped".to_string()
        };
        println!("  Range {}: {}", idx + 1, caption);
    }

    let spans = session.validated_ranges()?;
    let job = JobBuilder::build(spans, session.merge(), session.source());
    println!("Range specification: {}", job.range_spec());
    Ok(())
}

async fn handle_health_command(config: &ServiceConfig) -> Result<()> {
    let service = HttpSplitService::new(config)?;
    info!("Checking {}", service.health_url()?);

    if service.health().await? {
        println!("Split service is healthy");
        Ok(())
    } else {
        Err(PdfSplitterError::SplitService)
    }
}
