use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pr_changelog::render::{insert_release, referenced_pull_requests, release_heading, remove_release};
use pr_changelog::{
    render, BoundaryRef, ChangelogConfig, ChangelogPipeline, Config, Error, ErrorKind,
    GitHubClient, OutputFormat, PipelineConfig, RenderOptions, RepoSlug, VersionBoundary,
};

#[derive(Parser, Debug)]
#[command(name = "pr-changelog")]
#[command(version)]
#[command(about = "Generate a categorized changelog from merged GitHub pull requests")]
struct Args {
    /// Repository as OWNER/REPO
    repository: RepoSlug,

    /// Start of the range (tag, commit SHA or date), inclusive
    from: BoundaryRef,

    /// End of the range (tag, commit SHA or date), exclusive; HEAD leaves the range open
    #[arg(default_value = "HEAD")]
    to: BoundaryRef,

    /// Changelog rules file (defaults to .changelog.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Existing CHANGELOG file to update in place; PRs it already lists are skipped
    #[arg(long, conflicts_with = "output")]
    changelog: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (markdown, text, json)
    #[arg(short, long, default_value = "markdown")]
    format: OutputFormat,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Hide progress output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            exit_code(&e)
        }
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("pr_changelog={}", level).parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn exit_code(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<Error>().map(Error::kind) {
        Some(ErrorKind::Configuration) => ExitCode::from(2),
        Some(ErrorKind::BoundaryResolution) => ExitCode::from(3),
        Some(ErrorKind::Fetch) => ExitCode::from(4),
        Some(ErrorKind::Io) | None => ExitCode::from(1),
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    // Validate everything before touching the network
    let config = Config::from_env()?;
    let changelog_config = ChangelogConfig::discover(args.config.as_deref(), Path::new("."))?;
    let mut pipeline_config = PipelineConfig::try_from(&changelog_config)?;

    if args.changelog.is_some() && args.format != OutputFormat::Markdown {
        return Err(Error::Config("--changelog only supports the markdown format".to_string()).into());
    }

    let boundary = VersionBoundary::new(args.from, args.to);

    // A section for this same range is regenerated, so its entries are not skipped
    let existing = match &args.changelog {
        Some(path) => read_existing(path)?,
        None => String::new(),
    };
    let earlier_releases = remove_release(&existing, &release_heading(&boundary.to_string()));
    pipeline_config.selection.skip_pull_requests =
        referenced_pull_requests(&earlier_releases, &args.repository);
    if !pipeline_config.selection.skip_pull_requests.is_empty() {
        tracing::info!(
            "Skipping {} pull requests already in the changelog",
            pipeline_config.selection.skip_pull_requests.len()
        );
    }

    let mut client = GitHubClient::new(&config, args.repository.clone())?;
    if !args.quiet {
        client = client.with_progress();
    }

    let pipeline = ChangelogPipeline::new(client, pipeline_config);
    let changelog = pipeline.generate(&boundary).await?;

    let options = RenderOptions {
        format: args.format,
        repository: Some(args.repository),
    };
    let output = render(&changelog, &options)?;

    if let Some(path) = &args.changelog {
        std::fs::write(path, insert_release(&existing, &output)).map_err(Error::from)?;
        tracing::info!("Changelog updated: {}", path.display());
    } else if let Some(path) = &args.output {
        std::fs::write(path, &output).map_err(Error::from)?;
        tracing::info!("Output written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn read_existing(path: &Path) -> pr_changelog::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("{} does not exist yet, it will be created", path.display());
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}
