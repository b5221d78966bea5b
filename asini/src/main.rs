mod commands;
mod formatting;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use commands::{Context, DistTagAction, TagAction};

#[derive(Parser)]
#[command(name = "asini")]
#[command(about = "Monorepo management on top of git and npm")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to asini.toml; discovered from the working directory when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,

    /// Client used for installs, e.g. yarn
    #[arg(long, global = true)]
    npm_client: Option<String>,

    /// Registry URL passed to npm
    #[arg(long, global = true)]
    registry: Option<String>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show repository state
    Status,
    /// Initialize a git repository
    Init,
    /// Stage a file
    Add { path: PathBuf },
    /// Commit staged changes
    Commit {
        #[arg(short, long)]
        message: String,
    },
    /// Create or delete a tag
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
    /// Push the current branch, then the given tags
    Push { tags: Vec<String> },
    /// Discard working tree changes matching a pattern
    Checkout { pattern: String },
    /// List files changed under a path since a reference
    Changed {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Defaults to the last release tag, or the first commit
        #[arg(long)]
        since: Option<String>,
    },
    /// Install dependencies into a directory without touching its package.json
    Install {
        dir: PathBuf,
        specs: Vec<String>,
    },
    /// Run an npm subcommand in a directory
    Exec {
        subcommand: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Run a package script in a directory
    Run {
        script: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Publish the package in a directory under a dist-tag
    Publish {
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[arg(long, default_value = "latest")]
        tag: String,
    },
    /// Manage registry dist-tags
    DistTag {
        #[command(subcommand)]
        action: DistTagAction,
    },
    /// Check an installed package against a version range
    Satisfied {
        root: PathBuf,
        package: String,
        range: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.cwd.as_deref())?
        .with_registry(cli.registry)
        .with_npm_client(cli.npm_client);
    let ctx = Context::new(&config, cli.cwd);

    match cli.command {
        Commands::Status => commands::cmd_status(&ctx)?,
        Commands::Init => commands::cmd_init(&ctx)?,
        Commands::Add { path } => commands::cmd_add(&ctx, path)?,
        Commands::Commit { message } => commands::cmd_commit(&ctx, message)?,
        Commands::Tag { action } => commands::cmd_tag(&ctx, action)?,
        Commands::Push { tags } => commands::cmd_push(&ctx, tags)?,
        Commands::Checkout { pattern } => commands::cmd_checkout(&ctx, pattern)?,
        Commands::Changed { path, since } => commands::cmd_changed(&ctx, path, since)?,
        Commands::Install { dir, specs } => commands::cmd_install(&ctx, dir, specs).await?,
        Commands::Exec {
            subcommand,
            dir,
            args,
        } => commands::cmd_exec(&ctx, subcommand, dir, args).await?,
        Commands::Run { script, dir, args } => commands::cmd_run(&ctx, script, dir, args).await?,
        Commands::Publish { dir, tag } => commands::cmd_publish(&ctx, dir, tag).await?,
        Commands::DistTag { action } => commands::cmd_dist_tag(&ctx, action)?,
        Commands::Satisfied {
            root,
            package,
            range,
        } => {
            if !commands::cmd_satisfied(&ctx, root, package, range)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
