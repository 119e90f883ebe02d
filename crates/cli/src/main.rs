mod commands;

use clap::{ArgAction, Args, CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockpress")]
#[command(version, about = "Render CMS block pages to static HTML", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Where page content comes from
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Path to site configuration
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Read saved GraphQL responses from this directory instead of the CMS
    #[arg(long)]
    content: Option<PathBuf>,
}

#[derive(Parser)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to create site directory
        path: PathBuf,
    },

    /// Render a single page
    Render {
        /// Page slug
        slug: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Fetch draft content through the preview API
        #[arg(long)]
        preview: bool,

        /// Write HTML to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render every page to a static site
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Fetch draft content through the preview API
        #[arg(long)]
        preview: bool,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Preview draft pages locally with live reload
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Check every page for blocks that will not render
    Validate {
        #[command(flatten)]
        source: SourceArgs,

        /// Validate draft content through the preview API
        #[arg(long)]
        preview: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Render {
            slug,
            source,
            preview,
            output,
        } => commands::render::run(slug, source, preview, output).await,
        Command::Build {
            source,
            preview,
            output,
        } => commands::build::run(source, preview, output).await,
        Command::Preview { source, port } => commands::preview::run(source, port).await,
        Command::Validate { source, preview } => commands::validate::run(source, preview).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blockpress", &mut io::stdout());
            Ok(())
        }
    }
}
