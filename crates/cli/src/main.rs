mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "skilllinkup")]
#[command(version, about = "Bilingual (nl/en) content site for freelancers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Validate site manifest and locale parity of all content
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Serve the site, rendering pages per request
    Serve {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Reload content on change and refresh open browsers
        #[arg(long)]
        watch: bool,

        /// JSON fixture with posts and comments, replacing the configured store
        #[arg(long)]
        posts: Option<PathBuf>,
    },

    /// Export every content page in every locale as static files
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Serve {
            path,
            port,
            watch,
            posts,
        } => commands::serve::run(path, port, watch, posts).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "skilllinkup", &mut io::stdout());
            Ok(())
        }
    }
}
