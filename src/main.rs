//! CLI entry point for termsite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "termsite")]
#[command(author = "Nima Rasooli")]
#[command(version)]
#[command(about = "Content engine for a terminal-themed personal site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API and static file server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site information
    List {
        /// Type of content to list (post, slug, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Render one post to HTML
    Render {
        /// Slug of the post
        slug: String,

        /// Print the table of contents as JSON instead
        #[arg(long)]
        toc: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Comma separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Generate the RSS feed, sitemap and post index
    #[command(alias = "g")]
    Generate,

    /// Clean the public folder
    Clean,

    /// Validate the remote site data document
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "termsite=debug,info"
    } else {
        "termsite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let load = || termsite::Site::new(&base_dir);

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = load()?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            termsite::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let site = load()?;
            termsite::commands::list::run(&site, &r#type)?;
        }

        Commands::Render { slug, toc } => {
            let site = load()?;
            termsite::commands::render::run(&site, &slug, toc)?;
        }

        Commands::New { title, tags } => {
            let site = load()?;
            tracing::info!("Creating new post with title: {}", title);
            termsite::commands::new::run(&site, &title, &tags)?;
        }

        Commands::Generate => {
            let site = load()?;
            tracing::info!("Generating feeds...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            let site = load()?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Check => {
            let site = load()?;
            termsite::commands::check::run(&site).await?;
        }

        Commands::Version => {
            println!("termsite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
