//! Catalog CLI - product form and variant tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! catalog-cli migrate
//!
//! # Preview the variant grid a form file produces
//! catalog-cli variants preview product.yaml
//!
//! # Save a product from a form file
//! catalog-cli product save product.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `variants preview` - Print the variant grid for a form file
//! - `product save|show|categories` - Create, update and inspect products
//! - `upload` - Upload a single media file
//! - `sku` / `slug` - Generate SKUs and slugs
//!
//! Set `LOG_FORMAT=json` for JSON log lines. Logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use catalog_core::ProductId;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod form_file;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog product form tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect variant grids
    Variants {
        #[command(subcommand)]
        action: VariantsAction,
    },
    /// Save and inspect products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Upload a media file and print its public URL
    Upload {
        /// File to upload
        file: PathBuf,

        /// Content type, guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Generate SKUs with the configured prefix
    Sku {
        /// Number of SKUs to print
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Print the URL slug for some text
    Slug {
        /// Text to slugify
        text: String,
    },
}

#[derive(Subcommand)]
enum VariantsAction {
    /// Print the variant grid for a form file
    Preview {
        /// Form file (YAML)
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create or update a product from a form file
    Save {
        /// Form file (YAML)
        file: PathBuf,

        /// Existing product to edit
        #[arg(short, long)]
        product: Option<ProductId>,

        /// Save to in-memory storage instead of the database
        #[arg(long, conflicts_with = "product")]
        dry_run: bool,
    },
    /// Print a stored product as JSON
    Show {
        /// Product ID
        id: ProductId,
    },
    /// List active categories
    Categories,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_cli=info,catalog_admin=info".into());

    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Variants { action } => match action {
            VariantsAction::Preview { file, json } => {
                commands::variants::preview(&file, json).await?;
            }
        },
        Commands::Product { action } => match action {
            ProductAction::Save {
                file,
                product,
                dry_run,
            } => commands::product::save(&file, product, dry_run).await?,
            ProductAction::Show { id } => commands::product::show(id).await?,
            ProductAction::Categories => commands::product::categories().await?,
        },
        Commands::Upload { file, content_type } => {
            commands::tools::upload(&file, content_type.as_deref()).await?;
        }
        Commands::Sku { count } => commands::tools::sku(count)?,
        Commands::Slug { text } => commands::tools::slug(&text),
    }
    Ok(())
}
