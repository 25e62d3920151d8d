//! mdcatalog CLI - product catalog on markdown files

use clap::{Parser, Subcommand};
use mdcatalog::catalog::{self, BatchMode, DEFAULT_LOW_STOCK_THRESHOLD};
use mdcatalog::config::{CATALOG_NO_HISTORY_ENV, CATALOG_URI_ENV, DEFAULT_URI};
use mdcatalog::schema::INDEXES;
use mdcatalog::{ConnectOptions, ConnectionUri, Error, Session, VariantSpec};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdcatalog")]
#[command(about = "A markdown-based, git-versioned product catalog", long_about = None)]
struct Cli {
    /// Catalog connection string (file://<path> or a plain path)
    #[arg(short, long, env = CATALOG_URI_ENV, default_value = DEFAULT_URI)]
    uri: String,

    /// Do not record writes in git
    #[arg(long, env = CATALOG_NO_HISTORY_ENV)]
    no_history: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the catalog and insert seed data
    Seed {
        /// JSON file with an array of products (defaults to the bundled sample)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// How invalid items are handled
        #[arg(short, long, value_enum, default_value_t = BatchMode::Ordered)]
        batch: BatchMode,
    },

    /// Remove every product
    Reset,

    /// List all products
    List {
        /// Show ids, names, prices and variant labels only
        #[arg(long)]
        summary: bool,
    },

    /// Show one product by id
    Get { id: String },

    /// Delete one product by id
    Delete { id: String },

    /// Products in a category
    Category { category: String },

    /// Products with a variant of this color
    Color {
        color: String,

        /// Include only the first matching variant of each product
        #[arg(long)]
        projected: bool,
    },

    /// Products with a variant of this size
    Size { size: String },

    /// Products with a variant below the stock threshold
    LowStock {
        #[arg(short, long, default_value_t = DEFAULT_LOW_STOCK_THRESHOLD)]
        threshold: i64,
    },

    /// Products with a variant above the stock threshold
    StockAbove {
        #[arg(allow_negative_numbers = true)]
        threshold: i64,
    },

    /// Append a variant to a product
    AddVariant {
        product: String,
        #[arg(long)]
        color: String,
        #[arg(long)]
        size: String,
        #[arg(long, allow_negative_numbers = true)]
        stock: i64,
    },

    /// Set the stock of a product's first variant with this color
    UpdateStock {
        product: String,
        color: String,
        #[arg(allow_negative_numbers = true)]
        stock: i64,
    },

    /// Remove all variants with this color from a product
    RemoveVariant { product: String, color: String },

    /// Set the stock of one variant, addressed by its id
    UpdateStockById {
        variant_id: String,
        #[arg(allow_negative_numbers = true)]
        stock: i64,
    },

    /// Remove one variant, addressed by its id
    RemoveVariantById { variant_id: String },

    /// Total stock per product
    Stock,

    /// Number of products per category
    Categories,

    /// Search product names
    Search {
        term: String,

        /// Include relevance scores
        #[arg(long)]
        scores: bool,
    },

    /// Run the standard query walkthrough against the catalog
    Demo,

    /// Show catalog status and recent history
    Status {
        /// Number of history entries to show
        #[arg(short, long, default_value_t = 5)]
        log: usize,
    },

    /// List the secondary indexes
    Indexes,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = e.downcast_ref::<Error>().and_then(Error::suggestion) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Indexes = cli.command {
        return list_indexes();
    }

    let uri = ConnectionUri::parse(&cli.uri)?;
    let options = if cli.no_history {
        ConnectOptions::without_history()
    } else {
        ConnectOptions::default()
    };
    let command = cli.command;
    Session::scoped(uri, options, |session| async move {
        execute(&session, command).await
    })
    .await
}

async fn execute(session: &Session, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Seed { file, batch } => seed(session, file, batch).await,
        Commands::Reset => {
            let removed = catalog::reset_catalog(session).await?;
            println!("Removed {} product(s).", removed);
            Ok(())
        }
        Commands::List { summary: true } => print_json(&catalog::list_summaries(session).await?),
        Commands::List { summary: false } => print_json(&catalog::list_all(session).await?),
        Commands::Get { id } => match catalog::get_product(session, &id).await? {
            Some(product) => print_json(&product),
            None => Err(Error::Other(format!("No product with id '{}'", id)).into()),
        },
        Commands::Delete { id } => {
            if catalog::delete_product(session, &id).await? {
                println!("Deleted product {}.", id);
                Ok(())
            } else {
                Err(Error::Other(format!("No product with id '{}'", id)).into())
            }
        }
        Commands::Category { category } => {
            print_json(&catalog::find_by_category(session, &category).await?)
        }
        Commands::Color { color, projected } => {
            let products = if projected {
                catalog::find_by_variant_color_projected(session, &color).await?
            } else {
                catalog::find_by_variant_color(session, &color).await?
            };
            print_json(&products)
        }
        Commands::Size { size } => print_json(&catalog::find_by_size(session, &size).await?),
        Commands::LowStock { threshold } => {
            print_json(&catalog::find_low_stock(session, threshold).await?)
        }
        Commands::StockAbove { threshold } => {
            print_json(&catalog::find_in_stock_above(session, threshold).await?)
        }
        Commands::AddVariant {
            product,
            color,
            size,
            stock,
        } => {
            let variant = VariantSpec::new(color, size, stock);
            match catalog::add_variant(session, &product, variant).await? {
                Some(updated) => print_json(&updated),
                None => Err(Error::ProductNotFound { name: product }.into()),
            }
        }
        Commands::UpdateStock {
            product,
            color,
            stock,
        } => match catalog::update_variant_stock(session, &product, &color, stock).await? {
            Some(updated) => print_json(&updated),
            None => Err(Error::VariantNotFound { product, color }.into()),
        },
        Commands::RemoveVariant { product, color } => {
            match catalog::remove_variant(session, &product, &color).await? {
                Some(removal) => {
                    if removal.removed == 0 {
                        println!("No {} variants on '{}'; nothing removed.", color, product);
                    }
                    print_json(&removal)
                }
                None => Err(Error::ProductNotFound { name: product }.into()),
            }
        }
        Commands::UpdateStockById { variant_id, stock } => {
            match catalog::update_variant_stock_by_id(session, &variant_id, stock).await? {
                Some(updated) => print_json(&updated),
                None => Err(Error::VariantIdNotFound { id: variant_id }.into()),
            }
        }
        Commands::RemoveVariantById { variant_id } => {
            match catalog::remove_variant_by_id(session, &variant_id).await? {
                Some(updated) => print_json(&updated),
                None => Err(Error::VariantIdNotFound { id: variant_id }.into()),
            }
        }
        Commands::Stock => print_json(&catalog::total_stock_by_product(session).await?),
        Commands::Categories => print_json(&catalog::count_by_category(session).await?),
        Commands::Search { term, scores: true } => {
            print_json(&catalog::search_by_name_scored(session, &term).await?)
        }
        Commands::Search { term, scores: false } => {
            print_json(&catalog::search_by_name(session, &term).await?)
        }
        Commands::Demo => demo(session).await,
        Commands::Status { log } => show_status(session, log).await,
        Commands::Indexes => list_indexes(),
    }
}

async fn seed(session: &Session, file: Option<PathBuf>, batch: BatchMode) -> anyhow::Result<()> {
    let products = match &file {
        Some(path) => catalog::load_seed_file(path).await?,
        None => catalog::sample_products()?,
    };

    let removed = catalog::reset_catalog(session).await?;
    println!("Cleared {} existing product(s)", removed);

    let inserted = catalog::seed_catalog_with(session, products, batch).await?;
    println!("Inserted {} product(s)", inserted.len());
    println!();
    println!("Products:");
    for product in &inserted {
        println!(
            "- {} ({}) - ${:.2}",
            product.name, product.category, product.price
        );
        println!("  Variants: {}", product.variants.len());
    }

    Ok(())
}

async fn demo(session: &Session) -> anyhow::Result<()> {
    println!("=== 1. All Products ===");
    print_json(&catalog::list_all(session).await?)?;

    println!("\n=== 2. Electronics Category ===");
    print_json(&catalog::find_by_category(session, "Electronics").await?)?;

    println!("\n=== 3. Products with Blue Variants ===");
    print_json(&catalog::find_by_variant_color(session, "Blue").await?)?;

    println!("\n=== 4. Specific Blue Variant Details ===");
    print_json(&catalog::find_by_variant_color_projected(session, "Blue").await?)?;

    println!("\n=== 5. Low Stock Products ===");
    print_json(&catalog::find_low_stock(session, DEFAULT_LOW_STOCK_THRESHOLD).await?)?;

    println!("\n=== 6. Total Stock Summary ===");
    print_json(&catalog::total_stock_by_product(session).await?)
}

async fn show_status(session: &Session, log: usize) -> anyhow::Result<()> {
    let status = session.status(log).await?;

    println!("Catalog Status");
    println!("==============");
    println!("URI: {}", status.uri);
    println!("Products: {}", status.products);
    println!();

    match status.history {
        Some(history) => {
            println!("HEAD: {}", history.head);
            if history.uncommitted_changes {
                println!("Uncommitted changes detected.");
            } else {
                println!("No uncommitted changes.");
            }
            if !history.recent.is_empty() {
                println!("\nRecent changes:");
                for line in &history.recent {
                    println!("  {}", line);
                }
            }
        }
        None => println!("History: disabled"),
    }

    Ok(())
}

fn list_indexes() -> anyhow::Result<()> {
    print_json(&INDEXES)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
