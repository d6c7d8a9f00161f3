// ============================================================================
// armory — CLI driver for the catalog aggregation engine
// ============================================================================
// Usage:
//   armory sync                               Run a full catalog ingestion
//   armory list [--weapon W] [--search S]     Filter the merged catalog
//   armory dict weapons|tiers|collections     Print filter dictionaries
//   armory owned list|add|remove|favorite     Manage the owned overlay
//   armory wishlist list|add|remove|favorite  Manage the wishlist overlay
// ============================================================================

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use armory_core::{Catalog, ClientConfig, FilterState, Item, OverlayList};

/// Armory catalog aggregation tool
#[derive(Parser)]
#[command(name = "armory", version, about = "Sync and query the skin catalog")]
struct Cli {
    /// Backend base URL (default: env ARMORY_BACKEND_URL or localhost)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Reference API base URL
    #[arg(long, global = true)]
    reference_url: Option<String>,

    /// Bearer token for backend requests (default: env ARMORY_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Catalog page size
    #[arg(long, global = true)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch reference data and run a full catalog ingestion
    Sync,

    /// List catalog items with optional filters
    List {
        /// Filter by weapon uuid (exact match)
        #[arg(long)]
        weapon: Option<String>,

        /// Filter by collection uuid (exact match)
        #[arg(long)]
        collection: Option<String>,

        /// Filter by tier uuid (exact match)
        #[arg(long)]
        tier: Option<String>,

        /// Case-insensitive substring match on the item name
        #[arg(long)]
        search: Option<String>,

        /// Maximum number of rows to print
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Print a filter dictionary (weapons, tiers, collections)
    Dict {
        /// Which dictionary: weapons, tiers, collections
        name: String,
    },

    /// Manage the owned overlay
    Owned {
        #[command(subcommand)]
        action: OverlayAction,
    },

    /// Manage the wishlist overlay
    Wishlist {
        #[command(subcommand)]
        action: OverlayAction,
    },
}

#[derive(Subcommand)]
enum OverlayAction {
    /// Refresh from the backend and list the membership
    List,

    /// Add an item by uuid
    Add {
        uuid: String,

        /// Favorite chroma uuid to record alongside the membership
        #[arg(long)]
        favorite_chroma: Option<String>,
    },

    /// Remove an item by uuid
    Remove { uuid: String },

    /// Set the favorite chroma for an item
    Favorite { uuid: String, chroma_uuid: String },
}

fn build_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(url) = &cli.reference_url {
        config.reference_url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config
}

/// Load reference data and ingest the full catalog.
async fn load_catalog(catalog: &Catalog) -> Result<()> {
    catalog.load_reference().await?;
    let stats = catalog.sync().await?;
    eprintln!("Synced {} items across {} pages", stats.items, stats.pages);
    Ok(())
}

fn print_items(items: &[Item], limit: usize) {
    for item in items.iter().take(limit) {
        println!(
            "{:>5}  {:<36}  {:<40}  weapon={}  tier={}",
            item.id,
            item.uuid,
            item.name,
            if item.weapon_id.is_empty() {
                "Unknown"
            } else {
                item.weapon_id.as_str()
            },
            item.tier.display_name(),
        );
    }
    if items.len() > limit {
        println!("... and {} more", items.len() - limit);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);
    let mut catalog = Catalog::new(config);

    match cli.command {
        Commands::Sync => {
            load_catalog(&catalog).await?;
            println!("Catalog items: {}", catalog.item_count()?);
        }

        Commands::List {
            weapon,
            collection,
            tier,
            search,
            limit,
        } => {
            load_catalog(&catalog).await?;
            catalog.set_filters(FilterState {
                weapon: weapon.unwrap_or_default(),
                collection: collection.unwrap_or_default(),
                tier: tier.unwrap_or_default(),
                search: search.unwrap_or_default(),
            });
            let items = catalog.filtered()?;
            println!("{} matching items", items.len());
            print_items(&items, limit);
        }

        Commands::Dict { name } => {
            catalog.load_reference().await?;
            let entries = match name.as_str() {
                "weapons" => catalog.weapon_dictionary()?,
                "tiers" => catalog.tier_dictionary()?,
                "collections" => catalog.collection_dictionary()?,
                other => anyhow::bail!(
                    "Unknown dictionary '{}'. Valid values: weapons, tiers, collections",
                    other
                ),
            };
            for entry in entries {
                println!("{:<36}  {}", entry.value, entry.label);
            }
        }

        Commands::Owned { action } => {
            run_overlay_action(&mut catalog, OverlayList::Owned, action).await?;
        }

        Commands::Wishlist { action } => {
            run_overlay_action(&mut catalog, OverlayList::Wishlist, action).await?;
        }
    }

    Ok(())
}

async fn run_overlay_action(
    catalog: &mut Catalog,
    list: OverlayList,
    action: OverlayAction,
) -> Result<()> {
    match action {
        OverlayAction::List => {
            load_catalog(catalog).await?;
            let items = match list {
                OverlayList::Owned => {
                    catalog.refresh_owned().await?;
                    catalog.overlay().owned().to_vec()
                }
                OverlayList::Wishlist => {
                    catalog.refresh_wishlist().await?;
                    catalog.overlay().wishlist().to_vec()
                }
            };
            println!("{} items", items.len());
            print_items(&items, items.len());
        }

        OverlayAction::Add {
            uuid,
            favorite_chroma,
        } => {
            // The catalog snapshot is needed so the new membership can be
            // mirrored as a full item; for promotion, the wishlist must be
            // loaded before the add.
            load_catalog(catalog).await?;
            if list == OverlayList::Owned {
                catalog.refresh_wishlist().await?;
                catalog
                    .add_owned(&uuid, favorite_chroma.as_deref())
                    .await?;
            } else {
                catalog
                    .add_wishlisted(&uuid, favorite_chroma.as_deref())
                    .await?;
            }
            println!("Added {}", uuid);
        }

        OverlayAction::Remove { uuid } => {
            match list {
                OverlayList::Owned => catalog.remove_owned(&uuid).await?,
                OverlayList::Wishlist => catalog.remove_wishlisted(&uuid).await?,
            }
            println!("Removed {}", uuid);
        }

        OverlayAction::Favorite { uuid, chroma_uuid } => {
            catalog.set_favorite_chroma(list, &uuid, &chroma_uuid).await?;
            println!("Favorite chroma for {} set to {}", uuid, chroma_uuid);
        }
    }
    Ok(())
}
