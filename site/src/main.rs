use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wp_core::{PluginFilter, WordPressClient};
use wp_site::{
    plugin_catalog, plugin_page, post_page, render_xml, sitemap, ContentSource, PageOutcome,
    Settings, CONTENT_MENU, MAIN_MENU, PLUGIN_MENU,
};

/// Exit status when the requested entity does not exist.
const EXIT_NOT_FOUND: i32 = 2;

#[derive(Parser)]
#[command(name = "wp-site", about = "Load site content from the WordPress API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the sitemap
    Sitemap {
        /// Render as sitemap XML instead of JSON
        #[arg(long)]
        xml: bool,
    },
    /// Load a plugin detail page
    Plugin { slug: String },
    /// Load a post detail page
    Post { slug: String },
    /// Load the plugin catalog
    Plugins {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        access_level: Option<u64>,
        #[arg(long)]
        category: Option<u64>,
        #[arg(long)]
        original_author: Option<u64>,
        #[arg(long)]
        tag: Option<u64>,
    },
    /// Print the navigation menus
    Menu,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("failed to load configuration")?;
    info!(base_url = settings.client.base_url(), "content API configured");
    let source = ContentSource::new(WordPressClient::from_config(settings.client.clone()));

    match cli.command {
        Command::Sitemap { xml } => {
            let entries = sitemap(&source, &settings.site).await?;
            if xml {
                print!("{}", render_xml(&entries));
            } else {
                print_json(&entries)?;
            }
        }
        Command::Plugin { slug } => match plugin_page(&source, &slug).await? {
            PageOutcome::Found(page) => print_json(&page)?,
            PageOutcome::NotFound => not_found("plugin", &slug),
        },
        Command::Post { slug } => match post_page(&source, &slug).await? {
            PageOutcome::Found(page) => print_json(&page)?,
            PageOutcome::NotFound => not_found("post", &slug),
        },
        Command::Plugins {
            search,
            access_level,
            category,
            original_author,
            tag,
        } => {
            let filter = PluginFilter {
                search,
                access_level,
                category,
                original_author,
                tag,
            };
            print_json(&plugin_catalog(&source, &filter).await?)?;
        }
        Command::Menu => {
            print_json(&serde_json::json!({
                "main": MAIN_MENU,
                "content": CONTENT_MENU,
                "plugins": PLUGIN_MENU,
            }))?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(kind: &str, slug: &str) -> ! {
    eprintln!("{kind} not found: {slug}");
    std::process::exit(EXIT_NOT_FOUND);
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wp_site=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
