use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use vitrine::fetch::{ApiClient, FetchContext};
use vitrine::{config, generate, server};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Product showcase site generator and server")]
#[command(long_about = "\
Product showcase site generator and server

Product data comes from a cosmetics product API; vitrine renders it into
a list page and per-product detail pages.

Routes / output:

  /                  Product list (generated at build time)
  /dynamic/{id}      Detail page, fetched on every request (serve only)
  /dynamic_2/{id}    Detail page, pre-rendered for the configured id set;
                     other ids are generated on first request and cached

Run 'vitrine gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Output directory for the static site
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch product data and write the static site
    Build,
    /// Pre-generate pages and serve the site over HTTP
    Serve,
    /// Load and validate configuration without fetching or building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.config)?;
            let client = ApiClient::new(&config.api, FetchContext::BuildTime)?;
            println!("==> Generating {} pages from {}", config.prerender.ids.len() + 1, config.api.base_url);
            generate::generate(&client, &config.prerender.ids, &cli.output).await?;
        }
        Command::Serve => {
            tracing_subscriber::fmt().init();
            let config = config::load_config(&cli.config)?;
            let addr = config.server.socket_addr()?;

            let build_client = ApiClient::new(&config.api, FetchContext::BuildTime)?;
            let site = generate::generate_site(&build_client, &config.prerender.ids).await?;

            let request_client = ApiClient::new(&config.api, FetchContext::RequestTime)?;
            let state = server::AppState::new(site, Arc::new(request_client));
            server::serve(addr, state).await?;
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            println!(
                "==> Config OK: api {}, brand {}, {} prerender ids, serving on {}",
                config.api.base_url,
                config.api.brand.as_deref().unwrap_or("(none)"),
                config.prerender.ids.len(),
                config.server.addr,
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
