use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use place_browser::apis::foursquare::FoursquareClient;
use place_browser::app::state::AppState;
use place_browser::config::Config;
use place_browser::constants::DEFAULT_CONFIG_PATH;
use place_browser::data;
use place_browser::infra::http_client::ReqwestHttp;
use place_browser::infra::map_widget::InMemoryMap;
use place_browser::logging;
use place_browser::observability::metrics;
use place_browser::types::{Place, PlaceId};

#[derive(Parser)]
#[command(name = "place_browser")]
#[command(about = "Browse points of interest by tag and name, with Foursquare venue details")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// JSON file with place records (defaults to the built-in places)
    #[arg(long)]
    places: Option<PathBuf>,

    /// Print recorded metrics in Prometheus format on exit
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tag filters
    Tags,
    /// List the places that pass the filters
    List {
        /// Tags to switch off (comma-separated)
        #[arg(long)]
        off: Option<String>,
        /// Only places whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Select a place by name and show its venue details
    Show {
        name: String,
    },
    /// Interactive session reading commands from stdin
    Browse,
}

fn print_places(state: &AppState) {
    let visible = state.visible_places();
    if visible.is_empty() {
        println!("   (no places match)");
    }
    for place in visible {
        println!("   [{}] {} ({}) - {}", place.id, place.name, place.tags.join(", "), place.info);
    }
}

fn print_filters(state: &AppState) {
    for filter in state.filters() {
        println!("   [{}] {}", if filter.enabled { "x" } else { " " }, filter.name);
    }
}

fn print_selection(state: &AppState, place: &Place) {
    println!("\n📍 {}", place.name);
    println!("   {}", place.address);
    println!("   {}", place.info);
    if let Some(details) = place.venue_details() {
        if let Some(url) = &details.url {
            println!("   Web:   {}", url);
        }
        if let Some(phone) = &details.phone {
            println!("   Phone: {}", phone);
        }
        if let Some(photo) = &details.photo_url {
            println!("   Photo: {}", photo);
        }
    }
    if state.selection().connection_error {
        println!("   ⚠️  Could not load venue details, try again later");
    }
}

async fn browse(state: &mut AppState) -> Result<()> {
    println!("Commands: list | filters | toggle TAG | search TEXT | select N | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "" => continue,
            "quit" | "exit" => break,
            "list" => print_places(state),
            "filters" => print_filters(state),
            "toggle" => match state.toggle_filter(arg.trim()) {
                Ok(_) => print_places(state),
                Err(e) => println!("⚠️  {}", e),
            },
            "search" => {
                state.set_search(arg);
                print_places(state);
            }
            "select" => {
                let Ok(idx) = arg.trim().parse::<usize>() else {
                    println!("⚠️  select expects a place number");
                    continue;
                };
                match state.select(PlaceId(idx)).await {
                    Ok(place) => {
                        let place = place.clone();
                        print_selection(state, &place);
                    }
                    Err(e) => println!("⚠️  {}", e),
                }
            }
            other => println!("⚠️  Unknown command: {}", other),
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config).context("loading configuration")?;
    let records = match &cli.places {
        Some(path) => data::load_places(path)
            .with_context(|| format!("loading places from {}", path.display()))?,
        None => data::seed_places(),
    };

    let map = Arc::new(InMemoryMap::new());
    let lookup = Arc::new(FoursquareClient::new(
        Box::new(ReqwestHttp::new()),
        config.foursquare.clone(),
    ));
    let mut state = AppState::new(
        &records,
        map,
        config.map.clone(),
        lookup,
        &config.foursquare.photo_size,
    );
    state.start();

    match cli.command {
        Commands::Tags => print_filters(&state),
        Commands::List { off, search } => {
            let tags = off
                .iter()
                .flat_map(|s| s.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty());
            for tag in tags {
                state.set_filter(tag, false)?;
            }
            if let Some(text) = search {
                state.set_search(text);
            }
            print_places(&state);
        }
        Commands::Show { name } => {
            let Some(id) = state.find_place(&name).map(|p| p.id) else {
                bail!("no place named '{}'", name);
            };
            let place = state.select(id).await?.clone();
            print_selection(&state, &place);
        }
        Commands::Browse => browse(&mut state).await?,
    }

    state.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    if cli.metrics {
        if let Err(e) = metrics::init() {
            error!("Metrics disabled: {}", e);
        }
    }
    let print_metrics = cli.metrics;

    let result = run(cli).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    } else {
        info!("Done");
    }

    if print_metrics {
        if let Some(rendered) = metrics::render() {
            println!("\n{}", rendered);
        }
    }
    result
}
