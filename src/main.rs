use anyhow::Context;
use clap::{Parser, Subcommand};

use campfinder::sdk::campsites::{load_campsites, nearest};
use campfinder::sdk::config::Config;
use campfinder::sdk::geo::LngLat;
use campfinder::sdk::map::cluster::ClusterIndex;
use campfinder::sdk::map::MapFeature;
use campfinder::sdk::panel::{DirectionsPanel, SearchPanel};
use campfinder::sdk::relay;
use campfinder::sdk::routing::{GeoCache, RemoteProvider, Route, RoutingProvider, TripKey};
use campfinder::sdk::util::{log::init_logging, rate_limit::Limiter};

const CACHE_FILE: &str = "geo_cache.json";

/// Find campsites and driving directions to them
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the access-token relay for the web client
    Serve,

    /// Geocode a free-text location query
    Search {
        /// Address, city, or point of interest
        query: String,
    },

    /// List the campsites nearest to a coordinate
    Sites {
        /// Origin as "lon,lat"
        #[arg(long)]
        near: LngLat,

        /// How many sites to show
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Show how the campsites cluster at a zoom level
    Clusters {
        #[arg(long, default_value_t = 6)]
        zoom: u8,
    },

    /// Driving directions from an origin to a campsite coordinate
    Route {
        /// Origin: free text (geocoded) or "lon,lat"
        #[arg(long)]
        from: String,

        /// Destination as "lon,lat"
        #[arg(long)]
        to: LngLat,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve => relay::run(config.bind, config.access_token),
        Command::Search { query } => search(&config, &query),
        Command::Sites { near, limit } => sites(&config, near, limit),
        Command::Clusters { zoom } => clusters(&config, zoom),
        Command::Route { from, to } => route(&config, &from, to),
    }
}

fn search(config: &Config, query: &str) -> anyhow::Result<()> {
    let provider = RemoteProvider::new(config.access_token.clone(), Limiter::api_default());

    let mut panel = SearchPanel::new();
    let seq = panel.set_input(query).context("empty search query")?;
    let places = provider.forward_geocode(query)?;
    panel.apply_results(seq, places);

    if panel.shown_results().is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }
    for (i, place) in panel.shown_results().iter().enumerate() {
        println!("{}. {}  [{}]", i + 1, place.label, place.coord);
    }
    Ok(())
}

fn sites(config: &Config, near: LngLat, limit: usize) -> anyhow::Result<()> {
    let sites = load_campsites(&config.campsites_path)?;
    log::info!("Loaded {} campsites", sites.len());

    for site in nearest(&sites, &near, limit) {
        let name = site.name().unwrap_or("No Name Available");
        println!(
            "{}  [{}]  {:.1} km away",
            name,
            site.coord,
            near.haversine_km(&site.coord)
        );
    }
    Ok(())
}

fn clusters(config: &Config, zoom: u8) -> anyhow::Result<()> {
    let sites = load_campsites(&config.campsites_path)?;
    let index = ClusterIndex::new(sites.iter().map(|s| s.coord).collect());

    let mut singles = 0usize;
    for feature in index.features_at(zoom) {
        match feature {
            MapFeature::Cluster { center, count, .. } => {
                println!("cluster of {:>5} at [{}]", count, center)
            }
            MapFeature::Site { .. } => singles += 1,
        }
    }
    println!("{} unclustered sites at zoom {}", singles, zoom);
    Ok(())
}

fn route(config: &Config, from: &str, to: LngLat) -> anyhow::Result<()> {
    let provider = RemoteProvider::new(config.access_token.clone(), Limiter::api_default());
    let mut cache = GeoCache::load_from_file(CACHE_FILE)?;

    let origin = resolve_origin(from, &provider, &mut cache)?;
    let key = TripKey::new(&origin, &to);

    let route = match cache.get_route(&key) {
        Some(route) => {
            log::debug!("[CACHE HIT] {}", key);
            route.clone()
        }
        None => {
            let route = provider.directions(origin, to)?;
            cache.insert_route(key, route.clone());
            route
        }
    };

    let mut panel = DirectionsPanel::new();
    let request = panel.begin_request(Some(origin), Some(to))?;
    panel.apply_route(request.seq, route);

    for line in panel.step_lines() {
        println!("{}", line);
    }
    if let Some((time, distance)) = panel.summary() {
        println!("{}", time);
        println!("{}", distance);
    }
    if let Some(bounds) = panel.route().and_then(Route::bounds) {
        log::info!("Route view centers on [{}]", bounds.center());
    }

    cache.save_to_file(CACHE_FILE)?;
    log::debug!("Cache saved to {}", CACHE_FILE);
    Ok(())
}

fn resolve_origin(
    from: &str,
    provider: &RemoteProvider,
    cache: &mut GeoCache,
) -> anyhow::Result<LngLat> {
    if let Ok(coord) = from.parse::<LngLat>() {
        return Ok(coord);
    }
    if let Some(coord) = cache.get_geocode(from) {
        log::debug!("[CACHE HIT] geocode for \"{}\"", from);
        return Ok(coord);
    }
    let places = provider.forward_geocode(from)?;
    let place = places
        .into_iter()
        .next()
        .with_context(|| format!("no geocode results for \"{}\"", from))?;
    log::info!("Origin resolved to {} [{}]", place.label, place.coord);
    cache.insert_geocode(from, place.coord);
    Ok(place.coord)
}
