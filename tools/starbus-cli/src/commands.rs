use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use starbus_core::arrivals::{
    label, render, reorder, ArrivalFeed, ArrivalTone, NO_ARRIVALS_MESSAGE,
};
use starbus_core::favorites::FavoritesRegistry;
use starbus_core::provider::DaeguBusClient;
use starbus_core::search::{SearchOutcome, StopSearch, SUGGESTIONS_FAILED_MESSAGE};
use starbus_core::{Placement, RiderSession, StarbusConfig, DEFAULT_MAP_CENTER};
use starbus_transit::{
    normalize, KeyValueStore, RouteIdentifier, Stop, StopIdentifier, TransitDataSource,
    TransitError,
};
use tracing::info;

fn print_stop(index: usize, stop: &Stop) {
    let place = match stop.location() {
        Ok(at) => format!("{:.5}, {:.5}", at.lat, at.lng),
        Err(_) => "위치 정보 없음".to_string(),
    };
    println!("{:>3}. {} [{}]  {}  ({place})", index + 1, stop.name, stop.id, stop.route_list);
}

pub async fn search(client: Arc<DaeguBusClient>, query: &str, ranked: bool) -> Result<()> {
    let search = StopSearch::new(client);
    let outcome = if ranked {
        search.autocomplete(query).await
    } else {
        search.list(query).await
    };

    match outcome {
        SearchOutcome::Found(stops) => {
            for (index, stop) in stops.iter().enumerate() {
                print_stop(index, stop);
            }
            Ok(())
        }
        SearchOutcome::NoResults => {
            println!("검색 결과가 없습니다.");
            Ok(())
        }
        SearchOutcome::Failed(error) if ranked => Err(error).context(SUGGESTIONS_FAILED_MESSAGE),
        SearchOutcome::Failed(error) => Err(error).context("Stop search failed"),
    }
}

pub async fn arrivals(client: Arc<DaeguBusClient>, stop_id: &str) -> Result<()> {
    let stop_id = StopIdentifier::new(stop_id);
    let records = match client.arrivals(&stop_id).await {
        Ok(records) => reorder(records),
        Err(TransitError::NoData) => Vec::new(),
        Err(error) => return Err(error).context("Arrivals request failed"),
    };

    if records.is_empty() {
        println!("{NO_ARRIVALS_MESSAGE}");
    }
    for record in &records {
        println!(
            "[{}] {}  {}",
            ArrivalTone::of(&record.state),
            record.route_no,
            label(&record.state)
        );
    }
    Ok(())
}

fn print_feed(name: &str, feed: &ArrivalFeed) {
    match feed {
        ArrivalFeed::Pending => {}
        ArrivalFeed::Loaded(list) => {
            let at = list.fetched_at.with_timezone(&Local).format("%H:%M:%S");
            println!("\n{name} ({at})");
            for line in render(&list.records) {
                println!("  {line}");
            }
        }
        ArrivalFeed::NoData => println!("\n{name}\n  {NO_ARRIVALS_MESSAGE}"),
        ArrivalFeed::Failed(reason) => println!("\n{name}\n  도착 정보를 불러오지 못했습니다: {reason}"),
    }
}

pub async fn watch(
    client: Arc<DaeguBusClient>,
    store: Arc<dyn KeyValueStore>,
    config: &StarbusConfig,
    stop_id: Option<String>,
) -> Result<()> {
    let mut session = RiderSession::new(client, store, config);

    let placement = match stop_id {
        Some(id) => Some(session.select(Stop::new(id.as_str(), id.as_str()))),
        None => session.start(),
    };
    match placement {
        None => bail!("No stop given and no favorites saved"),
        Some(Placement::Centered(at)) => info!(lat = at.lat, lng = at.lng, "map centered"),
        Some(Placement::MissingGeoData) => info!("stop has no location"),
    }

    let mut updates = session.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut shown = ArrivalFeed::Pending;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                let name = state.stop.as_ref().map(|s| s.name.as_str()).unwrap_or_default();

                if state.arrivals != shown {
                    print_feed(name, &state.arrivals);
                    shown = state.arrivals;
                }
                print!("\r  {:>2}초 후 갱신 ", state.countdown);
                std::io::stdout().flush().context("Failed to write to stdout")?;
            }
        }
    }

    println!();
    Ok(())
}

pub fn list_favorites(store: Arc<dyn KeyValueStore>) -> Result<()> {
    let registry = FavoritesRegistry::open(store);
    if registry.favorites().is_empty() {
        println!("즐겨찾기가 없습니다.");
    }
    for (index, stop) in registry.favorites().iter().enumerate() {
        print_stop(index, stop);
    }
    Ok(())
}

pub async fn toggle_favorite(
    client: Arc<DaeguBusClient>,
    store: Arc<dyn KeyValueStore>,
    config: &StarbusConfig,
    query: &str,
    stop_id: &str,
) -> Result<()> {
    let mut session = RiderSession::new(client, store, config);
    session.start();

    let stops = match session.search(query).await {
        SearchOutcome::Failed(error) => return Err(error).context("Stop search failed"),
        outcome => outcome.into_stops(),
    };
    let Some(stop) = stops.into_iter().find(|s| s.id.as_str() == stop_id) else {
        bail!("No stop {stop_id} in results for {query:?}");
    };

    let name = stop.name.clone();
    let toggled = session.toggle_favorite(stop);
    if !toggled.persisted {
        bail!("Favorites could not be saved");
    }
    let verb = if toggled.was_added { "추가" } else { "삭제" };
    println!("{name}: 즐겨찾기 {verb} ({}개)", toggled.favorites.len());
    Ok(())
}

pub async fn route(
    client: Arc<DaeguBusClient>,
    store: Arc<dyn KeyValueStore>,
    config: &StarbusConfig,
    route_id: &str,
    stop: Option<String>,
) -> Result<()> {
    let mut session = RiderSession::new(client, store, config);
    if let Some(id) = stop {
        session.select(Stop::new(id.as_str(), id.as_str()));
    }

    let detail = session
        .route_detail(&RouteIdentifier::new(route_id))
        .await
        .with_context(|| format!("Failed to load route {route_id}"))?;

    for row in &detail.rows {
        let marker = match (row.vehicle_present, row.is_selected) {
            (true, true) => "🚌▶",
            (true, false) => "🚌 ",
            (false, true) => "  ▶",
            (false, false) => "   ",
        };
        println!("{marker} {} [{}]", row.stop.name, row.stop.stop_id);
    }
    println!("운행 중 차량 {}대", detail.vehicles_on_route());
    Ok(())
}

pub fn locate(x: f64, y: f64) {
    println!("{}", describe_location(x, y));
}

fn describe_location(x: f64, y: f64) -> String {
    // zero is how the provider marks a stop without survey data
    if x == 0.0 || y == 0.0 || !x.is_finite() || !y.is_finite() {
        return "좌표가 없습니다.".to_string();
    }

    let at = normalize(x, y);
    let distance = at.distance_to(DEFAULT_MAP_CENTER);
    format!("{:.6}, {:.6}  (시청에서 {:.0} m)", at.lat, at.lng, distance)
}
