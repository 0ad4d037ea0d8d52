//! One-shot command flows driving the crate end to end: search, personal
//! lists, the group view, and route editing.

pub mod persist;
pub mod runtime;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::args::Args;
use crate::export;
use crate::logic::{self, RouteSequencer, RouteState};
use crate::sources::{self, Api};
use crate::state::{
    AppState, FeeBucket, GroupPlace, PersonalList, Place, PlaceType, SearchRequest, StatusFilter,
    ViewMode,
};
use crate::util::config::Settings;

/// Shared result type for the command flows.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// What: Execute the flow selected by the command line.
///
/// Inputs:
/// - `args`: Parsed arguments.
///
/// Output:
/// - `Ok(())` when the selected flow completed; `Err` on validation or
///   network failure (the caller logs and sets the exit code).
///
/// # Errors
/// - Input validation failures (malformed `--bbox`, unknown list names) are
///   rejected before any network call; network failures propagate from the
///   fetchers.
pub async fn run(args: Args) -> Result<()> {
    let settings = Settings::load();
    let base = args
        .api_url
        .clone()
        .unwrap_or_else(|| settings.api_base_url.clone());
    // Opaque bearer token; only ever attached as a header.
    let token = std::env::var("TRIPSEA_TOKEN").ok();
    let api = Arc::new(Api::new(&base, settings.http_timeout_secs, token)?);

    let mut app = AppState::default();
    persist::load_recent(&mut app);
    persist::load_filters(&mut app);

    if args.mark.is_some() || args.unmark.is_some() {
        run_toggle(&api, &args).await?;
    } else if args.groups {
        app.groups = sources::fetch_groups(&api).await?;
        println!("{} groups", app.groups.len());
        for g in &app.groups {
            println!("  {} {} ({}, created by {})", g.group_id, g.name, g.your_role, g.created_by);
        }
    } else if let Some(group_id) = args.group {
        apply_filter_args(&mut app, &args);
        if wants_route(&args) {
            run_route(&api, &mut app, group_id, &args).await?;
        } else {
            run_group_view(&api, &mut app, group_id, &args).await?;
        }
    } else if let Some(list) = args.list.as_deref() {
        let list = parse_list(list)?;
        // Filters reset on the mode switch, then the flags take effect.
        app.switch_view_mode(ViewMode::List(list));
        apply_filter_args(&mut app, &args);
        run_list_view(&api, &mut app, list, &args).await?;
        print_places(&app);
        write_exports(&app.results, &args)?;
    } else if let Some(request) = search_request(&args, &settings)? {
        apply_filter_args(&mut app, &args);
        run_search(&api, &mut app, request, &settings).await?;
        print_places(&app);
        write_exports(&app.results, &args)?;
    } else {
        return Err(
            "nothing to do: pass a search (--lat/--lon, --bbox or --nearest), --list, or --group"
                .into(),
        );
    }

    persist::maybe_flush_recent(&mut app);
    persist::maybe_flush_filters(&mut app);
    Ok(())
}

/// True when any route flag was given alongside `--group`.
fn wants_route(args: &Args) -> bool {
    args.route
        || args.route_save
        || !args.route_add.is_empty()
        || !args.route_remove.is_empty()
        || args.route_move.is_some()
        || args.route_insert.is_some()
}

/// What: Build the search request from the geometric flags.
///
/// Output:
/// - `Ok(None)` when no search flags are present; `Err` on local validation
///   failures (no network call is made for malformed input).
fn search_request(args: &Args, settings: &Settings) -> Result<Option<SearchRequest>> {
    if let Some(bbox) = args.bbox.as_deref() {
        let parts: Vec<f64> = bbox
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| "--bbox must be north,south,east,west (numbers)")?;
        let [north, south, east, west] = parts[..] else {
            return Err("--bbox must have exactly four values".into());
        };
        return Ok(Some(SearchRequest::Bbox {
            north,
            south,
            east,
            west,
        }));
    }
    let (Some(lat), Some(lon)) = (args.lat, args.lon) else {
        return Ok(None);
    };
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err("coordinates out of range: lat in [-90, 90], lon in [-180, 180]".into());
    }
    if let Some(k) = args.nearest {
        if k == 0 {
            return Err("--nearest must be at least 1".into());
        }
        return Ok(Some(SearchRequest::Nearest { lat, lon, k }));
    }
    let km = args.km.unwrap_or(settings.default_radius_km);
    if km <= 0.0 || km > 1000.0 {
        return Err("--km must be between 0 and 1000".into());
    }
    Ok(Some(SearchRequest::Radius { lat, lon, km }))
}

/// Copy the filter flags onto the state's filter value objects.
fn apply_filter_args(app: &mut AppState, args: &Args) {
    let mut changed = false;

    if !args.place_types.is_empty() {
        app.generic_filters.place_types = parse_place_types(&args.place_types);
        changed = true;
    }
    if let Some(min) = args.min_rating {
        app.generic_filters.min_rating = min;
        changed = true;
    }
    if let Some(max) = args.max_distance {
        app.generic_filters.max_distance_km = Some(max);
        changed = true;
    }
    if !args.state.is_empty() {
        app.generic_filters.states = args.state.iter().cloned().collect();
        changed = true;
    }
    if let Some(q) = &args.query {
        app.input = q.clone();
    }

    if let Some(c) = &args.cuisine {
        app.restaurant_filters.cuisines = Some(c.clone());
        changed = true;
    }
    if !args.price.is_empty() {
        app.restaurant_filters.price_ranges = args.price.iter().copied().collect();
        changed = true;
    }
    if !args.dietary.is_empty() {
        app.restaurant_filters.dietary_options = args.dietary.clone();
        changed = true;
    }
    if args.delivery {
        app.restaurant_filters.delivery = true;
        changed = true;
    }
    if args.takeout {
        app.restaurant_filters.takeout = true;
        changed = true;
    }
    if args.reservations {
        app.restaurant_filters.reservations = true;
        changed = true;
    }
    if let Some(h) = &args.restaurant_hours {
        app.restaurant_filters.hours = Some(h.clone());
        changed = true;
    }
    if !args.restaurant_rating.is_empty() {
        app.restaurant_filters.rating_buckets = args.restaurant_rating.clone();
        changed = true;
    }

    if !args.tourist_type.is_empty() {
        app.tourist_filters.tourist_types = args.tourist_type.iter().cloned().collect();
        changed = true;
    }
    if !args.entry_fee.is_empty() {
        app.tourist_filters.entry_fee_buckets = args
            .entry_fee
            .iter()
            .filter_map(|t| {
                let bucket = FeeBucket::from_config_key(t);
                if bucket.is_none() {
                    tracing::warn!(token = %t, "ignoring unknown entry-fee bucket");
                }
                bucket
            })
            .collect();
        changed = true;
    }
    if args.family_friendly {
        app.tourist_filters.family_friendly = true;
        changed = true;
    }
    if args.accessibility {
        app.tourist_filters.accessibility = true;
        changed = true;
    }
    if args.pet_friendly {
        app.tourist_filters.pet_friendly = true;
        changed = true;
    }
    if args.guided_tours {
        app.tourist_filters.guided_tours = true;
        changed = true;
    }
    if let Some(h) = &args.tourist_hours {
        app.tourist_filters.hours = Some(h.clone());
        changed = true;
    }
    if !args.tourist_rating.is_empty() {
        app.tourist_filters.rating_buckets = args.tourist_rating.clone();
        changed = true;
    }

    if changed {
        app.filters_dirty = true;
    }
}

/// Parse `--type` tokens; unknown tokens are warned about and skipped.
fn parse_place_types(tokens: &[String]) -> HashSet<PlaceType> {
    tokens
        .iter()
        .filter_map(|t| {
            let ty = PlaceType::from_wire(t);
            if ty == PlaceType::Unknown && !t.trim().eq_ignore_ascii_case("unknown") {
                tracing::warn!(token = %t, "ignoring unknown place type");
                None
            } else {
                Some(ty)
            }
        })
        .collect()
}

/// Every category, for views where an empty set means "show nothing".
fn all_place_types() -> HashSet<PlaceType> {
    [
        PlaceType::Brewery,
        PlaceType::Restaurant,
        PlaceType::TouristPlace,
        PlaceType::Hotel,
        PlaceType::Unknown,
    ]
    .into_iter()
    .collect()
}

/// What: Toggle a place on/off the user's personal lists.
///
/// Details:
/// - Validated locally before any network call: both flags need `--place`.
async fn run_toggle(api: &Arc<Api>, args: &Args) -> Result<()> {
    let Some(place_id) = args.place else {
        return Err("--mark/--unmark need --place PLACE_ID".into());
    };
    if let Some(list) = args.mark.as_deref() {
        let list = parse_list(list)?;
        sources::add_to_list(api, list, place_id).await?;
        println!("marked place {place_id} as {}", list.as_path());
    }
    if let Some(list) = args.unmark.as_deref() {
        let list = parse_list(list)?;
        sources::remove_from_list(api, list, place_id).await?;
        println!("removed place {place_id} from {}", list.as_path());
    }
    Ok(())
}

/// Parse a personal list name.
fn parse_list(name: &str) -> Result<PersonalList> {
    match name.trim().to_lowercase().as_str() {
        "visited" => Ok(PersonalList::Visited),
        "wishlist" => Ok(PersonalList::Wishlist),
        "liked" => Ok(PersonalList::Liked),
        other => Err(format!("unknown list '{other}' (visited, wishlist, liked)").into()),
    }
}

/// What: Run one search through the background worker and fold the result in.
///
/// Details:
/// - Exercises the same id-tagged channel path an interactive front end
///   uses, so stale-response protection is always in the loop.
async fn run_search(
    api: &Arc<Api>,
    app: &mut AppState,
    request: SearchRequest,
    settings: &Settings,
) -> Result<()> {
    let (query_tx, query_rx) = mpsc::unbounded_channel();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel();
    let (err_tx, mut err_rx) = mpsc::unbounded_channel();
    runtime::spawn_search_worker(Arc::clone(api), query_rx, result_tx, &err_tx);

    logic::send_query(app, &query_tx, request.clone());
    let deadline = Duration::from_secs(settings.http_timeout_secs + 5);
    let completed = tokio::time::timeout(deadline, async {
        while app.loading {
            tokio::select! {
                Some(res) = result_rx.recv() => runtime::handle_search_results(app, res),
                Some(e) = err_rx.recv() => runtime::handle_net_error(app, e),
                else => break,
            }
        }
    })
    .await;
    if completed.is_err() {
        return Err("search timed out".into());
    }
    app.push_recent(describe_request(&request));
    Ok(())
}

/// Short human description of a search for the recent list.
fn describe_request(request: &SearchRequest) -> String {
    match request {
        SearchRequest::Radius { lat, lon, km } => format!("radius {lat},{lon} {km}km"),
        SearchRequest::Bbox {
            north,
            south,
            east,
            west,
        } => format!("bbox {north},{south},{east},{west}"),
        SearchRequest::Nearest { lat, lon, k } => format!("nearest {lat},{lon} k={k}"),
    }
}

/// Load one personal list into the store, with backend-computed distances
/// when a reference position is given.
async fn run_list_view(
    api: &Arc<Api>,
    app: &mut AppState,
    list: PersonalList,
    args: &Args,
) -> Result<()> {
    let reference = args.lat.zip(args.lon);
    let places = sources::fetch_personal_list(api, list, reference).await?;
    app.replace_store(places);
    Ok(())
}

/// What: Show a group's places filtered by member list statuses.
///
/// Details:
/// - With no `--members` every member is selected; with no `--status` the
///   three list statuses are matched (but not `none`).
async fn run_group_view(
    api: &Arc<Api>,
    app: &mut AppState,
    group_id: i64,
    args: &Args,
) -> Result<()> {
    let (members, group_places) = futures::try_join!(
        resolve_members(api, group_id, &args.members),
        sources::fetch_group_places(api, group_id),
    )?;
    let statuses: HashSet<StatusFilter> = if args.status.is_empty() {
        [
            StatusFilter::Visited,
            StatusFilter::InWishlist,
            StatusFilter::Liked,
        ]
        .into_iter()
        .collect()
    } else {
        args.status
            .iter()
            .filter_map(|t| {
                let status = StatusFilter::from_config_key(t);
                if status.is_none() {
                    tracing::warn!(token = %t, "ignoring unknown status");
                }
                status
            })
            .collect()
    };

    app.selected_members = members;
    app.member_filters = app
        .selected_members
        .iter()
        .map(|&id| (id, statuses.clone()))
        .collect();
    app.group_place_types = if args.place_types.is_empty() {
        all_place_types()
    } else {
        parse_place_types(&args.place_types)
    };
    app.group_places = group_places;

    let filtered = logic::filter_group_places(
        &app.group_places,
        &app.group_place_types,
        &app.selected_members,
        &app.member_filters,
    );
    print_group_places(group_id, &filtered, app.group_places.len());

    let places: Vec<Place> = filtered.iter().map(|gp| gp.place.clone()).collect();
    write_exports(&places, args)
}

/// The member ids taking part in the group view: the requested ones, or
/// every member of the group when none were requested.
async fn resolve_members(api: &Arc<Api>, group_id: i64, requested: &[i64]) -> Result<Vec<i64>> {
    if requested.is_empty() {
        Ok(sources::fetch_group_members(api, group_id)
            .await?
            .iter()
            .map(|m| m.user_id)
            .collect())
    } else {
        Ok(requested.to_vec())
    }
}

/// What: Load, edit, optionally save, and print a group's route.
///
/// Details:
/// - Additions resolve against the group's place pool so every stop carries
///   coordinates captured at insertion time.
/// - Without `--route-save`, edits exist only for this invocation; a note
///   is printed whenever unsaved edits remain.
async fn run_route(api: &Arc<Api>, app: &mut AppState, group_id: i64, args: &Args) -> Result<()> {
    let stops = sources::fetch_group_route(api, group_id).await?;
    let mut seq = RouteSequencer::load(group_id, stops);

    let needs_pool = !args.route_add.is_empty() || args.route_insert.is_some();
    let pool: Vec<GroupPlace> = if needs_pool {
        sources::fetch_group_places(api, group_id).await?
    } else {
        Vec::new()
    };

    for id in &args.route_add {
        add_from_pool(&mut seq, &pool, *id, None);
    }
    if let Some(spec) = args.route_insert.as_deref() {
        let (place_id, index) = parse_id_index(spec, "--route-insert")?;
        add_from_pool(&mut seq, &pool, place_id, Some(index));
    }
    for id in &args.route_remove {
        if !seq.remove_place(*id) {
            eprintln!("place {id} is not on the route");
        }
    }
    if let Some(spec) = args.route_move.as_deref() {
        let (from, to) = parse_from_to(spec)?;
        if !seq.reorder(from, to) {
            eprintln!("move {from} -> {to} changed nothing");
        }
    }

    if args.route_save {
        if let Some(entries) = seq.begin_save() {
            match sources::save_group_route(api, group_id, &entries, false).await {
                Ok(()) => {
                    seq.save_succeeded();
                    println!("route saved ({} stops)", seq.len());
                }
                Err(e) => {
                    seq.save_failed(e.to_string());
                    eprintln!(
                        "route save failed: {} (local edits kept; run again to retry)",
                        seq.last_error().unwrap_or("unknown error")
                    );
                }
            }
        } else {
            println!("nothing to save");
        }
    }

    print_route(&seq);
    if seq.state() == RouteState::Dirty {
        println!("note: unsaved edits were not persisted (pass --route-save)");
    }
    app.route = Some(seq);
    Ok(())
}

/// Append or insert a pool place onto the route, reporting rejections.
fn add_from_pool(seq: &mut RouteSequencer, pool: &[GroupPlace], place_id: i64, index: Option<usize>) {
    let Some(gp) = pool.iter().find(|gp| gp.place.id == place_id) else {
        eprintln!("place {place_id} is not in this group's pool");
        return;
    };
    let added = match index {
        Some(i) => seq.insert_at(&gp.place, i),
        None => seq.add_place(&gp.place),
    };
    if !added && let Some(e) = seq.last_error() {
        eprintln!("{e}");
    }
}

/// Parse `PLACE_ID,INDEX` for `--route-insert`.
fn parse_id_index(spec: &str, flag: &str) -> Result<(i64, usize)> {
    let Some((id, index)) = spec.split_once(',') else {
        return Err(format!("{flag} must be PLACE_ID,INDEX").into());
    };
    let id = id.trim().parse::<i64>().map_err(|_| format!("{flag}: bad place id"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("{flag}: bad index"))?;
    Ok((id, index))
}

/// Parse `FROM,TO` for `--route-move`.
fn parse_from_to(spec: &str) -> Result<(usize, usize)> {
    let Some((from, to)) = spec.split_once(',') else {
        return Err("--route-move must be FROM,TO".into());
    };
    let from = from
        .trim()
        .parse::<usize>()
        .map_err(|_| "--route-move: bad FROM index")?;
    let to = to
        .trim()
        .parse::<usize>()
        .map_err(|_| "--route-move: bad TO index")?;
    Ok((from, to))
}

/// Print the derived result view.
fn print_places(app: &AppState) {
    if let Some(err) = &app.last_error {
        eprintln!("warning: {err}");
    }
    println!("{} of {} places", app.results.len(), app.all_results.len());
    for p in &app.results {
        println!("  {}", place_line(p));
    }
}

/// One display line for a place.
fn place_line(p: &Place) -> String {
    let mut line = format!("[{}] {}", p.place_type.as_wire(), p.name);
    let location: Vec<&str> = [p.city.as_str(), p.state.as_str(), p.country.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !location.is_empty() {
        line.push_str(&format!(" - {}", location.join(", ")));
    }
    if let Some(r) = p.rating {
        line.push_str(&format!(" (rating {r:.1})"));
    }
    if let Some(d) = p.distance_km {
        line.push_str(&format!(" {d:.1} km"));
    }
    line
}

/// Print the filtered group view with per-member markers.
fn print_group_places(group_id: i64, filtered: &[GroupPlace], total: usize) {
    println!("group {group_id}: {} of {total} places", filtered.len());
    for gp in filtered {
        println!("  {}", place_line(&gp.place));
        for m in &gp.members {
            let mut marks = Vec::new();
            if m.visited {
                marks.push("visited");
            }
            if m.in_wishlist {
                marks.push("wishlist");
            }
            if m.liked {
                marks.push("liked");
            }
            if !marks.is_empty() {
                println!("      {}: {}", m.username, marks.join(", "));
            }
        }
    }
}

/// Print the route in order with its lifecycle state.
fn print_route(seq: &RouteSequencer) {
    println!(
        "route for group {} ({} stops, {:?})",
        seq.group_id(),
        seq.len(),
        seq.state()
    );
    for stop in seq.places() {
        println!("  {:>2}. {} ({:.4}, {:.4})", stop.order_index, stop.name, stop.lat, stop.lon);
    }
}

/// Write CSV/GeoJSON exports of the filtered output when requested.
fn write_exports(places: &[Place], args: &Args) -> Result<()> {
    if let Some(path) = &args.export_csv {
        let csv = export::places_to_csv(places);
        if path.as_os_str() == "-" {
            print!("{csv}");
        } else {
            std::fs::write(path, csv)?;
            println!("wrote {} places to {}", places.len(), path.display());
        }
    }
    if let Some(path) = &args.export_geojson {
        let doc = serde_json::to_string_pretty(&export::places_to_geojson(places))?;
        if path.as_os_str() == "-" {
            println!("{doc}");
        } else {
            std::fs::write(path, doc)?;
            println!("wrote {} places to {}", places.len(), path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(list: &[&str]) -> Args {
        let mut argv = vec!["tripsea"];
        argv.extend_from_slice(list);
        Args::parse_from(argv)
    }

    #[test]
    /// What: Geometric flags resolve to the right request variant
    ///
    /// - Input: Radius, bbox, and nearest flag combinations
    /// - Output: Matching `SearchRequest`s; no flags yields None
    fn search_request_selection() {
        let settings = Settings::default();
        let r = search_request(&args(&["--lat", "48.1", "--lon", "11.5"]), &settings)
            .expect("valid")
            .expect("some");
        assert_eq!(r, SearchRequest::Radius { lat: 48.1, lon: 11.5, km: 10.0 });

        let r = search_request(&args(&["--bbox", "49,48,12,11"]), &settings)
            .expect("valid")
            .expect("some");
        assert_eq!(r, SearchRequest::Bbox { north: 49.0, south: 48.0, east: 12.0, west: 11.0 });

        let r = search_request(
            &args(&["--lat", "48.1", "--lon", "11.5", "--nearest", "5"]),
            &settings,
        )
        .expect("valid")
        .expect("some");
        assert_eq!(r, SearchRequest::Nearest { lat: 48.1, lon: 11.5, k: 5 });

        assert!(search_request(&args(&[]), &settings).expect("valid").is_none());
    }

    #[test]
    /// What: Malformed geometric input is rejected locally
    ///
    /// - Input: Three-value bbox, out-of-range latitude, zero radius
    /// - Output: Errors before any network call
    fn search_request_validation() {
        let settings = Settings::default();
        assert!(search_request(&args(&["--bbox", "1,2,3"]), &settings).is_err());
        assert!(search_request(&args(&["--lat", "99", "--lon", "0"]), &settings).is_err());
        assert!(
            search_request(&args(&["--lat", "48.0", "--lon", "11.0", "--km", "0"]), &settings)
                .is_err()
        );
    }

    #[test]
    /// What: Filter flags land on the filter value objects
    ///
    /// - Input: Type, rating, cuisine, fee-bucket, and query flags
    /// - Output: Corresponding fields set and the dirty flag raised
    fn filter_args_applied() {
        let mut app = AppState::default();
        apply_filter_args(
            &mut app,
            &args(&[
                "--type",
                "restaurant,hotel",
                "--min-rating",
                "4",
                "--cuisine",
                "thai",
                "--entry-fee",
                "free,25+",
                "--query",
                "curry",
            ]),
        );
        assert!(app.generic_filters.place_types.contains(&PlaceType::Restaurant));
        assert!(app.generic_filters.place_types.contains(&PlaceType::Hotel));
        assert!((app.generic_filters.min_rating - 4.0).abs() < f64::EPSILON);
        assert_eq!(app.restaurant_filters.cuisines.as_deref(), Some("thai"));
        assert!(app.tourist_filters.entry_fee_buckets.contains(&FeeBucket::Free));
        assert!(app.tourist_filters.entry_fee_buckets.contains(&FeeBucket::Over25));
        assert_eq!(app.input, "curry");
        assert!(app.filters_dirty);
    }

    #[test]
    /// What: Route flag parsers validate their shapes
    ///
    /// - Input: Good and bad FROM,TO / PLACE_ID,INDEX strings
    /// - Output: Parsed pairs or local errors
    fn route_flag_parsers() {
        assert_eq!(parse_from_to("2, 0").expect("pair"), (2, 0));
        assert!(parse_from_to("2").is_err());
        assert!(parse_from_to("a,b").is_err());
        assert_eq!(parse_id_index("17,3", "--route-insert").expect("pair"), (17, 3));
        assert!(parse_id_index("17", "--route-insert").is_err());
    }
}
