//! Unit tests for the map view state machine.

use std::future::Future;

use geo::Coord;
use rstest::{fixture, rstest};

use super::*;
use crate::bbox::BoundingBox;
use crate::city::City;
use crate::notice::{GEODATA_FAILURE_MESSAGE, NOT_FOUND_MESSAGE};
use crate::query::OverpassQuery;
use crate::source::{GeocodeError, GeodataError};
use crate::test_support::{MemorySource, StaticGeocoder, tagged_point};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

#[fixture]
fn view() -> MapViewState {
    MapViewState::default()
}

#[fixture]
fn police_source() -> MemorySource {
    MemorySource::with_points(vec![tagged_point(
        1,
        -25.29,
        -57.64,
        &[("amenity", "police")],
    )])
}

fn police() -> LayerKey {
    LayerKey::Category(Category::Police)
}

#[rstest]
fn default_view_attaches_only_police(view: MapViewState) {
    assert_eq!(view.attached_layers().collect::<Vec<_>>(), vec![police()]);
    assert_eq!(view.status().active_layers, "Police");
    assert_eq!(view.status().point_count, "0");
    assert!(!view.status().loading);
    assert_eq!(view.phase(), RefreshPhase::Idle);
    assert_eq!(view.viewport().center(), City::INITIAL.center());
}

#[rstest]
fn refresh_renders_police_point(mut view: MapViewState, police_source: MemorySource) {
    let outcome = block_on(view.refresh(&police_source));

    assert_eq!(
        outcome,
        RefreshOutcome::Success {
            points: 1,
            markers: 1
        }
    );
    assert_eq!(outcome.phase(), Some(RefreshPhase::Success));
    assert_eq!(view.status().point_count, "1");
    assert_eq!(view.layers()[Category::Police].len(), 1);
    assert!(view.is_attached(police()));
    assert!(!view.status().loading);
    assert_eq!(view.phase(), RefreshPhase::Idle);
    let heat = view.heat().expect("heat surface");
    assert_eq!(heat.len(), 1);
    assert!(!view.is_attached(LayerKey::Heat));
}

fn first_clause_bbox(query: &OverpassQuery) -> BoundingBox {
    let (_, rest) = query.as_str().split_once("](").expect("clause bbox");
    let (edges, _) = rest.split_once(')').expect("closing parenthesis");
    edges.parse().expect("bbox edges")
}

#[rstest]
fn refresh_sends_query_for_viewport(mut view: MapViewState, police_source: MemorySource) {
    block_on(view.refresh(&police_source));

    let queries = police_source.queries();
    assert_eq!(queries.len(), 1);
    let bbox = first_clause_bbox(&queries[0]);
    let centre = City::INITIAL.center();
    assert!(bbox.contains(centre.y, centre.x));
    assert_ne!(bbox, BoundingBox::WORLD);
    let lon_span = bbox.east() - bbox.west();
    assert!((lon_span - 0.175_781_25).abs() < 1e-9, "span was {lon_span}");
    assert!(bbox.north() - bbox.south() < 1.0);
}

#[rstest]
fn refresh_with_no_elements_clears_everything(mut view: MapViewState, police_source: MemorySource) {
    block_on(view.refresh(&police_source));
    let empty = MemorySource::with_points(Vec::new());

    let outcome = block_on(view.refresh(&empty));

    assert_eq!(
        outcome,
        RefreshOutcome::Success {
            points: 0,
            markers: 0
        }
    );
    assert_eq!(view.status().point_count, "0");
    assert_eq!(view.layers().total_markers(), 0);
    assert!(view.heat().is_none());
}

#[rstest]
fn failed_refresh_raises_notice_and_leaves_layers_empty(
    mut view: MapViewState,
    police_source: MemorySource,
) {
    block_on(view.refresh(&police_source));
    let failing = MemorySource::with_error(GeodataError::Http {
        url: "https://overpass.test/api/interpreter".into(),
        status: 504,
        message: "gateway timeout".into(),
    });

    let outcome = block_on(view.refresh(&failing));

    assert_eq!(outcome.phase(), Some(RefreshPhase::Failed));
    let notice = view.status().notice.clone().expect("notice raised");
    assert_eq!(notice.message(), GEODATA_FAILURE_MESSAGE);
    assert_eq!(view.layers().total_markers(), 0);
    assert!(view.heat().is_none());
    assert_eq!(view.status().point_count, "0");
    assert!(!view.status().loading);
    assert_eq!(view.status().active_layers, "Police");
    assert_eq!(view.dismiss_notice(), Some(notice));
    assert!(view.status().notice.is_none());
}

#[rstest]
fn begin_refresh_shows_loading_and_empties_layers(
    mut view: MapViewState,
    police_source: MemorySource,
) {
    block_on(view.refresh(&police_source));

    let ticket = view.begin_refresh();

    assert!(view.status().loading);
    assert_eq!(view.phase(), RefreshPhase::Loading);
    assert_eq!(view.layers().total_markers(), 0);
    assert_eq!(view.attached_layers().count(), 0);
    assert_eq!(ticket.bbox(), &view.viewport().bounds());
}

#[rstest]
fn stale_completion_is_discarded(mut view: MapViewState) {
    let bbox = BoundingBox::new(-25.4, -57.7, -25.2, -57.5).expect("bbox");
    let first = view.begin_refresh_in(bbox);
    let second = view.begin_refresh_in(bbox);
    assert!(second.generation() > first.generation());

    let stale = view.complete_refresh(
        first,
        Ok(vec![tagged_point(9, -25.3, -57.6, &[("amenity", "police")])]),
    );

    assert_eq!(stale, RefreshOutcome::Superseded);
    assert_eq!(stale.phase(), None);
    assert!(view.status().loading);
    assert_eq!(view.layers().total_markers(), 0);

    let fresh = view.complete_refresh(second, Ok(Vec::new()));
    assert_eq!(
        fresh,
        RefreshOutcome::Success {
            points: 0,
            markers: 0
        }
    );
    assert!(!view.status().loading);
}

#[rstest]
fn duplicate_ids_count_once(mut view: MapViewState) {
    let point = tagged_point(5, -25.3, -57.6, &[("amenity", "hospital")]);
    let source = MemorySource::with_points(vec![point.clone(), point]);

    block_on(view.refresh(&source));

    assert_eq!(view.status().point_count, "1");
    assert_eq!(view.layers()[Category::Hospital].len(), 1);
}

#[rstest]
fn heat_attaches_only_once_surface_exists(mut view: MapViewState, police_source: MemorySource) {
    assert!(view.toggle_layer(LayerKey::Heat));
    assert!(!view.is_attached(LayerKey::Heat));
    assert_eq!(view.status().active_layers, "Police");

    block_on(view.refresh(&police_source));

    assert!(view.is_attached(LayerKey::Heat));
    assert_eq!(view.status().active_layers, "Police • Zone safety");
}

#[rstest]
fn toggling_off_detaches_without_dropping_markers(
    mut view: MapViewState,
    police_source: MemorySource,
) {
    block_on(view.refresh(&police_source));

    assert!(!view.toggle_layer(police()));

    assert!(!view.is_attached(police()));
    assert_eq!(view.layers()[Category::Police].len(), 1);
    assert_eq!(view.status().active_layers, "None");
}

#[rstest]
fn empty_selection_shows_placeholder() {
    let view = MapViewState::with_selection(
        Viewport::new(City::INITIAL.center(), 13, ViewportSize::default()),
        VisibilitySelection::empty(),
    );
    assert_eq!(view.attached_layers().count(), 0);
    assert_eq!(view.status().active_layers, "None");
}

#[rstest]
#[case(City::Asuncion)]
#[case(City::CiudadDelEste)]
#[case(City::Encarnacion)]
#[case(City::Villarrica)]
fn go_to_city_moves_viewport(mut view: MapViewState, #[case] city: City) {
    view.go_to_city(city);
    assert_eq!(view.viewport().center(), city.center());
    assert_eq!(view.viewport().zoom(), city.zoom());
}

#[rstest]
fn search_moves_to_match(mut view: MapViewState) {
    let geocoder = StaticGeocoder::found(-25.28, -57.63);

    let outcome = block_on(view.search_address(&geocoder, "  Palma 123 "));

    assert!(matches!(outcome, SearchOutcome::Moved(_)));
    assert_eq!(view.viewport().center(), Coord { x: -57.63, y: -25.28 });
    assert_eq!(view.viewport().zoom(), SEARCH_ZOOM);
    assert_eq!(geocoder.queries(), vec!["Palma 123, Paraguay".to_owned()]);
    assert!(!view.status().loading);
}

#[rstest]
fn search_keeps_loading_while_refresh_is_outstanding(mut view: MapViewState) {
    let ticket = view.begin_refresh();

    let geocoder = StaticGeocoder::found(-25.28, -57.63);
    let outcome = block_on(view.search_address(&geocoder, "Palma"));

    assert!(matches!(outcome, SearchOutcome::Moved(_)));
    assert!(view.status().loading);
    assert_eq!(view.phase(), RefreshPhase::Loading);

    let completed = view.complete_refresh(ticket, Ok(Vec::new()));
    assert_eq!(completed.phase(), Some(RefreshPhase::Success));
    assert!(!view.status().loading);
}

#[rstest]
fn search_without_match_keeps_viewport(mut view: MapViewState) {
    let before = *view.viewport();
    let geocoder = StaticGeocoder::not_found();

    let outcome = block_on(view.search_address(&geocoder, "nowhere"));

    let SearchOutcome::Failed(notice) = outcome else {
        panic!("expected a failed search, got {outcome:?}");
    };
    assert_eq!(notice.message(), NOT_FOUND_MESSAGE);
    assert_eq!(view.status().notice, Some(notice));
    assert_eq!(*view.viewport(), before);
}

#[rstest]
fn search_failure_raises_fetch_notice(mut view: MapViewState) {
    let before = *view.viewport();
    let geocoder = StaticGeocoder::failing(GeocodeError::Network {
        url: "https://nominatim.test/search".into(),
        message: "connection refused".into(),
    });

    let outcome = block_on(view.search_address(&geocoder, "Mariscal López"));

    assert!(matches!(
        outcome,
        SearchOutcome::Failed(Notice::FetchFailure { .. })
    ));
    assert_eq!(*view.viewport(), before);
    assert!(!view.status().loading);
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_search_is_skipped(mut view: MapViewState, #[case] query: &str) {
    let geocoder = StaticGeocoder::found(0.0, 0.0);

    let outcome = block_on(view.search_address(&geocoder, query));

    assert_eq!(outcome, SearchOutcome::Skipped);
    assert!(geocoder.queries().is_empty());
    assert!(view.status().notice.is_none());
}
