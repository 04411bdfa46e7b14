use campus_locator::{
    route, to_pixel, Campus, Point, ResolvedMatch, RoomMatch, RouteOrder, ViewportGeometry,
    MAX_BUILDING_SUGGESTIONS,
};

fn campus() -> Campus {
    Campus::builtin().expect("bundled dataset loads")
}

fn resolve_room(campus: &Campus, query: &str) -> RoomMatch {
    match campus.resolver().resolve(query) {
        Some(ResolvedMatch::Room(room)) => room,
        other => panic!("{:?} should resolve to a room, got {:?}", query, other),
    }
}

#[test]
fn every_building_code_resolves_to_itself() {
    let campus = campus();
    let resolver = campus.resolver();

    for building in campus.directory() {
        for query in [
            building.code.clone(),
            building.code.to_lowercase(),
            format!("  {}  ", building.code),
        ] {
            match resolver.resolve(&query) {
                Some(ResolvedMatch::Building(found)) => assert_eq!(found.code, building.code),
                other => panic!("{:?} resolved to {:?}", query, other),
            }
        }
    }
}

#[test]
fn room_query_spellings_agree() {
    let campus = campus();
    let expected = resolve_room(&campus, "NH 110");

    assert_eq!(expected.building.code, "NH");
    assert_eq!(expected.floor.level, "1");
    assert_eq!(expected.room.coordinate(), [0.246, 0.553]);

    for query in ["NH110", "nh110", "nh 110", "Nedderman 110", "Nedderman Hall 110"] {
        assert_eq!(resolve_room(&campus, query), expected, "query {:?}", query);
    }
}

#[test]
fn basement_rooms_use_the_stored_numbering() {
    let campus = campus();

    // NH stores basement rooms without the B prefix
    let spaced = resolve_room(&campus, "NH B22");
    assert_eq!(spaced.floor.level, "B");
    assert_eq!(spaced.floor.display_name, "Basement");
    assert_eq!(spaced.room.number, "22");
    assert_eq!(resolve_room(&campus, "NHB22"), spaced);

    // LS stores them with it
    let ls = resolve_room(&campus, "LS B22");
    assert_eq!(ls.room.number, "B22");
    assert_eq!(ls.room.coordinate(), [0.731, 0.262]);
}

#[test]
fn compact_code_ending_in_b_is_not_split_off_as_basement() {
    let campus = campus();

    let spaced = resolve_room(&campus, "ERB 110");
    assert_eq!(spaced.building.code, "ERB");
    assert_eq!(spaced.floor.level, "1");
    assert_eq!(resolve_room(&campus, "ERB110"), spaced);
    assert_eq!(resolve_room(&campus, "NHB22"), resolve_room(&campus, "NH B22"));
}

#[test]
fn bare_room_goes_to_first_building_in_directory() {
    let campus = campus();

    // NH and LS both have a basement room 22; NH is listed first
    let matched = resolve_room(&campus, "B22");
    assert_eq!(matched.building.code, "NH");
    assert_eq!(matched.room.coordinate(), [0.356, 0.421]);

    // Only LS stores B30, but NH has a usable basement and is consulted first
    let matched = resolve_room(&campus, "b30");
    assert_eq!(matched.building.code, "NH");
    assert_eq!(matched.room.coordinate(), [0.5, 0.5]);
}

#[test]
fn floor_with_image_but_no_room_data_gets_placeholder() {
    let campus = campus();
    let matched = resolve_room(&campus, "UH B10");

    assert_eq!(matched.floor.level, "B");
    assert!(matched.floor.image.is_some());
    assert_eq!(matched.room.number, "B10");
    assert_eq!(matched.room.coordinate(), [0.5, 0.5]);
}

#[test]
fn room_query_without_floor_falls_back_to_building() {
    let campus = campus();
    // Texas Hall has no floor plans or room data at all
    match campus.resolver().resolve("TEX 210") {
        Some(ResolvedMatch::Building(building)) => assert_eq!(building.code, "TEX"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn building_search_is_capped_and_ordered() {
    let campus = campus();
    let resolver = campus.resolver();

    let hits = resolver.search_buildings("hall");
    assert_eq!(hits.len(), MAX_BUILDING_SUGGESTIONS);
    assert_eq!(hits[0].code, "NH");

    let suggestions = resolver.suggest("Woolf");
    assert_eq!(suggestions.default_selection().unwrap().label(), "WH - Woolf Hall");
}

#[test]
fn blank_queries_resolve_nothing() {
    let campus = campus();
    let resolver = campus.resolver();
    for query in ["", "   ", "\t"] {
        assert!(resolver.resolve(query).is_none());
        assert!(resolver.search_buildings(query).is_empty());
    }
}

#[test]
fn resolved_room_maps_and_routes() {
    let campus = campus();
    let matched = resolve_room(&campus, "WH 305");
    let viewport = ViewportGeometry::new(390.0, 640.0).with_image(1700.0, 2200.0);

    let target = to_pixel(matched.room.coordinate(), &viewport).unwrap();
    let start = Point::new(20.0, 600.0);
    let route = route(start, target, &viewport).unwrap();

    assert_eq!(route.waypoints.len(), 4);
    assert_eq!(route.start(), Some(start));
    assert_eq!(route.target(), Some(target));
    assert!(matches!(route.order, RouteOrder::HorizontalFirst | RouteOrder::VerticalFirst));
}
