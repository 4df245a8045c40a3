//! Behaviour-driven step definitions driving the search CLI scenarios.

use super::helpers::{GeocoderReply, StubGeocoderBuilder, stdout_json};
use super::*;
use crate::search::run_search_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

struct SearchWorld {
    reply: RefCell<GeocoderReply>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

#[fixture]
fn world() -> SearchWorld {
    SearchWorld {
        reply: RefCell::new(GeocoderReply::NotFound),
        stdout: RefCell::new(Vec::new()),
        result: RefCell::new(None),
    }
}

fn unquote(text: &str) -> &str {
    text.trim().trim_matches('"')
}

fn run_with_argv(world: &SearchWorld, argv: Vec<String>) {
    let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
    let builder = StubGeocoderBuilder {
        reply: world.reply.borrow().clone(),
    };
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Search(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_search_with(args, &builder, &mut *buffer)
        }
        other => panic!("expected search command, found {other:?}"),
    });
    world.result.replace(Some(outcome));
}

#[given("the geocoder places the address in Ciudad del Este")]
fn geocoder_finds_cde(#[from(world)] world: &SearchWorld) {
    world.reply.replace(GeocoderReply::Found {
        lat: -25.5085,
        lon: -54.6111,
    });
}

#[given("the geocoder finds nothing")]
fn geocoder_finds_nothing(#[from(world)] world: &SearchWorld) {
    world.reply.replace(GeocoderReply::NotFound);
}

#[when("I search for {address}")]
fn search_for(#[from(world)] world: &SearchWorld, address: String) {
    let argv = vec![
        "civic-map".to_owned(),
        "search".to_owned(),
        unquote(&address).to_owned(),
    ];
    run_with_argv(world, argv);
}

#[when("I search without an address")]
fn search_without_address(#[from(world)] world: &SearchWorld) {
    run_with_argv(world, vec!["civic-map".to_owned(), "search".to_owned()]);
}

#[then("the search succeeds")]
fn search_succeeds(#[from(world)] world: &SearchWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the report is centred at zoom 15")]
fn report_centred(#[from(world)] world: &SearchWorld) {
    let report = stdout_json(&world.stdout.borrow());
    assert_eq!(report["viewport"]["zoom"], 15);
    assert_eq!(report["location"]["x"], -54.6111);
    assert_eq!(report["query"], "Avenida Monseñor Rodríguez, Paraguay");
}

#[then("the command fails because the address was not found")]
fn command_fails_not_found(#[from(world)] world: &SearchWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::AddressNotFound { query } => assert_eq!(query, "Calle Inexistente"),
        other => panic!("expected AddressNotFound, found {other:?}"),
    }
}

#[then("the command fails because the address is missing")]
fn command_fails_missing(#[from(world)] world: &SearchWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_SEARCH_ADDRESS),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_search_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/search_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: SearchWorld) {
            let _ = world;
        }
    };
}

register_search_scenario!(search_found_address, "moving to a found address");
register_search_scenario!(search_unknown_address, "reporting an unknown address");
register_search_scenario!(search_missing_address, "rejecting a missing address");
