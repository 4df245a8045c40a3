//! Focused unit tests covering refresh CLI configuration and reports.

use super::helpers::{StubGeodataSourceBuilder, central_points, overpass_timeout, stdout_json};
use super::*;
use crate::refresh::{
    RefreshArea, RefreshArgs, RefreshConfig, config_from_layers_for_test, run_refresh_with,
};
use civic_map_core::notice::GEODATA_FAILURE_MESSAGE;
use civic_map_core::{BoundingBoxError, Category, City, LayerKey, ViewportSize};
use civic_map_data::DEFAULT_OVERPASS_ENDPOINT;
use rstest::rstest;
use std::time::Duration;

#[rstest]
fn defaults_to_asuncion_with_police() {
    let config = RefreshConfig::try_from(RefreshArgs::default()).expect("config should build");

    assert_eq!(config.area, RefreshArea::City(City::Asuncion));
    assert!(config.selection.is_selected(LayerKey::Category(Category::Police)));
    assert_eq!(config.size, ViewportSize::default());
    assert_eq!(config.overpass_url, DEFAULT_OVERPASS_ENDPOINT);
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[rstest]
fn city_and_bbox_conflict() {
    let args = RefreshArgs {
        city: Some("cde".to_owned()),
        bbox: Some("-25.6,-54.7,-25.4,-54.5".to_owned()),
        ..RefreshArgs::default()
    };

    let err = RefreshConfig::try_from(args).expect_err("conflict should error");
    match err {
        CliError::ConflictingArguments { first, second } => {
            assert_eq!(first, ARG_REFRESH_CITY);
            assert_eq!(second, ARG_REFRESH_BBOX);
        }
        other => panic!("expected ConflictingArguments, found {other:?}"),
    }
}

#[rstest]
#[case::three_edges("-25.6,-54.7,-25.4")]
#[case::not_numbers("south,west,north,east")]
fn malformed_bbox_is_rejected(#[case] input: &str) {
    let args = RefreshArgs {
        bbox: Some(input.to_owned()),
        ..RefreshArgs::default()
    };

    let err = RefreshConfig::try_from(args).expect_err("bbox should error");
    match err {
        CliError::InvalidBoundingBox { input: got, source } => {
            assert_eq!(got, input);
            assert!(matches!(source, BoundingBoxError::Malformed { .. }));
        }
        other => panic!("expected InvalidBoundingBox, found {other:?}"),
    }
}

#[rstest]
fn inverted_bbox_is_rejected() {
    let args = RefreshArgs {
        bbox: Some("-25.4,-54.7,-25.6,-54.5".to_owned()),
        ..RefreshArgs::default()
    };

    let err = RefreshConfig::try_from(args).expect_err("bbox should error");
    assert!(matches!(
        err,
        CliError::InvalidBoundingBox {
            source: BoundingBoxError::InvertedLatitude { .. },
            ..
        }
    ));
}

#[rstest]
fn unknown_city_is_rejected() {
    let args = RefreshArgs {
        city: Some("luque".to_owned()),
        ..RefreshArgs::default()
    };

    let err = RefreshConfig::try_from(args).expect_err("city should error");
    match err {
        CliError::UnknownCity(source) => assert_eq!(source.key, "luque"),
        other => panic!("expected UnknownCity, found {other:?}"),
    }
}

#[rstest]
fn unknown_layer_is_rejected() {
    let args = RefreshArgs {
        layers: Some(vec!["police".to_owned(), "bus".to_owned()]),
        ..RefreshArgs::default()
    };

    let err = RefreshConfig::try_from(args).expect_err("layer should error");
    match err {
        CliError::UnknownLayer { key } => assert_eq!(key, "bus"),
        other => panic!("expected UnknownLayer, found {other:?}"),
    }
}

#[rstest]
fn explicit_layers_replace_the_default() {
    let args = RefreshArgs {
        layers: Some(vec!["heat".to_owned(), "hospital".to_owned()]),
        ..RefreshArgs::default()
    };

    let config = RefreshConfig::try_from(args).expect("config should build");

    assert!(config.selection.is_selected(LayerKey::Heat));
    assert!(config.selection.is_selected(LayerKey::Category(Category::Hospital)));
    assert!(!config.selection.is_selected(LayerKey::Category(Category::Police)));
}

#[rstest]
#[case(Some(0), None)]
#[case(None, Some(0))]
fn empty_viewport_is_rejected(#[case] width: Option<u32>, #[case] height: Option<u32>) {
    let args = RefreshArgs {
        width,
        height,
        ..RefreshArgs::default()
    };

    let err = RefreshConfig::try_from(args).expect_err("size should error");
    assert!(matches!(err, CliError::EmptyViewport { .. }));
}

#[rstest]
fn invalid_timeout_maps_to_configuration_error() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "city": "cde",
            "timeout_secs": 10,
            "overpass_url": "http://from-file/api/interpreter",
        }),
        None,
    );
    composer.push_environment(json!({
        "city": "villarrica",
        "user_agent": "from-env/1.0",
    }));
    composer.push_cli(json!({ "city": "encarnacion" }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.area, RefreshArea::City(City::Encarnacion));
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.overpass_url, "http://from-file/api/interpreter");
    assert_eq!(config.user_agent, "from-env/1.0");
}

#[rstest]
fn report_lists_rendered_layers() {
    let builder = StubGeodataSourceBuilder::with_points(central_points());
    let mut stdout = Vec::new();

    run_refresh_with(RefreshArgs::default(), &builder, &mut stdout).expect("refresh succeeds");

    let report = stdout_json(&stdout);
    assert_eq!(report["point_count"], "4");
    assert_eq!(report["active_layers"], "Police");
    assert_eq!(report["viewport"]["zoom"], 13);
    let layers = report["layers"].as_array().expect("layers array");
    assert_eq!(layers.len(), Category::COUNT);
    let police = layers
        .iter()
        .find(|layer| layer["key"] == "police")
        .expect("police layer");
    assert_eq!(police["attached"], true);
    assert_eq!(police["markers"].as_array().map(Vec::len), Some(1));
    let hospital = layers
        .iter()
        .find(|layer| layer["key"] == "hospital")
        .expect("hospital layer");
    assert_eq!(hospital["attached"], false);
    assert_eq!(hospital["markers"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["heat_attached"], false);
    assert_eq!(report["heat"]["points"].as_array().map(Vec::len), Some(3));
}

#[rstest]
fn bbox_area_is_queried_verbatim() {
    let args = RefreshArgs {
        bbox: Some("-25.6,-54.7,-25.4,-54.5".to_owned()),
        ..RefreshArgs::default()
    };
    let builder = StubGeodataSourceBuilder::with_points(Vec::new());
    let mut stdout = Vec::new();

    run_refresh_with(args, &builder, &mut stdout).expect("refresh succeeds");

    let report = stdout_json(&stdout);
    assert_eq!(report["bbox"]["south"], -25.6);
    assert_eq!(report["bbox"]["east"], -54.5);
    assert_eq!(report["point_count"], "0");
    assert!(report["heat"].is_null());
    let center_lat = report["viewport"]["center"]["y"].as_f64().expect("latitude");
    assert!((center_lat - -25.5).abs() < 1e-9);
}

#[rstest]
fn builder_receives_resolved_config() {
    let args = RefreshArgs {
        city: Some("villarrica".to_owned()),
        width: Some(640),
        height: Some(480),
        ..RefreshArgs::default()
    };
    let builder = StubGeodataSourceBuilder::with_points(Vec::new());
    let mut stdout = Vec::new();

    run_refresh_with(args, &builder, &mut stdout).expect("refresh succeeds");

    let built = builder.built.borrow();
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].area, RefreshArea::City(City::Villarrica));
    assert_eq!(
        built[0].size,
        ViewportSize {
            width: 640,
            height: 480
        }
    );
}

#[rstest]
fn failed_fetch_surfaces_the_notice() {
    let builder = StubGeodataSourceBuilder::with_error(overpass_timeout());
    let mut stdout = Vec::new();

    let err = run_refresh_with(RefreshArgs::default(), &builder, &mut stdout)
        .expect_err("refresh should fail");

    match err {
        CliError::FetchFailed { message, detail } => {
            assert_eq!(message, GEODATA_FAILURE_MESSAGE);
            assert!(detail.contains("timed out"), "detail: {detail}");
        }
        other => panic!("expected FetchFailed, found {other:?}"),
    }
    assert!(stdout.is_empty());
}
