use geojson::Value;
use gpx_heatmap::config::Config;
use gpx_heatmap::error::RenderError;
use gpx_heatmap::pipeline::parse::forward_fill;
use gpx_heatmap::pipeline::render::{render_html, MapRenderer};
use gpx_heatmap::types::gradient::{normalize, Gradient};
use gpx_heatmap::types::map::RenderOptions;
use gpx_heatmap::types::track::Segment;

fn segment(heart_rates: &[u16]) -> Segment {
    forward_fill(
        heart_rates
            .iter()
            .enumerate()
            .map(|(i, hr)| (47.0 + i as f64 * 0.01, 8.0 + i as f64 * 0.01, Some(*hr))),
    )
}

#[test]
fn viridis_endpoints() {
    let gradient = Gradient::viridis();
    assert_eq!(gradient.interpolate(0.0), "#440154");
    assert_eq!(gradient.interpolate(1.0), "#FDE725");
    assert_eq!(gradient.interpolate(0.5), "#21918C");
    assert_eq!(gradient.interpolate(-3.0), "#440154");
    assert!(Gradient::get("viridis").is_some());
    assert!(Gradient::get("nope").is_none());
}

#[test]
fn normalize_handles_degenerate_range() {
    assert_eq!(normalize(120.0, 100.0, 140.0), 0.5);
    assert_eq!(normalize(80.0, 100.0, 140.0), 0.0);
    assert_eq!(normalize(90.0, 90.0, 90.0), 0.0);
}

#[test]
fn strokes_are_bucketed_by_per_segment_heart_rate() {
    let options = RenderOptions::default();
    let mut renderer = MapRenderer::new(&options).expect("renderer");
    // Last reading never starts a stroke, so only 100 and 200 pick colors.
    renderer.add_segment(&segment(&[100, 100, 200, 150]));
    let collection = renderer.feature_collection();

    assert_eq!(collection.features.len(), 2);
    let mut colors = Vec::new();
    let mut strokes = 0;
    for feature in &collection.features {
        let props = feature.properties.as_ref().expect("properties");
        colors.push(props["color"].as_str().expect("color").to_string());
        assert_eq!(props["weight"], 4.0);
        assert_eq!(props["opacity"], 0.5);
        match &feature.geometry.as_ref().expect("geometry").value {
            Value::MultiLineString(lines) => {
                strokes += lines.len();
                assert!(lines.iter().all(|line| line.len() == 2));
            }
            other => panic!("Expected MultiLineString, got {other:?}"),
        }
    }
    assert_eq!(strokes, 3);
    assert_eq!(colors, vec!["#440154", "#FDE725"]);
    let bbox = collection.bbox.expect("bbox");
    let expected = [8.0, 47.0, 8.03, 47.03];
    assert!(bbox.iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-9));
}

#[test]
fn constant_heart_rate_uses_low_end_of_ramp() {
    let options = RenderOptions::default();
    let mut renderer = MapRenderer::new(&options).expect("renderer");
    renderer.add_segment(&segment(&[130, 130, 130]));
    let collection = renderer.feature_collection();
    assert_eq!(collection.features.len(), 1);
    let props = collection.features[0].properties.as_ref().expect("properties");
    assert_eq!(props["color"], "#440154");
}

#[test]
fn single_point_segment_draws_nothing_but_counts_for_bounds() {
    let options = RenderOptions::default();
    let mut renderer = MapRenderer::new(&options).expect("renderer");
    renderer.add_segment(&segment(&[100]));
    let collection = renderer.feature_collection();
    assert!(collection.features.is_empty());
    assert_eq!(collection.bbox, Some(vec![8.0, 47.0, 8.0, 47.0]));
}

#[test]
fn html_embeds_tiles_and_track_names() {
    let mut named = segment(&[100, 110, 120]);
    named.set_name(Some("Evening </script> Ride".to_string()));
    let html = render_html(&[named], &RenderOptions::default()).expect("html");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("leaflet.js"));
    assert!(html.contains("tile.openstreetmap.org"));
    assert!(html.contains("MultiLineString"));
    assert!(html.contains("Evening <\\/script> Ride"));
    assert_eq!(html.matches("</script>").count(), 2);
}

#[test]
fn empty_map_is_still_a_document() {
    let html = render_html(&[], &RenderOptions::default()).expect("html");
    assert!(html.contains("\"features\":[]"));
    assert!(html.contains("map.setView([0, 0], 2)"));
}

#[test]
fn rejects_invalid_options() {
    let options = RenderOptions {
        color_buckets: 0,
        ..RenderOptions::default()
    };
    assert!(matches!(
        MapRenderer::new(&options),
        Err(RenderError::InvalidOptions(_))
    ));

    let options = RenderOptions {
        stroke_opacity: 1.5,
        ..RenderOptions::default()
    };
    assert!(matches!(
        render_html(&[], &options),
        Err(RenderError::InvalidOptions(_))
    ));
}

#[test]
fn options_follow_config() {
    let config = Config {
        stroke_width: 2.5,
        gradient: "magma".to_string(),
        ..Config::default()
    };
    let options = RenderOptions::from_config(&config);
    assert_eq!(options.stroke_width, 2.5);
    assert_eq!(options.gradient.name, "magma");

    let unknown = Config {
        gradient: "plaid".to_string(),
        ..Config::default()
    };
    assert_eq!(RenderOptions::from_config(&unknown).gradient.name, "viridis");
}
