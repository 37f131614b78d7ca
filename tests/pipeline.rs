use std::fs;
use std::path::Path;

use gpx_heatmap::error::AppError;
use gpx_heatmap::pipeline::{self, discover, select::TrackFilter, RunOptions};
use gpx_heatmap::pipeline::parse::parse_timestamp;
use gpx_heatmap::types::map::OutlierParams;
use tempfile::TempDir;

fn gpx(name: &str, kind: &str, time: &str, lat: f64, lon: f64) -> String {
    let points: String = (0..5)
        .map(|i| {
            format!(
                r#"<trkpt lat="{:.4}" lon="{:.4}"><extensions><ns3:TrackPointExtension><ns3:hr>{}</ns3:hr></ns3:TrackPointExtension></extensions></trkpt>"#,
                lat + i as f64 * 0.001,
                lon + i as f64 * 0.001,
                110 + i * 5
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns:ns3="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
  <metadata><time>{time}</time></metadata>
  <trk><name>{name}</name><type>{kind}</type><trkseg>{points}</trkseg></trk>
</gpx>"#
    )
}

fn write(dir: &Path, file: &str, body: &str) {
    fs::write(dir.join(file), body).expect("write fixture");
}

#[test]
fn discovers_gpx_files_sorted_by_name() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "b.gpx", "");
    write(temp.path(), "a.gpx", "");
    write(temp.path(), "notes.txt", "");
    write(temp.path(), "c.GPX", "");
    fs::create_dir(temp.path().join("dir.gpx")).expect("mkdir");

    let files = discover::gpx_files(temp.path()).expect("discover");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.gpx", "b.gpx"]);
}

#[test]
fn missing_directory_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("nope");
    assert!(discover::gpx_files(&missing).is_err());
}

#[test]
fn filters_tracks_and_writes_map() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "01.gpx", &gpx("Old Ride", "cycling", "2019-03-01T07:00:00.000Z", 52.0, 13.0));
    write(temp.path(), "02.gpx", &gpx("Lunch Run", "running", "2021-03-01T12:00:00.000Z", 52.01, 13.0));
    write(temp.path(), "03.gpx", &gpx("Commute", "cycling", "2021-04-01T08:00:00.000Z", 52.02, 13.0));

    let options = RunOptions {
        filter: TrackFilter {
            since: Some(parse_timestamp("2020-01-01").expect("timestamp")),
            activities: vec!["cycling".to_string()],
        },
        ..RunOptions::default()
    };
    let output = temp.path().join("map.html");
    let written = pipeline::run(temp.path(), &output, &options).expect("run");
    assert_eq!(written, output);

    let html = fs::read_to_string(&output).expect("read map");
    assert!(html.contains("Commute"));
    assert!(!html.contains("Old Ride"));
    assert!(!html.contains("Lunch Run"));
}

#[test]
fn outlier_filter_drops_distant_track() {
    let temp = TempDir::new().expect("tempdir");
    for i in 0..10 {
        write(
            temp.path(),
            &format!("home-{i:02}.gpx"),
            &gpx(&format!("Home {i}"), "running", "2021-01-01", 52.0 + i as f64 * 0.002, 13.0),
        );
    }
    write(temp.path(), "trip.gpx", &gpx("Far Away", "running", "2021-01-01", -33.9, 151.2));

    let unfiltered = RunOptions::default();
    let (html, count) = pipeline::build_map(temp.path(), &unfiltered).expect("map");
    assert_eq!(count, 11);
    assert!(html.contains("Far Away"));

    let filtered = RunOptions {
        outliers: Some(OutlierParams::default()),
        ..RunOptions::default()
    };
    let (html, count) = pipeline::build_map(temp.path(), &filtered).expect("map");
    assert_eq!(count, 10);
    assert!(!html.contains("Far Away"));
    assert!(html.contains("Home 9"));
}

#[test]
fn broken_file_names_the_file() {
    let temp = TempDir::new().expect("tempdir");
    write(temp.path(), "good.gpx", &gpx("Fine", "running", "2021-01-01", 1.0, 1.0));
    write(temp.path(), "zz-broken.gpx", "<gpx><metadata><time>2021-01-01</time>");

    let err = pipeline::build_map(temp.path(), &RunOptions::default()).unwrap_err();
    match &err {
        AppError::ParseFile { path, .. } => assert!(path.ends_with("zz-broken.gpx")),
        other => panic!("Expected ParseFile, got {other:?}"),
    }
    assert!(err.to_string().contains("zz-broken.gpx"));
}

#[test]
fn empty_directory_renders_empty_map() {
    let temp = TempDir::new().expect("tempdir");
    let (html, count) = pipeline::build_map(temp.path(), &RunOptions::default()).expect("map");
    assert_eq!(count, 0);
    assert!(html.contains("\"features\":[]"));
}
