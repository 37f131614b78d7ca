use std::time::Instant;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::error::RenderError;
use crate::types::gradient::normalize;
use crate::types::map::RenderOptions;
use crate::types::track::Segment;

const LEAFLET_VERSION: &str = "1.9.4";

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>GPX tracks</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@__LEAFLET__/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@__LEAFLET__/dist/leaflet.js"></script>
  <style>
    html, body, #map { height: 100%; margin: 0; padding: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    var map = L.map("map");
    L.tileLayer(__TILE_URL__, {
      maxZoom: 19,
      attribution: __ATTRIBUTION__
    }).addTo(map);
    var tracks = __GEOJSON__;
    var layer = L.geoJSON(tracks, {
      style: function (feature) {
        return {
          color: feature.properties.color,
          weight: feature.properties.weight,
          opacity: feature.properties.opacity,
          lineCap: "butt"
        };
      },
      onEachFeature: function (feature, featureLayer) {
        if (feature.properties.name) {
          featureLayer.bindTooltip(feature.properties.name, { sticky: true });
        }
      }
    }).addTo(map);
    var bounds = layer.getBounds();
    if (bounds.isValid()) {
      map.fitBounds(bounds);
    } else {
      map.setView([0, 0], 2);
    }
  </script>
</body>
</html>
"#;

/// Collects heart-rate colored strokes for many segments into one map.
pub struct MapRenderer<'a> {
    options: &'a RenderOptions,
    features: Vec<Feature>,
    bounds: Option<(f64, f64, f64, f64)>,
}

impl<'a> MapRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Result<Self, RenderError> {
        validate_options(options)?;
        Ok(Self {
            options,
            features: Vec::new(),
            bounds: None,
        })
    }

    /// Adds one stroke per pair of consecutive points, colored by the heart
    /// rate at the first point of the pair.
    ///
    /// Normalization uses this segment's own heart-rate range, so the same
    /// color means different heart rates in different segments.
    pub fn add_segment(&mut self, segment: &Segment) {
        let Some((min_hr, max_hr)) = segment.heart_rate_range() else {
            return;
        };
        if let Some(extent) = segment.extent() {
            self.extend_bounds(extent);
        }
        if segment.len() < 2 {
            return;
        }

        let buckets = self.options.color_buckets;
        let lat = segment.lat();
        let lon = segment.lon();
        let heart_rate = segment.heart_rate();
        let mut bucket_lines: Vec<Vec<Vec<Vec<f64>>>> = vec![Vec::new(); buckets];
        for i in 0..segment.len() - 1 {
            let t = normalize(heart_rate[i] as f64, min_hr as f64, max_hr as f64);
            let bucket_idx = bucket_index(t, buckets);
            bucket_lines[bucket_idx].push(vec![
                vec![lon[i], lat[i]],
                vec![lon[i + 1], lat[i + 1]],
            ]);
        }

        for (bucket_idx, lines) in bucket_lines.into_iter().enumerate() {
            if lines.is_empty() {
                continue;
            }
            let color_t = bucket_idx as f64 / (buckets - 1).max(1) as f64;
            let mut props = Map::new();
            props.insert(
                "color".to_string(),
                JsonValue::String(self.options.gradient.interpolate(color_t)),
            );
            props.insert("weight".to_string(), self.options.stroke_width.into());
            props.insert("opacity".to_string(), self.options.stroke_opacity.into());
            if let Some(name) = segment.name() {
                props.insert("name".to_string(), JsonValue::String(name.to_string()));
            }

            self.features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::MultiLineString(lines))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            });
        }
    }

    fn extend_bounds(&mut self, (min_lon, max_lon, min_lat, max_lat): (f64, f64, f64, f64)) {
        self.bounds = Some(match self.bounds {
            None => (min_lon, max_lon, min_lat, max_lat),
            Some((a, b, c, d)) => (a.min(min_lon), b.max(max_lon), c.min(min_lat), d.max(max_lat)),
        });
    }

    pub fn feature_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: self
                .bounds
                .map(|(min_lon, max_lon, min_lat, max_lat)| vec![min_lon, min_lat, max_lon, max_lat]),
            features: self.features,
            foreign_members: None,
        }
    }

    pub fn into_html(self) -> Result<String, RenderError> {
        let tile_url = serde_json::to_string(&self.options.tile_url)?;
        let attribution = serde_json::to_string(&self.options.tile_attribution)?;
        let collection = self.feature_collection();
        let geojson = script_safe(&serde_json::to_string(&collection)?);

        Ok(HTML_TEMPLATE
            .replace("__LEAFLET__", LEAFLET_VERSION)
            .replace("__TILE_URL__", &script_safe(&tile_url))
            .replace("__ATTRIBUTION__", &script_safe(&attribution))
            .replace("__GEOJSON__", &geojson))
    }
}

/// Draws every segment and returns the complete HTML document.
pub fn render_html(segments: &[Segment], options: &RenderOptions) -> Result<String, RenderError> {
    let mut renderer = MapRenderer::new(options)?;
    let total = segments.len();
    for (i, segment) in segments.iter().enumerate() {
        let start = Instant::now();
        renderer.add_segment(segment);
        let elapsed = start.elapsed().as_secs_f64();
        tracing::info!(
            "Plotting segment {}/{} ({} points) '{}'... {:.2} seconds ({:.2} ms per point)",
            i + 1,
            total,
            segment.len(),
            segment.name().unwrap_or(""),
            elapsed,
            1000.0 * elapsed / segment.len().max(1) as f64
        );
    }
    renderer.into_html()
}

fn validate_options(options: &RenderOptions) -> Result<(), RenderError> {
    if options.color_buckets == 0 {
        return Err(RenderError::InvalidOptions(
            "color_buckets must be at least 1".to_string(),
        ));
    }
    if !(options.stroke_width > 0.0) {
        return Err(RenderError::InvalidOptions(format!(
            "stroke width must be positive, got {}",
            options.stroke_width
        )));
    }
    if !(0.0..=1.0).contains(&options.stroke_opacity) {
        return Err(RenderError::InvalidOptions(format!(
            "stroke opacity must be within 0..=1, got {}",
            options.stroke_opacity
        )));
    }
    Ok(())
}

fn bucket_index(t: f64, buckets: usize) -> usize {
    ((t * (buckets - 1) as f64).round() as usize).min(buckets - 1)
}

// Keeps embedded JSON from closing the surrounding <script> element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
