use crate::config::Config;
use crate::types::gradient::Gradient;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    pub gradient: Gradient,
    pub tile_url: String,
    pub tile_attribution: String,
    /// Number of distinct colors strokes are grouped into per segment. Each
    /// stroke's color is rounded to the nearest bucket, so it is close to but
    /// not exactly the ramp value for its heart rate.
    pub color_buckets: usize,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        let gradient = Gradient::get(&config.gradient).unwrap_or_else(|| {
            tracing::warn!("Unknown gradient {:?}, using viridis", config.gradient);
            Gradient::viridis()
        });
        Self {
            stroke_width: config.stroke_width,
            stroke_opacity: config.stroke_opacity,
            gradient,
            tile_url: config.tile_url.clone(),
            ..Self::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stroke_width: 4.0,
            stroke_opacity: 0.5,
            gradient: Gradient::viridis(),
            tile_url: crate::config::OSM_TILE_URL.to_string(),
            tile_attribution:
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                    .to_string(),
            color_buckets: 48,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutlierParams {
    pub min_samples: usize,
    pub eps_factor: f64,
    /// Share of all segments a single group must exceed to be kept alone.
    pub dominance: f64,
}

impl OutlierParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_samples: config.min_samples,
            eps_factor: config.eps_factor,
            ..Self::default()
        }
    }
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            min_samples: 5,
            eps_factor: 10.0,
            dominance: 0.9,
        }
    }
}
