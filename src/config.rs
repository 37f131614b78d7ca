use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "map-all.html";
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Clone)]
pub struct Config {
    pub output: PathBuf,
    pub tile_url: String,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
    pub min_samples: usize,
    pub eps_factor: f64,
    pub gradient: String,
}

impl Config {
    pub fn from_env() -> Self {
        let output = std::env::var("GPX_HEATMAP_OUTPUT")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let tile_url = std::env::var("GPX_HEATMAP_TILE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| OSM_TILE_URL.to_string());

        let stroke_width = std::env::var("GPX_HEATMAP_STROKE_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4.0);

        let stroke_opacity = std::env::var("GPX_HEATMAP_STROKE_OPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.5);

        let min_samples = std::env::var("GPX_HEATMAP_MIN_SAMPLES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let eps_factor = std::env::var("GPX_HEATMAP_EPS_FACTOR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10.0);

        let gradient = std::env::var("GPX_HEATMAP_GRADIENT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "viridis".to_string());

        Self {
            output,
            tile_url,
            stroke_width,
            stroke_opacity,
            min_samples,
            eps_factor,
            gradient,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            tile_url: OSM_TILE_URL.to_string(),
            stroke_width: 4.0,
            stroke_opacity: 0.5,
            min_samples: 5,
            eps_factor: 10.0,
            gradient: "viridis".to_string(),
        }
    }
}
