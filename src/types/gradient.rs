#[derive(Debug, Clone)]
pub struct Gradient {
    pub name: &'static str,
    pub colors: Vec<&'static str>,
}

impl Gradient {
    pub fn get(name: &str) -> Option<Self> {
        match name {
            "viridis" => Some(Self::viridis()),
            "magma" => Some(Self {
                name: "magma",
                colors: vec![
                    "#000004", "#1C1044", "#4F127B", "#812581", "#B5367A", "#E55064", "#FB8761",
                    "#FEC287", "#FCFDBF",
                ],
            }),
            "fire" => Some(Self {
                name: "fire",
                colors: vec!["#FF3366", "#FF6600", "#FF9933"],
            }),
            _ => None,
        }
    }

    /// Perceptually uniform ramp sampled at nine evenly spaced stops.
    pub fn viridis() -> Self {
        Self {
            name: "viridis",
            colors: vec![
                "#440154", "#472D7B", "#3B528B", "#2C728E", "#21918C", "#28AE80", "#5EC962",
                "#ADDC30", "#FDE725",
            ],
        }
    }

    pub fn interpolate(&self, t: f64) -> String {
        let t = t.clamp(0.0, 1.0);
        let stops = &self.colors;
        if stops.is_empty() {
            return "#FFFFFF".to_string();
        }
        if stops.len() == 1 {
            return stops[0].to_string();
        }
        let segments = (stops.len() - 1) as f64;
        let scaled = t * segments;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        let local_t = scaled - idx as f64;
        let start = parse_hex_color(stops[idx]).unwrap_or((255, 255, 255));
        let end = parse_hex_color(stops[idx + 1]).unwrap_or((255, 255, 255));
        let r = lerp_u8(start.0, end.0, local_t);
        let g = lerp_u8(start.1, end.1, local_t);
        let b = lerp_u8(start.2, end.2, local_t);
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::viridis()
    }
}

/// Maps `value` into `[0, 1]` over `[vmin, vmax]`. A degenerate range maps
/// everything to 0.
pub fn normalize(value: f64, vmin: f64, vmax: f64) -> f64 {
    if vmax <= vmin {
        return 0.0;
    }
    ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let value = hex.trim_start_matches('#');
    if value.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&value[0..2], 16).ok()?;
    let g = u8::from_str_radix(&value[2..4], 16).ok()?;
    let b = u8::from_str_radix(&value[4..6], 16).ok()?;
    Some((r, g, b))
}

fn lerp_u8(start: u8, end: u8, t: f64) -> u8 {
    let value = start as f64 + (end as f64 - start as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}
