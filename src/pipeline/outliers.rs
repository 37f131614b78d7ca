use rstar::{RTree, RTreeObject, AABB};

use crate::types::map::OutlierParams;
use crate::types::track::Segment;

/// Approximate extent of a segment in degrees.
///
/// Treats a degree of latitude and a degree of longitude as equal lengths, which
/// only holds near the equator and breaks down completely near the poles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    /// `[lon, lat]` midpoint of the segment's extents.
    pub center: [f64; 2],
    /// Half the diagonal of the lon/lat bounding box.
    pub radius: f64,
}

impl BoundingCircle {
    pub fn of(segment: &Segment) -> Option<Self> {
        let (min_lon, max_lon, min_lat, max_lat) = segment.extent()?;
        let width = max_lon - min_lon;
        let height = max_lat - min_lat;
        Some(Self {
            center: [min_lon + width / 2.0, min_lat + height / 2.0],
            radius: (width * width + height * height).sqrt() / 2.0,
        })
    }
}

#[derive(Debug, Clone)]
struct IndexedCenter {
    index: usize,
    position: [f64; 2],
}

impl RTreeObject for IndexedCenter {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// DBSCAN over 2D points with Euclidean distance.
///
/// Returns one label per point; `None` marks noise. A point's neighborhood
/// includes the point itself, and a point is a core point when its
/// neighborhood holds at least `min_samples` points.
pub fn dbscan(points: &[[f64; 2]], eps: f64, min_samples: usize) -> Vec<Option<usize>> {
    let tree = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(index, &position)| IndexedCenter { index, position })
            .collect(),
    );

    let neighborhoods: Vec<Vec<usize>> = points
        .iter()
        .map(|p| {
            let search = AABB::from_corners([p[0] - eps, p[1] - eps], [p[0] + eps, p[1] + eps]);
            let mut found: Vec<usize> = tree
                .locate_in_envelope_intersecting(&search)
                .filter(|c| distance(c.position, *p) <= eps)
                .map(|c| c.index)
                .collect();
            found.sort_unstable();
            found
        })
        .collect();
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|n| n.len() >= min_samples)
        .collect();

    let mut labels = vec![None; points.len()];
    let mut next_label = 0;
    for start in 0..points.len() {
        if labels[start].is_some() || !is_core[start] {
            continue;
        }
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if labels[i].is_some() {
                continue;
            }
            labels[i] = Some(next_label);
            if is_core[i] {
                stack.extend(neighborhoods[i].iter().copied().filter(|&j| labels[j].is_none()));
            }
        }
        next_label += 1;
    }
    labels
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Member count per distinct label, noise first, then clusters in label order.
pub fn group_sizes(labels: &[Option<usize>]) -> Vec<(Option<usize>, usize)> {
    let mut sizes: Vec<(Option<usize>, usize)> = Vec::new();
    for label in labels {
        match sizes.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => sizes.push((*label, 1)),
        }
    }
    sizes.sort_by_key(|(label, _)| *label);
    sizes
}

/// Drops segments far away from where most of the data is, such as a single
/// recording on another continent.
///
/// Falls back to returning the input unchanged whenever no single group of
/// segments dominates.
pub fn filter_outliers(segments: Vec<Segment>, params: &OutlierParams) -> Vec<Segment> {
    let total = segments.len();
    let Some(circles) = segments
        .iter()
        .map(BoundingCircle::of)
        .collect::<Option<Vec<_>>>()
    else {
        tracing::warn!("Cannot compute extent of an empty segment, skipping outlier filter");
        return segments;
    };

    let max_radius = circles.iter().map(|c| c.radius).fold(0.0, f64::max);
    let eps = params.eps_factor * max_radius;
    if !(eps > 0.0 && eps.is_finite()) {
        tracing::warn!(
            "Neighborhood radius {} is not usable, skipping outlier filter",
            eps
        );
        return segments;
    }

    let centers: Vec<[f64; 2]> = circles.iter().map(|c| c.center).collect();
    let labels = dbscan(&centers, eps, params.min_samples);
    let sizes = group_sizes(&labels);
    if sizes.len() <= 1 {
        tracing::info!("No outliers found");
        return segments;
    }

    let mut target = None;
    for (label, count) in &sizes {
        match label {
            Some(label) => tracing::info!("Cluster {}: {} members", label, count),
            None => tracing::info!("Noise: {} members", count),
        }
        if *count as f64 > params.dominance * total as f64 {
            target = Some(*label);
        }
    }

    let Some(target) = target else {
        tracing::warn!(
            "Data set too segmented so no single core set of data could be identified, doing no outlier filtering"
        );
        return segments;
    };

    let kept: Vec<Segment> = segments
        .into_iter()
        .zip(labels)
        .filter(|(_, label)| *label == target)
        .map(|(segment, _)| segment)
        .collect();
    tracing::info!(
        "Filtering out {} (of {}) outliers",
        total - kept.len(),
        total
    );
    kept
}
