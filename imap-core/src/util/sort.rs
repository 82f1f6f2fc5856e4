use std::cmp::Ordering;

use crate::entities::*;

/// Compare optional distances in ascending order.
///
/// An undefined distance is treated as infinitely far away.
pub fn cmp_distance_asc(a: Option<Distance>, b: Option<Distance>) -> Ordering {
    let a = a.unwrap_or_else(Distance::infinite).to_km();
    let b = b.unwrap_or_else(Distance::infinite).to_km();
    a.total_cmp(&b)
}

/// Compare optional values in descending order with missing
/// values after all present ones.
pub fn cmp_desc_missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub trait DistanceTo {
    fn distance_to(&self, pos: MapPoint) -> Option<Distance>;
}

impl DistanceTo for Report {
    fn distance_to(&self, pos: MapPoint) -> Option<Distance> {
        self.valid_pos().map(|p| MapPoint::distance(p, pos))
    }
}

pub trait WithDistance {
    fn distance(&self) -> Option<Distance>;
}

/// Stable sorting by ascending distance, undefined distances last.
pub trait SortByDistance {
    fn sort_by_distance(&mut self);
}

impl<T: WithDistance> SortByDistance for [T] {
    fn sort_by_distance(&mut self) {
        self.sort_by(|a, b| cmp_distance_asc(a.distance(), b.distance()));
    }
}
