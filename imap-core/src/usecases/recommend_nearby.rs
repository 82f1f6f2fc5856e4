use super::prelude::*;
use crate::util::sort::cmp_distance_asc;

/// Maximum number of recommendations.
pub const NEARBY_LIMIT: usize = 12;

/// Recommendations within this radius are preferred.
pub const NEARBY_RADIUS_KM: f64 = 25.0;

/// Anything that can be placed on the map.
pub trait Located {
    fn id(&self) -> &Id;
    fn pos(&self) -> Option<MapPoint>;
}

impl Located for Report {
    fn id(&self) -> &Id {
        &self.id
    }
    fn pos(&self) -> Option<MapPoint> {
        self.valid_pos()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyItem<'a, T> {
    pub item: &'a T,
    pub distance: Distance,
}

/// Recommend the reports closest to the focal one.
///
/// Candidates within [`NEARBY_RADIUS_KM`] come first. If there are
/// less than [`NEARBY_LIMIT`] of them the list is padded with the
/// nearest candidates beyond the radius.
pub fn recommend_nearby<'a, F, T>(focal: &F, candidates: &'a [T]) -> Vec<NearbyItem<'a, T>>
where
    F: Located,
    T: Located,
{
    recommend_nearby_within(focal, candidates, NEARBY_LIMIT, Distance::from_km(NEARBY_RADIUS_KM))
}

pub fn recommend_nearby_within<'a, F, T>(
    focal: &F,
    candidates: &'a [T],
    limit: usize,
    radius: Distance,
) -> Vec<NearbyItem<'a, T>>
where
    F: Located,
    T: Located,
{
    let Some(center) = focal.pos() else {
        return vec![];
    };
    let (mut within, mut beyond): (Vec<_>, Vec<_>) = candidates
        .iter()
        .filter(|c| c.id() != focal.id())
        .filter_map(|item| {
            let distance = MapPoint::distance(center, item.pos()?);
            Some(NearbyItem { item, distance })
        })
        .partition(|x| x.distance <= radius);
    within.sort_by(|a, b| cmp_distance_asc(Some(a.distance), Some(b.distance)));
    beyond.sort_by(|a, b| cmp_distance_asc(Some(a.distance), Some(b.distance)));
    within.truncate(limit);
    let missing = limit - within.len();
    within.extend(beyond.into_iter().take(missing));
    within
}
