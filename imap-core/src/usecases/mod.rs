use crate::{entities::*, gateways::image::ImageResolver, repositories::*};

mod create_report;
mod engagement;
mod error;
mod map_layers;
mod panel;
mod query_feed;
mod recommend_nearby;

#[cfg(test)]
pub mod tests;

type Result<T> = std::result::Result<T, Error>;

pub use self::{
    create_report::*, engagement::*, error::Error, map_layers::*, panel::*, query_feed::*,
    recommend_nearby::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{
        entities::*,
        repositories::{Error as RepoError, *},
    };
}

pub fn get_report<R: ReportRepo>(repo: &R, id: &str) -> Result<Report> {
    Ok(repo.get_report(id)?)
}

/// Nearby recommendations for a stored report among all located reports.
pub fn nearby_reports<R: ReportRepo>(repo: &R, id: &str) -> Result<Vec<(Report, Distance)>> {
    let focal = repo.get_report(id)?;
    let all = repo.all_reports()?;
    Ok(recommend_nearby(&focal, &all)
        .into_iter()
        .map(|x| (x.item.clone(), x.distance))
        .collect())
}

/// Markers of the nearby recommendations for a stored report.
///
/// Images are only resolved for the recommended reports.
pub fn nearby_markers<R, I>(repo: &R, id: &str, images: &I) -> Result<Vec<NearbyEntry>>
where
    R: ReportRepo,
    I: ImageResolver + ?Sized,
{
    let focal = repo.get_report(id)?;
    let all = repo.all_reports()?;
    Ok(recommend_nearby(&focal, &all)
        .into_iter()
        .filter_map(|x| {
            let marker = build_marker(x.item, images)?;
            Some(NearbyEntry {
                marker,
                distance: x.distance,
            })
        })
        .collect())
}
