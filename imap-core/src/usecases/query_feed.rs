use std::str::FromStr;

use strum::IntoStaticStr;

use super::prelude::*;
use crate::util::sort::{cmp_desc_missing_last, DistanceTo, SortByDistance, WithDistance};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum FeedSort {
    #[default]
    #[strum(to_string = "distance")]
    Distance,
    #[strum(to_string = "time_reported_desc")]
    TimeReportedDesc,
    #[strum(to_string = "time_taken_desc")]
    TimeTakenDesc,
}

impl FeedSort {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl FromStr for FeedSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let sort = match s.trim() {
            "distance" => Self::Distance,
            "time_reported_desc" | "time_newest" => Self::TimeReportedDesc,
            "time_taken_desc" | "time_taken_newest" => Self::TimeTakenDesc,
            _ => return Err(Error::SortOrder(s.to_owned())),
        };
        Ok(sort)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub center: Option<MapPoint>,
    /// A non-positive radius disables the radius filter.
    pub radius_km: f64,
    pub sort: FeedSort,
}

impl FeedQuery {
    fn radius(&self) -> Option<Distance> {
        (self.radius_km > 0.0).then(|| Distance::from_km(self.radius_km))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub report: Report,
    pub pos: MapPoint,
    /// Undefined if the query had no center.
    pub distance: Option<Distance>,
}

impl WithDistance for FeedItem {
    fn distance(&self) -> Option<Distance> {
        self.distance
    }
}

/// Filter and sort all reports for the proximity view.
///
/// The input order is preserved among equal elements.
pub fn build_feed(reports: Vec<Report>, query: &FeedQuery) -> Vec<FeedItem> {
    let radius = query.radius();
    let mut items: Vec<_> = reports
        .into_iter()
        .filter_map(|report| {
            let pos = report.valid_pos()?;
            let distance = query.center.and_then(|c| report.distance_to(c));
            if let (Some(radius), Some(distance)) = (radius, distance) {
                if distance > radius {
                    return None;
                }
            }
            Some(FeedItem {
                report,
                pos,
                distance,
            })
        })
        .collect();
    match query.sort {
        FeedSort::Distance => items.sort_by_distance(),
        FeedSort::TimeReportedDesc => {
            items.sort_by(|a, b| b.report.reported_at.cmp(&a.report.reported_at))
        }
        FeedSort::TimeTakenDesc => {
            items.sort_by(|a, b| cmp_desc_missing_last(a.report.taken_at, b.report.taken_at))
        }
    }
    items
}

pub fn query_feed<R: ReportRepo>(repo: &R, query: &FeedQuery) -> Result<Vec<FeedItem>> {
    let reports = repo.all_reports()?;
    let count = reports.len();
    let feed = build_feed(reports, query);
    log::debug!(
        "Feed with {} of {} reports sorted by {}",
        feed.len(),
        count,
        query.sort.as_str()
    );
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockDb, *};
    use imap_entities::builders::*;

    fn ids(feed: &[FeedItem]) -> Vec<&str> {
        feed.iter().map(|i| i.report.id.as_str()).collect()
    }

    fn three_reports() -> Vec<Report> {
        vec![
            Report::build().id("a").lat_lng(0.0, 0.0).severity(1).finish(),
            Report::build().id("b").lat_lng(0.0, 1.0).severity(3).finish(),
            Report::build().id("c").lat_lng(1.0, 0.0).severity(5).finish(),
        ]
    }

    #[test]
    fn parse_sort_keys_with_aliases() {
        assert_eq!("distance".parse::<FeedSort>().unwrap(), FeedSort::Distance);
        assert_eq!(
            "time_newest".parse::<FeedSort>().unwrap(),
            FeedSort::TimeReportedDesc
        );
        assert_eq!(
            "time_taken_newest".parse::<FeedSort>().unwrap(),
            FeedSort::TimeTakenDesc
        );
        assert_eq!(FeedSort::TimeTakenDesc.as_str(), "time_taken_desc");
        assert!(matches!(
            "random".parse::<FeedSort>(),
            Err(Error::SortOrder(_))
        ));
    }

    #[test]
    fn sort_by_distance_around_the_origin() {
        let db = MockDb::default();
        for r in three_reports() {
            db.create_report(r).unwrap();
        }
        let query = FeedQuery {
            center: Some(MapPoint::from_lat_lng_deg(0.0, 0.0)),
            radius_km: 200.0,
            sort: FeedSort::Distance,
        };
        let feed = query_feed(&db, &query).unwrap();
        assert_eq!(ids(&feed), vec!["a", "b", "c"]);
        assert_eq!(feed[0].distance, Some(Distance::from_km(0.0)));
        let d1 = feed[1].distance.unwrap().to_km();
        let d2 = feed[2].distance.unwrap().to_km();
        assert!((d1 - 111.195).abs() < 0.01);
        assert_eq!(d1, d2);
    }

    #[test]
    fn radius_filter() {
        let reports = vec![
            Report::build().id("near").lat_lng(23.5, 121.0).finish(),
            Report::build().id("far").lat_lng(25.0, 121.5).finish(),
        ];
        let center = Some(MapPoint::from_lat_lng_deg(23.5, 121.0));
        let query = FeedQuery {
            center,
            radius_km: 10.0,
            sort: FeedSort::Distance,
        };
        assert_eq!(ids(&build_feed(reports.clone(), &query)), vec!["near"]);

        for radius_km in [0.0, -1.0] {
            let query = FeedQuery {
                center,
                radius_km,
                sort: FeedSort::Distance,
            };
            assert_eq!(ids(&build_feed(reports.clone(), &query)), vec!["near", "far"]);
        }
    }

    #[test]
    fn reports_without_position_are_excluded() {
        let reports = vec![
            Report::build().id("a").no_pos().finish(),
            Report::build().id("b").lat_lng(10.0, 10.0).finish(),
        ];
        let feed = build_feed(reports, &FeedQuery::default());
        assert_eq!(ids(&feed), vec!["b"]);
        assert!(feed[0].distance.is_none());
    }

    #[test]
    fn without_center_the_storage_order_is_kept() {
        let feed = build_feed(
            three_reports(),
            &FeedQuery {
                center: None,
                radius_km: 1.0,
                sort: FeedSort::Distance,
            },
        );
        assert_eq!(ids(&feed), vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_by_time_taken_with_missing_values_last() {
        let reports = vec![
            Report::build().id("none").finish(),
            Report::build()
                .id("old")
                .taken_at("2024-05-01T10:00:00Z")
                .finish(),
            Report::build()
                .id("new")
                .taken_at("2025-01-01T10:00:00Z")
                .finish(),
            Report::build().id("none2").finish(),
        ];
        let query = FeedQuery {
            sort: FeedSort::TimeTakenDesc,
            ..Default::default()
        };
        assert_eq!(
            ids(&build_feed(reports, &query)),
            vec!["new", "old", "none", "none2"]
        );
    }

    #[test]
    fn sort_by_time_reported() {
        let reports = vec![
            Report::build()
                .id("a")
                .reported_at("2024-05-01T10:00:00Z")
                .finish(),
            Report::build()
                .id("b")
                .reported_at("2024-06-01T10:00:00Z")
                .finish(),
            Report::build()
                .id("c")
                .reported_at("2024-05-01T10:00:00Z")
                .finish(),
        ];
        let query = FeedQuery {
            sort: FeedSort::TimeReportedDesc,
            ..Default::default()
        };
        assert_eq!(ids(&build_feed(reports, &query)), vec!["b", "a", "c"]);
    }

    #[test]
    fn distances_are_non_decreasing() {
        let reports: Vec<_> = (0..20)
            .map(|i| {
                let lat = f64::from((i * 7) % 13) - 6.0;
                let lng = f64::from((i * 5) % 11) - 5.0;
                Report::build().lat_lng(lat, lng).finish()
            })
            .collect();
        let feed = build_feed(
            reports,
            &FeedQuery {
                center: Some(MapPoint::from_lat_lng_deg(1.0, 1.0)),
                radius_km: 0.0,
                sort: FeedSort::Distance,
            },
        );
        assert_eq!(feed.len(), 20);
        for w in feed.windows(2) {
            assert!(w[0].distance.unwrap() <= w[1].distance.unwrap());
        }
    }
}
