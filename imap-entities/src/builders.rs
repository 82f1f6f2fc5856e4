pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::report_builder::*;

pub mod report_builder {

    use super::*;
    use crate::{geo::*, id::*, report::*, time::*};

    #[derive(Debug)]
    pub struct ReportBuild {
        report: Report,
    }

    impl ReportBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.report.id = id.into();
            self
        }
        pub fn caption(mut self, caption: &str) -> Self {
            self.report.caption = Some(caption.into());
            self
        }
        pub fn category(mut self, category: Category) -> Self {
            self.report.category = category;
            self
        }
        pub fn severity(mut self, severity: i64) -> Self {
            self.report.severity = Severity::try_from(severity).ok();
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.report.pos = Some(pos);
            self
        }
        pub fn lat_lng(self, lat: f64, lng: f64) -> Self {
            self.pos(MapPoint::from_lat_lng_deg(lat, lng))
        }
        pub fn no_pos(mut self) -> Self {
            self.report.pos = None;
            self
        }
        pub fn taken_at(mut self, rfc3339: &str) -> Self {
            self.report.taken_at = Some(Timestamp::parse_rfc3339(rfc3339).unwrap());
            self
        }
        pub fn reported_at(mut self, rfc3339: &str) -> Self {
            self.report.reported_at = Timestamp::parse_rfc3339(rfc3339).unwrap();
            self
        }
        pub fn images(mut self, full: &str, thumb: &str) -> Self {
            self.report.images = ImageRefs {
                full: full.into(),
                thumb: thumb.into(),
            };
            self
        }
        pub fn finish(self) -> Report {
            self.report
        }
    }

    impl Builder for Report {
        type Build = ReportBuild;
        fn build() -> ReportBuild {
            ReportBuild {
                report: Report {
                    id: Id::new(),
                    caption: None,
                    category: Category::Other,
                    severity: Some(Severity::MIN),
                    pos: Some(MapPoint::from_lat_lng_deg(0.0, 0.0)),
                    taken_at: None,
                    reported_at: Timestamp::now(),
                    images: ImageRefs {
                        full: "full.jpg".into(),
                        thumb: "thumb.jpg".into(),
                    },
                },
            }
        }
    }
}
