use super::prelude::*;

/// When the photo was taken, unless the image itself tells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TakenAt {
    #[default]
    Now,
    /// RFC 3339 text entered by the user, blank means now.
    Manual(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Decimal degrees as entered by the user.
    Manual { lat: String, lng: String },
    /// The device location if it could be acquired.
    Current(Option<MapPoint>),
}

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct NewReport {
    pub images        : Option<ImageRefs>,
    pub caption       : Option<String>,
    pub category      : Option<String>,
    pub severity      : i64,
    /// Extracted from the image metadata by the image collaborator.
    pub exif_taken_at : Option<Timestamp>,
    pub taken_at      : TakenAt,
    pub location      : LocationSource,
}

#[derive(Debug)]
pub struct Storable(Report);

impl Storable {
    pub fn report(&self) -> &Report {
        &self.0
    }
}

fn resolve_location(location: LocationSource) -> Result<MapPoint> {
    match location {
        LocationSource::Manual { lat, lng } => Ok(MapPoint::parse_lat_lng_deg(&lat, &lng)?),
        LocationSource::Current(Some(pos)) => {
            if pos.is_valid() {
                Ok(pos)
            } else {
                Err(Error::InvalidPosition)
            }
        }
        LocationSource::Current(None) => Err(Error::MissingCurrentLocation),
    }
}

fn resolve_taken_at(
    exif_taken_at: Option<Timestamp>,
    taken_at: TakenAt,
    now: Timestamp,
) -> Result<Timestamp> {
    if let Some(exif) = exif_taken_at {
        return Ok(exif);
    }
    let manual = match taken_at {
        TakenAt::Now => None,
        TakenAt::Manual(text) => text.filter(|t| !t.trim().is_empty()),
    };
    match manual {
        Some(text) => Ok(Timestamp::parse_rfc3339(&text)?),
        None => Ok(now),
    }
}

pub fn prepare_new_report(new: NewReport, now: Timestamp) -> Result<Storable> {
    let NewReport {
        images,
        caption,
        category,
        severity,
        exif_taken_at,
        taken_at,
        location,
    } = new;
    let images = images.ok_or(Error::MissingImage)?;
    if images.full.as_str().trim().is_empty() {
        return Err(Error::MissingImage);
    }
    let severity = Severity::try_from(severity)?;
    let pos = resolve_location(location)?;
    let taken_at = resolve_taken_at(exif_taken_at, taken_at, now)?;
    let caption = caption
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty());
    let category = Category::parse_or_other(category.as_deref());
    Ok(Storable(Report {
        id: Id::new(),
        caption,
        category,
        severity: Some(severity),
        pos: Some(pos),
        taken_at: Some(taken_at),
        reported_at: now,
        images,
    }))
}

pub fn store_new_report<R: ReportRepo>(repo: &R, s: Storable) -> Result<Report> {
    let Storable(report) = s;
    repo.create_report(report.clone())?;
    log::info!(
        "Stored new {} report {} at {}",
        report.category,
        report.id,
        report.pos.map(|p| p.to_string()).unwrap_or_default()
    );
    Ok(report)
}

pub fn create_report<R: ReportRepo>(repo: &R, new: NewReport) -> Result<Report> {
    let s = prepare_new_report(new, Timestamp::now())?;
    store_new_report(repo, s)
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockDb, *};

    fn new_report() -> NewReport {
        NewReport {
            images: Some(ImageRefs {
                full: "a.jpg".into(),
                thumb: "a_thumb.jpg".into(),
            }),
            caption: Some("  Road collapsed ".into()),
            category: Some("road-blocked".into()),
            severity: 3,
            exif_taken_at: None,
            taken_at: TakenAt::Now,
            location: LocationSource::Manual {
                lat: "23.5".into(),
                lng: " 121.0".into(),
            },
        }
    }

    #[test]
    fn create_a_new_report() {
        let db = MockDb::default();
        let report = create_report(&db, new_report()).unwrap();
        assert!(report.id.is_valid());
        assert_eq!(report.caption.as_deref(), Some("Road collapsed"));
        assert_eq!(report.category, Category::RoadBlocked);
        assert_eq!(report.severity, Severity::try_from(3).ok());
        assert_eq!(report.pos, Some(MapPoint::from_lat_lng_deg(23.5, 121.0)));
        assert_eq!(report.taken_at, Some(report.reported_at));
        assert_eq!(db.reports.borrow().len(), 1);
        assert_eq!(db.get_report(report.id.as_str()).unwrap(), report);
    }

    #[test]
    fn image_is_required() {
        let db = MockDb::default();
        let mut x = new_report();
        x.images = None;
        assert!(matches!(create_report(&db, x), Err(Error::MissingImage)));
        assert!(db.reports.borrow().is_empty());
    }

    #[test]
    fn severity_out_of_range() {
        let db = MockDb::default();
        for severity in [0, 6, -1] {
            let mut x = new_report();
            x.severity = severity;
            assert!(matches!(create_report(&db, x), Err(Error::Severity)));
        }
        assert!(db.reports.borrow().is_empty());
    }

    #[test]
    fn malformed_coordinates() {
        let db = MockDb::default();
        for (lat, lng) in [("abc", "121"), ("23.5", ""), ("91", "0"), ("0", "181")] {
            let mut x = new_report();
            x.location = LocationSource::Manual {
                lat: lat.into(),
                lng: lng.into(),
            };
            assert!(matches!(create_report(&db, x), Err(Error::InvalidPosition)));
        }
        assert!(db.reports.borrow().is_empty());
    }

    #[test]
    fn current_location_required() {
        let db = MockDb::default();
        let mut x = new_report();
        x.location = LocationSource::Current(None);
        assert!(matches!(
            create_report(&db, x),
            Err(Error::MissingCurrentLocation)
        ));
        let mut x = new_report();
        let here = MapPoint::from_lat_lng_deg(24.0, 121.6);
        x.location = LocationSource::Current(Some(here));
        assert_eq!(create_report(&db, x).unwrap().pos, Some(here));
    }

    #[test]
    fn unknown_category_and_blank_caption() {
        let mut x = new_report();
        x.category = Some("volcano".into());
        x.caption = Some("   ".into());
        let s = prepare_new_report(x, Timestamp::now()).unwrap();
        assert_eq!(s.report().category, Category::Other);
        assert!(s.report().caption.is_none());
    }

    #[test]
    fn exif_time_wins() {
        let now = Timestamp::parse_rfc3339("2025-10-08T10:00:00Z").unwrap();
        let exif = Timestamp::parse_rfc3339("2025-10-08T08:30:00Z").unwrap();
        let mut x = new_report();
        x.exif_taken_at = Some(exif);
        x.taken_at = TakenAt::Manual(Some("2020-01-01T00:00:00Z".into()));
        let s = prepare_new_report(x, now).unwrap();
        assert_eq!(s.report().taken_at, Some(exif));
        assert_eq!(s.report().reported_at, now);
    }

    #[test]
    fn manual_taken_at() {
        let now = Timestamp::parse_rfc3339("2025-10-08T10:00:00Z").unwrap();
        let mut x = new_report();
        x.taken_at = TakenAt::Manual(Some("2025-10-08T16:30:00+08:00".into()));
        let s = prepare_new_report(x, now).unwrap();
        assert_eq!(
            s.report().taken_at.unwrap().to_rfc3339(),
            "2025-10-08T08:30:00Z"
        );

        let mut x = new_report();
        x.taken_at = TakenAt::Manual(Some(" ".into()));
        assert_eq!(prepare_new_report(x, now).unwrap().report().taken_at, Some(now));

        let mut x = new_report();
        x.taken_at = TakenAt::Manual(Some("last tuesday".into()));
        assert!(matches!(
            prepare_new_report(x, now),
            Err(Error::InvalidTimestamp)
        ));
    }
}
