use super::*;
use imap_core::{entities as e, usecases as uc};

impl From<e::MapPoint> for Coordinate {
    fn from(from: e::MapPoint) -> Self {
        let (lat, lng) = from.to_lat_lng_deg();
        Self { lat, lng }
    }
}

impl From<uc::FeedItem> for FeedItem {
    fn from(from: uc::FeedItem) -> Self {
        let uc::FeedItem {
            report,
            pos,
            distance,
        } = from;
        let e::Report {
            id,
            caption,
            category,
            severity,
            taken_at,
            reported_at,
            images,
            ..
        } = report;
        let (lat, lng) = pos.to_lat_lng_deg();
        Self {
            id: id.into(),
            distance_km: distance.map(e::Distance::to_km),
            category: category.as_str().to_owned(),
            severity: severity.map(e::Severity::value),
            caption,
            taken_at: taken_at.map(e::Timestamp::to_rfc3339),
            reported_at: reported_at.to_rfc3339(),
            lat,
            lng,
            thumbnail_ref: images.thumb.into(),
        }
    }
}

impl From<uc::Marker> for MarkerPayload {
    fn from(from: uc::Marker) -> Self {
        let category_color = from.color().to_owned();
        let uc::Marker {
            id,
            category,
            severity,
            caption,
            pos,
            taken_at,
            reported_at,
            img_large,
            img_thumb,
        } = from;
        let (lat, lng) = pos.to_lat_lng_deg();
        Self {
            id: id.into(),
            category: category.as_str().to_owned(),
            severity: severity.map(e::Severity::value),
            caption,
            lat,
            lng,
            taken_at: taken_at.map(e::Timestamp::to_rfc3339),
            reported_at: reported_at.to_rfc3339(),
            img_large,
            img_thumb,
            category_color,
        }
    }
}

impl From<uc::NearbyEntry> for NearbyReport {
    fn from(from: uc::NearbyEntry) -> Self {
        let uc::NearbyEntry { marker, distance } = from;
        Self {
            marker: marker.into(),
            distance_km: distance.to_km(),
        }
    }
}

impl From<uc::HeatPoint> for HeatPoint {
    fn from(from: uc::HeatPoint) -> Self {
        let uc::HeatPoint { pos, weight } = from;
        let (lat, lng) = pos.to_lat_lng_deg();
        Self { lat, lng, weight }
    }
}

impl From<uc::HeatLayer> for HeatLayer {
    fn from(from: uc::HeatLayer) -> Self {
        let uc::HeatLayer {
            points,
            gradient,
            min_opacity,
            radius,
            blur,
            max_zoom,
        } = from;
        Self {
            points: points.into_iter().map(Into::into).collect(),
            gradient: gradient
                .iter()
                .map(|(stop, color)| GradientStop {
                    stop: *stop,
                    color: (*color).to_owned(),
                })
                .collect(),
            min_opacity,
            radius,
            blur,
            max_zoom,
        }
    }
}

impl From<uc::MapLayers> for MapPayload {
    fn from(from: uc::MapLayers) -> Self {
        let uc::MapLayers {
            markers,
            heat,
            visibility,
        } = from;
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
            heat: heat.into(),
            show_markers: visibility.markers,
            show_heat: visibility.heat,
        }
    }
}

impl From<uc::CommentView> for Comment {
    fn from(from: uc::CommentView) -> Self {
        let uc::CommentView { comment, liked } = from;
        let e::Comment {
            id,
            author,
            text,
            created_at,
            likes,
        } = comment;
        Self {
            id,
            author,
            text,
            created_at: created_at.as_millis(),
            likes,
            liked,
        }
    }
}

impl From<e::Category> for CategoryInfo {
    fn from(from: e::Category) -> Self {
        Self {
            name: from.as_str().to_owned(),
            marker_color: from.marker_color().to_owned(),
            hex_color: from.hex_color().to_owned(),
        }
    }
}

impl From<e::Report> for ReportCreated {
    fn from(from: e::Report) -> Self {
        Self {
            id: from.id.into(),
            reported_at: from.reported_at.to_rfc3339(),
        }
    }
}

impl TryFrom<LocationSource> for uc::LocationSource {
    type Error = uc::Error;

    fn try_from(from: LocationSource) -> Result<Self, Self::Error> {
        let location = match from {
            LocationSource::Manual { lat, lng } => Self::Manual { lat, lng },
            LocationSource::Current {
                lat: Some(lat),
                lng: Some(lng),
            } => {
                let pos = e::MapPoint::try_from_lat_lng_deg(lat, lng)
                    .ok_or(uc::Error::InvalidPosition)?;
                Self::Current(Some(pos))
            }
            LocationSource::Current { .. } => Self::Current(None),
        };
        Ok(location)
    }
}

impl TryFrom<NewReport> for uc::NewReport {
    type Error = uc::Error;

    fn try_from(from: NewReport) -> Result<Self, Self::Error> {
        let NewReport {
            image_full,
            image_thumb,
            caption,
            category,
            severity,
            taken_at,
            exif_taken_at,
            location,
        } = from;
        let images = image_full
            .filter(|full| !full.trim().is_empty())
            .map(|full| e::ImageRefs {
                thumb: image_thumb
                    .filter(|thumb| !thumb.trim().is_empty())
                    .unwrap_or_else(|| full.clone())
                    .into(),
                full: full.into(),
            });
        Ok(Self {
            images,
            caption,
            category,
            severity,
            exif_taken_at: exif_taken_at.as_deref().and_then(e::Timestamp::parse_exif),
            taken_at: uc::TakenAt::Manual(taken_at),
            location: location.try_into()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imap_core::usecases::{build_feed, FeedQuery};

    #[test]
    fn feed_item_from_usecase() {
        let report = e::Report {
            id: "r1".into(),
            caption: Some("Flooded underpass".into()),
            category: e::Category::Flooding,
            severity: e::Severity::try_from(3).ok(),
            pos: Some(e::MapPoint::from_lat_lng_deg(23.5, 121.0)),
            taken_at: None,
            reported_at: e::Timestamp::parse_rfc3339("2025-10-08T08:30:00Z").unwrap(),
            images: e::ImageRefs {
                full: "r1.jpg".into(),
                thumb: "r1_thumb.jpg".into(),
            },
        };
        let feed = build_feed(
            vec![report],
            &FeedQuery {
                center: Some(e::MapPoint::from_lat_lng_deg(23.5, 121.0)),
                ..Default::default()
            },
        );
        let item = FeedItem::from(feed.into_iter().next().unwrap());
        assert_eq!(item.id, "r1");
        assert_eq!(item.distance_km, Some(0.0));
        assert_eq!(item.category, "flooding");
        assert_eq!(item.severity, Some(3));
        assert_eq!(item.taken_at, None);
        assert_eq!(item.reported_at, "2025-10-08T08:30:00Z");
        assert_eq!(item.thumbnail_ref, "r1_thumb.jpg");
    }

    #[test]
    fn new_report_without_thumbnail() {
        let r = NewReport {
            image_full: Some("a.jpg".into()),
            image_thumb: None,
            caption: None,
            category: None,
            severity: 2,
            taken_at: None,
            exif_taken_at: Some("2025:10:08 08:30:00".into()),
            location: LocationSource::Current {
                lat: Some(23.5),
                lng: Some(121.0),
            },
        };
        let r = uc::NewReport::try_from(r).unwrap();
        let images = r.images.unwrap();
        assert_eq!(images.thumb.as_str(), "a.jpg");
        assert!(r.exif_taken_at.is_some());
        assert!(matches!(r.location, uc::LocationSource::Current(Some(_))));
    }

    #[test]
    fn new_report_with_invalid_current_location() {
        let r = NewReport {
            image_full: Some("a.jpg".into()),
            image_thumb: None,
            caption: None,
            category: None,
            severity: 2,
            taken_at: None,
            exif_taken_at: None,
            location: LocationSource::Current {
                lat: Some(123.5),
                lng: Some(121.0),
            },
        };
        assert!(matches!(
            uc::NewReport::try_from(r),
            Err(uc::Error::InvalidPosition)
        ));
    }
}
