use super::{prelude::*, recommend_nearby::Located};
use crate::gateways::image::{ImageResolver, ImageSize};

/// One marker per located report.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id          : Id,
    pub category    : Category,
    pub severity    : Option<Severity>,
    pub caption     : Option<String>,
    pub pos         : MapPoint,
    pub taken_at    : Option<Timestamp>,
    pub reported_at : Timestamp,
    pub img_large   : Option<String>,
    pub img_thumb   : Option<String>,
}

impl Marker {
    pub fn color(&self) -> &'static str {
        self.category.marker_color()
    }
}

impl Located for Marker {
    fn id(&self) -> &Id {
        &self.id
    }
    fn pos(&self) -> Option<MapPoint> {
        Some(self.pos)
    }
}

pub fn build_marker<I: ImageResolver + ?Sized>(report: &Report, images: &I) -> Option<Marker> {
    let pos = report.valid_pos()?;
    let img_thumb = images
        .resolve(&report.images.thumb, ImageSize::Thumbnail)
        .or_else(|| images.resolve(&report.images.full, ImageSize::Thumbnail));
    let img_large = images
        .resolve(&report.images.full, ImageSize::Full)
        .or_else(|| img_thumb.clone());
    if img_thumb.is_none() {
        log::debug!("No image available for report {}", report.id);
    }
    Some(Marker {
        id: report.id.clone(),
        category: report.category,
        severity: report.severity,
        caption: report.caption.clone(),
        pos,
        taken_at: report.taken_at,
        reported_at: report.reported_at,
        img_large,
        img_thumb,
    })
}

pub fn build_markers<I: ImageResolver + ?Sized>(reports: &[Report], images: &I) -> Vec<Marker> {
    reports
        .iter()
        .filter_map(|r| build_marker(r, images))
        .collect()
}

/// Color stops from low to high intensity.
pub const HEAT_GRADIENT: [(f64, &str); 5] = [
    (0.0, "#d4f4ff"),
    (0.35, "#7ad3ff"),
    (0.55, "#2ea3ff"),
    (0.75, "#ff8a5c"),
    (1.0, "#ff2d2d"),
];

pub const HEAT_MIN_OPACITY: f64 = 0.25;
pub const HEAT_RADIUS: u32 = 22;
pub const HEAT_BLUR: u32 = 18;
pub const HEAT_MAX_ZOOM: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub pos: MapPoint,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    pub gradient: &'static [(f64, &'static str)],
    pub min_opacity: f64,
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u8,
}

impl HeatLayer {
    pub fn new(points: Vec<HeatPoint>) -> Self {
        Self {
            points,
            gradient: &HEAT_GRADIENT,
            min_opacity: HEAT_MIN_OPACITY,
            radius: HEAT_RADIUS,
            blur: HEAT_BLUR,
            max_zoom: HEAT_MAX_ZOOM,
        }
    }
}

pub fn heat_weight(severity: Option<Severity>) -> f64 {
    severity
        .map(|s| f64::from(s.value()))
        .filter(|w| *w > 0.0)
        .unwrap_or(1.0)
}

pub fn build_heat_layer(reports: &[Report]) -> HeatLayer {
    let points = reports
        .iter()
        .filter_map(|r| {
            r.valid_pos().map(|pos| HeatPoint {
                pos,
                weight: heat_weight(r.severity),
            })
        })
        .collect();
    HeatLayer::new(points)
}

/// Visibility of the two map layers, independent of their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility {
    pub markers: bool,
    pub heat: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            markers: true,
            heat: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLayers {
    pub markers: Vec<Marker>,
    pub heat: HeatLayer,
    pub visibility: LayerVisibility,
}

impl MapLayers {
    pub fn toggle_markers(&mut self) {
        self.visibility.markers = !self.visibility.markers;
    }

    pub fn toggle_heat(&mut self) {
        self.visibility.heat = !self.visibility.heat;
    }
}

pub fn build_map_layers<I: ImageResolver + ?Sized>(reports: &[Report], images: &I) -> MapLayers {
    MapLayers {
        markers: build_markers(reports, images),
        heat: build_heat_layer(reports),
        visibility: LayerVisibility::default(),
    }
}

pub fn load_map_layers<R, I>(repo: &R, images: &I) -> Result<MapLayers>
where
    R: ReportRepo,
    I: ImageResolver + ?Sized,
{
    let reports = repo.all_reports()?;
    Ok(build_map_layers(&reports, images))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::image::PassThroughImages;
    use imap_entities::builders::*;
    use std::collections::HashSet;

    struct OnlyFull;

    impl ImageResolver for OnlyFull {
        fn resolve(&self, image: &ImageRef, _: ImageSize) -> Option<String> {
            image.as_str().starts_with("full").then(|| image.as_str().to_owned())
        }
    }

    struct NoImages;

    impl ImageResolver for NoImages {
        fn resolve(&self, _: &ImageRef, _: ImageSize) -> Option<String> {
            None
        }
    }

    fn reports() -> Vec<Report> {
        vec![
            Report::build()
                .id("a")
                .lat_lng(0.0, 0.0)
                .severity(4)
                .category(Category::Flooding)
                .finish(),
            Report::build().id("b").no_pos().finish(),
            Report::build().id("c").lat_lng(1.0, 1.0).severity(9).finish(),
        ]
    }

    #[test]
    fn one_marker_per_located_report() {
        let markers = build_markers(&reports(), &PassThroughImages);
        let ids: HashSet<_> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(markers.len(), 2);
        assert_eq!(ids, ["a", "c"].into_iter().collect());
        assert_eq!(markers[0].color(), "blue");
        assert_eq!(markers[1].color(), "gray");
        assert_eq!(markers[0].img_thumb.as_deref(), Some("thumb.jpg"));
        assert_eq!(markers[0].img_large.as_deref(), Some("full.jpg"));
    }

    #[test]
    fn image_fallbacks() {
        let markers = build_markers(&reports(), &OnlyFull);
        assert_eq!(markers[0].img_thumb.as_deref(), Some("full.jpg"));
        assert_eq!(markers[0].img_large.as_deref(), Some("full.jpg"));

        let markers = build_markers(&reports(), &NoImages);
        assert_eq!(markers.len(), 2);
        assert!(markers[0].img_thumb.is_none());
        assert!(markers[0].img_large.is_none());
    }

    #[test]
    fn heat_weights_default_to_one() {
        let heat = build_heat_layer(&reports());
        let weights: Vec<_> = heat.points.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![4.0, 1.0]);
        assert_eq!(heat_weight(None), 1.0);
        assert_eq!(heat_weight(Some(Severity::MAX)), 5.0);
        assert_eq!(heat.gradient.len(), 5);
        assert_eq!(heat.gradient[4], (1.0, "#ff2d2d"));
    }

    #[test]
    fn toggling_layers_keeps_their_data() {
        let mut layers = build_map_layers(&reports(), &PassThroughImages);
        assert!(layers.visibility.markers);
        assert!(!layers.visibility.heat);
        let before = layers.clone();
        layers.toggle_heat();
        layers.toggle_markers();
        assert!(layers.visibility.heat);
        assert!(!layers.visibility.markers);
        assert_eq!(layers.markers, before.markers);
        assert_eq!(layers.heat, before.heat);
    }
}
