use crate::entities::MapPoint;

pub type ZoomLevel = u8;

/// The interactive map that displays the reports.
pub trait MapHandle {
    fn zoom(&self) -> ZoomLevel;
    fn fly_to(&mut self, center: MapPoint, zoom: ZoomLevel);
}
