use std::future::Future;

use crate::entities::MapPoint;

/// Acquires the current location of the device.
pub trait GeoLocator {
    fn locate(&self) -> impl Future<Output = anyhow::Result<MapPoint>> + Send;
}
