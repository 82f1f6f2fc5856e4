use std::{future::Future, time::Duration};

use imap_core::{entities::MapPoint, gateways::geolocation::GeoLocator};
use serde::Deserialize;

pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(8);

/// Acquire the current location, giving up after `timeout`.
///
/// Failures are logged and result in `None`, so that callers can
/// fall back to manual entry.
pub async fn locate_with_timeout<L>(locator: &L, timeout: Duration) -> Option<MapPoint>
where
    L: GeoLocator,
{
    match tokio::time::timeout(timeout, locator.locate()).await {
        Ok(Ok(pos)) => Some(pos),
        Ok(Err(err)) => {
            log::warn!("Unable to acquire the current location: {err}");
            None
        }
        Err(_) => {
            log::warn!(
                "Acquiring the current location timed out after {} ms",
                timeout.as_millis()
            );
            None
        }
    }
}

/// Approximate location lookup via an HTTP endpoint that
/// responds with `{ "lat": .., "lon": .. }`.
#[derive(Debug, Clone)]
pub struct HttpGeoLocator {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct LocationResponse {
    lat: f64,
    lon: f64,
}

impl HttpGeoLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl GeoLocator for HttpGeoLocator {
    fn locate(&self) -> impl Future<Output = anyhow::Result<MapPoint>> + Send {
        async move {
            let res = self
                .client
                .get(&self.url)
                .send()
                .await?
                .error_for_status()?;
            let LocationResponse { lat, lon } = res.json().await?;
            MapPoint::try_from_lat_lng_deg(lat, lon)
                .ok_or_else(|| anyhow::anyhow!("Invalid location received: {lat},{lon}"))
        }
    }
}

/// A locator that never knows where it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeoLocator;

impl GeoLocator for NoGeoLocator {
    fn locate(&self) -> impl Future<Output = anyhow::Result<MapPoint>> + Send {
        async { Err(anyhow::anyhow!("Geolocation is disabled")) }
    }
}
