use super::{error::ParameterError, *};

// Numeric query parameters are parsed here, malformed values are errors.

fn feed_center(lat: Option<&str>, lng: Option<&str>) -> result::Result<Option<MapPoint>, ApiError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => MapPoint::parse_lat_lng_deg(lat, lng)
            .map(Some)
            .map_err(|err| ParameterError::from(err).into()),
        _ => Err(ParameterError::InvalidPosition.into()),
    }
}

fn feed_radius(radius_km: Option<&str>, default_km: f64) -> result::Result<f64, ApiError> {
    let Some(radius_km) = radius_km else {
        return Ok(default_km);
    };
    radius_km
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| ParameterError::InvalidRadius(radius_km.to_owned()).into())
}

#[get("/reports?<lat>&<lng>&<radius_km>&<sort>")]
pub fn get_feed(
    db: sqlite::Connections,
    cfg: &State<Cfg>,
    lat: Option<&str>,
    lng: Option<&str>,
    radius_km: Option<&str>,
    sort: Option<&str>,
) -> Result<Vec<json::FeedItem>> {
    let sort = match sort {
        Some(sort) => sort.parse::<usecases::FeedSort>()?,
        None => Default::default(),
    };
    let query = usecases::FeedQuery {
        center: feed_center(lat, lng)?,
        radius_km: feed_radius(radius_km, cfg.default_radius_km)?,
        sort,
    };
    let feed = usecases::query_feed(&db.shared()?, &query)?;
    Ok(Json(feed.into_iter().map(Into::into).collect()))
}

#[post("/reports", format = "application/json", data = "<data>")]
pub fn post_report(
    db: sqlite::Connections,
    data: JsonResult<json::NewReport>,
) -> Result<json::ReportCreated> {
    let new_report = usecases::NewReport::try_from(data?.into_inner())?;
    let storable = usecases::prepare_new_report(new_report, Timestamp::now())?;
    let report = db.transaction(|conn| usecases::store_new_report(conn, storable))?;
    info!("Created report {}", report.id);
    Ok(Json(report.into()))
}

#[get("/reports/<id>")]
pub fn get_report(
    db: sqlite::Connections,
    images: &State<Images>,
    id: String,
) -> Result<json::MarkerPayload> {
    let report = usecases::get_report(&db.shared()?, &id)?;
    let Some(marker) = usecases::build_marker(&report, images.resolver()) else {
        // Reports without a valid position are not shown on the map
        return Err(RepoError::NotFound.into());
    };
    Ok(Json(marker.into()))
}

#[get("/reports/<id>/nearby")]
pub fn get_nearby_reports(
    db: sqlite::Connections,
    images: &State<Images>,
    id: String,
) -> Result<Vec<json::NearbyReport>> {
    let nearby = usecases::nearby_markers(&db.shared()?, &id, images.resolver())?;
    Ok(Json(nearby.into_iter().map(Into::into).collect()))
}

#[get("/map")]
pub fn get_map(db: sqlite::Connections, images: &State<Images>) -> Result<json::MapPayload> {
    let layers = usecases::load_map_layers(&db.shared()?, images.resolver())?;
    Ok(Json(layers.into()))
}
