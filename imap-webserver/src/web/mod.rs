use imap_core::gateways::image::ImageResolver;
use rocket::{config::Config as RocketCfg, Rocket, Route};

pub mod api;
mod guards;
mod sqlite;

#[cfg(test)]
pub mod tests;

#[derive(Debug, Clone)]
pub struct Cfg {
    /// Applied to feed queries without an explicit radius.
    pub default_radius_km: f64,
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            default_radius_km: 10.0,
        }
    }
}

pub(crate) struct InstanceOptions {
    mounts: Vec<(&'static str, Vec<Route>)>,
    rocket_cfg: Option<RocketCfg>,
    cfg: Cfg,
    version: &'static str,
}

pub(crate) struct Gateways {
    images: Box<dyn ImageResolver + Send + Sync>,
}

pub(crate) fn rocket_instance(
    options: InstanceOptions,
    db: sqlite::Connections,
    gateways: Gateways,
) -> Rocket<rocket::Build> {
    let InstanceOptions {
        mounts,
        rocket_cfg,
        cfg,
        version,
    } = options;
    let Gateways { images } = gateways;

    let r = match rocket_cfg {
        Some(cfg) => rocket::custom(cfg),
        None => rocket::build(),
    };

    let mut instance = r
        .manage(db)
        .manage(guards::Images(images))
        .manage(guards::Version(version))
        .manage(cfg);

    for (m, r) in mounts {
        instance = instance.mount(m, r);
    }
    instance
}

fn mounts() -> Vec<(&'static str, Vec<Route>)> {
    vec![("/api", api::routes())]
}

pub async fn run(
    db: sqlite::Connections,
    enable_cors: bool,
    cfg: Cfg,
    images: Box<dyn ImageResolver + Send + Sync>,
    version: &'static str,
) {
    match db.shared().and_then(|db| {
        use imap_core::repositories::ReportRepo as _;
        Ok(db.count_reports()?)
    }) {
        Ok(count) => info!("Serving {count} reports"),
        Err(err) => warn!("Unable to count reports: {err}"),
    }
    let options = InstanceOptions {
        mounts: mounts(),
        rocket_cfg: None,
        cfg,
        version,
    };
    let gateways = Gateways { images };
    let instance = rocket_instance(options, db, gateways);
    let server_task = if enable_cors {
        match rocket_cors::CorsOptions::default().to_cors() {
            Ok(cors) => instance.attach(cors).launch(),
            Err(err) => {
                error!("Invalid CORS configuration: {err}");
                return;
            }
        }
    } else {
        instance.launch()
    };
    if let Err(err) = server_task.await {
        error!("Unable to run web server: {err}");
    }
}
