use rocket::{config::Config as RocketCfg, local::blocking::Client, Route};

use crate::web::{sqlite, Cfg};
use imap_core::gateways::image::PassThroughImages;

pub mod prelude {

    pub const DUMMY_VERSION: &str = "3.2.1";

    pub use rocket::{
        http::{ContentType, Status},
        local::blocking::{Client, LocalResponse},
    };

    pub use imap_core::repositories::*;
}

fn rocket_test_instance_with_cfg(
    mounts: Vec<(&'static str, Vec<Route>)>,
    cfg: Cfg,
    rocket_cfg: RocketCfg,
) -> (rocket::Rocket<rocket::Build>, sqlite::Connections) {
    let connections = imap_db_sqlite::Connections::init(":memory:", 1).unwrap();
    connections.run_migrations().unwrap();
    let db = sqlite::Connections::from(connections);
    let options = super::InstanceOptions {
        mounts,
        rocket_cfg: Some(rocket_cfg),
        cfg,
        version: prelude::DUMMY_VERSION,
    };
    let gateways = super::Gateways {
        images: Box::new(PassThroughImages),
    };
    let rocket = super::rocket_instance(options, db.clone(), gateways);
    (rocket, db)
}

pub fn setup(mounts: Vec<(&'static str, Vec<Route>)>) -> (Client, sqlite::Connections) {
    setup_with_cfg(mounts, Cfg::default())
}

pub fn setup_with_cfg(
    mounts: Vec<(&'static str, Vec<Route>)>,
    cfg: Cfg,
) -> (Client, sqlite::Connections) {
    let rocket_cfg = RocketCfg::debug_default();
    let (rocket, db) = rocket_test_instance_with_cfg(mounts, cfg, rocket_cfg);
    let client = Client::tracked(rocket).unwrap();
    (client, db)
}
