#[macro_use]
extern crate log;

use imap_core::gateways::image::ImageResolver;
use imap_db_sqlite::Connections;

mod web;

pub use web::Cfg;

pub async fn run(
    connections: Connections,
    enable_cors: bool,
    cfg: Cfg,
    images: Box<dyn ImageResolver + Send + Sync>,
    version: &'static str,
) {
    web::run(connections.into(), enable_cors, cfg, images, version).await;
}
