use std::{io, path::PathBuf};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use imap_boundary as json;
use imap_core::{
    entities::*,
    gateways::image::{ImageResolver, PassThroughImages},
    repositories::ReportRepo as _,
    usecases,
};
use imap_db_sqlite::Connections;
use imap_gateways::{
    engagement::JsonFileEngagementStorage,
    geolocation::{locate_with_timeout, HttpGeoLocator, NoGeoLocator},
    image::FileImageResolver,
};

use crate::config::Config;

#[derive(Parser)]
#[command(version, about = "Geotagged incident reports on a map")]
struct Args {
    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the proximity feed
    Feed {
        #[arg(long, requires = "lng", conflicts_with = "here", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Center the feed around the current location
        #[arg(long)]
        here: bool,
        #[arg(long)]
        radius_km: Option<f64>,
        /// distance, time_reported_desc or time_taken_desc
        #[arg(long)]
        sort: Option<String>,
    },
    /// Print all map markers and the heat layer
    Map,
    /// Comments of a single report kept on this machine
    Comments {
        report_id: String,
        #[command(subcommand)]
        action: CommentsAction,
    },
}

#[derive(Subcommand)]
enum CommentsAction {
    List,
    Add {
        #[arg(long)]
        author: Option<String>,
        text: String,
    },
    Like {
        comment_id: CommentId,
    },
    /// Show or change the sort order (time_desc or likes_desc)
    Sort {
        mode: Option<String>,
    },
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    let cfg = Config::try_load_from_file_or_default(args.config.as_ref())?;

    log::info!(
        "Connecting to SQLite database '{}' (pool size = {})",
        cfg.db.conn_sqlite,
        cfg.db.conn_pool_size
    );
    let connections = Connections::init(&cfg.db.conn_sqlite, cfg.db.conn_pool_size.into())?;
    connections.run_migrations()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let web_cfg = imap_webserver::Cfg {
                default_radius_km: cfg.webserver.default_radius_km,
            };
            let images = image_resolver(&cfg);
            imap_webserver::run(
                connections,
                cfg.webserver.enable_cors,
                web_cfg,
                images,
                env!("CARGO_PKG_VERSION"),
            )
            .await;
        }
        Command::Feed {
            lat,
            lng,
            here,
            radius_km,
            sort,
        } => {
            let center = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(
                    MapPoint::try_from_lat_lng_deg(lat, lng)
                        .ok_or_else(|| anyhow!("Invalid position: {lat},{lng}"))?,
                ),
                _ if here => current_location(&cfg).await,
                _ => None,
            };
            let query = usecases::FeedQuery {
                center,
                radius_km: radius_km.unwrap_or(cfg.webserver.default_radius_km),
                sort: sort
                    .as_deref()
                    .map(str::parse::<usecases::FeedSort>)
                    .transpose()?
                    .unwrap_or_default(),
            };
            let feed = usecases::query_feed(&connections.shared()?, &query)?;
            print_json(
                &feed
                    .into_iter()
                    .map(json::FeedItem::from)
                    .collect::<Vec<_>>(),
            )?;
        }
        Command::Map => {
            let images = image_resolver(&cfg);
            let layers = usecases::load_map_layers(&connections.shared()?, &*images)?;
            print_json(&json::MapPayload::from(layers))?;
        }
        Command::Comments { report_id, action } => {
            let report = connections.shared()?.get_report(&report_id)?;
            let storage = JsonFileEngagementStorage::try_new(&cfg.engagement.dir)?;
            let store = usecases::EngagementStore::new(storage);
            run_comments_action(&store, &report.id, action)?;
        }
    }
    Ok(())
}

fn run_comments_action(
    store: &usecases::EngagementStore<JsonFileEngagementStorage>,
    report_id: &Id,
    action: CommentsAction,
) -> Result<()> {
    match action {
        CommentsAction::List => {
            let comments: Vec<json::Comment> = store
                .list_comments(report_id)?
                .into_iter()
                .map(Into::into)
                .collect();
            print_json(&comments)?;
        }
        CommentsAction::Add { author, text } => {
            let comment = store.submit_comment(report_id, author.as_deref(), &text)?;
            print_json(&json::Comment::from(usecases::CommentView {
                comment,
                liked: false,
            }))?;
        }
        CommentsAction::Like { comment_id } => match store.like_comment(report_id, comment_id)? {
            usecases::LikeOutcome::Liked { likes } => {
                log::info!("Comment {comment_id} has {likes} likes");
            }
            usecases::LikeOutcome::AlreadyLiked => {
                log::warn!("Comment {comment_id} has already been liked");
            }
            usecases::LikeOutcome::NotFound => {
                return Err(anyhow!("Comment {comment_id} not found"));
            }
        },
        CommentsAction::Sort { mode } => {
            if let Some(mode) = mode {
                let mode = mode
                    .parse::<CommentSortMode>()
                    .map_err(|_| anyhow!("Unknown sort mode '{mode}'"))?;
                store.set_sort_preference(report_id, mode)?;
            }
            println!("{}", store.sort_preference(report_id)?.as_str());
        }
    }
    Ok(())
}

fn image_resolver(cfg: &Config) -> Box<dyn ImageResolver + Send + Sync> {
    match &cfg.images.dir {
        Some(dir) => Box::new(FileImageResolver::new(dir.clone())),
        None => Box::new(PassThroughImages),
    }
}

async fn current_location(cfg: &Config) -> Option<MapPoint> {
    let timeout = cfg.geolocation.timeout;
    let pos = match &cfg.geolocation.url {
        Some(url) => locate_with_timeout(&HttpGeoLocator::new(url.clone()), timeout).await,
        None => locate_with_timeout(&NoGeoLocator, timeout).await,
    };
    if pos.is_none() {
        log::warn!("The current location is not available, the feed is not sorted by distance");
    }
    pos
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(io::stdout().lock(), value)?;
    println!();
    Ok(())
}
