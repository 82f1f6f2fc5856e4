use std::{fmt::Display, result};

use imap_boundary as json;
use imap_boundary::Error as JsonErrorResponse;
use rocket::{
    self, get,
    http::Status,
    post,
    response::{self, Responder},
    routes,
    serde::json::{Error as JsonError, Json},
    Route, State,
};

use super::{guards::*, sqlite, Cfg};
use imap_core::{
    entities::*,
    repositories::{Error as RepoError, *},
    usecases,
};

mod error;
mod reports;
mod util;

pub use self::error::Error as ApiError;


type Result<T> = result::Result<Json<T>, ApiError>;
type JsonResult<'a, T> = result::Result<Json<T>, JsonError<'a>>;

pub fn routes() -> Vec<Route> {
    routes![
        // ---   reports   --- //
        reports::get_feed,
        reports::post_report,
        reports::get_report,
        reports::get_nearby_reports,
        // ---   map   --- //
        reports::get_map,
        // ---   util   --- //
        util::get_categories,
        util::get_version,
    ]
}

fn json_error_response<'r, 'o: 'r, E: Display>(
    req: &'r rocket::Request<'_>,
    err: &E,
    status: Status,
) -> response::Result<'o> {
    let message = err.to_string();
    let boundary_error = JsonErrorResponse {
        http_status: status.code,
        message,
    };
    Json(boundary_error).respond_to(req).map(|mut res| {
        res.set_status(status);
        res
    })
}
