#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;

#[derive(Insertable)]
#[diesel(table_name = reports)]
pub struct NewReport<'a> {
    pub id: &'a str,
    pub caption: Option<&'a str>,
    pub category: &'a str,
    pub severity: Option<i64>,
    pub img_full: &'a str,
    pub img_thumb: &'a str,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub taken_at: Option<i64>,
    pub reported_at: i64,
}

#[derive(Queryable)]
pub struct Report {
    pub rowid: i64,
    pub id: String,
    pub caption: Option<String>,
    pub category: String,
    pub severity: Option<i64>,
    pub img_full: String,
    pub img_thumb: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub taken_at: Option<i64>,
    pub reported_at: i64,
}
