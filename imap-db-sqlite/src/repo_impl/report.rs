use super::*;

impl<L: PoolLock> ReportRepo for LockedConnection<L> {
    fn create_report(&self, report: Report) -> Result<()> {
        if !L::WRITABLE {
            return Err(anyhow!("Read-only database access").into());
        }
        create_report(&mut self.sqlite_conn(), report)
    }
    fn get_report(&self, id: &str) -> Result<Report> {
        get_report(&mut self.sqlite_conn(), id)
    }
    fn all_reports(&self) -> Result<Vec<Report>> {
        all_reports(&mut self.sqlite_conn())
    }
    fn count_reports(&self) -> Result<usize> {
        count_reports(&mut self.sqlite_conn())
    }
}

impl ReportRepo for DbConnection<'_> {
    fn create_report(&self, report: Report) -> Result<()> {
        create_report(&mut self.sqlite_conn(), report)
    }
    fn get_report(&self, id: &str) -> Result<Report> {
        get_report(&mut self.sqlite_conn(), id)
    }
    fn all_reports(&self) -> Result<Vec<Report>> {
        all_reports(&mut self.sqlite_conn())
    }
    fn count_reports(&self) -> Result<usize> {
        count_reports(&mut self.sqlite_conn())
    }
}

fn create_report(conn: &mut SqliteConnection, report: Report) -> Result<()> {
    let Report {
        id,
        caption,
        category,
        severity,
        pos,
        taken_at,
        reported_at,
        images,
    } = report;
    let (lat, lng) = pos.map(MapPoint::to_lat_lng_deg).unzip();
    let new_report = models::NewReport {
        id: id.as_str(),
        caption: caption.as_deref(),
        category: category.as_str(),
        severity: severity.map(i64::from),
        img_full: images.full.as_str(),
        img_thumb: images.thumb.as_str(),
        lat,
        lng,
        taken_at: taken_at.map(Timestamp::as_millis),
        reported_at: reported_at.as_millis(),
    };
    let _count = diesel::insert_into(schema::reports::table)
        .values(&new_report)
        .execute(conn)
        .map_err(from_diesel_err)?;
    debug_assert_eq!(1, _count);
    Ok(())
}

fn load_report(from: models::Report) -> Result<Report> {
    let models::Report {
        rowid: _,
        id,
        caption,
        category,
        severity,
        img_full,
        img_thumb,
        lat,
        lng,
        taken_at,
        reported_at,
    } = from;
    let pos = match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let pos = MapPoint::try_from_lat_lng_deg(lat, lng);
            if pos.is_none() {
                log::warn!("Report {id} has an invalid position: {lat},{lng}");
            }
            pos
        }
        _ => None,
    };
    let severity = severity.and_then(|s| Severity::try_from(s).ok());
    let reported_at = Timestamp::from_millis(reported_at)
        .ok_or_else(|| anyhow!("Invalid reported_at timestamp of report {id}: {reported_at}"))?;
    Ok(Report {
        id: id.into(),
        caption,
        category: Category::parse_or_other(Some(category.as_str())),
        severity,
        pos,
        taken_at: taken_at.and_then(Timestamp::from_millis),
        reported_at,
        images: ImageRefs {
            full: img_full.into(),
            thumb: img_thumb.into(),
        },
    })
}

fn get_report(conn: &mut SqliteConnection, id: &str) -> Result<Report> {
    use schema::reports::dsl;
    let report = schema::reports::table
        .filter(dsl::id.eq(id))
        .first::<models::Report>(conn)
        .map_err(from_diesel_err)?;
    load_report(report)
}

fn all_reports(conn: &mut SqliteConnection) -> Result<Vec<Report>> {
    use schema::reports::dsl;
    schema::reports::table
        .order_by(dsl::rowid)
        .load::<models::Report>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_report)
        .collect()
}

fn count_reports(conn: &mut SqliteConnection) -> Result<usize> {
    let count = schema::reports::table
        .select(diesel::dsl::count_star())
        .first::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count as usize)
}
