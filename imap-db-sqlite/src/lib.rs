#[macro_use]
extern crate diesel;

use anyhow::Result as Fallible;
use diesel::{
    connection::SimpleConnection as _, r2d2, result::Error as DieselError,
    sqlite::SqliteConnection, Connection as _,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use imap_core::usecases as uc;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::{
    cell::{RefCell, RefMut},
    ops::Deref,
    sync::Arc,
};

mod models;
mod repo_impl;
mod schema;

pub use repo_impl::from_diesel_err;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

// Applied to every new database file. Some of them, e.g. the
// encoding, only take effect before the first table is created.
const PRAGMAS: &[&str] = &[
    "journal_mode = WAL",
    "synchronous = NORMAL",
    "wal_autocheckpoint = 1000",
    "wal_checkpoint(TRUNCATE)",
    "secure_delete = 0",
    "automatic_index = 1",
    "encoding = 'UTF-8'",
];

type ConnectionManager = r2d2::ConnectionManager<SqliteConnection>;
pub type ConnectionPool = r2d2::Pool<ConnectionManager>;
type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

/// The kind of lock that is held on the pool while a
/// connection is in use.
pub trait PoolLock: Deref<Target = ConnectionPool> {
    const WRITABLE: bool;
}

impl PoolLock for RwLockReadGuard<'_, ConnectionPool> {
    const WRITABLE: bool = false;
}

impl PoolLock for RwLockWriteGuard<'_, ConnectionPool> {
    const WRITABLE: bool = true;
}

/// A pooled connection that keeps the pool locked until it is dropped.
pub struct LockedConnection<L> {
    // Returned to the pool before the lock is released
    conn: RefCell<PooledConnection>,
    _lock: L,
}

pub type DbReadOnly<'a> = LockedConnection<RwLockReadGuard<'a, ConnectionPool>>;
pub type DbReadWrite<'a> = LockedConnection<RwLockWriteGuard<'a, ConnectionPool>>;

impl<L: PoolLock> LockedConnection<L> {
    fn acquire(lock: L) -> Fallible<Self> {
        let conn = lock.get().inspect_err(|err| {
            let access = if L::WRITABLE { "read/write" } else { "read-only" };
            log::error!("Failed to obtain a pooled database connection for {access} access: {err}");
        })?;
        Ok(Self {
            conn: RefCell::new(conn),
            _lock: lock,
        })
    }

    fn sqlite_conn(&self) -> RefMut<'_, PooledConnection> {
        self.conn.borrow_mut()
    }
}

/// A connection inside of a running transaction.
pub struct DbConnection<'a> {
    conn: RefCell<&'a mut SqliteConnection>,
}

impl<'a> DbConnection<'a> {
    fn sqlite_conn(&self) -> RefMut<'_, &'a mut SqliteConnection> {
        self.conn.borrow_mut()
    }
}

// Use case errors cannot pass through diesel, they are
// kept aside while diesel rolls back the transaction.
fn run_transaction<T, E, F>(conn: &mut SqliteConnection, f: F) -> Result<T, uc::Error>
where
    F: FnOnce(&DbConnection) -> Result<T, E>,
    E: Into<uc::Error>,
{
    let mut aborted = None;
    let result = conn.transaction(|conn| {
        let conn = DbConnection {
            conn: RefCell::new(conn),
        };
        f(&conn).map_err(|err| {
            aborted = Some(err.into());
            DieselError::RollbackTransaction
        })
    });
    result.map_err(|err| match aborted {
        Some(err) => err,
        None => uc::Error::Repo(from_diesel_err(err)),
    })
}

/// Pooled access to a single SQLite database.
///
/// Any number of readers may use the pool concurrently, but a writer
/// locks the whole pool. SQLite would otherwise fail concurrent
/// writes with SQLITE_LOCKED ("database is locked").
#[derive(Clone)]
pub struct Connections {
    pool: Arc<RwLock<ConnectionPool>>,
}

impl Connections {
    pub fn init(url: &str, pool_size: u32) -> Fallible<Self> {
        // Fail early for inaccessible files, r2d2 would keep retrying
        drop(SqliteConnection::establish(url)?);
        let pool = ConnectionPool::builder()
            .max_size(pool_size)
            .build(ConnectionManager::new(url))?;
        let pragmas: String = PRAGMAS.iter().map(|p| format!("PRAGMA {p};\n")).collect();
        pool.get()?.batch_execute(&pragmas)?;
        Ok(Self {
            pool: Arc::new(RwLock::new(pool)),
        })
    }

    pub fn shared(&self) -> Fallible<DbReadOnly<'_>> {
        LockedConnection::acquire(self.pool.read())
    }

    pub fn exclusive(&self) -> Fallible<DbReadWrite<'_>> {
        LockedConnection::acquire(self.pool.write())
    }

    /// Run `f` with exclusive access inside of a single transaction,
    /// that is rolled back if `f` fails.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, uc::Error>
    where
        F: FnOnce(&DbConnection) -> Result<T, E>,
        E: Into<uc::Error>,
    {
        let db = self
            .exclusive()
            .map_err(|err| uc::Error::Repo(err.into()))?;
        let mut conn = db.sqlite_conn();
        run_transaction(&mut conn, f)
    }

    pub fn run_migrations(&self) -> Fallible<()> {
        log::info!("Running embedded database migrations");
        self.exclusive()?
            .sqlite_conn()
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| anyhow::anyhow!("Failed to run database migrations: {err}"))?;
        Ok(())
    }
}
