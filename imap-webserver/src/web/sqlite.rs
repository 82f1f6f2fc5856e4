use anyhow::Result as Fallible;
use imap_core::usecases as uc;
use imap_db_sqlite::{Connections as ConnectionPool, DbConnection, DbReadOnly, DbReadWrite};
use rocket::{
    outcome::try_outcome,
    request::{FromRequest, Outcome},
    Request, State,
};

// Request guard around the shared connection pool
#[derive(Clone)]
pub struct Connections(ConnectionPool);

impl Connections {
    pub fn shared(&self) -> Fallible<DbReadOnly> {
        self.0.shared()
    }

    pub fn exclusive(&self) -> Fallible<DbReadWrite> {
        self.0.exclusive()
    }

    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, uc::Error>
    where
        F: FnOnce(&DbConnection) -> Result<T, E>,
        E: Into<uc::Error>,
    {
        self.0.transaction(f)
    }
}

impl From<ConnectionPool> for Connections {
    fn from(pool: ConnectionPool) -> Self {
        Self(pool)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Connections {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let pool = try_outcome!(request.guard::<&State<Connections>>().await);
        Outcome::Success(pool.inner().clone())
    }
}
