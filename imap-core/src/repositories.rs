// Low-level storage access traits.
// The report store is shared by all clients, the engagement
// storage is scoped to a single client.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    io,
};

use crate::entities::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait ReportRepo {
    fn create_report(&self, report: Report) -> Result<()>;
    fn get_report(&self, id: &str) -> Result<Report>;

    // Ordered by insertion
    fn all_reports(&self) -> Result<Vec<Report>>;
    fn count_reports(&self) -> Result<usize>;
}

/// The kinds of client-local engagement state kept per report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementKind {
    Comments,
    Likes,
    SortMode,
}

impl EngagementKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::Likes => "likes",
            Self::SortMode => "sort-mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngagementKey {
    pub report_id: Id,
    pub kind: EngagementKind,
}

impl EngagementKey {
    pub fn new(report_id: &Id, kind: EngagementKind) -> Self {
        Self {
            report_id: report_id.clone(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementRecord {
    /// Most recent first
    Comments(Vec<Comment>),
    /// Ids of the comments liked by this client
    Likes(BTreeSet<CommentId>),
    SortMode(CommentSortMode),
}

impl EngagementRecord {
    pub const fn kind(&self) -> EngagementKind {
        match self {
            Self::Comments(_) => EngagementKind::Comments,
            Self::Likes(_) => EngagementKind::Likes,
            Self::SortMode(_) => EngagementKind::SortMode,
        }
    }
}

/// Key/value storage for client-local engagement state.
///
/// Implementations must return the record that has been stored
/// last for a key, or `None` if nothing has been stored yet.
pub trait EngagementStorage {
    fn get(&self, key: &EngagementKey) -> Result<Option<EngagementRecord>>;
    fn set(&self, report_id: &Id, record: EngagementRecord) -> Result<()>;
}

/// Volatile engagement storage, e.g. for tests or throw-away sessions.
#[derive(Debug, Default)]
pub struct InMemoryEngagementStorage {
    records: RefCell<HashMap<EngagementKey, EngagementRecord>>,
}

impl EngagementStorage for InMemoryEngagementStorage {
    fn get(&self, key: &EngagementKey) -> Result<Option<EngagementRecord>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&self, report_id: &Id, record: EngagementRecord) -> Result<()> {
        let key = EngagementKey::new(report_id, record.kind());
        self.records.borrow_mut().insert(key, record);
        Ok(())
    }
}

impl<T: EngagementStorage + ?Sized> EngagementStorage for &T {
    fn get(&self, key: &EngagementKey) -> Result<Option<EngagementRecord>> {
        (**self).get(key)
    }

    fn set(&self, report_id: &Id, record: EngagementRecord) -> Result<()> {
        (**self).set(report_id, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_storage_is_namespaced_by_report_and_kind() {
        let storage = InMemoryEngagementStorage::default();
        let a = Id::from("a");
        let b = Id::from("b");
        storage
            .set(&a, EngagementRecord::SortMode(CommentSortMode::LikesDesc))
            .unwrap();
        assert_eq!(
            storage
                .get(&EngagementKey::new(&a, EngagementKind::SortMode))
                .unwrap(),
            Some(EngagementRecord::SortMode(CommentSortMode::LikesDesc))
        );
        assert!(storage
            .get(&EngagementKey::new(&b, EngagementKind::SortMode))
            .unwrap()
            .is_none());
        assert!(storage
            .get(&EngagementKey::new(&a, EngagementKind::Comments))
            .unwrap()
            .is_none());
    }
}
