use std::{collections::BTreeSet, io, path::Path};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use imap_core::{
    entities::*,
    repositories::{EngagementKey, EngagementKind, EngagementRecord, EngagementStorage, Error},
};
use jfs::Store;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, Error>;

/// Client-local engagement state persisted as JSON files,
/// one file per report and kind.
pub struct JsonFileEngagementStorage {
    json_store: Store,
}

impl JsonFileEngagementStorage {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }

    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
}

// Report ids are encoded, because they end up in file names.
fn file_id(report_id: &Id, kind: EngagementKind) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(report_id.as_str());
    format!("{}-{encoded}", kind.as_str())
}

#[derive(Debug, Deserialize, Serialize)]
struct JsonComment {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    author: Option<String>,
    text: String,
    created_at: i64,
    likes: u32,
}

impl From<Comment> for JsonComment {
    fn from(from: Comment) -> Self {
        let Comment {
            id,
            author,
            text,
            created_at,
            likes,
        } = from;
        Self {
            id,
            author,
            text,
            created_at: created_at.as_millis(),
            likes,
        }
    }
}

impl JsonComment {
    fn into_comment(self) -> Option<Comment> {
        let Self {
            id,
            author,
            text,
            created_at,
            likes,
        } = self;
        Some(Comment {
            id,
            author,
            text,
            created_at: Timestamp::from_millis(created_at)?,
            likes,
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum JsonRecord {
    Comments(Vec<JsonComment>),
    Likes(BTreeSet<CommentId>),
    SortMode(String),
}

impl From<EngagementRecord> for JsonRecord {
    fn from(from: EngagementRecord) -> Self {
        match from {
            EngagementRecord::Comments(comments) => {
                Self::Comments(comments.into_iter().map(Into::into).collect())
            }
            EngagementRecord::Likes(likes) => Self::Likes(likes),
            EngagementRecord::SortMode(mode) => Self::SortMode(mode.as_str().to_owned()),
        }
    }
}

fn load_record(kind: EngagementKind, record: JsonRecord) -> Option<EngagementRecord> {
    let record = match (kind, record) {
        (EngagementKind::Comments, JsonRecord::Comments(comments)) => EngagementRecord::Comments(
            comments
                .into_iter()
                .map(JsonComment::into_comment)
                .collect::<Option<_>>()?,
        ),
        // An empty comment list is indistinguishable from an empty like set
        (EngagementKind::Likes, JsonRecord::Likes(likes)) => EngagementRecord::Likes(likes),
        (EngagementKind::Likes, JsonRecord::Comments(comments)) if comments.is_empty() => {
            EngagementRecord::Likes(BTreeSet::new())
        }
        (EngagementKind::SortMode, JsonRecord::SortMode(mode)) => {
            EngagementRecord::SortMode(mode.parse().ok()?)
        }
        _ => return None,
    };
    Some(record)
}

impl EngagementStorage for JsonFileEngagementStorage {
    fn get(&self, key: &EngagementKey) -> Result<Option<EngagementRecord>> {
        let id = file_id(&key.report_id, key.kind);
        // Only a missing file is an absent record.
        let record = match self.json_store.get::<JsonRecord>(&id) {
            Ok(record) => record,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                log::error!("Unable to read {id}: {err}");
                return Err(err.into());
            }
        };
        load_record(key.kind, record).map(Some).ok_or_else(|| {
            anyhow::anyhow!(
                "Malformed {} record of report {}",
                key.kind.as_str(),
                key.report_id
            )
            .into()
        })
    }

    fn set(&self, report_id: &Id, record: EngagementRecord) -> Result<()> {
        let id = file_id(report_id, record.kind());
        let record = JsonRecord::from(record);
        self.json_store.save_with_id(&record, &id)?;
        Ok(())
    }
}
