use strum::{EnumString, IntoStaticStr};

use crate::time::*;

/// Comment ids are derived from the creation instant in milliseconds.
pub type CommentId = i64;

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id         : CommentId,
    pub author     : Option<String>,
    pub text       : String,
    pub created_at : Timestamp,
    pub likes      : u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CommentSortMode {
    /// Newest first
    #[default]
    TimeDesc,
    /// Most liked first, newest first among equally liked
    LikesDesc,
}

impl CommentSortMode {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
