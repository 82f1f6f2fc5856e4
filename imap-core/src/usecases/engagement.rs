use std::collections::BTreeSet;

use super::prelude::*;

/// A comment as seen by the current client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    /// The like control must stay disabled if set.
    pub liked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked { likes: u32 },
    AlreadyLiked,
    NotFound,
}

/// Per report comments, likes and sort preference of a single client.
#[derive(Debug)]
pub struct EngagementStore<S> {
    storage: S,
}

impl<S> EngagementStore<S>
where
    S: EngagementStorage,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn load_comments(&self, report_id: &Id) -> Result<Vec<Comment>> {
        let key = EngagementKey::new(report_id, EngagementKind::Comments);
        match self.storage.get(&key)? {
            Some(EngagementRecord::Comments(comments)) => Ok(comments),
            None => Ok(vec![]),
            Some(other) => Err(unexpected_record(report_id, &other)),
        }
    }

    fn load_likes(&self, report_id: &Id) -> Result<BTreeSet<CommentId>> {
        let key = EngagementKey::new(report_id, EngagementKind::Likes);
        match self.storage.get(&key)? {
            Some(EngagementRecord::Likes(likes)) => Ok(likes),
            None => Ok(BTreeSet::new()),
            Some(other) => Err(unexpected_record(report_id, &other)),
        }
    }

    pub fn sort_preference(&self, report_id: &Id) -> Result<CommentSortMode> {
        let key = EngagementKey::new(report_id, EngagementKind::SortMode);
        match self.storage.get(&key)? {
            Some(EngagementRecord::SortMode(mode)) => Ok(mode),
            _ => Ok(CommentSortMode::default()),
        }
    }

    pub fn set_sort_preference(&self, report_id: &Id, mode: CommentSortMode) -> Result<()> {
        self.storage
            .set(report_id, EngagementRecord::SortMode(mode))?;
        Ok(())
    }

    /// All comments sorted by the stored (or default) sort preference.
    pub fn list_comments(&self, report_id: &Id) -> Result<Vec<CommentView>> {
        let mode = self.sort_preference(report_id)?;
        self.list_comments_sorted(report_id, mode)
    }

    pub fn list_comments_sorted(
        &self,
        report_id: &Id,
        mode: CommentSortMode,
    ) -> Result<Vec<CommentView>> {
        let mut comments = self.load_comments(report_id)?;
        sort_comments(&mut comments, mode);
        let likes = self.load_likes(report_id)?;
        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                liked: likes.contains(&comment.id),
                comment,
            })
            .collect())
    }

    pub fn submit_comment(
        &self,
        report_id: &Id,
        author: Option<&str>,
        text: &str,
    ) -> Result<Comment> {
        self.submit_comment_at(report_id, author, text, Timestamp::now())
    }

    pub fn submit_comment_at(
        &self,
        report_id: &Id,
        author: Option<&str>,
        text: &str,
        now: Timestamp,
    ) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyComment);
        }
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(ToOwned::to_owned);
        let mut comments = self.load_comments(report_id)?;
        let mut id = now.as_millis();
        while comments.iter().any(|c| c.id == id) {
            id += 1;
        }
        let created_at = Timestamp::from_millis(id).unwrap_or(now);
        let comment = Comment {
            id,
            author,
            text: text.to_owned(),
            created_at,
            likes: 0,
        };
        comments.insert(0, comment.clone());
        self.storage
            .set(report_id, EngagementRecord::Comments(comments))?;
        log::debug!("Added comment {id} to report {report_id}");
        Ok(comment)
    }

    /// Like a comment at most once per client.
    pub fn like_comment(&self, report_id: &Id, comment_id: CommentId) -> Result<LikeOutcome> {
        let mut likes = self.load_likes(report_id)?;
        if likes.contains(&comment_id) {
            return Ok(LikeOutcome::AlreadyLiked);
        }
        let mut comments = self.load_comments(report_id)?;
        let Some(comment) = comments.iter_mut().find(|c| c.id == comment_id) else {
            return Ok(LikeOutcome::NotFound);
        };
        comment.likes = comment.likes.saturating_add(1);
        let count = comment.likes;
        // The flag is recorded first, a lost count is
        // preferable to counting the same client twice.
        let previous_likes = likes.clone();
        likes.insert(comment_id);
        self.storage
            .set(report_id, EngagementRecord::Likes(likes))?;
        if let Err(err) = self
            .storage
            .set(report_id, EngagementRecord::Comments(comments))
        {
            if let Err(err) = self
                .storage
                .set(report_id, EngagementRecord::Likes(previous_likes))
            {
                log::error!("Unable to revoke like of comment {comment_id}: {err}");
            }
            return Err(err.into());
        }
        Ok(LikeOutcome::Liked { likes: count })
    }
}

fn unexpected_record(report_id: &Id, record: &EngagementRecord) -> Error {
    RepoError::Other(anyhow::anyhow!(
        "Unexpected {} record for report {report_id}",
        record.kind().as_str()
    ))
    .into()
}

pub fn sort_comments(comments: &mut [Comment], mode: CommentSortMode) {
    match mode {
        CommentSortMode::TimeDesc => comments.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        CommentSortMode::LikesDesc => comments.sort_by(|a, b| {
            b.likes
                .cmp(&a.likes)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}
