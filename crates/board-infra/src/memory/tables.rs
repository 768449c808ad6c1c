use std::collections::{BTreeMap, BTreeSet};

use board_core::domain::{Comment, File, Hashtag, Post, RecommendedPost, User, Vote};
use board_core::error::RepoError;

/// Backing tables. `BTreeMap` keeps iteration in id order.
#[derive(Default)]
pub(super) struct Tables {
    sequence: i32,
    pub users: BTreeMap<i32, User>,
    pub posts: BTreeMap<i32, Post>,
    pub votes: BTreeMap<i32, Vote>,
    pub files: BTreeMap<i32, File>,
    pub comments: BTreeMap<i32, Comment>,
    pub hashtags: BTreeMap<i32, Hashtag>,
    /// `(post_id, hashtag_id)` links.
    pub post_hashtags: BTreeSet<(i32, i32)>,
    pub recommended: BTreeMap<i32, RecommendedPost>,
}

impl Tables {
    /// One sequence shared by every table.
    pub fn next_id(&mut self) -> i32 {
        self.sequence += 1;
        self.sequence
    }

    pub fn active_post_mut(&mut self, id: i32) -> Result<&mut Post, RepoError> {
        self.posts
            .get_mut(&id)
            .filter(|p| !p.is_deleted())
            .ok_or(RepoError::NotFound)
    }

    /// Fail without side effects when any file id is unknown.
    pub fn check_files(&self, file_ids: &[i32]) -> Result<(), RepoError> {
        match file_ids.iter().find(|id| !self.files.contains_key(id)) {
            Some(id) => Err(RepoError::InvalidReference(format!("file {id}"))),
            None => Ok(()),
        }
    }

    /// Make `file_ids` the exact set of files attached to `post_id`.
    pub fn replace_files(&mut self, post_id: i32, file_ids: &[i32]) {
        for file in self.files.values_mut() {
            if file_ids.contains(&file.id) {
                file.post_id = Some(post_id);
            } else if file.post_id == Some(post_id) {
                file.post_id = None;
            }
        }
    }

    /// Link `titles` to a post, creating missing hashtags.
    pub fn link_hashtags(&mut self, post_id: i32, titles: &[String]) {
        for title in titles {
            let existing = self
                .hashtags
                .values()
                .find(|h| &h.title == title)
                .map(|h| h.id);
            let hashtag_id = match existing {
                Some(id) => id,
                None => {
                    let id = self.next_id();
                    self.hashtags.insert(
                        id,
                        Hashtag {
                            id,
                            title: title.clone(),
                        },
                    );
                    id
                }
            };
            self.post_hashtags.insert((post_id, hashtag_id));
        }
    }
}
