use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: i32,
    pub title: String,
}

/// How a post listing is narrowed to a single hashtag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashtagFilter {
    Id(i32),
    Title(String),
}

impl Hashtag {
    /// Normalize a user-supplied tag: trims whitespace and a leading `#`.
    /// Returns `None` for tags that are empty after trimming.
    pub fn normalize(raw: &str) -> Option<String> {
        let title = raw.trim().trim_start_matches('#').trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_hash_and_whitespace() {
        assert_eq!(Hashtag::normalize("  #rust "), Some("rust".to_string()));
        assert_eq!(Hashtag::normalize("board"), Some("board".to_string()));
        assert_eq!(Hashtag::normalize(" # "), None);
        assert_eq!(Hashtag::normalize(""), None);
    }
}
