//! Media records as the surrounding system stores and renders them.

use super::MediaKind;
use serde::{Deserialize, Serialize};

/// One image or video attached to a post.
///
/// A live photo is an image plus a video tied together in one of two ways:
/// - `pair_id`: a transient token shared by both halves before they are saved
/// - `linked_video_id`: the saved image's reference to the saved video's `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Persisted identifier, absent until saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub media_type: MediaKind,
    #[serde(rename = "media_url")]
    pub url: String,
    #[serde(rename = "live_pair_id", default, skip_serializing_if = "Option::is_none")]
    pub pair_id: Option<String>,
    #[serde(rename = "live_video_id", default, skip_serializing_if = "Option::is_none")]
    pub linked_video_id: Option<u64>,
}

impl MediaItem {
    pub fn new(media_type: MediaKind, url: impl Into<String>) -> Self {
        Self {
            id: None,
            media_type,
            url: url.into(),
            pair_id: None,
            linked_video_id: None,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::new(MediaKind::Image, url)
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(MediaKind::Video, url)
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_pair_id(mut self, pair_id: impl Into<String>) -> Self {
        self.pair_id = Some(pair_id.into());
        self
    }

    pub fn linked_to(mut self, video_id: u64) -> Self {
        self.linked_video_id = Some(video_id);
        self
    }

    pub fn is_image(&self) -> bool {
        self.media_type == MediaKind::Image
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaKind::Video
    }

    /// The saved id, ignoring the zero placeholder of unsaved records
    pub fn persisted_id(&self) -> Option<u64> {
        self.id.filter(|&id| id > 0)
    }

    /// The saved video link, ignoring zero
    pub fn persisted_link(&self) -> Option<u64> {
        self.linked_video_id.filter(|&id| id > 0)
    }

    /// The transient pair token, if non-empty
    pub fn pair_key(&self) -> Option<&str> {
        self.pair_id.as_deref().filter(|key| !key.is_empty())
    }
}
