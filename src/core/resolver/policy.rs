//! Pluggable live photo rules.
//!
//! Presentation layers sometimes need to bend a rule (e.g. treat an
//! animated image as a video). They implement [`PairPolicy`] and override
//! only the methods they care about; the rest fall back to the defaults.

use crate::core::media::MediaItem;

/// Capability set for live photo decisions
pub trait PairPolicy: Send + Sync {
    fn is_video(&self, item: &MediaItem) -> bool {
        item.is_video()
    }

    fn is_live_photo(&self, item: &MediaItem, collection: &[MediaItem]) -> bool {
        super::is_live_photo(item, collection)
    }

    fn live_video_for<'a>(
        &self,
        item: &MediaItem,
        collection: &'a [MediaItem],
    ) -> Option<&'a MediaItem> {
        super::live_video_for(item, collection)
    }

    fn is_hidden(&self, item: &MediaItem, collection: &[MediaItem]) -> bool {
        self.is_video(item) && super::is_hidden(item, collection)
    }

    fn visible_items<'a>(&self, collection: &'a [MediaItem]) -> Vec<&'a MediaItem> {
        collection
            .iter()
            .filter(|item| !self.is_hidden(item, collection))
            .collect()
    }
}

/// The stock rules
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPairPolicy;

impl PairPolicy for DefaultPairPolicy {}
