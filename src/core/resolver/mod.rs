//! # Resolver Module
//!
//! Decides which items of a media collection are shown on their own and
//! which are the hidden video half of a live photo.
//!
//! A video is hidden when an image in the same collection claims it,
//! either through a saved link (`image.linked_video_id == video.id`) or
//! through a shared, non-empty transient `pair_id`. Images are never
//! hidden. Everything here is a read-only filter over the slice it is given.

mod policy;

pub use policy::{DefaultPairPolicy, PairPolicy};

use crate::core::media::MediaItem;

/// True if `image` claims `video` through either kind of link
pub fn claims(image: &MediaItem, video: &MediaItem) -> bool {
    if !image.is_image() || !video.is_video() {
        return false;
    }

    let persisted = matches!(
        (image.persisted_link(), video.persisted_id()),
        (Some(link), Some(id)) if link == id
    );
    let transient = matches!(
        (image.pair_key(), video.pair_key()),
        (Some(a), Some(b)) if a == b
    );

    persisted || transient
}

/// True if `item` is a video claimed by some image in `collection`
pub fn is_hidden(item: &MediaItem, collection: &[MediaItem]) -> bool {
    item.is_video() && collection.iter().any(|other| claims(other, item))
}

/// The items that should be rendered on their own, in collection order
pub fn visible_items(collection: &[MediaItem]) -> Vec<&MediaItem> {
    collection
        .iter()
        .filter(|item| !is_hidden(item, collection))
        .collect()
}

/// True if `item` is an image with a video half present in `collection`.
///
/// A saved link counts even when the video itself is not in the slice.
pub fn is_live_photo(item: &MediaItem, collection: &[MediaItem]) -> bool {
    if !item.is_image() {
        return false;
    }
    if item.persisted_link().is_some() {
        return true;
    }
    collection.iter().any(|other| claims(item, other))
}

/// The video half of a live photo image, if it is in `collection`.
///
/// The saved link is tried first, then the transient pair id.
pub fn live_video_for<'a>(item: &MediaItem, collection: &'a [MediaItem]) -> Option<&'a MediaItem> {
    if !item.is_image() {
        return None;
    }

    if let Some(link) = item.persisted_link() {
        if let Some(video) = collection
            .iter()
            .find(|m| m.is_video() && m.persisted_id() == Some(link))
        {
            return Some(video);
        }
    }

    let key = item.pair_key()?;
    collection
        .iter()
        .find(|m| m.is_video() && m.pair_key() == Some(key))
}
