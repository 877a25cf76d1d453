//! # Linker Module
//!
//! Turns transient pair ids into saved links once both halves of a live
//! photo have persisted ids, and carries saved links across edits that
//! reorder or re-save media.
//!
//! ## Example
//! ```rust,ignore
//! // After the batch is saved and every item has an id:
//! let created = apply_links(&mut items);
//!
//! // Before reordering an existing post:
//! let snapshot = LinkSnapshot::capture(&items);
//! reorder_and_resave(&mut items);
//! snapshot.restore(&mut items);
//! ```

use crate::core::media::MediaItem;
use crate::error::LinkError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Map image index to video index for items sharing a pair id.
///
/// `pair_ids[i]` belongs to `media[i]`; empty ids are ignored. When a
/// group holds several images or videos, the last of each wins.
pub fn link_by_pair_id<S: AsRef<str>>(
    media: &[MediaItem],
    pair_ids: &[S],
) -> Result<BTreeMap<usize, usize>, LinkError> {
    if media.len() != pair_ids.len() {
        return Err(LinkError::LengthMismatch {
            media: media.len(),
            pair_ids: pair_ids.len(),
        });
    }

    Ok(group_links(
        media,
        pair_ids.iter().map(|pair_id| pair_id.as_ref()),
    ))
}

fn group_links<'a>(
    media: &[MediaItem],
    pair_ids: impl Iterator<Item = &'a str>,
) -> BTreeMap<usize, usize> {
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, pair_id) in pair_ids.enumerate() {
        if !pair_id.is_empty() {
            groups.entry(pair_id).or_default().push(index);
        }
    }

    let mut links = BTreeMap::new();
    for indexes in groups.values() {
        let image = indexes.iter().rev().find(|&&i| media[i].is_image());
        let video = indexes.iter().rev().find(|&&i| media[i].is_video());
        if let (Some(&image), Some(&video)) = (image, video) {
            links.insert(image, video);
        }
    }
    links
}

/// Set `linked_video_id` on every image whose pair-id partner has been saved.
///
/// Returns the number of links written.
pub fn apply_links(items: &mut [MediaItem]) -> usize {
    let links = group_links(
        items,
        items.iter().map(|item| item.pair_id.as_deref().unwrap_or("")),
    );

    let mut created = 0;
    for (image, video) in links {
        let Some(video_id) = items[video].persisted_id() else {
            continue;
        };
        items[image].linked_video_id = Some(video_id);
        info!(image_id = ?items[image].id, video_id, "Created live photo link");
        created += 1;
    }
    created
}

/// Saved links recorded by URL so they survive a re-save that changes ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// Image URL to video URL
    relations: BTreeMap<String, String>,
}

impl LinkSnapshot {
    /// Record every saved link whose video is in `items`
    pub fn capture(items: &[MediaItem]) -> Self {
        let mut relations = BTreeMap::new();
        for image in items {
            let Some(link) = image.persisted_link() else {
                continue;
            };
            if let Some(video) = items.iter().find(|m| m.persisted_id() == Some(link)) {
                relations.insert(image.url.clone(), video.url.clone());
            }
        }
        Self { relations }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Clear every link in `items`, then re-link by URL.
    ///
    /// Returns the number of links restored. Relations whose image or
    /// video URL is gone, or whose video has no id, are dropped.
    pub fn restore(&self, items: &mut [MediaItem]) -> usize {
        for item in items.iter_mut() {
            item.linked_video_id = None;
        }

        let by_url: HashMap<&str, usize> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.url.as_str(), index))
            .collect();

        let mut updates = Vec::new();
        for (image_url, video_url) in &self.relations {
            let (Some(&image), Some(&video)) =
                (by_url.get(image_url.as_str()), by_url.get(video_url.as_str()))
            else {
                continue;
            };
            if let Some(video_id) = items[video].persisted_id() {
                updates.push((image, video_id));
            }
        }

        for &(image, video_id) in &updates {
            items[image].linked_video_id = Some(video_id);
        }
        updates.len()
    }
}
