//! # Correlator Module
//!
//! Pairs separately uploaded image and video files into live photos by
//! file name: `IMG_0042.HEIC` and `IMG_0042.MOV` belong together.
//!
//! ## Matching policy
//! Images are visited in batch order. Each image binds to the first video
//! (in batch order) with the same base name. Videos are not removed once
//! bound, so two images sharing a base name both bind to the same video.
//!
//! The whole batch must be known before pairing starts; the correlator is
//! not incremental.

mod ids;

pub use ids::{PairIdGenerator, SequentialIds, UuidGenerator};

use crate::core::media::{MediaFile, MediaItem, MediaKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Something that can take part in name-based pairing
pub trait Correlatable {
    /// File name, path or URL the base name is derived from
    fn correlation_name(&self) -> &str;

    /// Image, video, or neither (ignored)
    fn correlation_kind(&self) -> Option<MediaKind>;
}

impl Correlatable for MediaFile {
    fn correlation_name(&self) -> &str {
        &self.name
    }

    fn correlation_kind(&self) -> Option<MediaKind> {
        self.kind()
    }
}

impl Correlatable for MediaItem {
    fn correlation_name(&self) -> &str {
        &self.url
    }

    fn correlation_kind(&self) -> Option<MediaKind> {
        Some(self.media_type)
    }
}

impl<S: AsRef<str>> Correlatable for (S, MediaKind) {
    fn correlation_name(&self) -> &str {
        self.0.as_ref()
    }

    fn correlation_kind(&self) -> Option<MediaKind> {
        Some(self.1)
    }
}

/// Projection of one batch entry used while pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCandidate {
    pub index: usize,
    pub base_name: String,
    pub kind: MediaKind,
}

/// An image and a video from one batch that form a live photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivePhotoPair {
    pub image_index: usize,
    pub video_index: usize,
    pub pair_id: String,
}

/// Normalize a file name, path or URL for pairing.
///
/// Drops any directory prefix, a trailing query string and the last
/// extension, then lower-cases the rest.
pub fn base_name(name_or_url: &str) -> String {
    let file = name_or_url.rsplit(['/', '\\']).next().unwrap_or(name_or_url);
    let file = file.split('?').next().unwrap_or(file);
    let stem = match file.rfind('.') {
        Some(idx) => &file[..idx],
        None => file,
    };
    stem.to_lowercase()
}

/// Split a batch into image and video candidates, keeping batch order
pub fn candidates<T: Correlatable>(items: &[T]) -> (Vec<MediaCandidate>, Vec<MediaCandidate>) {
    let mut images = Vec::new();
    let mut videos = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let Some(kind) = item.correlation_kind() else {
            continue;
        };
        let candidate = MediaCandidate {
            index,
            base_name: base_name(item.correlation_name()),
            kind,
        };
        match kind {
            MediaKind::Image => images.push(candidate),
            MediaKind::Video => videos.push(candidate),
        }
    }

    (images, videos)
}

/// Pair a batch using random UUID pair ids
pub fn correlate<T: Correlatable>(items: &[T]) -> Vec<LivePhotoPair> {
    correlate_with(items, &UuidGenerator)
}

/// Pair a batch, drawing pair ids from `ids`
pub fn correlate_with<T: Correlatable>(
    items: &[T],
    ids: &dyn PairIdGenerator,
) -> Vec<LivePhotoPair> {
    let (images, videos) = candidates(items);
    let mut pairs = Vec::new();

    for image in &images {
        if image.base_name.is_empty() {
            continue;
        }
        if let Some(video) = videos.iter().find(|v| v.base_name == image.base_name) {
            pairs.push(LivePhotoPair {
                image_index: image.index,
                video_index: video.index,
                pair_id: ids.next_id(),
            });
        }
    }

    debug!(
        images = images.len(),
        videos = videos.len(),
        pairs = pairs.len(),
        "Correlated batch"
    );
    pairs
}

/// Tag both members of every pair with its pair id.
///
/// Pairs pointing outside `items` are skipped.
pub fn apply_pair_ids(items: &mut [MediaItem], pairs: &[LivePhotoPair]) {
    for pair in pairs {
        if pair.image_index >= items.len() || pair.video_index >= items.len() {
            continue;
        }
        items[pair.image_index].pair_id = Some(pair.pair_id.clone());
        items[pair.video_index].pair_id = Some(pair.pair_id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn img(name: &str) -> (&str, MediaKind) {
        (name, MediaKind::Image)
    }

    fn vid(name: &str) -> (&str, MediaKind) {
        (name, MediaKind::Video)
    }

    #[test]
    fn base_name_strips_path_query_and_extension() {
        assert_eq!(base_name("https://cdn.example.com/u/IMG_0042.JPG?sig=abc"), "img_0042");
        assert_eq!(base_name("C:\\DCIM\\IMG_0042.MOV"), "img_0042");
        assert_eq!(base_name("archive.tar.gz"), "archive.tar");
        assert_eq!(base_name("README"), "readme");
    }

    #[test]
    fn base_name_of_bare_extension_is_empty() {
        assert_eq!(base_name(".jpg"), "");
        assert_eq!(base_name(""), "");
        assert_eq!(base_name("/uploads/.mp4?x=1"), "");
    }

    #[test]
    fn pairs_first_image_with_matching_video() {
        let items = [img("a.jpg"), vid("a.mp4"), img("b.jpg")];
        let pairs = correlate(&items);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].image_index, 0);
        assert_eq!(pairs[0].video_index, 1);
    }

    #[test]
    fn empty_base_names_never_pair() {
        let items = [img(""), vid(""), img(".jpg"), vid(".mp4")];
        assert!(correlate(&items).is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let items = [vid("IMG_7.MOV"), img("img_7.heic")];
        let pairs = correlate(&items);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].image_index, pairs[0].video_index), (1, 0));
    }

    #[test]
    fn image_binds_to_first_matching_video() {
        let items = [img("a.jpg"), vid("a.mov"), vid("a.mp4")];
        let pairs = correlate(&items);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].video_index, 1);
    }

    #[test]
    fn images_sharing_a_name_bind_to_the_same_video() {
        // No exclusion list: both images claim the first matching video.
        let items = [img("a.jpg"), img("a.heic"), vid("a.mp4"), vid("a.mov")];
        let pairs = correlate(&items);

        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].image_index, pairs[0].video_index), (0, 2));
        assert_eq!((pairs[1].image_index, pairs[1].video_index), (1, 2));
        assert_ne!(pairs[0].pair_id, pairs[1].pair_id);
    }

    #[test]
    fn pairs_follow_image_order() {
        let items = [vid("b.mp4"), img("b.jpg"), vid("a.mp4"), img("a.jpg")];
        let pairs = correlate(&items);
        let order: Vec<usize> = pairs.iter().map(|p| p.image_index).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn pair_ids_are_unique_within_a_run() {
        let items: Vec<(String, MediaKind)> = (0..20)
            .flat_map(|i| {
                [
                    (format!("IMG_{i}.jpg"), MediaKind::Image),
                    (format!("IMG_{i}.mp4"), MediaKind::Video),
                ]
            })
            .collect();
        let pairs = correlate(&items);
        let ids: HashSet<&str> = pairs.iter().map(|p| p.pair_id.as_str()).collect();
        assert_eq!(pairs.len(), 20);
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn files_use_declared_mime_for_kind() {
        let files = vec![
            MediaFile::new("x.jpg", "image/jpeg", Vec::new()),
            MediaFile::new("x.bin", "application/octet-stream", Vec::new()),
            MediaFile::new("x.mp4", "video/mp4", Vec::new()),
        ];
        let pairs = correlate_with(&files, &SequentialIds::new("t"));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].video_index, 2);
        assert_eq!(pairs[0].pair_id, "t-1");
    }

    #[test]
    fn media_items_pair_by_url() {
        let items = vec![
            MediaItem::image("/api/images/IMG_1.jpg"),
            MediaItem::video("/api/videos/IMG_1.mp4"),
        ];
        assert_eq!(correlate(&items).len(), 1);
    }

    #[test]
    fn apply_pair_ids_tags_both_halves() {
        let mut items = vec![
            MediaItem::image("a.jpg"),
            MediaItem::video("a.mp4"),
            MediaItem::image("b.jpg"),
        ];
        let pairs = correlate_with(&items, &SequentialIds::new("p"));
        apply_pair_ids(&mut items, &pairs);

        assert_eq!(items[0].pair_key(), Some("p-1"));
        assert_eq!(items[1].pair_key(), Some("p-1"));
        assert_eq!(items[2].pair_key(), None);
    }

    #[test]
    fn apply_pair_ids_skips_out_of_range_pairs() {
        let mut items = vec![MediaItem::image("a.jpg")];
        let pairs = vec![LivePhotoPair {
            image_index: 0,
            video_index: 5,
            pair_id: "x".to_string(),
        }];
        apply_pair_ids(&mut items, &pairs);
        assert_eq!(items[0].pair_id, None);
    }
}
