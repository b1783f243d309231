//! Item joiner.

use std::collections::HashMap;

use crate::labels::LabelStore;
use crate::models::{ExternalId, FacetKind, Item, SourceFacet};

/// Accumulates facets into items, preserving first-appearance order.
#[derive(Debug, Default)]
pub struct ItemJoiner {
    items: Vec<Item>,
    index: HashMap<ExternalId, usize>,
    replaced: Vec<SourceFacet>,
}

impl ItemJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a scanned file to its item, creating the item on first sight.
    ///
    /// A second file of the same kind for the same identifier replaces the
    /// first one; the replaced facet is kept for reporting.
    pub fn add_facet(&mut self, facet: SourceFacet) {
        let position = match self.index.get(&facet.external_id) {
            Some(&position) => position,
            None => {
                self.items.push(Item::new(facet.external_id.clone()));
                self.index
                    .insert(facet.external_id.clone(), self.items.len() - 1);
                self.items.len() - 1
            }
        };

        let item = &mut self.items[position];
        let slot = match facet.kind {
            FacetKind::Video => &mut item.video,
            FacetKind::Image => &mut item.image,
            FacetKind::Label => return,
        };

        if let Some(previous) = slot.replace(facet) {
            tracing::warn!(
                "Id '{}' has more than one {} file; '{}' is ignored",
                previous.external_id,
                previous.kind,
                previous.path.display()
            );
            self.replaced.push(previous);
        }
    }

    /// Attach every facet of a scan, in scan order.
    pub fn add_all(&mut self, facets: impl IntoIterator<Item = SourceFacet>) {
        for facet in facets {
            self.add_facet(facet);
        }
    }

    /// Facets that were replaced by a later file with the same identifier.
    pub fn replaced(&self) -> &[SourceFacet] {
        &self.replaced
    }

    /// Attach labels and return the items in first-appearance order.
    ///
    /// Labels whose identifier has no file are not turned into items.
    pub fn finish(self, labels: &LabelStore) -> Vec<Item> {
        self.items
            .into_iter()
            .map(|mut item| {
                item.label = labels.get(&item.external_id).cloned();
                item
            })
            .collect()
    }
}

/// Join the video scan, then the image scan, with the label store.
pub fn join_items(
    videos: impl IntoIterator<Item = SourceFacet>,
    images: impl IntoIterator<Item = SourceFacet>,
    labels: &LabelStore,
) -> Vec<Item> {
    let mut joiner = ItemJoiner::new();
    joiner.add_all(videos);
    joiner.add_all(images);
    joiner.finish(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::parse_labels;

    fn video(id: &str) -> SourceFacet {
        SourceFacet::new(
            FacetKind::Video,
            ExternalId::new(id),
            format!("videos/Clip({}).mp4", id),
            format!("Clip({})", id),
        )
    }

    fn image(id: &str) -> SourceFacet {
        SourceFacet::new(
            FacetKind::Image,
            ExternalId::new(id),
            format!("images/{}.png", id),
            id,
        )
    }

    #[test]
    fn orders_videos_before_new_image_ids() {
        let labels = parse_labels("");
        let items = join_items(
            vec![video("20"), video("10")],
            vec![image("30"), image("10"), image("5")],
            &labels,
        );

        let ids: Vec<_> = items.iter().map(|i| i.external_id.as_str()).collect();
        assert_eq!(ids, vec!["20", "10", "30", "5"]);
        assert!(items[1].video.is_some() && items[1].image.is_some());
        assert!(items[2].video.is_none());
    }

    #[test]
    fn attaches_matching_labels_only() {
        let labels = parse_labels("12 Blue Tit, Cyanistes caeruleus\n99 Jay, Garrulus\n");
        let items = join_items(vec![video("12")], vec![image("12"), image("13")], &labels);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label.as_ref().unwrap().display_name, "Blue Tit");
        assert!(items[1].label.is_none());
    }

    #[test]
    fn later_duplicate_replaces_earlier_file() {
        let mut joiner = ItemJoiner::new();
        joiner.add_facet(video("12"));
        let mut second = video("12");
        second.path = "videos/Other(12).mp4".into();
        joiner.add_facet(second);

        assert_eq!(joiner.replaced().len(), 1);
        let items = joiner.finish(&parse_labels(""));
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].video.as_ref().unwrap().path.to_str(),
            Some("videos/Other(12).mp4")
        );
    }
}
