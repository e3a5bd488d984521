use log::debug;

use crate::clients::{CatalogApi, errors::Result};

/// Largest item count the playlist endpoints accept in one request
pub const ADD_ITEMS_BATCH_SIZE: usize = 50;

/// Splits `items` into consecutive slices of at most `size` elements
pub fn batches<T>(items: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    items.chunks(size.max(1))
}

/// Replaces a remote playlist's contents and details.
///
/// Not transactional: a failure part way leaves the playlist empty or partly
/// filled until the next successful run.
pub struct PlaylistPublisher<'a, C> {
    api: &'a C,
    batch_size: usize,
}

impl<'a, C: CatalogApi> PlaylistPublisher<'a, C> {
    pub fn new(api: &'a C) -> Self {
        PlaylistPublisher {
            api,
            batch_size: ADD_ITEMS_BATCH_SIZE,
        }
    }

    pub async fn clear_playlist(&self, playlist_id: &str) -> Result<()> {
        self.api.replace_playlist_items(playlist_id, &[]).await
    }

    pub async fn add_to_playlist(&self, playlist_id: &str, items: &[String]) -> Result<()> {
        self.api.add_playlist_items(playlist_id, items).await
    }

    pub async fn update(
        &self,
        playlist_id: &str,
        items: &[String],
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<()> {
        self.clear_playlist(playlist_id).await?;
        for (n, chunk) in batches(items, self.batch_size).enumerate() {
            debug!("Adding batch {} ({} items) to {playlist_id}", n + 1, chunk.len());
            self.add_to_playlist(playlist_id, chunk).await?;
        }
        self.api
            .change_playlist_details(playlist_id, name, description, public)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_are_bounded_and_ordered() {
        let items: Vec<u32> = (0..120).collect();
        let chunks: Vec<&[u32]> = batches(&items, 50).collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks.iter().map(|c| c.len()).collect::<Vec<_>>(),
            vec![50, 50, 20]
        );
        assert_eq!(chunks.concat(), items);
    }

    #[test]
    fn exact_multiple_and_empty_inputs() {
        let items: Vec<u32> = (0..100).collect();
        assert_eq!(batches(&items, 50).count(), 2);
        assert_eq!(batches::<u32>(&[], 50).count(), 0);
    }
}
