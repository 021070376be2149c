//! The payload of the detail view and its per-category card backgrounds.

use std::fmt::Display;

use futures_util::future::join_all;
use http_body::Body;
use log::warn;
use serde::Serialize;

use crate::client::Client;
use crate::error::BoxError;
use crate::place::{AttractionsByCategory, Photo, SearchResult};
use crate::service::HttpService;
use crate::types::Category;

/// Everything the detail view shows for one pinned result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedDetailPayload {
    pub result: SearchResult,
    pub attractions: AttractionsByCategory,
    /// Resolved URL of the hero photo, empty if there is none.
    pub background_image: String,
}

/// Picks a background photo for each category card.
///
/// The first photo is kept for the hero image unless it is the only one;
/// the remaining photos are handed out cyclically in category order.
/// Returns nothing if there are no photos at all.
pub fn assign_backgrounds<'a>(
    photos: &'a [Photo],
    categories: &[Category],
) -> Vec<(Category, &'a Photo)> {
    let pool = match photos.len() {
        0 => return Vec::new(),
        1 => photos,
        _ => &photos[1..],
    };

    categories
        .iter()
        .enumerate()
        .map(|(i, &category)| (category, &pool[i % pool.len()]))
        .collect()
}

/// Resolves the card backgrounds of `payload` to image URLs.
///
/// Photos that cannot be resolved are logged and left as an empty string.
pub async fn resolve_backgrounds<S, B>(
    client: &Client<S, B>,
    payload: &PinnedDetailPayload,
) -> Vec<(Category, String)>
where
    S: HttpService<B> + Clone,
    S::Error: Display,
    <S::ResponseBody as Body>::Error: Into<BoxError>,
    B: From<Vec<u8>> + Default,
{
    let assigned = assign_backgrounds(&payload.result.photos, payload.attractions.categories());
    let urls = join_all(assigned.iter().map(|&(_, photo)| {
        let (width, height) = photo.full_size();
        client.photo_url(photo, width, height)
    }))
    .await;

    assigned
        .into_iter()
        .zip(urls)
        .map(|((category, photo), url)| {
            let url = url.unwrap_or_else(|e| {
                warn!("failed to resolve photo {}: {}", photo.name, e);
                String::new()
            });
            (category, url)
        })
        .collect()
}
