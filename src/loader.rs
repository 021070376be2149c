//! Loading of the data behind a pinned result.
//!
//! A [`PinnedItem`] is a plain state machine. The fetches themselves run in the
//! stream returned by [`load`], whose [`Update`]s are fed back into the item with
//! [`PinnedItem::apply`]. Every update carries the [`Ticket`] of the load that
//! produced it, so results of a superseded load are discarded on arrival.

use std::fmt::Display;

use futures_core::Stream;
use futures_util::stream;
use http_body::Body;
use log::{debug, warn};

use crate::aggregator::attractions_near;
use crate::client::Client;
use crate::detail::PinnedDetailPayload;
use crate::error::BoxError;
use crate::format::{average_rating, CategorySummary};
use crate::navigation::{Decision, Gate};
use crate::place::{AttractionsByCategory, PlaceId, SearchResult};
use crate::service::HttpService;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    /// The attractions have been fetched. The background photo may still be on its way.
    Ready,
}

/// Identifies one load of one pinned result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    id: PlaceId,
    generation: u64,
}

/// A completed fetch of a load.
#[derive(Clone, Debug)]
pub struct Update {
    pub ticket: Ticket,
    pub kind: UpdateKind,
}

#[derive(Clone, Debug)]
pub enum UpdateKind {
    /// The resolved URL of the result's first photo, empty if it has none.
    Background(String),
    Attractions(AttractionsByCategory),
}

/// A pinned result together with the data loaded for it.
#[derive(Clone, Debug)]
pub struct PinnedItem {
    result: SearchResult,
    state: LoadState,
    background_image: String,
    attractions: AttractionsByCategory,
    generation: u64,
    gate: Gate,
}

impl Ticket {
    /// Id of the result being loaded.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl PinnedItem {
    pub fn new(result: SearchResult) -> Self {
        PinnedItem {
            result,
            state: LoadState::Idle,
            background_image: String::new(),
            attractions: AttractionsByCategory::new(),
            generation: 0,
            gate: Gate::new(),
        }
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn id(&self) -> &str {
        &self.result.id
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn background_image(&self) -> &str {
        &self.background_image
    }

    pub fn attractions(&self) -> &AttractionsByCategory {
        &self.attractions
    }

    /// Enters `Loading`, returning the ticket the new load's updates must carry.
    ///
    /// Tickets of any earlier load become stale.
    pub fn start(&mut self) -> Ticket {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.ticket()
    }

    /// Resets the item to `Idle` with a new result, dropping the loaded data
    /// and any waiting navigation.
    pub fn restart(&mut self, result: SearchResult) {
        self.result = result;
        self.generation += 1;
        self.state = LoadState::Idle;
        self.background_image.clear();
        self.attractions = AttractionsByCategory::new();
        self.gate.cancel();
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && ticket.id == self.result.id
    }

    /// Applies a completed fetch.
    ///
    /// Returns the payload to navigate with if this update made the item ready
    /// while a navigation was waiting for it.
    pub fn apply(&mut self, update: Update) -> Option<PinnedDetailPayload> {
        if !self.is_current(&update.ticket) || self.state == LoadState::Idle {
            debug!("discarding stale update for {}", update.ticket.id);
            return None;
        }

        match update.kind {
            UpdateKind::Background(url) => self.background_image = url,
            UpdateKind::Attractions(attractions) => {
                self.attractions = attractions;
                self.state = LoadState::Ready;
            }
        }

        if self.state == LoadState::Ready && self.gate.release() {
            Some(self.payload())
        } else {
            None
        }
    }

    /// Requests navigation to the detail view of this item.
    pub fn click(&mut self) -> Decision {
        self.gate.request(self.state)
    }

    /// The detail payload made of whatever has been loaded so far.
    pub fn payload(&self) -> PinnedDetailPayload {
        PinnedDetailPayload {
            result: self.result.clone(),
            attractions: self.attractions.clone(),
            background_image: self.background_image.clone(),
        }
    }

    /// Average rating per category, once the attractions are loaded.
    pub fn summaries(&self) -> Vec<CategorySummary> {
        if self.state != LoadState::Ready {
            return Vec::new();
        }
        self.attractions
            .iter()
            .map(|(category, attractions)| CategorySummary {
                category,
                average_rating: average_rating(attractions),
            })
            .collect()
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            id: self.result.id.clone(),
            generation: self.generation,
        }
    }
}

/// Fetches the background photo and the attractions of `result` concurrently.
///
/// Yields one update per fetch, in completion order. Failures are logged and
/// reported as empty data.
pub fn load<S, B>(
    client: &Client<S, B>,
    result: &SearchResult,
    ticket: Ticket,
) -> impl Stream<Item = Update>
where
    S: HttpService<B> + Clone,
    S::Error: Display,
    <S::ResponseBody as Body>::Error: Into<BoxError>,
    B: From<Vec<u8>> + Default,
{
    let background = {
        let client = client.clone();
        let photo = result.hero_photo().cloned();
        let ticket = ticket.clone();
        async move {
            let url = match photo {
                Some(photo) => {
                    let (width, height) = photo.full_size();
                    client
                        .photo_url(&photo, width, height)
                        .await
                        .unwrap_or_else(|e| {
                            warn!("failed to resolve photo {}: {}", photo.name, e);
                            String::new()
                        })
                }
                None => String::new(),
            };
            Update {
                ticket,
                kind: UpdateKind::Background(url),
            }
        }
    };

    let attractions = {
        let client = client.clone();
        let location = result.location;
        async move {
            let attractions = attractions_near(&client, location).await;
            Update {
                ticket,
                kind: UpdateKind::Attractions(attractions),
            }
        }
    };

    stream::select(stream::once(background), stream::once(attractions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::LocalizedText;
    use crate::types::{Category, Location};

    fn result(id: &str) -> SearchResult {
        SearchResult {
            id: id.to_owned(),
            name: format!("places/{}", id),
            display_name: LocalizedText::default(),
            formatted_address: String::new(),
            location: Location::default(),
            photos: Vec::new(),
        }
    }

    fn attractions() -> AttractionsByCategory {
        let mut map = AttractionsByCategory::new();
        map.insert(
            Category::Culture,
            serde_json::from_str(
                r#"[{"id":"a","rating":4.0,"location":{"latitude":0,"longitude":0}},
                    {"id":"b","rating":5.0,"location":{"latitude":0,"longitude":0}}]"#,
            )
            .unwrap(),
        );
        map
    }

    fn update(ticket: &Ticket, kind: UpdateKind) -> Update {
        Update {
            ticket: ticket.clone(),
            kind,
        }
    }

    #[test]
    fn photo_does_not_gate_readiness() {
        let mut item = PinnedItem::new(result("p1"));
        assert_eq!(item.state(), LoadState::Idle);

        let ticket = item.start();
        assert_eq!(item.state(), LoadState::Loading);

        item.apply(update(&ticket, UpdateKind::Background("bg".to_owned())));
        assert_eq!(item.state(), LoadState::Loading);
        assert_eq!(item.background_image(), "bg");

        item.apply(update(&ticket, UpdateKind::Attractions(attractions())));
        assert_eq!(item.state(), LoadState::Ready);
    }

    #[test]
    fn ready_without_photo() {
        let mut item = PinnedItem::new(result("p1"));
        let ticket = item.start();
        item.apply(update(&ticket, UpdateKind::Attractions(attractions())));
        assert_eq!(item.state(), LoadState::Ready);
        assert_eq!(item.payload().background_image, "");
    }

    #[test]
    fn stale_updates_are_discarded() {
        let mut item = PinnedItem::new(result("p1"));
        let old = item.start();
        item.restart(result("p1"));
        assert_eq!(item.state(), LoadState::Idle);

        // nothing is current while idle
        item.apply(update(&old, UpdateKind::Attractions(attractions())));
        assert_eq!(item.state(), LoadState::Idle);

        let new = item.start();
        item.apply(update(&old, UpdateKind::Attractions(attractions())));
        item.apply(update(&old, UpdateKind::Background("old".to_owned())));
        assert_eq!(item.state(), LoadState::Loading);
        assert_eq!(item.background_image(), "");

        item.apply(update(&new, UpdateKind::Attractions(AttractionsByCategory::new())));
        assert_eq!(item.state(), LoadState::Ready);
        assert!(item.attractions().is_empty());
    }

    #[test]
    fn click_while_loading_navigates_on_ready() {
        let mut item = PinnedItem::new(result("p1"));
        let ticket = item.start();

        assert_eq!(item.click(), Decision::Latched);
        assert_eq!(item.click(), Decision::AlreadyLatched);
        assert!(item
            .apply(update(&ticket, UpdateKind::Background("bg".to_owned())))
            .is_none());

        let payload = item
            .apply(update(&ticket, UpdateKind::Attractions(attractions())))
            .unwrap();
        assert_eq!(payload.background_image, "bg");
        assert_eq!(payload.attractions.get(Category::Culture).len(), 2);

        // the latch fired once
        assert_eq!(item.click(), Decision::Now);
    }

    #[test]
    fn summaries_once_ready() {
        let mut item = PinnedItem::new(result("p1"));
        let ticket = item.start();
        assert!(item.summaries().is_empty());

        item.apply(update(&ticket, UpdateKind::Attractions(attractions())));
        let summaries = item.summaries();
        assert_eq!(summaries.len(), Category::COUNT);
        assert_eq!(summaries[0].to_string(), "Culture: 4.5");
        assert_eq!(summaries[1].average_rating, 0.0);
    }
}
