use std::fmt::Display;
use std::future::Future;
use std::mem;

use futures_core::Stream;
use futures_util::{pin_mut, StreamExt};
use http_body::Body;
use log::{debug, info, warn};

use crate::client::Client;
use crate::detail::{resolve_backgrounds, PinnedDetailPayload};
use crate::error::BoxError;
use crate::format::{format_destination, CategorySummary, Destination};
use crate::loader::{self, LoadState, PinnedItem, Update, UpdateKind};
use crate::navigation::{Decision, Navigator, Route};
use crate::place::{Photo, SearchResult};
use crate::service::HttpService;
use crate::state::AppState;
use crate::types::Category;

/// Edge length of the photos shown next to search results.
pub const THUMBNAIL_PX: u32 = 60;

/// Ties the API client, the shared state and a navigator together.
///
/// A `Session` never awaits network calls while borrowed mutably: operations
/// that fetch return a future or a stream, whose output is handed back with
/// [`apply_search`](Session::apply_search) or [`apply`](Session::apply)
/// (or [`drive`](Session::drive)). Outputs of superseded requests are discarded.
///
/// The pinned items follow the pinned set of the [`AppState`], which other
/// views may change through their own handle. Every mutating operation brings
/// the items in line with it first; [`sync`](Session::sync) does so explicitly
/// and starts loading the results pinned elsewhere.
pub struct Session<S, B, N> {
    client: Client<S, B>,
    state: AppState,
    navigator: N,
    items: Vec<PinnedItem>,
    search_generation: u64,
    search_results: Vec<SearchResult>,
}

/// The output of a [`Session::search`] future.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    generation: u64,
    pub results: Vec<SearchResult>,
}

impl<S, B, N> Session<S, B, N>
where
    S: HttpService<B> + Clone,
    S::Error: Display,
    <S::ResponseBody as Body>::Error: Into<BoxError>,
    B: From<Vec<u8>> + Default,
    N: Navigator,
{
    pub fn new(client: Client<S, B>, state: AppState, navigator: N) -> Self {
        Session {
            client,
            state,
            navigator,
            items: Vec::new(),
            search_generation: 0,
            search_results: Vec::new(),
        }
    }

    pub fn client(&self) -> &Client<S, B> {
        &self.client
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Starts a text search. Any earlier search still in flight becomes stale.
    ///
    /// A blank query yields no results without calling the API.
    pub fn search(&mut self, query: &str) -> impl Future<Output = SearchOutcome> {
        self.search_generation += 1;
        let generation = self.search_generation;
        let client = self.client.clone();
        let query = query.trim().to_owned();

        async move {
            let results = if query.is_empty() {
                Vec::new()
            } else {
                client.search_text(&query).await.unwrap_or_else(|e| {
                    warn!("search for {:?} failed: {}", query, e);
                    Vec::new()
                })
            };
            SearchOutcome {
                generation,
                results,
            }
        }
    }

    /// Shows the results of a search unless a newer search has been started.
    pub fn apply_search(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.search_generation {
            debug!("discarding results of a superseded search");
            return false;
        }
        self.search_results = outcome.results;
        true
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }

    /// Resolves the small photo shown next to a search result.
    pub fn thumbnail(&self, photo: &Photo) -> impl Future<Output = String> {
        let client = self.client.clone();
        let photo = photo.clone();

        async move {
            client
                .photo_url(&photo, THUMBNAIL_PX, THUMBNAIL_PX)
                .await
                .unwrap_or_else(|e| {
                    warn!("failed to resolve thumbnail {}: {}", photo.name, e);
                    String::new()
                })
        }
    }

    /// Pins a result and starts loading its data.
    ///
    /// Returns `None` if the result is already pinned and its data is loading
    /// or loaded.
    pub fn pin(&mut self, result: SearchResult) -> Option<impl Stream<Item = Update>> {
        let added = self.state.pin(result.clone());
        self.reconcile();

        let client = &self.client;
        let item = self.items.iter_mut().find(|item| item.id() == result.id)?;
        if added && item.state() != LoadState::Idle {
            // unpinned elsewhere and pinned again since the last sync
            item.restart(result);
        }
        if item.state() != LoadState::Idle {
            debug!("{} is already pinned", item.id());
            return None;
        }

        let ticket = item.start();
        Some(loader::load(client, item.result(), ticket))
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let unpinned = self.state.unpin(id).is_some();
        self.reconcile();
        unpinned
    }

    /// Brings the pinned items in line with the shared pinned set.
    ///
    /// Items of results unpinned elsewhere are dropped. Results pinned elsewhere
    /// get an item, and the returned streams load every item not loaded yet.
    pub fn sync(&mut self) -> Vec<impl Stream<Item = Update>> {
        self.reconcile();

        let client = &self.client;
        self.items
            .iter_mut()
            .filter(|item| item.state() == LoadState::Idle)
            .map(|item| {
                let ticket = item.start();
                loader::load(client, item.result(), ticket)
            })
            .collect()
    }

    /// Loads the data of a pinned result again, superseding the running load.
    pub fn refresh(&mut self, id: &str) -> Option<impl Stream<Item = Update>> {
        self.reconcile();
        let client = &self.client;
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        let result = item.result().clone();
        item.restart(result);
        let ticket = item.start();
        Some(loader::load(client, item.result(), ticket))
    }

    pub fn item(&self, id: &str) -> Option<&PinnedItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// The pinned items in the order of the pinned set, as of the last
    /// operation on this session.
    pub fn items(&self) -> &[PinnedItem] {
        &self.items
    }

    /// Applies an update from a loader stream.
    ///
    /// Returns whether the update triggered a waiting navigation.
    pub fn apply(&mut self, update: Update) -> bool {
        self.reconcile();
        let item = match self.items.iter_mut().find(|item| item.id() == update.ticket.id()) {
            Some(item) => item,
            None => {
                debug!("discarding update for unpinned {}", update.ticket.id());
                return false;
            }
        };

        let background = match update.kind {
            UpdateKind::Background(ref url) if item.is_current(&update.ticket) => Some(url.clone()),
            _ => None,
        };
        let id = update.ticket.id().to_owned();
        let navigation = item.apply(update);

        // A photo arriving after navigation still reaches the open detail view.
        if let Some(url) = background {
            if let Some(mut details) = self.state.details() {
                if details.result.id == id && details.background_image != url {
                    details.background_image = url;
                    self.state.set_details(Some(details));
                }
            }
        }

        match navigation {
            Some(payload) => {
                self.navigate(payload);
                true
            }
            None => false,
        }
    }

    /// Applies every update of a loader stream as it arrives.
    ///
    /// Returns whether any of them triggered a waiting navigation.
    pub async fn drive<U>(&mut self, updates: U) -> bool
    where
        U: Stream<Item = Update>,
    {
        pin_mut!(updates);
        let mut navigated = false;
        while let Some(update) = updates.next().await {
            navigated |= self.apply(update);
        }
        navigated
    }

    /// Handles a click on a pinned item.
    ///
    /// Navigates to the detail view right away if the item is ready and returns
    /// `true`. Otherwise the navigation waits for the item to become ready.
    pub fn click(&mut self, id: &str) -> bool {
        self.reconcile();
        let item = match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => item,
            None => return false,
        };

        match item.click() {
            Decision::Now => {
                let payload = item.payload();
                self.navigate(payload);
                true
            }
            Decision::Latched => {
                info!("{} is still loading, navigating once ready", id);
                false
            }
            Decision::AlreadyLatched => false,
        }
    }

    /// Searches a curated destination and pins the best match.
    ///
    /// Does nothing if a pinned result's name already appears in the destination.
    /// Returns whether a result was pinned.
    pub async fn pin_destination(&mut self, destination: &Destination) -> bool {
        let formatted = format_destination(destination);

        let pinned = self.state.pinned();
        if pinned.iter().any(|r| {
            let name = &r.display_name.text;
            !name.is_empty() && formatted.contains(&**name)
        }) {
            debug!("{} is already pinned", formatted);
            return false;
        }

        let results = self.client.search_text(&formatted).await.unwrap_or_else(|e| {
            warn!("search for {:?} failed: {}", formatted, e);
            Vec::new()
        });
        let mut results = results.into_iter();
        let first = match results.next() {
            Some(first) => first,
            None => {
                warn!("no place found for {}", formatted);
                return false;
            }
        };
        if results.next().is_some() {
            warn!("{} matched more than one place, pinning the first", formatted);
        }

        match self.pin(first) {
            Some(updates) => {
                self.drive(updates).await;
                true
            }
            None => false,
        }
    }

    /// The payload of the active detail view.
    ///
    /// Without one, the detail view cannot be shown and the navigator is sent
    /// back to the entry view.
    pub fn detail_view(&mut self) -> Option<PinnedDetailPayload> {
        let details = self.state.details();
        if details.is_none() {
            info!("no active details");
            self.navigator.push(Route::Entry);
        }
        details
    }

    /// Resolves the card backgrounds of the active detail view.
    pub fn detail_backgrounds(&self) -> impl Future<Output = Vec<(Category, String)>> {
        let client = self.client.clone();
        let details = self.state.details();

        async move {
            match details {
                Some(details) => resolve_backgrounds(&client, &details).await,
                None => Vec::new(),
            }
        }
    }

    /// Average rating per category of a pinned item, empty until it is loaded.
    pub fn category_summaries(&self, id: &str) -> Vec<CategorySummary> {
        self.item(id).map(PinnedItem::summaries).unwrap_or_default()
    }

    fn reconcile(&mut self) {
        let mut stale = mem::take(&mut self.items);
        for result in self.state.pinned() {
            let item = match stale.iter().position(|item| item.id() == result.id) {
                Some(i) => stale.swap_remove(i),
                None => {
                    debug!("tracking pinned {}", result.id);
                    PinnedItem::new(result)
                }
            };
            self.items.push(item);
        }
        for item in stale {
            debug!("dropping unpinned {}", item.id());
        }
    }

    fn navigate(&mut self, payload: PinnedDetailPayload) {
        info!("showing details of {}", payload.result.id);
        self.state.set_details(Some(payload));
        self.navigator.push(Route::Details);
    }
}
