#![doc(html_root_url = "https://docs.rs/tripboard/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
# Tripboard

Destination search, pinning and nearby-attraction discovery on top of the
[Google Places API (New)][places].

[places]: https://developers.google.com/maps/documentation/places/web-service/op-overview

## Usage

Add `tripboard` to your dependencies in your project's `Cargo.toml`:

```toml
[dependencies]
tokio = { version = "1", features = ["macros", "rt-multi-thread"] }
tripboard = "0.1.0"
```

## Overview

Search a destination, pin it and open its detail view once its attractions
have been loaded:

```rust,no_run
use tripboard::{ApiKey, AppState, Builder, Route, Session};

# #[tokio::main]
# async fn main() {
let key = ApiKey::from_env().expect("GOOGLE_API_KEY must be set");
let client = Builder::new(key).connect();
let mut session = Session::new(client, AppState::new(), Vec::<Route>::new());

let outcome = session.search("Paris").await;
session.apply_search(outcome);

let paris = session.search_results()[0].clone();
let id = paris.id.clone();
if let Some(updates) = session.pin(paris) {
    // Not ready yet: the navigation waits for the attractions.
    session.click(&id);
    session.drive(updates).await;
}

for summary in session.category_summaries(&id) {
    println!("{} ⭐", summary);
}
assert_eq!(session.navigator().last(), Some(&Route::Details));
# }
```

Any [`tower_service::Service`] over `http` types can stand in for the bundled
`hyper` client; see [`Builder::build`].
*/

#[cfg(feature = "hyper")]
extern crate hyper_pkg;

#[macro_use]
mod util;

pub mod aggregator;
pub mod detail;
pub mod error;
pub mod format;
#[cfg(feature = "hyper")]
#[cfg_attr(docsrs, doc(cfg(feature = "hyper")))]
pub mod hyper;
pub mod loader;
pub mod navigation;
pub mod place;
pub mod service;
pub mod state;
pub mod timeout;
pub mod types;

mod api_key;
mod builder;
mod client;
mod gzip;
mod session;

pub use crate::aggregator::attractions_near;
pub use crate::api_key::ApiKey;
pub use crate::builder::Builder;
pub use crate::client::{Client, MAX_PHOTO_PX};
pub use crate::detail::PinnedDetailPayload;
pub use crate::error::Error;
pub use crate::format::{average_rating, format_category, CategorySummary, Destination};
pub use crate::loader::{LoadState, PinnedItem, Update};
pub use crate::navigation::{Navigator, Route};
pub use crate::place::{Attraction, AttractionsByCategory, Photo, SearchResult};
pub use crate::session::{SearchOutcome, Session, THUMBNAIL_PX};
pub use crate::state::AppState;
pub use crate::types::{Category, Location};
