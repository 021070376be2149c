//! Fan-out of nearby searches over every category.

use std::fmt::Display;

use futures_util::future::join_all;
use http_body::Body;
use log::warn;

use crate::client::Client;
use crate::error::BoxError;
use crate::place::AttractionsByCategory;
use crate::service::HttpService;
use crate::types::{Category, Location};

/// Searches every category around `location` concurrently.
///
/// A category whose search fails is logged and left empty, so the result
/// always holds every category.
pub async fn attractions_near<S, B>(client: &Client<S, B>, location: Location) -> AttractionsByCategory
where
    S: HttpService<B> + Clone,
    S::Error: Display,
    <S::ResponseBody as Body>::Error: Into<BoxError>,
    B: From<Vec<u8>> + Default,
{
    let searches = Category::ALL
        .iter()
        .map(|&category| client.search_category(location, category));
    let results = join_all(searches).await;

    Category::ALL
        .iter()
        .zip(results)
        .map(|(&category, result)| {
            let attractions = result.unwrap_or_else(|e| {
                warn!("failed to fetch {} attractions: {}", category, e);
                Vec::new()
            });
            (category, attractions)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use futures::executor::block_on;
    use futures::future;
    use http::{Request, Response, StatusCode};

    use super::*;
    use crate::{ApiKey, Builder};

    #[test]
    fn failed_category_is_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let service = tower::service_fn(move |req: Request<Vec<u8>>| {
            counter.fetch_add(1, Ordering::SeqCst);
            let body: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
            let types = body["includedPrimaryTypes"].as_array().unwrap();
            let res = if types.iter().any(|t| t == "hotel") {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(hyper_pkg::Body::empty())
                    .unwrap()
            } else {
                let place = format!(
                    r#"{{"places":[{{"id":"{}","rating":4.5,"location":{{"latitude":0,"longitude":0}}}}]}}"#,
                    types[0].as_str().unwrap()
                );
                Response::new(hyper_pkg::Body::from(place))
            };
            future::ok::<_, Infallible>(res)
        });
        let client = Builder::new(ApiKey::new("k").unwrap()).build(service);

        let map = block_on(attractions_near(&client, Location::new(48.85, 2.35)));

        assert_eq!(calls.load(Ordering::SeqCst), Category::COUNT);
        assert!(map.get(Category::Lodging).is_empty());
        assert_eq!(map.get(Category::Culture)[0].id, "art_gallery");
        assert_eq!(map.get(Category::Transportation)[0].id, "airport");
        assert_eq!(map.len(), Category::COUNT - 1);
    }

    #[test]
    fn every_category_fails() {
        let service = tower::service_fn(|_: Request<Vec<u8>>| {
            future::ok::<_, Infallible>(
                Response::builder()
                    .status(StatusCode::FORBIDDEN)
                    .body(hyper_pkg::Body::empty())
                    .unwrap(),
            )
        });
        let client = Builder::new(ApiKey::new("k").unwrap()).build(service);

        let map = block_on(attractions_near(&client, Location::default()));
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), Category::COUNT);
    }

    #[tokio::test]
    async fn searches_overlap_and_keep_category_order() {
        tokio::time::pause();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(Mutex::new(Vec::new()));
        let service = {
            let in_flight = in_flight.clone();
            let completed = completed.clone();
            tower::service_fn(move |req: Request<Vec<u8>>| {
                let body: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
                let first = body["includedPrimaryTypes"][0].as_str().unwrap().to_owned();
                let index = Category::ALL
                    .iter()
                    .position(|c| c.place_types()[0] == first)
                    .unwrap();
                in_flight.fetch_add(1, Ordering::SeqCst);

                let in_flight = in_flight.clone();
                let completed = completed.clone();
                async move {
                    // the last category answers first
                    let delay = 10 * (Category::COUNT - index) as u64;
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    let pending = in_flight.fetch_sub(1, Ordering::SeqCst);
                    completed.lock().unwrap().push((index, pending));

                    let place = format!(
                        r#"{{"places":[{{"id":"{}","location":{{"latitude":0,"longitude":0}}}}]}}"#,
                        first
                    );
                    Ok::<_, Infallible>(Response::new(hyper_pkg::Body::from(place)))
                }
            })
        };
        let client = Builder::new(ApiKey::new("k").unwrap()).build(service);

        let map = attractions_near(&client, Location::default()).await;

        let completed = completed.lock().unwrap().clone();
        // every search was sent before the first one came back
        assert_eq!(completed[0], (Category::COUNT - 1, Category::COUNT));
        let order: Vec<_> = completed.iter().map(|&(index, _)| index).collect();
        assert_eq!(order, [5, 4, 3, 2, 1, 0]);

        assert_eq!(map.len(), Category::COUNT);
        for &category in Category::ALL {
            assert_eq!(map.get(category)[0].id, category.place_types()[0]);
        }
    }
}
