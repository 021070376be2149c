use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::future;
use http::header::{
    HeaderName, HeaderValue, ACCEPT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, LOCATION,
};
use http::request;
use http::response::Parts;
use http::Request;
use http_body::Body;
use log::debug;
use serde::de::DeserializeOwned;

use crate::api_key::ApiKey;
use crate::error::{BoxError, Error, RequestError};
use crate::gzip;
use crate::place::{Attraction, Photo, PhotoMedia, Places, SearchResult};
use crate::service::HttpService;
use crate::types::{
    Category, Circle, Location, LocationRestriction, NearbySearchRequest, RankPreference,
    TextSearchRequest,
};
use crate::util;

const X_GOOG_API_KEY: &str = "x-goog-api-key";
const X_GOOG_FIELD_MASK: &str = "x-goog-fieldmask";

const SEARCH_TEXT_FIELDS: &str = "places.displayName,places.formattedAddress,places.id,\
                                  places.location,places.name,places.photos";
const SEARCH_NEARBY_FIELDS: &str = "places.id,places.displayName,places.formattedAddress,\
                                    places.location,places.rating,places.name,places.photos,\
                                    places.websiteUri";

/// Largest edge length the photo media endpoint accepts.
pub const MAX_PHOTO_PX: u32 = 4800;

/// A client of the Places API over an HTTP `Service`.
///
/// Cloning a `Client` clones the underlying service and shares the configuration.
pub struct Client<S, B> {
    service: S,
    config: Arc<Config>,
    marker: PhantomData<fn(B)>,
}

pub(crate) struct Config {
    pub api_key: ApiKey,
    pub endpoint: String,
    pub radius: f64,
    pub max_result_count: u32,
}

impl<S, B> Client<S, B> {
    pub(crate) fn new(service: S, config: Arc<Config>) -> Self {
        Client {
            service,
            config,
            marker: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    pub fn max_result_count(&self) -> u32 {
        self.config.max_result_count
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S, B> Client<S, B>
where
    S: HttpService<B> + Clone,
    <S::ResponseBody as Body>::Error: Into<BoxError>,
    B: From<Vec<u8>> + Default,
{
    /// Searches places matching a free-form query, e.g. `"Paris, France"`.
    pub async fn search_text(&self, text_query: &str) -> Result<Vec<SearchResult>, Error<S::Error>> {
        let body = serde_json::to_vec(&TextSearchRequest { text_query })?;
        let req = self.post("places:searchText", SEARCH_TEXT_FIELDS, body)?;
        let places: Places<SearchResult> = self.send_json(req).await?;
        Ok(places.places)
    }

    /// Searches the most popular places of the given primary types within
    /// the configured radius of `location`.
    pub async fn search_nearby(
        &self,
        location: Location,
        included_primary_types: &[&str],
    ) -> Result<Vec<Attraction>, Error<S::Error>> {
        let body = serde_json::to_vec(&NearbySearchRequest {
            included_primary_types,
            rank_preference: RankPreference::Popularity,
            max_result_count: self.config.max_result_count,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: location,
                    radius: self.config.radius,
                },
            },
        })?;
        let req = self.post("places:searchNearby", SEARCH_NEARBY_FIELDS, body)?;
        let places: Places<Attraction> = self.send_json(req).await?;
        Ok(places.places)
    }

    /// Shorthand for `search_nearby` with the place types of `category`.
    pub async fn search_category(
        &self,
        location: Location,
        category: Category,
    ) -> Result<Vec<Attraction>, Error<S::Error>> {
        self.search_nearby(location, category.place_types()).await
    }

    /// Resolves a photo reference to a fetchable image URL of at most the given size.
    pub async fn photo_url(
        &self,
        photo: &Photo,
        max_width_px: u32,
        max_height_px: u32,
    ) -> Result<String, Error<S::Error>> {
        let uri = format!(
            "{}/{}/media?maxWidthPx={}&maxHeightPx={}",
            self.config.endpoint,
            photo.name,
            clamp_px(max_width_px),
            clamp_px(max_height_px),
        );
        let req = self.authorize(Request::get(uri)).body(B::default())?;

        let (parts, body) = self.send(req).await?;
        if parts.status.is_redirection() {
            return parts
                .headers
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or(Error::MissingRedirect);
        }
        if !parts.status.is_success() {
            return Err(Error::Http(parts.status));
        }

        let media: PhotoMedia = serde_json::from_slice(&body)?;
        Ok(media.photo_uri)
    }

    fn post(
        &self,
        method: &str,
        field_mask: &'static str,
        body: Vec<u8>,
    ) -> Result<Request<B>, RequestError> {
        let uri = format!("{}/{}", self.config.endpoint, method);
        self.authorize(Request::post(uri))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(CONTENT_LENGTH, body.len())
            .header(
                HeaderName::from_static(X_GOOG_FIELD_MASK),
                HeaderValue::from_static(field_mask),
            )
            .body(B::from(body))
    }

    fn authorize(&self, req: request::Builder) -> request::Builder {
        let req = req.header(
            HeaderName::from_static(X_GOOG_API_KEY),
            self.config.api_key.header().clone(),
        );
        match gzip::accept_encoding() {
            Some(encoding) => req.header(ACCEPT_ENCODING, encoding),
            None => req,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, req: Request<B>) -> Result<T, Error<S::Error>> {
        let (parts, body) = self.send(req).await?;
        if !parts.status.is_success() {
            return Err(Error::Http(parts.status));
        }
        serde_json::from_slice(&body).map_err(Error::Json)
    }

    async fn send(&self, req: Request<B>) -> Result<(Parts, Vec<u8>), Error<S::Error>> {
        debug!("{} {}", req.method(), req.uri().path());

        let mut service = self.service.clone();
        future::poll_fn(|cx| service.poll_ready(cx))
            .await
            .map_err(Error::Service)?;
        let (parts, body) = service
            .call(req)
            .await
            .map_err(Error::Service)?
            .into_parts();

        debug!("response status: {}", parts.status);
        let body = util::read_body(&parts.headers, body).await?;
        Ok((parts, body))
    }
}

impl<S: Clone, B> Clone for Client<S, B> {
    fn clone(&self) -> Self {
        Client {
            service: self.service.clone(),
            config: self.config.clone(),
            marker: PhantomData,
        }
    }
}

impl<S: Debug, B> Debug for Client<S, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("service", &self.service)
            .field("endpoint", &self.config.endpoint)
            .field("radius", &self.config.radius)
            .field("max_result_count", &self.config.max_result_count)
            .finish()
    }
}

fn clamp_px(px: u32) -> u32 {
    px.max(1).min(MAX_PHOTO_PX)
}
