//! Builder type for [`Client`](crate::Client).

use std::sync::Arc;
use std::time::Duration;

use crate::api_key::ApiKey;
use crate::client::{Client, Config};

/// A builder for `Client`.
///
/// ## Example
///
/// ```rust,no_run
/// use tripboard::{ApiKey, Builder};
///
/// # #[tokio::main]
/// # async fn main() {
/// let key = ApiKey::from_env().expect("GOOGLE_API_KEY must be set");
/// let client = Builder::new(key).radius(5_000.0).connect();
///
/// let paris = client.search_text("Paris").await.unwrap();
/// println!("{:?}", paris.first().map(|p| &p.formatted_address));
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    api_key: ApiKey,
    endpoint: String,
    radius: f64,
    max_result_count: u32,
    timeout: Duration,
}

impl Builder {
    pub const DEFAULT_ENDPOINT: &'static str = "https://places.googleapis.com/v1";
    /// 8 km, roughly 5 miles.
    pub const DEFAULT_RADIUS: f64 = 8000.0;
    pub const DEFAULT_MAX_RESULT_COUNT: u32 = 10;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: ApiKey) -> Self {
        Builder {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            radius: Self::DEFAULT_RADIUS,
            max_result_count: Self::DEFAULT_MAX_RESULT_COUNT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Reset the base URI of the Places API, e.g. to point at a proxy.
    pub fn endpoint(&mut self, endpoint: impl Into<String>) -> &mut Self {
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        self.endpoint = endpoint;
        self
    }

    /// Reset the API key.
    pub fn api_key(&mut self, api_key: ApiKey) -> &mut Self {
        self.api_key = api_key;
        self
    }

    /// Set the radius in meters of the circle searched for nearby attractions.
    pub fn radius(&mut self, meters: f64) -> &mut Self {
        self.radius = meters;
        self
    }

    /// Set how many attractions are requested per category. The API accepts 1 to 20.
    pub fn max_result_count(&mut self, count: u32) -> &mut Self {
        self.max_result_count = count;
        self
    }

    /// Set how long a single API call may take when using [`connect`](Builder::connect).
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Creates a `Client` over `service`.
    ///
    /// No timeout is applied; wrap `service` in [`Timeout`](crate::timeout::Timeout)
    /// to bound each call.
    pub fn build<S, B>(&self, service: S) -> Client<S, B> {
        Client::new(
            service,
            Arc::new(Config {
                api_key: self.api_key.clone(),
                endpoint: self.endpoint.clone(),
                radius: self.radius,
                max_result_count: self.max_result_count,
            }),
        )
    }

    /// Creates a `Client` over a `hyper` HTTPS client, with the configured timeout.
    #[cfg(feature = "hyper")]
    #[cfg_attr(docsrs, doc(cfg(feature = "hyper")))]
    pub fn connect(&self) -> crate::hyper::Client {
        let conn = hyper_tls::HttpsConnector::new();
        let client = hyper_pkg::Client::builder().build::<_, hyper_pkg::Body>(conn);
        self.build(crate::timeout::Timeout::new(client, self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let client: Client<(), Vec<u8>> = Builder::new(ApiKey::new("k").unwrap()).build(());
        assert_eq!(client.endpoint(), "https://places.googleapis.com/v1");
        assert_eq!(client.radius(), 8000.0);
        assert_eq!(client.max_result_count(), 10);
    }

    #[test]
    fn endpoint_without_trailing_slash() {
        let client: Client<(), Vec<u8>> = Builder::new(ApiKey::new("k").unwrap())
            .endpoint("http://localhost:8080/v1//")
            .max_result_count(20)
            .build(());
        assert_eq!(client.endpoint(), "http://localhost:8080/v1");
        assert_eq!(client.max_result_count(), 20);
    }
}
