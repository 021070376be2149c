//! Type aliases for use with `hyper` crate's HTTP client.

use hyper_pkg::client::HttpConnector;
use hyper_tls::HttpsConnector;

use crate::timeout::Timeout;

/// The HTTP client service built by [`Builder::connect`](crate::Builder::connect).
pub type Service = Timeout<hyper_pkg::Client<HttpsConnector<HttpConnector>>>;
pub type Client = crate::Client<Service, hyper_pkg::Body>;
pub type Error = crate::Error<crate::timeout::Error<hyper_pkg::Error>>;
pub type Session<N> = crate::Session<Service, hyper_pkg::Body, N>;
