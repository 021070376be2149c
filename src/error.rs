//! Error types

pub use http::Error as RequestError;
pub use serde_json::Error as JsonError;

use std::env;
use std::error;
use std::fmt::{self, Display, Formatter};
use std::io;

use http::header::InvalidHeaderValue;

use crate::types::StatusCode;

pub(crate) type BoxError = Box<dyn error::Error + Send + Sync>;

/// An error occurred while talking to the Places API.
#[derive(Debug)]
pub enum Error<E> {
    /// An error from the underlying HTTP client service.
    Service(E),
    /// The API responded with an unexpected HTTP status.
    Http(StatusCode),
    /// The request could not be built, e.g. a photo name that is not a valid URI path.
    Request(RequestError),
    /// An error occured while reading the response body.
    Body(BoxError),
    /// An error occured while decoding gzip stream from the server.
    Gzip(io::Error),
    /// The response body was not the expected JSON.
    Json(JsonError),
    /// A photo media response carried neither a redirect target nor a `photoUri`.
    MissingRedirect,
}

/// The API key could not be loaded.
///
/// Applications treat this as fatal at startup.
#[derive(Debug)]
pub enum ApiKeyError {
    /// The environment variable is not set or is not unicode.
    Missing(&'static str, env::VarError),
    /// The key is an empty string.
    Empty,
    /// The key contains characters that cannot be sent in an HTTP header.
    Invalid(InvalidHeaderValue),
}

/// Failure while reading a response body, before it is tied to a service error type.
#[derive(Debug)]
pub(crate) enum BodyError {
    Read(BoxError),
    Gzip(io::Error),
}

impl<E> Error<E> {
    /// Returns the HTTP status if the API rejected the request.
    pub fn status(&self) -> Option<StatusCode> {
        match *self {
            Error::Http(status) => Some(status),
            _ => None,
        }
    }
}

impl<E: error::Error + 'static> error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use Error::*;

        match *self {
            Service(ref e) => Some(e),
            Http(_) | MissingRedirect => None,
            Request(ref e) => Some(e),
            Body(ref e) => Some(&**e),
            Gzip(ref e) => Some(e),
            Json(ref e) => Some(e),
        }
    }
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Error::*;

        match *self {
            Service(ref e) => Display::fmt(e, f),
            Http(ref code) => Display::fmt(code, f),
            Request(ref e) => Display::fmt(e, f),
            Body(ref e) => Display::fmt(e, f),
            Gzip(ref e) => Display::fmt(e, f),
            Json(ref e) => Display::fmt(e, f),
            MissingRedirect => f.write_str("photo response did not contain an image URL"),
        }
    }
}

impl<E> From<BodyError> for Error<E> {
    fn from(e: BodyError) -> Self {
        match e {
            BodyError::Read(e) => Error::Body(e),
            BodyError::Gzip(e) => Error::Gzip(e),
        }
    }
}

impl<E> From<JsonError> for Error<E> {
    fn from(e: JsonError) -> Self {
        Error::Json(e)
    }
}

impl<E> From<RequestError> for Error<E> {
    fn from(e: RequestError) -> Self {
        Error::Request(e)
    }
}

impl error::Error for ApiKeyError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ApiKeyError::Missing(_, ref e) => Some(e),
            ApiKeyError::Empty => None,
            ApiKeyError::Invalid(ref e) => Some(e),
        }
    }
}

impl Display for ApiKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ApiKeyError::Missing(var, ref e) => write!(f, "missing API key `{}`: {}", var, e),
            ApiKeyError::Empty => f.write_str("API key is empty"),
            ApiKeyError::Invalid(ref e) => write!(f, "invalid API key: {}", e),
        }
    }
}
