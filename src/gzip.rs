//! Decoding of gzip-encoded response bodies.

use http::header::{HeaderMap, HeaderValue, CONTENT_ENCODING};

/// Value of the `Accept-Encoding` header sent with every request, if any.
pub fn accept_encoding() -> Option<HeaderValue> {
    if cfg!(feature = "gzip") {
        Some(HeaderValue::from_static("gzip"))
    } else {
        None
    }
}

pub fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get_all(CONTENT_ENCODING)
        .iter()
        .any(|e| e == "gzip")
}

#[cfg(feature = "gzip")]
pub async fn decode(compressed: &[u8]) -> std::io::Result<Vec<u8>> {
    use async_compression::tokio::bufread::GzipDecoder;
    use tokio::io::AsyncReadExt;

    let mut buf = Vec::with_capacity(compressed.len() * 4);
    GzipDecoder::new(compressed).read_to_end(&mut buf).await?;
    Ok(buf)
}

// Only reachable if a server ignores the absent `Accept-Encoding`.
#[cfg(not(feature = "gzip"))]
pub async fn decode(_: &[u8]) -> std::io::Result<Vec<u8>> {
    Err(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "received a gzip body but the `gzip` feature is disabled",
    ))
}
