use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use futures_util::future;
use futures_util::stream::{Stream, TryStreamExt};
use http::header::HeaderMap;
use http_body::Body;
use pin_project_lite::pin_project;

use crate::error::{BodyError, BoxError};
use crate::gzip;

/// Creates an enum with `AsRef<str>`, `Display` and `Serialize` impls
/// mapping each variant to its wire representation.
macro_rules! str_enum {
    (
        $(#[$attr:meta])*
        pub enum $E:ident {
            $(
                $(#[$v_attr:meta])*
                $V:ident = $by:expr
            ),*$(,)?
        }
    ) => {
        $(#[$attr])*
        pub enum $E {
            $(
                $(#[$v_attr])*
                $V,
            )*
        }

        impl $E {
            /// All the variants, in declaration order.
            pub const ALL: &'static [$E] = &[$($E::$V),*];
        }

        impl std::convert::AsRef<str> for $E {
            fn as_ref(&self) -> &str {
                match *self {
                    $($E::$V => $by,)*
                }
            }
        }

        impl std::fmt::Display for $E {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(std::convert::AsRef::<str>::as_ref(self))
            }
        }

        impl ::serde::Serialize for $E {
            fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(std::convert::AsRef::<str>::as_ref(self))
            }
        }
    }
}

pin_project! {
    /// Wraps `http_body::Body` to make it a `Stream`.
    pub(crate) struct HttpBodyAsStream<B> {
        #[pin]
        pub inner: B,
    }
}

impl<B: Body> HttpBodyAsStream<B> {
    pub fn new(inner: B) -> Self {
        HttpBodyAsStream { inner }
    }
}

impl<B> Stream for HttpBodyAsStream<B>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    type Item = Result<Bytes, BodyError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_data(cx).map(|opt| {
            opt.map(|result| {
                result
                    .map(|mut buf| buf.copy_to_bytes(buf.remaining()))
                    .map_err(|e| BodyError::Read(e.into()))
            })
        })
    }
}

/// Reads a whole response body, decoding it first if the server gzipped it.
pub(crate) async fn read_body<B>(headers: &HeaderMap, body: B) -> Result<Vec<u8>, BodyError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let buf = HttpBodyAsStream::new(body)
        .try_fold(Vec::new(), |mut buf, chunk| {
            buf.extend_from_slice(&chunk);
            future::ready(Ok(buf))
        })
        .await?;

    if gzip::is_gzip(headers) {
        gzip::decode(&buf).await.map_err(BodyError::Gzip)
    } else {
        Ok(buf)
    }
}
