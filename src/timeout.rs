//! A deadline for whole API calls.

use std::error;
use std::fmt::{self, Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::ready;
use http::{HeaderMap, Response};
use pin_project_lite::pin_project;
use tokio::time::{Instant, Sleep};
use tower_service::Service;

/// Wraps an HTTP client service so that each call, including reading the response body,
/// fails with [`Error::Elapsed`] once `timeout` has passed.
///
/// The deadline is armed in `call`, which must run inside a Tokio runtime.
#[derive(Clone, Debug)]
pub struct Timeout<S> {
    inner: S,
    timeout: Duration,
}

pin_project! {
    pub struct ResponseFuture<F> {
        #[pin]
        inner: F,
        #[pin]
        sleep: Sleep,
    }
}

pin_project! {
    /// A response body sharing the deadline of the call that produced it.
    pub struct Body<B> {
        #[pin]
        inner: B,
        #[pin]
        sleep: Sleep,
    }
}

#[derive(Debug)]
pub enum Error<E> {
    Inner(E),
    Elapsed,
}

impl<S> Timeout<S> {
    pub fn new(service: S, timeout: Duration) -> Self {
        Timeout {
            inner: service,
            timeout,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<S, T, B> Service<T> for Timeout<S>
where
    S: Service<T, Response = Response<B>>,
{
    type Response = Response<Body<B>>;
    type Error = Error<S::Error>;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Error::Inner)
    }

    fn call(&mut self, req: T) -> Self::Future {
        ResponseFuture {
            inner: self.inner.call(req),
            sleep: tokio::time::sleep(self.timeout),
        }
    }
}

impl<F, B, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<Body<B>>, Error<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        if let Poll::Ready(result) = this.inner.poll(cx) {
            let deadline: Instant = this.sleep.deadline();
            return Poll::Ready(result.map_err(Error::Inner).map(|res| {
                let (parts, body) = res.into_parts();
                let body = Body {
                    inner: body,
                    sleep: tokio::time::sleep_until(deadline),
                };
                Response::from_parts(parts, body)
            }));
        }

        ready!(this.sleep.poll(cx));
        Poll::Ready(Err(Error::Elapsed))
    }
}

impl<B: http_body::Body> http_body::Body for Body<B> {
    type Data = B::Data;
    type Error = Error<B::Error>;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        let this = self.project();

        if let Poll::Ready(o) = this.inner.poll_data(cx) {
            return Poll::Ready(o.map(|r| r.map_err(Error::Inner)));
        }

        this.sleep.poll(cx).map(|()| Some(Err(Error::Elapsed)))
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<HeaderMap>, Self::Error>> {
        let this = self.project();

        if let Poll::Ready(r) = this.inner.poll_trailers(cx) {
            return Poll::Ready(r.map_err(Error::Inner));
        }

        this.sleep.poll(cx).map(|()| Err(Error::Elapsed))
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }
}

impl<E: error::Error + 'static> error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Inner(ref e) => Some(e),
            Error::Elapsed => None,
        }
    }
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Inner(ref e) => Display::fmt(e, f),
            Error::Elapsed => f.write_str("request timed out"),
        }
    }
}
