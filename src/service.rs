//! The HTTP client abstraction `Client` is generic over.

use std::future::Future;
use std::task::{Context, Poll};

use http::{Request, Response};
use http_body::Body;
use tower_service::Service;

use private::Sealed;

/// An HTTP client (like [`hyper::Client`](hyper_pkg::client::Client)).
///
/// Implemented for every [`tower_service::Service`] taking `Request<B>` and
/// responding with a `Response`. Unlike `Service`, the future of a call is
/// known to resolve to a `Response<Self::ResponseBody>`, so code generic over
/// the client can take the response apart.
pub trait HttpService<B>: Sealed<B> {
    /// Body of the responses given by the service.
    type ResponseBody: Body;
    type Error;
    type Future: Future<Output = Result<Response<Self::ResponseBody>, Self::Error>>;

    /// See [`Service::poll_ready`].
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>>;

    /// See [`Service::call`].
    fn call(&mut self, req: Request<B>) -> Self::Future;
}

impl<S, ReqB, ResB> HttpService<ReqB> for S
where
    S: Service<Request<ReqB>, Response = Response<ResB>> + ?Sized,
    ResB: Body,
{
    type ResponseBody = ResB;
    type Error = <S as Service<Request<ReqB>>>::Error;
    type Future = <S as Service<Request<ReqB>>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Service::poll_ready(self, cx)
    }

    fn call(&mut self, req: Request<ReqB>) -> Self::Future {
        Service::call(self, req)
    }
}

mod private {
    use http::{Request, Response};
    use http_body::Body;
    use tower_service::Service;

    pub trait Sealed<B> {}

    impl<S, ReqB, ResB> Sealed<ReqB> for S
    where
        S: Service<Request<ReqB>, Response = Response<ResB>> + ?Sized,
        ResB: Body,
    {
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use futures::executor::block_on;
    use futures::future;

    use super::*;

    async fn status_of<S: HttpService<Vec<u8>>>(mut service: S) -> Result<u16, S::Error> {
        future::poll_fn(|cx| service.poll_ready(cx)).await?;
        let res = service.call(Request::new(Vec::new())).await?;
        Ok(res.status().as_u16())
    }

    #[test]
    fn any_http_service_is_a_client() {
        let service = tower::service_fn(|req: Request<Vec<u8>>| {
            assert!(req.body().is_empty());
            future::ok::<_, Infallible>(Response::new(hyper_pkg::Body::empty()))
        });
        assert_eq!(block_on(status_of(service)), Ok(200));
    }
}
