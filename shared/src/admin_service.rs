use crate::http::make_boxed_error_response;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

type AdminBody = BoxBody<Bytes, Infallible>;

/// Health and readiness probes for the admin listener.
///
/// `/health` answers as long as the process is serving. `/ready` asks the
/// readiness check on every call and reports its failure reason with a 503.
pub struct AdminService<F> {
    readiness: F,
}

impl<F> AdminService<F>
where
    F: Fn() -> Result<(), String>,
{
    pub fn new(readiness: F) -> Self {
        Self { readiness }
    }

    fn respond(&self, method: &Method, path: &str) -> Response<AdminBody> {
        if method != Method::GET && method != Method::HEAD {
            return make_boxed_error_response(StatusCode::METHOD_NOT_ALLOWED);
        }

        match path {
            "/health" => text_response(StatusCode::OK, "ok"),
            "/ready" => match (self.readiness)() {
                Ok(()) => text_response(StatusCode::OK, "ok"),
                Err(reason) => {
                    tracing::debug!(reason = %reason, "Not ready");
                    text_response(StatusCode::SERVICE_UNAVAILABLE, &reason)
                }
            },
            _ => make_boxed_error_response(StatusCode::NOT_FOUND),
        }
    }
}

fn text_response(status: StatusCode, text: &str) -> Response<AdminBody> {
    let mut response = Response::new(Full::new(Bytes::from(format!("{text}\n"))).boxed());
    *response.status_mut() = status;
    response
}

impl<F, B> Service<Request<B>> for AdminService<F>
where
    F: Fn() -> Result<(), String> + Send + Sync + 'static,
{
    type Response = Response<AdminBody>;
    type Error = std::io::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let response = self.respond(req.method(), req.uri().path());
        Box::pin(async move { Ok(response) })
    }
}
