use crate::errors::ArtistsError;
use crate::metrics_defs::REQUEST_DURATION;
use crate::service::ArtistService;
use http::Method;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Body, Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use shared::headers::{add_cors_headers, add_json_content_type};
use shared::histogram;
use shared::http::make_boxed_error_response;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

pub type HandlerBody = BoxBody<Bytes, ArtistsError>;

const ARTISTS_PATH: &str = "/artists";

/// Body of `POST` and `DELETE` requests.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtistRequest {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Serialize)]
struct ArtistsResponse<'a> {
    artists: &'a [String],
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Preflight,
    List,
    Add,
    Remove,
    Unsupported,
}

impl Operation {
    fn classify(method: &Method, path: &str) -> Self {
        match (method, path) {
            (&Method::OPTIONS, _) => Operation::Preflight,
            (&Method::GET, ARTISTS_PATH) => Operation::List,
            (&Method::POST, ARTISTS_PATH) => Operation::Add,
            (&Method::DELETE, ARTISTS_PATH) => Operation::Remove,
            _ => Operation::Unsupported,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Operation::Preflight => "preflight",
            Operation::List => "list",
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::Unsupported => "unsupported",
        }
    }
}

/// HTTP front end for [`ArtistService`].
pub struct ArtistsApi {
    service: Arc<ArtistService>,
}

impl ArtistsApi {
    pub fn new(service: Arc<ArtistService>) -> Self {
        Self { service }
    }
}

impl Service<Request<Incoming>> for ArtistsApi {
    type Response = Response<HandlerBody>;
    type Error = ArtistsError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.service.clone();
        Box::pin(async move { Ok(handle(&service, req).await) })
    }
}

/// Answers one request. Failures become JSON error responses, so this never
/// fails itself.
pub async fn handle<B>(service: &ArtistService, req: Request<B>) -> Response<HandlerBody>
where
    B: Body,
    B::Error: Display,
{
    let start = Instant::now();
    let operation = Operation::classify(req.method(), req.uri().path());
    tracing::debug!(operation = operation.as_str(), "Dispatching request");

    let mut response = match dispatch(service, operation, req).await {
        Ok(response) => response,
        Err(e) => error_response(operation, e),
    };
    add_cors_headers(response.headers_mut());

    histogram!(
        REQUEST_DURATION,
        "operation" => operation.as_str(),
        "status" => response.status().as_str().to_owned()
    )
    .record(start.elapsed().as_secs_f64());

    response
}

async fn dispatch<B>(
    service: &ArtistService,
    operation: Operation,
    req: Request<B>,
) -> Result<Response<HandlerBody>, ArtistsError>
where
    B: Body,
    B::Error: Display,
{
    if operation == Operation::Preflight {
        let mut response = Response::new(Empty::new().map_err(|e| match e {}).boxed());
        *response.status_mut() = StatusCode::NO_CONTENT;
        return Ok(response);
    }

    // Without a credential nothing else can be served
    service.check_ready()?;

    match operation {
        Operation::List => {
            let artists = service.list().await?;
            json_response(StatusCode::OK, &artists)
        }
        Operation::Add => {
            let name = read_name(req).await?;
            let mutation = service.add(&name).await?;
            json_response(
                StatusCode::OK,
                &ArtistsResponse {
                    artists: mutation.artists.as_slice(),
                    message: mutation.outcome.message(),
                },
            )
        }
        Operation::Remove => {
            let name = read_name(req).await?;
            let mutation = service.remove(&name).await?;
            json_response(
                StatusCode::OK,
                &ArtistsResponse {
                    artists: mutation.artists.as_slice(),
                    message: mutation.outcome.message(),
                },
            )
        }
        Operation::Preflight | Operation::Unsupported => Err(ArtistsError::RouteNotFound),
    }
}

/// Reads the `name` field from a JSON request body. A missing or null name
/// comes back empty and is rejected by validation.
async fn read_name<B>(req: Request<B>) -> Result<String, ArtistsError>
where
    B: Body,
    B::Error: Display,
{
    let bytes = req
        .into_body()
        .collect()
        .await
        .map_err(|e| ArtistsError::RequestBody(e.to_string()))?
        .to_bytes();

    let body: ArtistRequest = serde_json::from_slice(&bytes)
        .map_err(|e| ArtistsError::RequestBody(e.to_string()))?;
    Ok(body.name.unwrap_or_default())
}

fn json_response<T: Serialize>(
    status: StatusCode,
    value: &T,
) -> Result<Response<HandlerBody>, ArtistsError> {
    let bytes = serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(ArtistsError::ResponseSerialization)?;

    let mut response = Response::new(Full::new(bytes).map_err(|e| match e {}).boxed());
    *response.status_mut() = status;
    add_json_content_type(response.headers_mut());
    Ok(response)
}

fn error_response(operation: Operation, error: ArtistsError) -> Response<HandlerBody> {
    let status = error.status();
    match status {
        StatusCode::NOT_FOUND => {
            tracing::warn!(operation = operation.as_str(), "No route matched")
        }
        s if s.is_server_error() => {
            tracing::error!(operation = operation.as_str(), error = %error, "Request failed")
        }
        _ => tracing::debug!(operation = operation.as_str(), error = %error, "Request rejected"),
    }

    let body = ErrorResponse {
        error: error.to_string(),
    };
    json_response(status, &body).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize error response");
        make_boxed_error_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}
