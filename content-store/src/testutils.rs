//! In-process stand-in for the GitHub contents API.

use crate::VersionToken;
use crate::codec::{decode_content, encode_content};
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const BRANCH: &str = "main";

struct MockFile {
    text: String,
    revision: u64,
}

impl MockFile {
    fn sha(&self) -> String {
        format!("sha-{}", self.revision)
    }
}

#[derive(Default)]
struct MockState {
    files: HashMap<String, MockFile>,
    token: String,
    requests: usize,
    last_commit: Option<(String, String)>,
}

#[derive(Deserialize)]
struct UpdateBody {
    message: String,
    content: String,
    sha: String,
    branch: String,
}

pub struct MockGithub {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

impl MockGithub {
    pub async fn spawn(token: &str, files: &[(&str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(Mutex::new(MockState {
            files: files
                .iter()
                .map(|(path, text)| {
                    let file = MockFile {
                        text: text.to_string(),
                        revision: 1,
                    };
                    (path.to_string(), file)
                })
                .collect(),
            token: token.to_string(),
            ..MockState::default()
        }));

        let server_state = state.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let state = server_state.clone();

                tokio::spawn(async move {
                    let svc = service_fn(move |req| handle(state.clone(), req));
                    let _ = Builder::new(TokioExecutor::new())
                        .serve_connection(TokioIo::new(stream), svc)
                        .await;
                });
            }
        });

        MockGithub { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn text(&self, path: &str) -> String {
        self.state.lock().unwrap().files[path].text.clone()
    }

    pub fn version(&self, path: &str) -> VersionToken {
        VersionToken::new(self.state.lock().unwrap().files[path].sha())
    }

    pub fn requests(&self) -> usize {
        self.state.lock().unwrap().requests
    }

    /// Message and branch of the most recent accepted update.
    pub fn last_commit(&self) -> Option<(String, String)> {
        self.state.lock().unwrap().last_commit.clone()
    }
}

fn json_response(status: StatusCode, value: serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(value.to_string())));
    *response.status_mut() = status;
    response
}

// The real API wraps base64 content at 60 columns
fn wrap_lines(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| format!("{}\n", String::from_utf8_lossy(chunk)))
        .collect()
}

async fn handle(
    state: Arc<Mutex<MockState>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();

    let mut state = state.lock().unwrap();
    state.requests += 1;

    let authorized = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", state.token).as_str());
    if !authorized {
        return Ok(json_response(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"message": "Bad credentials"}),
        ));
    }
    if !parts.headers.contains_key(http::header::USER_AGENT) {
        return Ok(json_response(
            StatusCode::FORBIDDEN,
            serde_json::json!({"message": "User-Agent required"}),
        ));
    }

    // /repos/{owner}/{name}/contents/{path}
    let file_path = parts
        .uri
        .path()
        .strip_prefix("/repos/")
        .and_then(|rest| rest.splitn(4, '/').nth(3).map(String::from));
    let not_found = || {
        json_response(
            StatusCode::NOT_FOUND,
            serde_json::json!({"message": "Not Found"}),
        )
    };
    let Some(file_path) = file_path else {
        return Ok(not_found());
    };

    match parts.method {
        Method::GET => {
            let on_branch = parts
                .uri
                .query()
                .is_some_and(|q| q.split('&').any(|pair| pair == format!("ref={BRANCH}")));
            match state.files.get(&file_path) {
                Some(file) if on_branch => Ok(json_response(
                    StatusCode::OK,
                    serde_json::json!({
                        "type": "file",
                        "encoding": "base64",
                        "path": file_path,
                        "sha": file.sha(),
                        "content": wrap_lines(&encode_content(&file.text)),
                    }),
                )),
                _ => Ok(not_found()),
            }
        }
        Method::PUT => {
            let Ok(update) = serde_json::from_slice::<UpdateBody>(&body) else {
                return Ok(json_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    serde_json::json!({"message": "Invalid request"}),
                ));
            };
            if update.branch != BRANCH {
                return Ok(not_found());
            }
            let Ok(text) = decode_content(&update.content) else {
                return Ok(json_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    serde_json::json!({"message": "content is not valid Base64"}),
                ));
            };
            let Some(file) = state.files.get_mut(&file_path) else {
                return Ok(not_found());
            };
            if file.sha() != update.sha {
                return Ok(json_response(
                    StatusCode::CONFLICT,
                    serde_json::json!({"message": format!("{file_path} does not match {}", update.sha)}),
                ));
            }

            file.text = text;
            file.revision += 1;
            let sha = file.sha();
            state.last_commit = Some((update.message, update.branch));

            Ok(json_response(
                StatusCode::OK,
                serde_json::json!({"content": {"path": file_path, "sha": sha}}),
            ))
        }
        _ => Ok(json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            serde_json::json!({"message": "Method not allowed"}),
        )),
    }
}
