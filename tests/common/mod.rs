//! In-process stand-in for the remote chess service.
//!
//! Each endpoint answers from its own queue of scripted replies and records
//! every request it receives.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use player::clients::MoveSessionClient;
use player::config::Config;
use serde_json::{json, Value};

pub enum Reply {
    Json(Value),
    Raw(StatusCode, String),
    /// Never answer within any reasonable test timeout
    Hang,
}

/// `{"game_updated": pgn}` plus the fields the real service echoes back.
pub fn game_updated(original: &str, mv: &str, updated: &str) -> Reply {
    Reply::Json(json!({
        "move": mv,
        "game_original": original,
        "game_updated": updated,
    }))
}

pub fn advice(message: &str) -> Reply {
    Reply::Json(json!({ "message": message, "reference_info": "" }))
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub endpoint: &'static str,
    pub content_type: String,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    parse: VecDeque<Reply>,
    moves: VecDeque<Reply>,
    help: VecDeque<Reply>,
    requests: Vec<Recorded>,
}

impl MockState {
    fn queue(&mut self, endpoint: &str) -> &mut VecDeque<Reply> {
        match endpoint {
            "/parse" => &mut self.parse,
            "/move" => &mut self.moves,
            _ => &mut self.help,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockService {
    state: Arc<Mutex<MockState>>,
}

impl MockService {
    pub fn on_parse(&self, reply: Reply) -> &Self {
        self.state.lock().unwrap().parse.push_back(reply);
        self
    }

    pub fn on_move(&self, reply: Reply) -> &Self {
        self.state.lock().unwrap().moves.push_back(reply);
        self
    }

    pub fn on_help(&self, reply: Reply) -> &Self {
        self.state.lock().unwrap().help.push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }

    /// Serve on an ephemeral local port; returns the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/parse", post(parse))
            .route("/move", post(make_move))
            .route("/help", post(help))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn parse(State(mock): State<MockService>, headers: HeaderMap, body: String) -> Response {
    respond(mock, "/parse", headers, body).await
}

async fn make_move(State(mock): State<MockService>, headers: HeaderMap, body: String) -> Response {
    respond(mock, "/move", headers, body).await
}

async fn help(State(mock): State<MockService>, headers: HeaderMap, body: String) -> Response {
    respond(mock, "/help", headers, body).await
}

async fn respond(
    mock: MockService,
    endpoint: &'static str,
    headers: HeaderMap,
    body: String,
) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);

    let reply = {
        let mut state = mock.state.lock().unwrap();
        state.requests.push(Recorded {
            endpoint,
            content_type,
            body,
        });
        state.queue(endpoint).pop_front()
    };

    match reply {
        Some(Reply::Json(value)) => Json(value).into_response(),
        Some(Reply::Raw(status, text)) => (status, text).into_response(),
        Some(Reply::Hang) => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no scripted reply").into_response(),
    }
}

pub fn config(base_url: &str) -> Config {
    Config {
        api_url: base_url.to_string(),
        request_timeout: Duration::from_secs(10),
        opponent_name: "LLaMA 3".to_string(),
    }
}

pub fn client(base_url: &str) -> MoveSessionClient {
    MoveSessionClient::new(&config(base_url)).unwrap()
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
