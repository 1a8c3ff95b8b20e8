use chess_core::GameRecord;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Endpoint, MoveError};

#[derive(Serialize)]
struct GameRequest<'a> {
    game: &'a str,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    game: &'a str,
    #[serde(rename = "move")]
    move_text: &'a str,
}

/// Body of `/parse` and `/move` replies. The service also echoes `move` and
/// `game_original`; only the updated game is used.
#[derive(Deserialize)]
struct GameUpdatedResponse {
    game_updated: String,
}

#[derive(Deserialize)]
struct AdviceResponse {
    message: String,
}

/// Client for the remote move-interpretation service.
///
/// Each call sends the current game and returns a new value; nothing here
/// holds game state.
pub struct MoveSessionClient {
    client: Client,
    base_url: String,
}

impl MoveSessionClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("llm-chess/0.1")
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Send the player's free-text move. Succeeds only with the current game
    /// plus exactly one legal half-move.
    pub async fn request_move_parse(
        &self,
        current: &GameRecord,
        move_text: &str,
    ) -> Result<GameRecord, MoveError> {
        let game = current.wire_pgn();
        let body = ParseRequest {
            game: &game,
            move_text,
        };
        let resp: GameUpdatedResponse = self.post(Endpoint::Parse, &body).await?;
        continuation(Endpoint::Parse, current, &resp.game_updated)
    }

    /// Ask the remote opponent for its reply to the current game.
    pub async fn request_opponent_move(&self, current: &GameRecord) -> Result<GameRecord, MoveError> {
        let game = current.wire_pgn();
        let resp: GameUpdatedResponse = self
            .post(Endpoint::Move, &GameRequest { game: &game })
            .await?;
        continuation(Endpoint::Move, current, &resp.game_updated)
    }

    /// Free-text advice about the current game.
    pub async fn request_advice(&self, current: &GameRecord) -> Result<String, MoveError> {
        let game = current.wire_pgn();
        let resp: AdviceResponse = self
            .post(Endpoint::Help, &GameRequest { game: &game })
            .await?;
        Ok(resp.message)
    }

    async fn post<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R, MoveError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, "POST");

        let transport = |source| MoveError::Transport { endpoint, source };

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport)?;
        tracing::debug!(%endpoint, %status, bytes = text.len(), "Response received");

        if !status.is_success() {
            tracing::warn!(%endpoint, %status, "Chess service rejected request");
            return Err(MoveError::rejected(
                endpoint,
                format!("HTTP {status}: {}", text.trim()),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(%endpoint, "Malformed response body: {e}");
            MoveError::rejected(endpoint, format!("Malformed response body: {e}"))
        })
    }
}

/// Accept `game_updated` only if it is `current` plus one half-move.
fn continuation(
    endpoint: Endpoint,
    current: &GameRecord,
    game_updated: &str,
) -> Result<GameRecord, MoveError> {
    let updated = GameRecord::from_pgn(game_updated)
        .map_err(|e| MoveError::rejected(endpoint, format!("Unusable game: {e}")))?;

    match updated.extends(current) {
        Some(1) => Ok(updated),
        Some(added) => {
            tracing::warn!(%endpoint, added, "Unexpected number of new half-moves");
            Err(MoveError::rejected(
                endpoint,
                format!("Expected one new half-move, got {added}"),
            ))
        }
        None => {
            tracing::warn!(%endpoint, "Returned game diverges from the current game");
            Err(MoveError::rejected(
                endpoint,
                "Returned game does not continue the current game",
            ))
        }
    }
}
