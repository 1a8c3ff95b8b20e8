//! Per-player game session.

use chess_core::{GameRecord, GameStatus};
use chess_core::shakmaty::Color;
use thiserror::Error;

use crate::clients::MoveSessionClient;
use crate::error::MoveError;

/// The human always plays White; the remote model plays Black.
pub const HUMAN: Color = Color::White;

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Please enter a move.")]
    EmptyMove,

    #[error("The game is over ({})", .0.result_token())]
    GameOver(GameStatus),

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("It is not the opponent's turn")]
    NotOpponentsTurn,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Owns the authoritative game record for one player.
///
/// The record is replaced only after a remote round-trip has fully
/// succeeded; any error leaves it untouched.
#[derive(Debug, Default)]
pub struct Session {
    record: GameRecord,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: GameRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn status(&self) -> GameStatus {
        self.record.status()
    }

    /// Whether the next half-move belongs to the remote opponent.
    pub fn awaiting_opponent(&self) -> bool {
        !self.status().is_over() && self.record.turn() != HUMAN
    }

    pub fn reset(&mut self) {
        self.record = GameRecord::new();
    }

    /// Have the service interpret `move_text` and play it for the human.
    pub async fn submit_move(
        &mut self,
        client: &MoveSessionClient,
        move_text: &str,
    ) -> Result<&GameRecord, TurnError> {
        let move_text = move_text.trim();
        if move_text.is_empty() {
            return Err(TurnError::EmptyMove);
        }
        self.ensure_in_progress()?;
        if self.record.turn() != HUMAN {
            return Err(TurnError::NotYourTurn);
        }

        let updated = client.request_move_parse(&self.record, move_text).await?;
        self.record = updated;
        Ok(&self.record)
    }

    /// Have the remote opponent play its half-move.
    pub async fn opponent_reply(
        &mut self,
        client: &MoveSessionClient,
    ) -> Result<&GameRecord, TurnError> {
        self.ensure_in_progress()?;
        if self.record.turn() == HUMAN {
            return Err(TurnError::NotOpponentsTurn);
        }

        let updated = client.request_opponent_move(&self.record).await?;
        self.record = updated;
        Ok(&self.record)
    }

    pub async fn advice(&self, client: &MoveSessionClient) -> Result<String, TurnError> {
        Ok(client.request_advice(&self.record).await?)
    }

    fn ensure_in_progress(&self) -> Result<(), TurnError> {
        match self.record.status() {
            GameStatus::InProgress => Ok(()),
            finished => Err(TurnError::GameOver(finished)),
        }
    }
}
