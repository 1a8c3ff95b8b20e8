use std::fmt;
use std::str::FromStr;

use shakmaty::{Chess, Color, EnPassantMode, File, Move, Position, Rank, Square};

use crate::error::PgnError;
use crate::pgn::{self, PgnHeaders, Ply, Replay};

/// Why a finished game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoveRule,
    FivefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::SeventyFiveMoveRule => "75-move rule",
            DrawReason::FivefoldRepetition => "fivefold repetition",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// PGN result marker.
    pub fn result_token(&self) -> &'static str {
        match self {
            GameStatus::InProgress => "*",
            GameStatus::WhiteWins => "1-0",
            GameStatus::BlackWins => "0-1",
            GameStatus::Draw(_) => "1/2-1/2",
        }
    }
}

/// Ordered half-moves from the standard start position.
///
/// A record is only ever built by replaying its moves, so it always holds a
/// legal game. The board is derived during that replay and never changes
/// afterwards; a different game is a different record.
#[derive(Debug, Clone)]
pub struct GameRecord {
    replay: Replay,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRecord {
    /// A fresh game at the initial position.
    pub fn new() -> Self {
        Self {
            replay: Replay::new(),
        }
    }

    /// Build a record from PGN text: bare movetext, movetext with a result
    /// marker, or a full game with tags. Only the first game is read.
    pub fn from_pgn(pgn: &str) -> Result<Self, PgnError> {
        Ok(Self {
            replay: pgn::read_replay(pgn)?,
        })
    }

    pub fn plies(&self) -> &[Ply] {
        &self.replay.plies
    }

    pub fn ply_count(&self) -> usize {
        self.replay.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replay.plies.is_empty()
    }

    /// Current board.
    pub fn position(&self) -> &Chess {
        self.replay.position()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.replay.plies.last().map(|ply| &ply.mv)
    }

    pub fn turn(&self) -> Color {
        self.position().turn()
    }

    pub fn status(&self) -> GameStatus {
        let pos = self.position();

        if pos.is_checkmate() {
            return match pos.turn() {
                Color::White => GameStatus::BlackWins,
                Color::Black => GameStatus::WhiteWins,
            };
        }
        if pos.is_stalemate() {
            return GameStatus::Draw(DrawReason::Stalemate);
        }
        if pos.is_insufficient_material() {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if pos.halfmoves() >= 150 {
            return GameStatus::Draw(DrawReason::SeventyFiveMoveRule);
        }
        if self.repetitions() >= 5 {
            return GameStatus::Draw(DrawReason::FivefoldRepetition);
        }
        GameStatus::InProgress
    }

    /// Numbered movetext without a result marker: `""`, `"1. e4"`, ...
    pub fn movetext(&self) -> String {
        pgn::write_movetext(&self.replay.plies)
    }

    /// Movetext terminated by the result marker, as sent to the remote
    /// service: `"*"` for a new game, `"1. e4 *"` after one move.
    pub fn wire_pgn(&self) -> String {
        let movetext = self.movetext();
        let result = self.status().result_token();
        if movetext.is_empty() {
            result.to_string()
        } else {
            format!("{movetext} {result}")
        }
    }

    /// Complete PGN with the tag roster, suitable for saving.
    pub fn to_pgn(&self, headers: &PgnHeaders) -> String {
        pgn::write_pgn(headers, &self.replay.plies, self.status().result_token())
    }

    /// If this record continues `earlier` move for move, the number of
    /// half-moves it adds. `None` when the two games diverge.
    pub fn extends(&self, earlier: &GameRecord) -> Option<usize> {
        let ours = self.plies();
        let theirs = earlier.plies();
        if ours.len() < theirs.len() {
            return None;
        }
        let shared = ours.iter().zip(theirs).all(|(a, b)| a.mv == b.mv);
        shared.then(|| ours.len() - theirs.len())
    }

    /// How many times the current position has occurred, itself included.
    fn repetitions(&self) -> usize {
        let current = PositionKey::of(self.position());
        self.replay
            .positions
            .iter()
            .filter(|pos| PositionKey::of(pos) == current)
            .count()
    }
}

/// Identity of a position for repetition counting: placement, side to move,
/// castling rights and a legal en passant square.
#[derive(Debug, PartialEq, Eq, Hash)]
struct PositionKey {
    placement: String,
    turn: Color,
    castling: u64,
    ep: Option<Square>,
}

impl PositionKey {
    fn of(pos: &Chess) -> Self {
        let mut placement = String::with_capacity(64);
        for rank in 0..8u32 {
            for file in 0..8u32 {
                let sq = Square::from_coords(File::new(file), Rank::new(rank));
                placement.push(pos.board().piece_at(sq).map_or('.', |p| p.char()));
            }
        }
        Self {
            placement,
            turn: pos.turn(),
            castling: u64::from(pos.castles().castling_rights()),
            ep: pos.ep_square(EnPassantMode::Legal),
        }
    }
}

/// Records are equal when they contain the same moves.
impl PartialEq for GameRecord {
    fn eq(&self, other: &Self) -> bool {
        self.ply_count() == other.ply_count() && self.extends(other) == Some(0)
    }
}

impl Eq for GameRecord {}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.movetext())
    }
}

impl FromStr for GameRecord {
    type Err = PgnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_pgn(s)
    }
}
