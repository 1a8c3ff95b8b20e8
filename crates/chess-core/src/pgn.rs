//! PGN reading and writing for game records.
//!
//! Reading goes through a `pgn_reader` visitor that replays every SAN move
//! with shakmaty, so a record can only be built from a legal move sequence.

use std::fmt::Write;
use std::io;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Move, Position};

use crate::error::PgnError;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A single half-move as it was written and as it was played.
#[derive(Debug, Clone)]
pub struct Ply {
    pub san: SanPlus,
    pub mv: Move,
}

/// Moves played so far together with every position they passed through.
/// `positions[0]` is the start position, `positions[i]` follows `plies[i - 1]`.
#[derive(Debug, Clone)]
pub(crate) struct Replay {
    pub plies: Vec<Ply>,
    pub positions: Vec<Chess>,
}

impl Replay {
    pub fn new() -> Self {
        Self {
            plies: Vec::new(),
            positions: vec![Chess::default()],
        }
    }

    pub fn position(&self) -> &Chess {
        // positions always holds at least the start position
        &self.positions[self.positions.len() - 1]
    }

    /// Play one SAN move on the current position.
    pub fn push(&mut self, san_plus: SanPlus) -> Result<(), PgnError> {
        let ply = self.plies.len() + 1;
        let illegal = |reason: String| PgnError::IllegalMove {
            ply,
            san: san_plus.to_string(),
            reason,
        };

        let pos = self.position().clone();
        let mv = san_plus
            .san
            .to_move(&pos)
            .map_err(|e| illegal(e.to_string()))?;
        let next = pos.play(mv.clone()).map_err(|e| illegal(e.to_string()))?;

        self.plies.push(Ply { san: san_plus, mv });
        self.positions.push(next);
        Ok(())
    }
}

/// Tags that decide whether a game can be replayed from the standard start.
#[derive(Default)]
struct StartTags {
    fen: Option<String>,
}

/// Visitor that replays the mainline and stops at the first illegal move.
struct ReplayVisitor;

impl Visitor for ReplayVisitor {
    type Tags = StartTags;
    type Movetext = Replay;
    type Output = Result<Replay, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(StartTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        if name == b"FEN" {
            tags.fen = Some(value.decode_utf8_lossy().trim().to_string());
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        if let Some(fen) = tags.fen {
            if fen != STANDARD_START_FEN {
                return ControlFlow::Break(Err(PgnError::NonStandardStart(fen)));
            }
        }
        ControlFlow::Continue(Replay::new())
    }

    fn begin_variation(&mut self, _movetext: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, replay: &mut Self::Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        match replay.push(san_plus) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => ControlFlow::Break(Err(e)),
        }
    }

    fn end_game(&mut self, replay: Self::Movetext) -> Self::Output {
        Ok(replay)
    }
}

/// Replay the first game found in `pgn`. Empty input is a new game.
pub(crate) fn read_replay(pgn: &str) -> Result<Replay, PgnError> {
    if pgn.trim().is_empty() {
        return Ok(Replay::new());
    }

    let mut reader = Reader::new(io::Cursor::new(pgn.as_bytes()));
    match reader.read_game(&mut ReplayVisitor)? {
        Some(result) => result,
        None => Ok(Replay::new()),
    }
}

/// Numbered movetext without a result marker, e.g. `1. e4 e5 2. Nf3`.
pub fn write_movetext(plies: &[Ply]) -> String {
    let mut out = String::new();
    for (idx, ply) in plies.iter().enumerate() {
        if idx % 2 == 0 {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{}. ", idx / 2 + 1);
        } else {
            out.push(' ');
        }
        let _ = write!(out, "{}", ply.san);
    }
    out
}

/// Seven tag roster, minus `Result` which always comes from the game itself.
#[derive(Debug, Clone)]
pub struct PgnHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            event: "?".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "?".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
        }
    }
}

/// Full PGN: tag section, blank line, movetext terminated by the result.
pub fn write_pgn(headers: &PgnHeaders, plies: &[Ply], result: &str) -> String {
    let mut out = String::new();
    let tags = [
        ("Event", headers.event.as_str()),
        ("Site", headers.site.as_str()),
        ("Date", headers.date.as_str()),
        ("Round", headers.round.as_str()),
        ("White", headers.white.as_str()),
        ("Black", headers.black.as_str()),
        ("Result", result),
    ];
    for (name, value) in tags {
        let _ = writeln!(out, "[{} \"{}\"]", name, escape_tag(value));
    }
    out.push('\n');

    let movetext = write_movetext(plies);
    if !movetext.is_empty() {
        out.push_str(&movetext);
        out.push(' ');
    }
    out.push_str(result);
    out.push('\n');
    out
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
