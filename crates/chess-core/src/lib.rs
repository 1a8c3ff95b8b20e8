//! Game records and board rendering for the terminal chess front-end.

pub use shakmaty;

pub mod error;
pub mod game_record;
pub mod pgn;
pub mod render;

pub use error::PgnError;
pub use game_record::{DrawReason, GameRecord, GameStatus};
pub use pgn::{PgnHeaders, Ply};
