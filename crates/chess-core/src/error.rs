use thiserror::Error;

#[derive(Debug, Error)]
pub enum PgnError {
    #[error("PGN read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Illegal move '{san}' at ply {ply}: {reason}")]
    IllegalMove {
        ply: usize,
        san: String,
        reason: String,
    },

    #[error("Game does not start from the standard position: {0}")]
    NonStandardStart(String),
}
