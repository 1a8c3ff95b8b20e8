use std::path::PathBuf;

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free-text move description
    Move(String),
    /// Ask for advice
    Help,
    /// Start a fresh game
    New,
    /// Print the game record
    Pgn,
    /// Re-render the board
    Board,
    /// Ask the opponent for its reply again
    Retry,
    /// Write the full PGN to a file
    Save(PathBuf),
    /// List commands
    Commands,
    Quit,
    Empty,
    Unknown(String),
}

pub const COMMAND_HELP: &str = "\
Type a move in plain words, e.g. \"Pawn to e4\", \"bishop takes queen at h8\",
\"Pawn on c-file takes pawn at b5\" or \"Knight to d5\".

  /help          advice on the current position
  /board         show the board again
  /pgn           print the game so far
  /save <path>   write the game to a PGN file
  /retry         ask the opponent to reply again
  /new           start a new game
  /commands      show this list
  /quit          leave
";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Move(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "help" | "hint" => Command::Help,
        "new" | "restart" => Command::New,
        "pgn" => Command::Pgn,
        "board" => Command::Board,
        "retry" => Command::Retry,
        "save" if !arg.is_empty() => Command::Save(PathBuf::from(arg)),
        "commands" | "?" => Command::Commands,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}
