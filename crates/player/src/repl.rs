//! Line-oriented game loop: read a command, run it, render the result.

use std::fs;
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chess_core::render::{self, TextStyle};
use chess_core::{GameStatus, PgnHeaders};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Notify;

use crate::clients::MoveSessionClient;
use crate::commands::{parse_command, Command, COMMAND_HELP};
use crate::config::Config;
use crate::session::{Session, TurnError};

/// How the board is shown after each change.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub text: TextStyle,
    /// Board image rewritten after every render
    pub svg_path: Option<PathBuf>,
    pub svg_size: u32,
}

pub fn status_line(status: GameStatus, opponent: &str) -> String {
    let text = match status {
        GameStatus::InProgress => {
            "In progress. Type a move, or /commands for options.".to_string()
        }
        GameStatus::WhiteWins => format!("You won! You are smarter than {opponent}."),
        GameStatus::BlackWins => format!("{opponent} won!"),
        GameStatus::Draw(reason) => format!("Draw by {reason}. Are you a language model?"),
    };
    format!("Game status: {text}")
}

/// Resolve `fut` unless `interrupt` fires first.
async fn interruptible<F: Future>(interrupt: &Notify, fut: F) -> Option<F::Output> {
    tokio::select! {
        out = fut => Some(out),
        () = interrupt.notified() => None,
    }
}

pub struct Repl<W> {
    client: MoveSessionClient,
    session: Session,
    config: Config,
    render: RenderOptions,
    interrupt: Arc<Notify>,
    out: W,
}

impl<W: Write> Repl<W> {
    pub fn new(
        client: MoveSessionClient,
        session: Session,
        config: Config,
        render: RenderOptions,
        out: W,
    ) -> Self {
        Self {
            client,
            session,
            config,
            render,
            interrupt: Arc::new(Notify::new()),
            out,
        }
    }

    /// Notifying this abandons the pending request, or leaves the loop when
    /// waiting at the prompt. The binary wires it to Ctrl-C.
    pub fn interrupt_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.interrupt)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run until `/quit`, end of input, or an interrupt at the prompt.
    /// Input that is not valid UTF-8 is decoded lossily.
    pub async fn run<R>(&mut self, mut input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.render_board()?;
        writeln!(self.out, "{COMMAND_HELP}")?;

        let mut buf = Vec::new();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            buf.clear();
            let read = tokio::select! {
                read = input.read_until(b'\n', &mut buf) => read?,
                () = self.interrupt.notified() => 0,
            };
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            if !self.handle(parse_command(&line)).await? {
                break;
            }
        }

        writeln!(self.out, "Bye.")?;
        Ok(())
    }

    /// Execute one command. Returns `false` when the player quits.
    pub async fn handle(&mut self, command: Command) -> io::Result<bool> {
        match command {
            Command::Move(text) => self.play_move(&text).await?,
            Command::Help => self.advice().await?,
            Command::Retry => {
                let status = self.session.status();
                if self.session.awaiting_opponent() {
                    self.opponent_turn().await?;
                } else if status.is_over() {
                    self.report(&TurnError::GameOver(status))?;
                } else {
                    self.report(&TurnError::NotOpponentsTurn)?;
                }
            }
            Command::New => {
                self.session.reset();
                tracing::info!("New game");
                self.render_board()?;
            }
            Command::Pgn => {
                let record = self.session.record();
                if record.is_empty() {
                    writeln!(self.out, "No moves yet.")?;
                } else {
                    writeln!(self.out, "{}", record.wire_pgn())?;
                }
            }
            Command::Board => self.render_board()?,
            Command::Save(path) => self.save(&path)?,
            Command::Commands => writeln!(self.out, "{COMMAND_HELP}")?,
            Command::Quit => return Ok(false),
            Command::Empty => {}
            Command::Unknown(input) => {
                writeln!(self.out, "Unknown command '{input}'. Type /commands for the list.")?
            }
        }
        Ok(true)
    }

    async fn play_move(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "Parsing your move...")?;
        let pending = self.session.submit_move(&self.client, text);
        let submitted = interruptible(&self.interrupt, pending)
            .await
            .map(|res| res.map(|_| ()));

        match submitted {
            None => {
                writeln!(self.out, "Cancelled. The game is unchanged.")?;
                return Ok(());
            }
            Some(Err(e)) => {
                self.report(&e)?;
                return Ok(());
            }
            Some(Ok(())) => self.render_board()?,
        }

        if self.session.status().is_over() {
            return Ok(());
        }
        self.opponent_turn().await
    }

    async fn opponent_turn(&mut self) -> io::Result<()> {
        writeln!(self.out, "Generating {}'s next move...", self.config.opponent_name)?;
        let pending = self.session.opponent_reply(&self.client);
        let replied = interruptible(&self.interrupt, pending)
            .await
            .map(|res| res.map(|_| ()));

        match replied {
            None => writeln!(
                self.out,
                "Cancelled. Type /retry to ask for the reply again."
            )?,
            Some(Err(e)) => self.report(&e)?,
            Some(Ok(())) => {
                self.render_board()?;
                if !self.session.status().is_over() {
                    writeln!(
                        self.out,
                        "Your move was made and {} responded! Move again.",
                        self.config.opponent_name
                    )?;
                }
            }
        }
        Ok(())
    }

    async fn advice(&mut self) -> io::Result<()> {
        writeln!(self.out, "Analyzing the game...")?;
        match interruptible(&self.interrupt, self.session.advice(&self.client)).await {
            None => writeln!(self.out, "Cancelled.")?,
            Some(Ok(message)) => writeln!(self.out, "\n{}\n", message.trim())?,
            Some(Err(e)) => self.report(&e)?,
        }
        Ok(())
    }

    fn save(&mut self, path: &Path) -> io::Result<()> {
        let headers = PgnHeaders {
            event: "Casual game".to_string(),
            site: self.config.api_url.clone(),
            date: chrono::Local::now().format("%Y.%m.%d").to_string(),
            round: "-".to_string(),
            white: "Human".to_string(),
            black: self.config.opponent_name.clone(),
        };
        let pgn = self.session.record().to_pgn(&headers);

        match fs::write(path, pgn) {
            Ok(()) => writeln!(self.out, "Saved to {}", path.display()),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to save game: {e}");
                writeln!(self.out, "Could not save to {}: {e}", path.display())
            }
        }
    }

    fn report(&mut self, err: &TurnError) -> io::Result<()> {
        let opponent = &self.config.opponent_name;
        let message = match err {
            TurnError::EmptyMove => err.to_string(),
            TurnError::GameOver(status) => format!(
                "{} Type /new to play again.",
                status_line(*status, opponent)
            ),
            TurnError::NotYourTurn => {
                format!("Waiting for {opponent} to move. Type /retry to ask for the reply.")
            }
            TurnError::NotOpponentsTurn => "It is your move.".to_string(),
            TurnError::Move(e) => {
                tracing::debug!(endpoint = %e.endpoint(), "Turn failed: {e}");
                e.user_message(opponent)
            }
        };
        writeln!(self.out, "{message}")
    }

    fn render_board(&mut self) -> io::Result<()> {
        let record = self.session.record();
        let board = render::text_board(record, &self.render.text);
        let status = status_line(record.status(), &self.config.opponent_name);

        if let Some(path) = &self.render.svg_path {
            let svg = render::svg_board(record, self.render.svg_size);
            if let Err(e) = fs::write(path, svg) {
                tracing::warn!(path = %path.display(), "Failed to write board image: {e}");
            }
        }

        writeln!(self.out, "\n{board}\n{status}")
    }
}
