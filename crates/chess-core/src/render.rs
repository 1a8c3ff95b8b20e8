//! Board rendering. Every function here is a pure function of the record.

use std::fmt::Write;

use shakmaty::{Color, File, Move, Piece, Position, Rank, Role, Square};

use crate::game_record::GameRecord;

const LIGHT_SQUARE: &str = "#f0d9b5";
const DARK_SQUARE: &str = "#b58863";
const LIGHT_HIGHLIGHT: &str = "#cdd26a";
const DARK_HIGHLIGHT: &str = "#aaa23a";
const MARGIN_RATIO: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceStyle {
    /// `K Q R B N P` for White, lowercase for Black.
    #[default]
    Ascii,
    /// Chess glyphs.
    Unicode,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextStyle {
    pub pieces: PieceStyle,
}

fn square_at(file: u32, rank: u32) -> Square {
    Square::from_coords(File::new(file), Rank::new(rank))
}

fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

fn file_char(file: u32) -> char {
    char::from(b'a' + file as u8)
}

/// Text board with White at the bottom and coordinates on two sides.
pub fn text_board(record: &GameRecord, style: &TextStyle) -> String {
    let board = record.position().board();
    let mut out = String::new();

    for rank in (0..8u32).rev() {
        let _ = write!(out, "{} ", rank + 1);
        for file in 0..8u32 {
            let c = match board.piece_at(square_at(file, rank)) {
                Some(piece) => match style.pieces {
                    PieceStyle::Ascii => piece.char(),
                    PieceStyle::Unicode => glyph(piece),
                },
                None => '.',
            };
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }

    out.push_str("  ");
    for file in 0..8u32 {
        out.push(' ');
        out.push(file_char(file));
    }
    out.push('\n');
    out
}

/// Squares touched by the last move, for highlighting. Castling shows the
/// king's origin and destination, not the rook square shakmaty moves to.
fn last_move_squares(record: &GameRecord) -> Vec<Square> {
    match record.last_move() {
        Some(&Move::Castle { king, rook }) => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            vec![Square::from_coords(file, king.rank()), king]
        }
        Some(mv) => {
            let mut squares = vec![mv.to()];
            if let Some(from) = mv.from() {
                squares.push(from);
            }
            squares
        }
        None => Vec::new(),
    }
}

/// Standalone SVG image of the board, `size` pixels square, White at the
/// bottom and the last move highlighted.
pub fn svg_board(record: &GameRecord, size: u32) -> String {
    let size = size.max(64) as f32;
    let margin = size * MARGIN_RATIO;
    let cell = (size - 2.0 * margin) / 8.0;
    let board = record.position().board();
    let highlighted = last_move_squares(record);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(svg, r##"<rect x="0" y="0" width="{size}" height="{size}" fill="#212121"/>"##);

    for rank in 0..8u32 {
        for file in 0..8u32 {
            let sq = square_at(file, rank);
            let x = margin + file as f32 * cell;
            let y = margin + (7 - rank) as f32 * cell;
            let dark = (file + rank) % 2 == 0;
            let fill = match (dark, highlighted.contains(&sq)) {
                (true, true) => DARK_HIGHLIGHT,
                (true, false) => DARK_SQUARE,
                (false, true) => LIGHT_HIGHLIGHT,
                (false, false) => LIGHT_SQUARE,
            };
            let _ = writeln!(
                svg,
                r#"<rect class="square {sq}" x="{x:.1}" y="{y:.1}" width="{cell:.1}" height="{cell:.1}" fill="{fill}"/>"#
            );

            if let Some(piece) = board.piece_at(sq) {
                let _ = writeln!(
                    svg,
                    r#"<text class="piece" x="{:.1}" y="{:.1}" font-size="{:.1}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    x + cell / 2.0,
                    y + cell / 2.0,
                    cell * 0.8,
                    glyph(piece),
                );
            }
        }
    }

    let label_size = margin * 0.7;
    for i in 0..8u32 {
        let along = margin + i as f32 * cell + cell / 2.0;
        let _ = writeln!(
            svg,
            r##"<text x="{along:.1}" y="{:.1}" font-size="{label_size:.1}" fill="#e5e5e5" text-anchor="middle" dominant-baseline="central">{}</text>"##,
            size - margin / 2.0,
            file_char(i),
        );
        let _ = writeln!(
            svg,
            r##"<text x="{:.1}" y="{along:.1}" font-size="{label_size:.1}" fill="#e5e5e5" text-anchor="middle" dominant-baseline="central">{}</text>"##,
            margin / 2.0,
            8 - i,
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_board_initial_position() {
        let text = text_board(&GameRecord::new(), &TextStyle::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[1], "7  p p p p p p p p");
        assert_eq!(lines[4], "4  . . . . . . . .");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }

    #[test]
    fn test_text_board_follows_moves() {
        let record = GameRecord::from_pgn("1. e4").unwrap();
        let text = text_board(&record, &TextStyle::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[4], "4  . . . . P . . .");
        assert_eq!(lines[6], "2  P P P P . P P P");
    }

    #[test]
    fn test_text_board_unicode() {
        let style = TextStyle {
            pieces: PieceStyle::Unicode,
        };
        let text = text_board(&GameRecord::new(), &style);
        assert!(text.starts_with("8  ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜"));
        assert!(text.contains("1  ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖"));
    }

    #[test]
    fn test_svg_board_structure() {
        let svg = svg_board(&GameRecord::new(), 400);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="square"#).count(), 64);
        assert_eq!(svg.matches(r#"class="piece""#).count(), 32);
        assert!(!svg.contains(LIGHT_HIGHLIGHT));
        assert!(!svg.contains(DARK_HIGHLIGHT));
    }

    #[test]
    fn test_svg_board_highlights_last_move() {
        let record = GameRecord::from_pgn("1. e4").unwrap();
        let svg = svg_board(&record, 400);
        // e2 is light, e4 is light
        assert_eq!(svg.matches(LIGHT_HIGHLIGHT).count(), 2);

        let capture = GameRecord::from_pgn("1. e4 d5 2. exd5").unwrap();
        let svg = svg_board(&capture, 400);
        assert_eq!(svg.matches(r#"class="piece""#).count(), 31);
    }

    #[test]
    fn test_svg_board_highlights_castling_king_squares() {
        let record =
            GameRecord::from_pgn("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O").unwrap();
        let svg = svg_board(&record, 400);

        let fill_of = |name: &str| {
            let marker = format!(r#"class="square {name}""#);
            svg.lines()
                .find(|line| line.contains(&marker))
                .map(|line| line.to_string())
                .unwrap()
        };
        assert!(fill_of("e1").contains(DARK_HIGHLIGHT));
        assert!(fill_of("g1").contains(DARK_HIGHLIGHT));
        assert!(fill_of("h1").contains(LIGHT_SQUARE));
        assert_eq!(svg.matches(DARK_HIGHLIGHT).count(), 2);

        let long = GameRecord::from_pgn(
            "1. d4 d5 2. Nc3 Nc6 3. Bf4 Bf5 4. Qd2 Qd7 5. O-O-O O-O-O",
        )
        .unwrap();
        let svg = svg_board(&long, 400);
        // black king e8 -> c8, both light squares
        for name in ["c8", "e8"] {
            let marker = format!(r#"class="square {name}""#);
            let line = svg.lines().find(|line| line.contains(&marker)).unwrap();
            assert!(line.contains(LIGHT_HIGHLIGHT), "{name} not highlighted");
        }
        assert_eq!(svg.matches(LIGHT_HIGHLIGHT).count(), 2);
        assert!(!svg.contains(DARK_HIGHLIGHT));
    }
}
