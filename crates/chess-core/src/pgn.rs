//! PGN parsing built on the pgn-reader streaming visitor.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};

use crate::game_data::{GameHeaders, GameRecord};
use crate::variant::Variant;

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("PGN read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no game found in PGN text")]
    Empty,

    #[error("PGN is missing the {0} header")]
    MissingHeader(&'static str),
}

/// Collects headers and mainline SAN moves of a single game.
struct RecordBuilder;

impl Visitor for RecordBuilder {
    type Tags = GameHeaders;
    type Movetext = GameRecord;
    type Output = Result<GameRecord, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameHeaders> {
        ControlFlow::Continue(GameHeaders {
            result: "*".to_string(),
            ..Default::default()
        })
    }

    fn tag(
        &mut self,
        headers: &mut GameHeaders,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().into_owned();
        match name {
            b"Event" => headers.event = Some(value),
            b"Site" => headers.site = value,
            b"Date" => headers.date = Some(value),
            b"White" => headers.white = value,
            b"Black" => headers.black = value,
            b"Result" => headers.result = value,
            b"Variant" => headers.variant = Variant::from_header(&value),
            b"FEN" if !value.is_empty() => headers.starting_fen = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, headers: GameHeaders) -> ControlFlow<Self::Output, GameRecord> {
        ControlFlow::Continue(GameRecord {
            headers,
            moves: Vec::new(),
        })
    }

    fn begin_variation(&mut self, _: &mut GameRecord) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, game: &mut GameRecord, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        game.moves.push(san_plus.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, game: GameRecord) -> Self::Output {
        if game.headers.white.is_empty() {
            return Err(PgnError::MissingHeader("White"));
        }
        if game.headers.black.is_empty() {
            return Err(PgnError::MissingHeader("Black"));
        }
        Ok(game)
    }
}

/// Parse the first game of a PGN string.
pub fn parse_pgn(pgn: &str) -> Result<GameRecord, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    reader.read_game(&mut RecordBuilder)?.ok_or(PgnError::Empty)?
}

/// Parse every game in a multi-game PGN string, in file order.
/// Each game is parsed independently so one bad game does not hide the rest.
pub fn parse_pgns(text: &str) -> Result<Vec<Result<GameRecord, PgnError>>, PgnError> {
    let mut reader = Reader::new(text.as_bytes());
    let mut games = Vec::new();
    while let Some(game) = reader.read_game(&mut RecordBuilder)? {
        games.push(game);
    }
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pgn_basic() {
        let pgn = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/abcd1234"]
[Date "2024.01.15"]
[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[Variant "Standard"]

1. e4 e5 2. Nf3 { a comment } Nc6 (2... d6 3. d4) 3. Bb5 1-0"#;

        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.headers.white, "Player1");
        assert_eq!(game.headers.black, "Player2");
        assert_eq!(game.headers.result, "1-0");
        assert_eq!(game.headers.site, "https://lichess.org/abcd1234");
        assert_eq!(game.headers.variant, Variant::Standard);
        assert_eq!(game.headers.starting_fen, None);
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
    }

    #[test]
    fn test_parse_pgn_with_fen_and_variant() {
        let pgn = r#"[Site "https://lichess.org/xyz"]
[White "a"]
[Black "b"]
[Result "*"]
[Variant "Chess960"]
[FEN "bqnrkrnb/pppppppp/8/8/8/8/PPPPPPPP/BQNRKRNB w KQkq - 0 1"]
[SetUp "1"]

1. d4 d5 *"#;

        let game = parse_pgn(pgn).unwrap();
        assert_eq!(game.headers.variant, Variant::Chess960);
        assert_eq!(
            game.headers.starting_fen.as_deref(),
            Some("bqnrkrnb/pppppppp/8/8/8/8/PPPPPPPP/BQNRKRNB w KQkq - 0 1")
        );
        assert_eq!(game.moves.len(), 2);
    }

    #[test]
    fn test_parse_pgn_missing_player() {
        let pgn = "[White \"a\"]\n\n1. e4 *";
        assert!(matches!(parse_pgn(pgn), Err(PgnError::MissingHeader("Black"))));
    }

    #[test]
    fn test_parse_pgns_multiple() {
        let text = "[White \"a\"]\n[Black \"b\"]\n\n1. e4 *\n\n\n[White \"c\"]\n[Black \"d\"]\n\n1. d4 d5 *\n";
        let games = parse_pgns(text).unwrap();
        assert_eq!(games.len(), 2);
        let second = games[1].as_ref().unwrap();
        assert_eq!(second.headers.white, "c");
        assert_eq!(second.moves, vec!["d4", "d5"]);
    }
}
