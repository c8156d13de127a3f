use chess_core::game_data::GameRecord;
use chess_core::pgn::parse_pgn;

pub const SITE: &str = "https://lichess.org/abcd1234";

/// Build a game between `white` and `black` from a movetext string.
pub fn game(site: &str, white: &str, black: &str, movetext: &str) -> GameRecord {
    let pgn = format!(
        "[Event \"Rated Blitz game\"]\n[Site \"{site}\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"*\"]\n\n{movetext} *\n"
    );
    parse_pgn(&pgn).unwrap()
}

/// Same, starting from a FEN position.
pub fn game_from_fen(site: &str, white: &str, black: &str, fen: &str, movetext: &str) -> GameRecord {
    let pgn = format!(
        "[Site \"{site}\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"*\"]\n[SetUp \"1\"]\n[FEN \"{fen}\"]\n\n{movetext} *\n"
    );
    parse_pgn(&pgn).unwrap()
}

/// Same, for a game played in `variant` from its own starting layout.
pub fn game_in_variant(site: &str, white: &str, black: &str, variant: &str, movetext: &str) -> GameRecord {
    let pgn = format!(
        "[Site \"{site}\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"*\"]\n[Variant \"{variant}\"]\n\n{movetext} *\n"
    );
    parse_pgn(&pgn).unwrap()
}

/// White gets an en passant chance on d6 after halfmove 4.
pub const WHITE_CHANCE: &str = "1. e4 a6 2. e5 d5";
