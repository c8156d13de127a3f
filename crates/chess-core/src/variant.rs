use serde::{Deserialize, Serialize};

/// Game variants as named in the Lichess `Variant` PGN header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Standard,
    Chess960,
    FromPosition,
    Horde,
    RacingKings,
    Atomic,
    Antichess,
    KingOfTheHill,
    ThreeCheck,
    Crazyhouse,
}

impl Variant {
    /// Parse a header value. Unknown names fall back to standard chess.
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "chess960" => Variant::Chess960,
            "from position" => Variant::FromPosition,
            "horde" => Variant::Horde,
            "racing kings" => Variant::RacingKings,
            "atomic" => Variant::Atomic,
            "antichess" => Variant::Antichess,
            "king of the hill" => Variant::KingOfTheHill,
            "three-check" | "threecheck" => Variant::ThreeCheck,
            "crazyhouse" => Variant::Crazyhouse,
            _ => Variant::Standard,
        }
    }
}

impl From<Variant> for shakmaty::variant::Variant {
    fn from(v: Variant) -> Self {
        use shakmaty::variant::Variant as V;
        match v {
            Variant::Standard | Variant::Chess960 | Variant::FromPosition => V::Chess,
            Variant::Horde => V::Horde,
            Variant::RacingKings => V::RacingKings,
            Variant::Atomic => V::Atomic,
            Variant::Antichess => V::Antichess,
            Variant::KingOfTheHill => V::KingOfTheHill,
            Variant::ThreeCheck => V::ThreeCheck,
            Variant::Crazyhouse => V::Crazyhouse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        assert_eq!(Variant::from_header("Racing Kings"), Variant::RacingKings);
        assert_eq!(Variant::from_header("From Position"), Variant::FromPosition);
        assert_eq!(Variant::from_header("Three-check"), Variant::ThreeCheck);
        assert_eq!(Variant::from_header("Something else"), Variant::Standard);
    }
}
