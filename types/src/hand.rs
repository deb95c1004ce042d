use std::fmt;

/// The three playable hands, in the order they are stored and reported.
pub const HANDS: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissor];

/// A hand kind.
///
/// `Nil` is never produced by parsing a transaction. It only exists so the game engine has a
/// neutral value that ties against everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Hand {
    #[default]
    Nil = 0,
    Rock = 1,
    Paper = 2,
    Scissor = 3,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hand::Nil => "nil",
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissor => "scissor",
        }
    }

    /// Parse a hand token from raw transaction bytes.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        match token {
            b"rock" => Some(Hand::Rock),
            b"paper" => Some(Hand::Paper),
            b"scissor" => Some(Hand::Scissor),
            _ => None,
        }
    }

    /// The hand this one defeats, if any.
    pub fn beats(&self) -> Option<Hand> {
        match self {
            Hand::Nil => None,
            Hand::Rock => Some(Hand::Scissor),
            Hand::Paper => Some(Hand::Rock),
            Hand::Scissor => Some(Hand::Paper),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_playable_tokens() {
        assert_eq!(Hand::from_token(b"rock"), Some(Hand::Rock));
        assert_eq!(Hand::from_token(b"paper"), Some(Hand::Paper));
        assert_eq!(Hand::from_token(b"scissor"), Some(Hand::Scissor));
        assert_eq!(Hand::from_token(b"nil"), None);
        assert_eq!(Hand::from_token(b"Rock"), None);
        assert_eq!(Hand::from_token(b"scissors"), None);
        assert_eq!(Hand::from_token(b""), None);
    }

    #[test]
    fn dominance_is_cyclic() {
        for hand in HANDS {
            let beaten = hand.beats().expect("playable hand beats something");
            assert_ne!(beaten, hand);
            assert_ne!(beaten.beats(), Some(hand));
        }
        assert_eq!(Hand::Nil.beats(), None);
    }
}
