use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use std::fmt;

use crate::Hand;

/// Cards of each hand handed out by an `init` transaction.
pub const STARTING_CARDS: u32 = 4;

/// Stars handed out by an `init` transaction.
pub const STARTING_STARS: i64 = 3;

/// Opaque participant identifier, taken verbatim from transaction bytes.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(Vec<u8>);

impl MemberId {
    pub fn new(id: impl Into<Vec<u8>>) -> Self {
        Self(id.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for MemberId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.as_bytes().to_vec())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// Remaining inventory per playable hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cards {
    pub rock: u32,
    pub paper: u32,
    pub scissor: u32,
}

impl Cards {
    pub fn uniform(count: u32) -> Self {
        Self {
            rock: count,
            paper: count,
            scissor: count,
        }
    }

    /// Remaining count for `hand`. `Hand::Nil` never has cards.
    pub fn get(&self, hand: Hand) -> u32 {
        match hand {
            Hand::Nil => 0,
            Hand::Rock => self.rock,
            Hand::Paper => self.paper,
            Hand::Scissor => self.scissor,
        }
    }

    pub fn get_mut(&mut self, hand: Hand) -> Option<&mut u32> {
        match hand {
            Hand::Nil => None,
            Hand::Rock => Some(&mut self.rock),
            Hand::Paper => Some(&mut self.paper),
            Hand::Scissor => Some(&mut self.scissor),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.rock == 0 && self.paper == 0 && self.scissor == 0
    }
}

/// A tournament participant's persisted record.
///
/// The member's ID is not part of the record; it is carried by the store key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub cards: Cards,
    /// May go negative; nothing floors it.
    pub stars: i64,
}

impl Default for Member {
    fn default() -> Self {
        Self {
            cards: Cards::uniform(STARTING_CARDS),
            stars: STARTING_STARS,
        }
    }
}

impl Member {
    /// Whether the member leaves the tournament.
    ///
    /// A member is out with exactly zero stars, or with at most two stars and no cards left.
    /// Negative balances only match the second branch.
    pub fn is_eliminated(&self) -> bool {
        self.stars == 0 || (self.stars <= 2 && self.cards.is_exhausted())
    }
}

impl Write for Member {
    fn write(&self, writer: &mut impl BufMut) {
        self.cards.rock.write(writer);
        self.cards.paper.write(writer);
        self.cards.scissor.write(writer);
        self.stars.write(writer);
    }
}

impl Read for Member {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            cards: Cards {
                rock: u32::read(reader)?,
                paper: u32::read(reader)?,
                scissor: u32::read(reader)?,
            },
            stars: i64::read(reader)?,
        })
    }
}

impl EncodeSize for Member {
    fn encode_size(&self) -> usize {
        self.cards.rock.encode_size()
            + self.cards.paper.encode_size()
            + self.cards.scissor.encode_size()
            + self.stars.encode_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_codec::{DecodeExt, Encode};

    fn member(rock: u32, paper: u32, scissor: u32, stars: i64) -> Member {
        Member {
            cards: Cards {
                rock,
                paper,
                scissor,
            },
            stars,
        }
    }

    #[test]
    fn fresh_member_has_starting_values() {
        let m = Member::default();
        for hand in crate::HANDS {
            assert_eq!(m.cards.get(hand), 4);
        }
        assert_eq!(m.stars, 3);
        assert!(!m.is_eliminated());
    }

    #[test]
    fn elimination_rule() {
        // Zero stars always eliminates, cards or not.
        assert!(member(4, 4, 4, 0).is_eliminated());
        // Low stars only eliminate once every hand is spent.
        assert!(member(0, 0, 0, 1).is_eliminated());
        assert!(member(0, 0, 0, 2).is_eliminated());
        assert!(!member(0, 1, 0, 1).is_eliminated());
        assert!(!member(0, 0, 1, 2).is_eliminated());
        // Three or more stars survive an empty hand.
        assert!(!member(0, 0, 0, 3).is_eliminated());
        // Negative balances are only caught when the hand is empty.
        assert!(!member(1, 0, 0, -1).is_eliminated());
        assert!(member(0, 0, 0, -1).is_eliminated());
    }

    #[test]
    fn nil_has_no_inventory() {
        let mut cards = Cards::uniform(4);
        assert_eq!(cards.get(Hand::Nil), 0);
        assert!(cards.get_mut(Hand::Nil).is_none());
        *cards.get_mut(Hand::Paper).unwrap() -= 1;
        assert_eq!(cards, Cards { rock: 4, paper: 3, scissor: 4 });
    }

    #[test]
    fn encoding_is_fixed_width_big_endian() {
        let encoded = member(1, 2, 3, -1).encode();
        assert_eq!(encoded.len(), 20);
        assert_eq!(&encoded[..4], &[0, 0, 0, 1]);
        assert_eq!(&encoded[12..], &[0xff; 8]);
        assert_eq!(Member::decode(encoded).unwrap(), member(1, 2, 3, -1));
    }

    #[test]
    fn truncated_record_fails_to_decode() {
        let encoded = Member::default().encode();
        assert!(Member::decode(&encoded[..encoded.len() - 1]).is_err());
    }
}
