use super::super::*;
use crate::{game, ledger};
use lrps_types::{Member, Play};
use std::cmp::Ordering;
use tracing::debug;

impl<'a, S: State> Layer<'a, S> {
    /// Play one round.
    ///
    /// Every check runs before the first write, so a rejected round leaves nothing pending.
    pub(in crate::layer) fn handle_play(&mut self, play: &Play) -> Result<Execution> {
        let [(first_id, first_hand), (second_id, second_hand)] = &play.moves;

        let Some(mut first) = ledger::load_member(&*self, first_id)? else {
            return Ok(Err(Rejection::MemberNotFound(first_id.clone())));
        };
        let Some(mut second) = ledger::load_member(&*self, second_id)? else {
            return Ok(Err(Rejection::MemberNotFound(second_id.clone())));
        };
        for (id, member, hand) in [
            (first_id, &first, *first_hand),
            (second_id, &second, *second_hand),
        ] {
            if member.cards.get(hand) == 0 {
                return Ok(Err(Rejection::NoCard {
                    member: id.clone(),
                    hand,
                }));
            }
        }

        spend(&mut first, *first_hand);
        spend(&mut second, *second_hand);

        let winner = match game::resolve(*first_hand, *second_hand) {
            Ordering::Greater => {
                first.stars = first.stars.saturating_add(1);
                second.stars = second.stars.saturating_sub(1);
                Some(first_id)
            }
            Ordering::Less => {
                first.stars = first.stars.saturating_sub(1);
                second.stars = second.stars.saturating_add(1);
                Some(second_id)
            }
            Ordering::Equal => None,
        };

        for (id, member) in [(first_id, &first), (second_id, &second)] {
            if member.is_eliminated() {
                debug!(member = %id, stars = member.stars, "member eliminated");
                ledger::remove_member(self, id)?;
            } else {
                ledger::store_member(self, id, member)?;
            }
        }

        Ok(Ok(Applied {
            tags: vec![
                Tag::new(TAG_ROUND_ID, play.round.as_ref()),
                Tag::new(
                    TAG_WINNER,
                    winner.map(|id| id.as_ref().to_vec()).unwrap_or_default(),
                ),
            ],
            entry_count: None,
        }))
    }
}

/// Use up one card of `hand`. Callers have already checked the count is positive.
fn spend(member: &mut Member, hand: Hand) {
    if let Some(count) = member.cards.get_mut(hand) {
        *count -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::load_member, Memory};
    use lrps_types::{Cards, RoundId};

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

    fn seeded(members: &[(&str, Member)]) -> Memory {
        let mut memory = Memory::default();
        for (id, m) in members {
            ledger::store_member(&mut memory, &MemberId::from(*id), m).unwrap();
        }
        memory
    }

    fn round(a: (&str, Hand), b: (&str, Hand)) -> Play {
        Play {
            round: RoundId::new("r1"),
            moves: [(a.0.into(), a.1), (b.0.into(), b.1)],
        }
    }

    fn get(layer: &Layer<'_, Memory>, id: &str) -> Option<Member> {
        load_member(layer, &MemberId::from(id)).unwrap()
    }

    #[test]
    fn decisive_round_moves_stars_and_spends_cards() {
        let memory = seeded(&[("alice", Member::default()), ("bob", Member::default())]);
        let mut layer = Layer::new(&memory);

        let applied = layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Scissor)))
            .unwrap()
            .unwrap();

        assert_eq!(get(&layer, "alice"), Some(member(3, 4, 4, 4)));
        assert_eq!(get(&layer, "bob"), Some(member(4, 4, 3, 2)));
        assert_eq!(
            applied.tags,
            vec![Tag::new("roundID", "r1"), Tag::new("winner", "alice")]
        );
        assert_eq!(applied.entry_count, None);
    }

    #[test]
    fn second_member_can_win() {
        let memory = seeded(&[("alice", Member::default()), ("bob", Member::default())]);
        let mut layer = Layer::new(&memory);
        let applied = layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Paper)))
            .unwrap()
            .unwrap();
        assert_eq!(get(&layer, "alice").unwrap().stars, 2);
        assert_eq!(get(&layer, "bob").unwrap().stars, 4);
        assert_eq!(applied.tags[1], Tag::new("winner", "bob"));
    }

    #[test]
    fn tie_spends_cards_but_keeps_stars() {
        let memory = seeded(&[("alice", Member::default()), ("bob", Member::default())]);
        let mut layer = Layer::new(&memory);
        let applied = layer
            .handle_play(&round(("alice", Hand::Paper), ("bob", Hand::Paper)))
            .unwrap()
            .unwrap();
        assert_eq!(get(&layer, "alice"), Some(member(4, 3, 4, 3)));
        assert_eq!(get(&layer, "bob"), Some(member(4, 3, 4, 3)));
        assert_eq!(applied.tags[1], Tag::new("winner", ""));
    }

    #[test]
    fn missing_member_leaves_nothing_pending() {
        let memory = seeded(&[("alice", Member::default())]);
        let mut layer = Layer::new(&memory);
        let rejection = layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Paper)))
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, Rejection::MemberNotFound("bob".into()));
        assert!(layer.commit().is_empty());

        let memory = seeded(&[("bob", Member::default())]);
        let mut layer = Layer::new(&memory);
        let rejection = layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Paper)))
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, Rejection::MemberNotFound("alice".into()));
    }

    #[test]
    fn empty_hand_is_rejected_before_any_write() {
        // Second member's check fails after the first member passed.
        let memory = seeded(&[("alice", Member::default()), ("bob", member(4, 4, 0, 3))]);
        let mut layer = Layer::new(&memory);
        let rejection = layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Scissor)))
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            Rejection::NoCard {
                member: "bob".into(),
                hand: Hand::Scissor
            }
        );
        assert!(layer.commit().is_empty());
    }

    #[test]
    fn zero_stars_eliminates_loser() {
        let memory = seeded(&[("alice", Member::default()), ("bob", member(4, 4, 4, 1))]);
        let mut layer = Layer::new(&memory);
        layer
            .handle_play(&round(("alice", Hand::Scissor), ("bob", Hand::Paper)))
            .unwrap()
            .unwrap();
        assert_eq!(get(&layer, "bob"), None);
        assert_eq!(get(&layer, "alice").unwrap().stars, 4);
    }

    #[test]
    fn last_card_with_low_stars_eliminates() {
        let memory = seeded(&[("alice", member(1, 0, 0, 2)), ("bob", member(1, 0, 0, 1))]);
        let mut layer = Layer::new(&memory);
        layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Rock)))
            .unwrap()
            .unwrap();
        assert_eq!(get(&layer, "alice"), None);
        assert_eq!(get(&layer, "bob"), None);
    }

    #[test]
    fn low_stars_with_cards_left_survive() {
        let memory = seeded(&[("alice", member(1, 1, 0, 2)), ("bob", member(4, 4, 4, 3))]);
        let mut layer = Layer::new(&memory);
        layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Paper)))
            .unwrap()
            .unwrap();
        // alice: 1 star, paper still in hand.
        assert_eq!(get(&layer, "alice"), Some(member(0, 1, 0, 1)));
    }

    #[test]
    fn winner_with_empty_hand_and_three_stars_survives() {
        let memory = seeded(&[("alice", member(1, 0, 0, 2)), ("bob", Member::default())]);
        let mut layer = Layer::new(&memory);
        layer
            .handle_play(&round(("alice", Hand::Rock), ("bob", Hand::Scissor)))
            .unwrap()
            .unwrap();
        assert_eq!(get(&layer, "alice"), Some(member(0, 0, 0, 3)));
    }

    #[test]
    fn negative_stars_with_cards_are_kept() {
        let memory = seeded(&[("alice", Member::default()), ("bob", member(4, 4, 4, 0))]);
        let mut layer = Layer::new(&memory);
        // bob is still on the ledger at zero stars (e.g. a record written before this rule).
        layer
            .handle_play(&round(("alice", Hand::Paper), ("bob", Hand::Rock)))
            .unwrap()
            .unwrap();
        assert_eq!(get(&layer, "bob"), Some(member(3, 4, 4, -1)));
    }
}
