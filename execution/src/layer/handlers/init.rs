use super::super::*;
use crate::ledger;
use lrps_types::Member;
use tracing::debug;

impl<'a, S: State> Layer<'a, S> {
    /// Register every listed member with fresh cards and stars, overwriting existing records.
    ///
    /// The aggregate entry count becomes the number of IDs listed (duplicates included).
    pub(in crate::layer) fn handle_init(&mut self, members: &[MemberId]) -> Result<Execution> {
        let fresh = Member::default();
        for id in members {
            ledger::store_member(self, id, &fresh)?;
        }
        debug!(members = members.len(), "initialized members");

        Ok(Ok(Applied {
            tags: Vec::new(),
            entry_count: Some(members.len() as i64),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::load_member, Memory};
    use lrps_types::{Cards, HANDS};

    #[test]
    fn creates_fresh_records() {
        let memory = Memory::default();
        let mut layer = Layer::new(&memory);
        let ids: Vec<MemberId> = vec!["alice".into(), "bob".into(), "carol".into()];

        let applied = layer
            .execute(&Transaction::Init {
                members: ids.clone(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(applied.entry_count, Some(3));
        assert!(applied.tags.is_empty());

        for id in &ids {
            let member = load_member(&layer, id).unwrap().expect("member registered");
            assert_eq!(member.stars, 3);
            for hand in HANDS {
                assert_eq!(member.cards.get(hand), 4);
            }
        }
    }

    #[test]
    fn overwrites_existing_record() {
        let mut memory = Memory::default();
        let id = MemberId::from("alice");
        ledger::store_member(
            &mut memory,
            &id,
            &Member {
                cards: Cards {
                    rock: 0,
                    paper: 1,
                    scissor: 2,
                },
                stars: 9,
            },
        )
        .unwrap();

        let mut layer = Layer::new(&memory);
        layer.handle_init(&[id.clone()]).unwrap().unwrap();
        assert_eq!(load_member(&layer, &id).unwrap(), Some(Member::default()));
    }

    #[test]
    fn duplicate_ids_still_count() {
        let memory = Memory::default();
        let mut layer = Layer::new(&memory);
        let applied = layer
            .handle_init(&["alice".into(), "alice".into()])
            .unwrap()
            .unwrap();
        assert_eq!(applied.entry_count, Some(2));
        assert_eq!(layer.commit().len(), 1);
    }
}
