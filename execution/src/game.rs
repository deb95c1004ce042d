use lrps_types::Hand;
use std::cmp::Ordering;

/// Resolve a round from `a`'s point of view.
///
/// `Greater` means `a` wins, `Less` means `b` wins. Equal hands and the `Nil` hand always tie.
pub fn resolve(a: Hand, b: Hand) -> Ordering {
    if a == b || a == Hand::Nil || b == Hand::Nil {
        return Ordering::Equal;
    }
    if a.beats() == Some(b) {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}
