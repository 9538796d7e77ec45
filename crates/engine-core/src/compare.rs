//! Multi-key lexicographic comparator builder.

use std::cmp::Ordering;

/// A sort key producing an `f64`. `f64::INFINITY` pushes an entry to the back
/// for that key without disqualifying it on later keys.
pub type Key<'a, T> = Box<dyn Fn(&T) -> f64 + 'a>;

/// Build a comparator that orders by each key in turn, ascending; later keys
/// only break ties on the earlier ones.
pub fn by_keys<'a, T: 'a>(keys: Vec<Key<'a, T>>) -> impl Fn(&T, &T) -> Ordering + 'a {
    move |a, b| {
        for key in &keys {
            match key(a).total_cmp(&key(b)) {
                Ordering::Equal => {}
                order => return order,
            }
        }
        Ordering::Equal
    }
}
