//! Phrase matching by positional intersection
//!
//! A document contains `w0 .. wn` when some literal position of `w0` is followed
//! by `w1` one position later, and so on. Each step keeps only the positions whose
//! predecessor survived the previous step, so the work is linear in the number of
//! postings touched.

use std::collections::HashSet;
use std::convert::Infallible;

use super::position::Position;
use super::store::IndexStore;
use crate::storage::Result;

/// Filter `next` down to literal positions directly after one in `previous`.
fn advance(previous: &HashSet<u32>, next: &[Position]) -> HashSet<u32> {
    next.iter()
        .filter_map(|p| p.literal())
        .filter(|&p| p > 0 && previous.contains(&(p - 1)))
        .collect()
}

fn literal_set(positions: &[Position]) -> HashSet<u32> {
    positions.iter().filter_map(|p| p.literal()).collect()
}

/// Walk per-word position lists in phrase order, pulling each list lazily.
///
/// Returns as soon as a step leaves no candidate positions, so later lists are
/// never fetched.
fn walk_phrase<I, P, E>(mut per_word: I) -> std::result::Result<bool, E>
where
    I: Iterator<Item = std::result::Result<P, E>>,
    P: AsRef<[Position]>,
{
    let Some(first) = per_word.next() else {
        return Ok(true);
    };

    let mut surviving = literal_set(first?.as_ref());
    for positions in per_word {
        if surviving.is_empty() {
            return Ok(false);
        }
        surviving = advance(&surviving, positions?.as_ref());
    }
    Ok(!surviving.is_empty())
}

/// Check adjacency over per-word position lists, in phrase order.
///
/// An empty phrase matches trivially.
pub fn matches_phrase<P: AsRef<[Position]>>(per_word: &[P]) -> bool {
    walk_phrase(per_word.iter().map(Ok::<_, Infallible>)).unwrap_or_else(|never| match never {})
}

/// Whether `doc` contains `words` as a phrase, fetching positions from `store`.
pub fn contains_phrase<S: IndexStore + ?Sized>(
    store: &S,
    words: &[String],
    doc: &S::DocId,
) -> Result<bool> {
    walk_phrase(words.iter().map(|word| store.get_term_locations(word, doc)))
}
