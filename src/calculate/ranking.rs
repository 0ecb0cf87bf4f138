use std::cmp::Ordering;

use crate::models::{PlayerStatLine, StandingsRow};

/// Standings order: points, then set differential, then sets won, all
/// descending. Returns `Less` when `a` should be listed above `b`.
pub fn compare_standing(a: &PlayerStatLine, b: &PlayerStatLine) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.set_differential().cmp(&a.set_differential()))
        .then_with(|| b.sets_won.cmp(&a.sets_won))
}

/// Sort season totals into the standings table.
///
/// Rows the comparator cannot separate keep their input order, so callers
/// control the final tie-break by how they order the input (the store passes
/// players sorted by name). Ranks are positional: 1, 2, 3... with no shared
/// ranks.
pub fn rank<T, I>(entries: I) -> Vec<StandingsRow<T>>
where
    I: IntoIterator<Item = (T, PlayerStatLine)>,
{
    let mut entries: Vec<(T, PlayerStatLine)> = entries.into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| compare_standing(a, b));

    entries
        .into_iter()
        .zip(1u32..)
        .map(|((player, stats), rank)| StandingsRow {
            rank,
            player,
            stats,
        })
        .collect()
}
