//! Government scheme recommendations
//!
//! Two independent rule tables, one scored against village resource records
//! and one against individual patta holders. Every rule is a pair of plain
//! functions: an eligibility predicate and an additive priority score.
//! Recommendation is a single pass: score eligible rules, drop non-positive
//! scores, stable-sort descending and truncate.

pub mod individual;
pub mod village;

use serde::Serialize;

/// Default number of schemes returned per record
pub const DEFAULT_LIMIT: usize = 5;

/// A rule table entry paired with its score for one record
#[derive(Debug, Serialize)]
pub struct Scored<'a, S> {
    #[serde(flatten)]
    pub scheme: &'a S,
    pub score: i64,
}

/// Score every rule against `record` and keep the best `limit`.
pub(crate) fn rank<'a, S, R: ?Sized>(
    table: &'a [S],
    record: &R,
    eligible: impl Fn(&S, &R) -> bool,
    priority: impl Fn(&S, &R) -> i64,
    limit: usize,
) -> Vec<Scored<'a, S>> {
    let mut scored: Vec<Scored<'a, S>> = table
        .iter()
        .map(|scheme| Scored {
            scheme,
            score: if eligible(scheme, record) {
                priority(scheme, record)
            } else {
                0
            },
        })
        .filter(|s| s.score > 0)
        .collect();

    // Stable, so equal scores keep table order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}
