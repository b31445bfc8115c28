//! Three-tier relevance ranking.
//!
//! Used by the local package index and by the remote application directory
//! so both order results the same way: exact name match first, then names
//! starting with the query, then names merely containing it. Matching is
//! case-insensitive and each tier keeps the order it was given.

/// Default cap on ranked results.
pub const MAX_RESULTS: usize = 10;

/// Rank `items` against `query` and keep at most `cap` of them.
///
/// Items whose name does not contain the query are dropped.
///
/// # Example
///
/// ```
/// use apm_schema::rank_by_relevance;
///
/// let names = vec!["ripgrep-all", "rg", "ripgrep", "xripgrep"];
/// let ranked = rank_by_relevance(names, "ripgrep", |n| *n, 10);
/// assert_eq!(ranked, vec!["ripgrep", "ripgrep-all", "xripgrep"]);
/// ```
pub fn rank_by_relevance<T, F>(
    items: impl IntoIterator<Item = T>,
    query: &str,
    name: F,
    cap: usize,
) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let query = query.to_lowercase();

    let mut exact = Vec::new();
    let mut prefix = Vec::new();
    let mut contains = Vec::new();

    for item in items {
        let lowered = name(&item).to_lowercase();
        if lowered == query {
            exact.push(item);
        } else if lowered.starts_with(&query) {
            prefix.push(item);
        } else if lowered.contains(&query) {
            contains.push(item);
        }
    }

    exact
        .into_iter()
        .chain(prefix)
        .chain(contains)
        .take(cap)
        .collect()
}
