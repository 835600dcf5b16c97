use indexmap::IndexMap;

use crate::aggregators::types::{CrossTabGroup, NamedCount};
use crate::coerce;

/// Two-level count: group → member → count, ranked at both levels.
///
/// Each group keeps its `top_k` most frequent members, but its `total` is
/// summed over every member before that cut. Groups are then ranked by total
/// and cut to `top_n`. Ties at either level keep first-seen order. Records
/// with a blank or `"N/A"` group or member are skipped.
pub fn cross_tab<T, G, M>(
    records: &[T],
    group: G,
    member: M,
    top_k: usize,
    top_n: usize,
) -> Vec<CrossTabGroup>
where
    G: Fn(&T) -> &str,
    M: Fn(&T) -> &str,
{
    let mut table: IndexMap<&str, IndexMap<&str, u64>> = IndexMap::new();

    for record in records {
        let g = group(record);
        let m = member(record);
        if coerce::is_blank_or_sentinel(g) || coerce::is_blank_or_sentinel(m) {
            continue;
        }
        *table.entry(g).or_default().entry(m).or_insert(0) += 1;
    }

    let mut groups: Vec<CrossTabGroup> = table
        .into_iter()
        .map(|(label, members)| {
            let total = members.values().sum();

            let mut ranked: Vec<(&str, u64)> = members.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));

            CrossTabGroup {
                label: label.to_string(),
                top_members: ranked
                    .into_iter()
                    .take(top_k)
                    .map(|(name, count)| NamedCount::new(name, count))
                    .collect(),
                total,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups.truncate(top_n);
    groups
}
