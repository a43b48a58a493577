use crate::domain::model::{MatchedLinks, PortfolioEntry};
use std::collections::HashSet;

pub const DEFAULT_MATCH_LIMIT: usize = 2;

/// Ranks portfolio entries by how many of `required_skills` they share.
///
/// Comparison is case-insensitive. Entries with no overlap are dropped, the rest
/// are ordered by overlap descending with ties kept in portfolio order, and the
/// links of the first `limit` entries are returned.
pub fn match_portfolio<S: AsRef<str>>(
    required_skills: &[S],
    portfolio: &[PortfolioEntry],
    limit: usize,
) -> MatchedLinks {
    let required: HashSet<String> = required_skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if required.is_empty() || limit == 0 {
        return MatchedLinks::default();
    }

    let mut scored: Vec<(usize, &PortfolioEntry)> = portfolio
        .iter()
        .filter_map(|entry| {
            let score = entry_skills(entry)
                .filter(|skill| required.contains(skill))
                .count();
            (score > 0).then_some((score, entry))
        })
        .collect();

    // sort_by 是穩定排序，同分時維持原本的作品集順序
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    MatchedLinks(
        scored
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry.link.clone())
            .collect(),
    )
}

fn entry_skills(entry: &PortfolioEntry) -> impl Iterator<Item = String> + '_ {
    let mut seen = HashSet::new();
    entry
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(move |s| seen.insert(s.clone()))
}
