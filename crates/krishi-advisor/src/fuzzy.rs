//! Fuzzy crop-name matching.
//!
//! Farmers type crop names with spelling variation ("whaet", "tomatoe");
//! the matcher resolves free text to the closest catalog name by a weighted
//! string-similarity ratio.

/// Minimum score a candidate must reach to be usable at all. Below this,
/// matches are noise ("rice" vs "cotton" scores well under it) and the
/// caller reports the crop as not recognized.
pub const MATCH_FLOOR: f64 = 0.72;

/// A resolved fuzzy match
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// Position of the winning candidate in the input order
    pub index: usize,
    pub name: String,
    pub score: f64,
}

/// Weighted similarity ratio in [0, 1].
///
/// Takes the better of Jaro-Winkler (forgiving of transpositions, the
/// typical typo) and normalized Levenshtein (forgiving of insertions),
/// case-insensitively.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    strsim::jaro_winkler(&a, &b).max(strsim::normalized_levenshtein(&a, &b))
}

/// Best candidate for a query, or `None` when no candidate clears the floor.
///
/// Ties break toward the first candidate encountered at the maximum score,
/// so a given catalog order always resolves the same way.
pub fn best_match<'a, I>(query: &str, candidates: I) -> Option<FuzzyMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<FuzzyMatch> = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = weighted_ratio(query, candidate);
        let improves = match &best {
            None => true,
            Some(current) => score > current.score,
        };
        if improves {
            best = Some(FuzzyMatch { index, name: candidate.to_string(), score });
        }
    }

    best.filter(|m| m.score >= MATCH_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROPS: [&str; 3] = ["Wheat", "Rice", "Maize"];

    #[test]
    fn test_transposed_typo_resolves() {
        let m = best_match("whaet", CROPS).unwrap();
        assert_eq!(m.name, "Wheat");
        assert_eq!(m.index, 0);
        assert!(m.score >= MATCH_FLOOR);
    }

    #[test]
    fn test_exact_match_scores_one() {
        let m = best_match("rice", CROPS).unwrap();
        assert_eq!(m.name, "Rice");
        assert!((m.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_query_is_rejected() {
        assert!(best_match("tractor", CROPS).is_none());
    }

    #[test]
    fn test_empty_candidates() {
        assert!(best_match("wheat", []).is_none());
    }

    #[test]
    fn test_empty_query() {
        assert!(best_match("", CROPS).is_none());
    }

    #[test]
    fn test_tie_breaks_on_first_candidate() {
        // Duplicate names at different rows: the earlier row wins
        let m = best_match("maize", ["Maize", "Rice", "Maize"]).unwrap();
        assert_eq!(m.index, 0);
    }
}
