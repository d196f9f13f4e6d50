//! Lexical relevance ranking.
//!
//! Scores each segment by how many times the full query string appears in
//! it (case-insensitive, non-overlapping, literal — a multi-word query
//! must appear as a contiguous substring to score at all). Deliberately a
//! coarse heuristic: no embeddings, no stemming, no stop words. With
//! per-document segment counts this small, anything fancier buys nothing.

use crate::models::ScoredSegment;

/// Count non-overlapping case-insensitive occurrences of `query` in
/// `segment`. An empty query scores zero everywhere.
pub fn score_segment(segment: &str, query: &str) -> usize {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    segment.to_lowercase().matches(needle.as_str()).count()
}

/// Select the `top_k` highest-scoring segments, most relevant first.
///
/// The sort is stable, so equal scores keep their original document
/// order. Always returns exactly `min(top_k, segments.len())` results —
/// zero-score segments are included when nothing better exists. This is
/// a "most relevant of what exists" selector, not a relevance filter.
pub fn rank_segments(segments: Vec<String>, query: &str, top_k: usize) -> Vec<ScoredSegment> {
    let mut scored: Vec<ScoredSegment> = segments
        .into_iter()
        .map(|text| {
            let score = score_segment(&text, query);
            ScoredSegment { text, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_are_case_insensitive() {
        assert_eq!(score_segment("Dog dog DOG", "dog"), 3);
        assert_eq!(score_segment("Dog dog DOG", "DoG"), 3);
    }

    #[test]
    fn counts_are_non_overlapping() {
        assert_eq!(score_segment("aaaa", "aa"), 2);
    }

    #[test]
    fn multi_word_query_must_be_contiguous() {
        assert_eq!(score_segment("dog likes food", "dog food"), 0);
        assert_eq!(score_segment("buy dog food today", "dog food"), 1);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(score_segment("anything", ""), 0);
    }

    #[test]
    fn top_scorers_first_ties_keep_original_order() {
        let ranked = rank_segments(segs(&["dog food", "cat toys", "dog leash"]), "dog", 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].text, "dog food");
        assert_eq!(ranked[1].text, "dog leash");
        assert_eq!(ranked[0].score, 1);
        assert_eq!(ranked[1].score, 1);
    }

    #[test]
    fn cap_property() {
        let segments = segs(&["a", "b", "c", "d", "e"]);
        for cap in 0..8 {
            let got = rank_segments(segments.clone(), "x", cap);
            assert_eq!(got.len(), cap.min(segments.len()));
        }
    }

    #[test]
    fn zero_scores_are_still_returned() {
        let ranked = rank_segments(segs(&["alpha", "beta", "gamma"]), "zebra", 3);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|s| s.score == 0));
        // original order preserved under an all-zero tie
        assert_eq!(ranked[0].text, "alpha");
        assert_eq!(ranked[2].text, "gamma");
    }

    #[test]
    fn scores_are_non_increasing() {
        let ranked = rank_segments(
            segs(&["x", "dog dog dog", "dog", "dog dog"]),
            "dog",
            4,
        );
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].score, 3);
    }
}
