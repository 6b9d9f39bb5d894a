// src/core/score.rs — Extract a numeric score from free-form review text

/// Find the first `Score: <digits>/10` occurrence and return its value.
///
/// The keyword is case-sensitive; whitespace between the colon and the
/// digits is tolerated. No match returns 0, as does a matched value
/// outside 0..=10. An explicit "Score: 0/10" is therefore
/// indistinguishable from a missing score.
pub fn extract_score(review: &str) -> u8 {
    let mut rest = review;
    while let Some(pos) = rest.find("Score:") {
        let after = &rest[pos + "Score:".len()..];
        let candidate = after.trim_start();
        let digits: &str = {
            let end = candidate
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(candidate.len());
            &candidate[..end]
        };
        if !digits.is_empty() && candidate[digits.len()..].starts_with("/10") {
            return match digits.parse::<u32>() {
                Ok(n) if n <= 10 => n as u8,
                _ => 0,
            };
        }
        rest = after;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_score() {
        assert_eq!(extract_score("Solid work.\nScore: 7/10"), 7);
    }

    #[test]
    fn test_whitespace_after_colon() {
        assert_eq!(extract_score("Score:    9/10"), 9);
        assert_eq!(extract_score("Score:9/10"), 9);
    }

    #[test]
    fn test_no_match_returns_zero() {
        assert_eq!(extract_score("This is fine."), 0);
        assert_eq!(extract_score(""), 0);
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        assert_eq!(extract_score("score: 8/10"), 0);
        assert_eq!(extract_score("SCORE: 8/10"), 0);
    }

    #[test]
    fn test_explicit_zero_matches_no_score() {
        // Known ambiguity: "0/10" and "no score" both come back as 0.
        assert_eq!(extract_score("Score: 0/10"), 0);
        assert_eq!(extract_score("no score here"), 0);
    }

    #[test]
    fn test_out_of_range_returns_zero() {
        assert_eq!(extract_score("Score: 11/10"), 0);
        assert_eq!(extract_score("Score: 99/10"), 0);
    }

    #[test]
    fn test_overflowing_digits_return_zero() {
        assert_eq!(extract_score("Score: 99999999999999999999/10"), 0);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_score("Score: 4/10 ... later Score: 8/10"), 4);
    }

    #[test]
    fn test_skips_non_matching_occurrences() {
        // "Score:" without digits/10 after it is not a match; scanning
        // continues.
        assert_eq!(extract_score("Score: excellent\nScore: 6/10"), 6);
    }

    #[test]
    fn test_requires_out_of_ten_suffix() {
        assert_eq!(extract_score("Score: 7"), 0);
        assert_eq!(extract_score("Score: 7/5"), 0);
    }

    #[test]
    fn test_embedded_mid_sentence() {
        assert_eq!(extract_score("I'd give it Score: 5/10, maybe more."), 5);
    }

    #[test]
    fn test_boundary_values() {
        assert_eq!(extract_score("Score: 10/10"), 10);
        assert_eq!(extract_score("Score: 1/10"), 1);
    }

    #[test]
    fn test_total_on_arbitrary_input() {
        // Never panics, always in range.
        for s in ["Score:/10", "Score: /10", "```Score```", "🦀 Score: 3/10"] {
            let v = extract_score(s);
            assert!(v <= 10);
        }
    }
}
