//! Indel-based string similarity, scaled 0-100.
//!
//! `ratio` is `2 * LCS / (len_a + len_b)`. `partial_ratio` slides the shorter
//! string across the longer one, including partial overlaps at both ends, and
//! keeps the best window.

/// Similarity of two whole strings, 0.0..=100.0. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_ratio(&a, &b)
}

/// Best similarity between the shorter string and any window of the longer one.
///
/// Case-sensitive; callers lowercase when they need case-insensitivity.
/// Either string empty scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let n = short.len();
    let m = long.len();

    let mut best = 0.0_f64;
    let mut consider = |window: &[char]| {
        let score = indel_ratio(short, window);
        if score > best {
            best = score;
        }
        best >= 100.0
    };

    // Windows hanging off the left edge.
    for end in 1..n.min(m) {
        if consider(&long[..end]) {
            return 100;
        }
    }
    // Full-length windows.
    for start in 0..=(m - n) {
        if consider(&long[start..start + n]) {
            return 100;
        }
    }
    // Windows hanging off the right edge.
    for start in (m - n + 1)..m {
        if consider(&long[start..]) {
            return 100;
        }
    }

    best.round().clamp(0.0, 100.0) as u8
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::{lcs_len, partial_ratio, ratio};

    #[test]
    fn lcs_counts_common_subsequence() {
        let a: Vec<char> = "abcde".chars().collect();
        let b: Vec<char> = "ace".chars().collect();
        assert_eq!(lcs_len(&a, &b), 3);
    }

    #[test]
    fn ratio_of_identical_strings_is_full() {
        assert_eq!(ratio("mri", "mri"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
    }

    #[test]
    fn substring_scores_full_partial_ratio() {
        assert_eq!(partial_ratio("deep learning", "a study of deep learning in mri"), 100);
        assert_eq!(partial_ratio("a study of deep learning in mri", "deep learning"), 100);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(partial_ratio("", "anything"), 0);
        assert_eq!(partial_ratio("anything", ""), 0);
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(partial_ratio("quantitative susceptibility", "xyz") < 50);
    }

    #[test]
    fn single_typo_stays_above_ninety() {
        let score = partial_ratio(
            "open source mri reconstruction",
            "open sourse mri reconstruction",
        );
        assert!(score >= 90, "score was {score}");
    }

    #[test]
    fn is_case_sensitive() {
        assert!(partial_ratio("ABC", "abc") < 100);
    }
}
