//! Bounded Levenshtein distance.

use std::mem;

/// Computes the edit distance between `a` and `b`, giving up once it exceeds `max`.
///
/// Returns the exact distance when it is at most `max`, and `max + 1` otherwise. The
/// `max + 1` result means "too far", not a real distance. Insertions, deletions and
/// substitutions cost one each and are counted per `char`; comparison is
/// case-sensitive.
pub fn levenshtein(a: &str, b: &str, max: usize) -> usize {
    let too_far = max.saturating_add(1);

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // The length difference is a lower bound on the distance.
    if a.len().abs_diff(b.len()) > max {
        return too_far;
    }
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];

        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
            row_min = row_min.min(curr[j + 1]);
        }

        // Row minima never decrease, so nothing below can come back under `max`.
        if row_min > max {
            return too_far;
        }

        mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    if distance > max { too_far } else { distance }
}
