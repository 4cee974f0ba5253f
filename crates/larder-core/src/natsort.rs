//! Natural (numeric-aware) string ordering
//!
//! Package names, version strings, alias keys, and file paths are all sorted
//! with the same comparator, so `pkg-2` orders before `pkg-10`.

use indexmap::IndexMap;
use std::cmp::Ordering;

/// Compare two strings, treating runs of ASCII digits as numbers.
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let (run_a, next_i) = digit_run(a, i);
            let (run_b, next_j) = digit_run(b, j);
            match compare_digit_runs(run_a, run_b) {
                Ordering::Equal => {
                    i = next_i;
                    j = next_j;
                }
                other => return other,
            }
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                other => return other,
            }
        }
    }

    // Runs of equal numeric value but different widths ("01" vs "1") leave
    // the cursors out of step; fall back to a bytewise tiebreak.
    (a.len() - i).cmp(&(b.len() - j)).then_with(|| a.cmp(b))
}

/// Sort an ordered map's keys in place with the natural comparator.
pub fn sort_keys<V>(map: &mut IndexMap<String, V>) {
    map.sort_by(|key_a, _, key_b, _| compare(key_a, key_b));
}

fn digit_run(s: &[u8], start: usize) -> (&[u8], usize) {
    let mut end = start;
    while end < s.len() && s[end].is_ascii_digit() {
        end += 1;
    }
    (&s[start..end], end)
}

/// Compare two digit runs by numeric value without parsing them, so runs
/// longer than any integer width still order correctly.
fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(run: &[u8]) -> &[u8] {
    let first = run.iter().position(|&c| c != b'0').unwrap_or(run.len());
    &run[first..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_strings_compare_bytewise() {
        assert_eq!(compare("alpha", "beta"), Ordering::Less);
        assert_eq!(compare("beta", "alpha"), Ordering::Greater);
        assert_eq!(compare("alpha", "alpha"), Ordering::Equal);
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert_eq!(compare("pkg-2", "pkg-10"), Ordering::Less);
        assert_eq!(compare("pkg-10", "pkg-2"), Ordering::Greater);
        assert_eq!(compare("9", "10"), Ordering::Less);
        assert_eq!(compare("1.10", "1.2"), Ordering::Greater);
    }

    #[test]
    fn test_prefix_orders_before_longer() {
        assert_eq!(compare("pkg", "pkg-1"), Ordering::Less);
        assert_eq!(compare("1.0", "1.0.1"), Ordering::Less);
    }

    #[test]
    fn test_huge_digit_runs() {
        let small = "v340282366920938463463374607431768211456";
        let big = "v340282366920938463463374607431768211457";
        assert_eq!(compare(small, big), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros_equal_numeric_value() {
        assert_eq!(compare("v01", "v1"), Ordering::Less);
        assert_eq!(compare("v01a", "v1a"), Ordering::Less);
        assert_eq!(compare("v007", "v8"), Ordering::Less);
    }

    #[test]
    fn test_sort_keys_natural() {
        let mut map: IndexMap<String, u32> = IndexMap::new();
        map.insert("pkg-10".to_string(), 0);
        map.insert("pkg-2".to_string(), 1);
        map.insert("other".to_string(), 2);

        sort_keys(&mut map);

        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["other", "pkg-2", "pkg-10"]);
    }
}
