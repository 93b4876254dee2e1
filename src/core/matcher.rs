//! Name matching for completion and search.
//!
//! Completion uses case-insensitive containment: `grav` finds `sv_gravity`.
//! `find` falls back to a scored subsequence match when nothing contains the
//! query verbatim. Both report byte indices of the matched characters so a
//! front-end can highlight them.

/// Result of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The match score (higher is better).
    pub score: i32,
    /// Byte indices of matched characters in the text.
    pub indices: Vec<usize>,
}

impl MatchResult {
    pub fn new(score: i32, indices: Vec<usize>) -> Self {
        Self { score, indices }
    }
}

/// Case-insensitive substring match.
///
/// The score is the negated position of the first occurrence, so a prefix
/// match (position 0) beats everything else.
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::contains_match;
///
/// let result = contains_match("GRAV", "sv_gravity").unwrap();
/// assert_eq!(result.indices, vec![3, 4, 5, 6]);
/// assert!(contains_match("sv", "sv_cheats").unwrap().score
///     > contains_match("sv", "csv_data").unwrap().score);
/// assert!(contains_match("xyz", "help").is_none());
/// ```
pub fn contains_match(pattern: &str, text: &str) -> Option<MatchResult> {
    let haystack = text.to_ascii_lowercase();
    let needle = pattern.to_ascii_lowercase();

    let position = haystack.find(&needle)?;
    let indices = (position..position + needle.len()).collect();
    let score = i32::try_from(position).map_or(i32::MIN, |p| -p);

    Some(MatchResult::new(score, indices))
}

/// Fuzzy subsequence match.
///
/// Returns `Some` if all characters of `pattern` appear in `text` in order
/// (not necessarily consecutive).
///
/// # Scoring
///
/// - Base score: +1 per matched character
/// - Consecutive match bonus: +10
/// - Word start bonus: +5 (after `_`, `.` or at start)
/// - Exact prefix bonus: +20
///
/// # Examples
///
/// ```
/// use bevy_convar_console::core::subsequence_match;
///
/// let result = subsequence_match("sgr", "sv_gravity").unwrap();
/// assert_eq!(result.indices, vec![0, 3, 4]);
/// assert!(subsequence_match("xyz", "hello").is_none());
/// ```
pub fn subsequence_match(pattern: &str, text: &str) -> Option<MatchResult> {
    let pattern = pattern.as_bytes();
    let text_bytes = text.as_bytes();

    let mut score = 0i32;
    let mut indices = Vec::with_capacity(pattern.len());
    let mut prev: Option<usize> = None;

    if text_bytes.len() >= pattern.len() && text_bytes[..pattern.len()].eq_ignore_ascii_case(pattern) {
        score += 20;
    }

    let mut remaining = pattern.iter().peekable();
    for (i, byte) in text_bytes.iter().enumerate() {
        let Some(wanted) = remaining.peek() else {
            break;
        };
        if !byte.eq_ignore_ascii_case(wanted) {
            continue;
        }

        score += 1;
        if prev.is_some_and(|p| p + 1 == i) {
            score += 10;
        }
        if i == 0 || matches!(text_bytes[i - 1], b'_' | b'.') {
            score += 5;
        }

        indices.push(i);
        prev = Some(i);
        remaining.next();
    }

    remaining
        .peek()
        .is_none()
        .then(|| MatchResult::new(score, indices))
}

/// Match candidates and sort them, best score first, then alphabetically.
pub fn match_and_sort<'a, M>(
    pattern: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    matcher: M,
) -> Vec<(&'a str, MatchResult)>
where
    M: Fn(&str, &str) -> Option<MatchResult>,
{
    let mut matches: Vec<_> = candidates
        .into_iter()
        .filter_map(|candidate| matcher(pattern, candidate).map(|result| (candidate, result)))
        .collect();

    matches.sort_by(|a, b| b.1.score.cmp(&a.1.score).then_with(|| a.0.cmp(b.0)));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_case_insensitive() {
        assert!(contains_match("HELP", "help").is_some());
        assert!(contains_match("elp", "HELP").is_some());
        assert!(contains_match("hlp", "help").is_none());
    }

    #[test]
    fn test_contains_empty_pattern() {
        let result = contains_match("", "anything").unwrap();
        assert_eq!(result.score, 0);
        assert!(result.indices.is_empty());
    }

    #[test]
    fn test_subsequence_match() {
        let result = subsequence_match("sgr", "sv_gravity").unwrap();
        assert_eq!(result.indices, vec![0, 3, 4]);
        assert!(subsequence_match("abc", "ab").is_none());
    }

    #[test]
    fn test_word_boundary_bonus() {
        let result1 = subsequence_match("svg", "sv_gravity").unwrap();
        let result2 = subsequence_match("svg", "saving").unwrap();
        assert!(result1.score > result2.score);
    }

    #[test]
    fn test_match_and_sort_contains() {
        let candidates = ["csv_export", "sv_gravity", "sv_cheats", "cl_showfps"];

        let results = match_and_sort("sv", candidates, contains_match);
        let names: Vec<_> = results.iter().map(|(name, _)| *name).collect();

        // Prefix matches first (alphabetical), then by position
        assert_eq!(names, vec!["sv_cheats", "sv_gravity", "csv_export"]);
    }
}
