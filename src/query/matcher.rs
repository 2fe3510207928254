use super::parser::{NEGATION_MARKER, RuleSet, Term};
use std::borrow::Cow;

impl Term {
    /// Check a lowercased haystack against this term
    ///
    /// A term with empty text holds trivially, negated or not, so a stray
    /// `!` can never hide a row.
    pub fn matches(&self, haystack: &str) -> bool {
        if self.text.is_empty() {
            return true;
        }
        haystack.contains(self.text.as_str()) != self.negated
    }
}

impl RuleSet {
    /// Check whether `haystack` satisfies every term, ignoring case
    pub fn matches(&self, haystack: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        self.matches_folded(&fold_case(haystack))
    }

    /// Same as [`RuleSet::matches`] for a haystack that is already lowercased
    pub fn matches_folded(&self, haystack: &str) -> bool {
        self.terms.iter().all(|term| term.matches(haystack))
    }
}

/// Check `haystack` against `rules`, ignoring case
pub fn matches(haystack: &str, rules: &RuleSet) -> bool {
    rules.matches(haystack)
}

/// Lowercase `text`, borrowing it when it has nothing to fold
pub fn fold_case(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| c.to_lowercase().eq(std::iter::once(c))) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// Append an exclusion for every word of `phrase` to `query`
///
/// The result is the canonical form of the query. Words that are already
/// excluded are not repeated.
pub fn exclusion_query(query: &str, phrase: &str) -> String {
    let mut rules = RuleSet::parse(query);
    for word in phrase.split_whitespace() {
        let term = Term::exclude(word.trim_start_matches(NEGATION_MARKER).to_lowercase());
        if term.text.is_empty() || rules.terms.contains(&term) {
            continue;
        }
        rules.terms.push(term);
    }
    rules.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAYSTACK: &str = "summer jazz festival";

    #[test]
    fn test_empty_rules_match_everything() {
        let rules = RuleSet::parse("");
        assert!(rules.matches(HAYSTACK));
        assert!(rules.matches(""));
    }

    #[test]
    fn test_include_and_exclude() {
        assert!(matches(HAYSTACK, &RuleSet::parse("jazz")));
        assert!(!matches(HAYSTACK, &RuleSet::parse("rock")));
        assert!(matches(HAYSTACK, &RuleSet::parse("!rock")));
        assert!(!matches(HAYSTACK, &RuleSet::parse("!jazz")));
    }

    #[test]
    fn test_bare_marker_never_hides() {
        assert!(matches(HAYSTACK, &RuleSet::parse("!")));
        assert!(matches("", &RuleSet::parse("! ! !")));
    }

    #[test]
    fn test_empty_include_term_is_trivial() {
        let rules: RuleSet = vec![Term::include(""), Term::include("jazz")]
            .into_iter()
            .collect();
        assert!(rules.matches(HAYSTACK));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("Summer Jazz", &RuleSet::parse("JAZZ")));
        assert!(!matches("Summer Jazz", &RuleSet::parse("!jAzZ")));
    }

    #[test]
    fn test_exclusions_compose_with_and() {
        let rules = RuleSet::parse("!rock !pop");
        assert!(rules.matches("jazz night"));
        assert!(!rules.matches("rock night"));
        assert!(!rules.matches("pop night"));
    }

    #[test]
    fn test_term_order_does_not_matter() {
        let permutations = [
            "jazz !rock live",
            "jazz live !rock",
            "!rock jazz live",
            "!rock live jazz",
            "live jazz !rock",
            "live !rock jazz",
        ];
        for haystack in ["summer jazz live", "jazz rock live", "jazz", "live"] {
            let expected = RuleSet::parse(permutations[0]).matches(haystack);
            for query in &permutations[1..] {
                assert_eq!(
                    RuleSet::parse(query).matches(haystack),
                    expected,
                    "query '{query}' disagrees on '{haystack}'"
                );
            }
        }
    }

    #[test]
    fn test_fold_case_borrows_lowercase_text() {
        assert!(matches!(fold_case("already lower"), Cow::Borrowed(_)));
        assert_eq!(fold_case("MiXeD"), "mixed");
        assert_eq!(fold_case("ÄPFEL"), "äpfel");
    }

    #[test]
    fn test_exclusion_query() {
        assert_eq!(exclusion_query("jazz", "Rock Pop"), "jazz !rock !pop");
        assert_eq!(exclusion_query("jazz !rock", "rock"), "jazz !rock");
        assert_eq!(exclusion_query("", "!Kino"), "!kino");
        assert_eq!(exclusion_query("jazz", "  ! "), "jazz");
    }
}
