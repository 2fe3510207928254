use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Prefix that turns a term into an exclusion
pub const NEGATION_MARKER: char = '!';

/// A single search term (e.g., "jazz" or "!rock")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    /// The substring to look for, lowercased and without the negation marker
    pub text: String,
    /// Whether this is an exclusion term (prefixed with !)
    pub negated: bool,
}

impl Term {
    /// A term that requires `text` to be present
    pub fn include(text: impl Into<String>) -> Self {
        Term {
            text: text.into(),
            negated: false,
        }
    }

    /// A term that requires `text` to be absent
    pub fn exclude(text: impl Into<String>) -> Self {
        Term {
            text: text.into(),
            negated: true,
        }
    }

    /// Parse a single whitespace-free token
    ///
    /// The token is lowercased. A leading `!` marks the term as negated and is
    /// stripped, which leaves an empty text for a bare `!`.
    pub fn parse(token: &str) -> Self {
        let token = token.to_lowercase();
        match token.strip_prefix(NEGATION_MARKER) {
            Some(stripped) => Term::exclude(stripped),
            None => Term::include(token),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "{}{}", NEGATION_MARKER, self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// A parsed query: every term must hold for a text to match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// All terms in query order (combined with AND logic)
    pub terms: Vec<Term>,
}

impl RuleSet {
    /// Create a rule set that matches everything
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Parse a raw query string
    ///
    /// Never fails: blank input gives an empty rule set.
    pub fn parse(query: &str) -> Self {
        query.split_whitespace().map(Term::parse).collect()
    }

    /// Check if this rule set is empty (no terms)
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    /// Texts that must be present
    pub fn include_terms(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter(|t| !t.negated)
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Texts that must be absent; bare markers are left out since they exclude nothing
    pub fn exclude_terms(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter(|t| t.negated && !t.text.is_empty())
            .map(|t| t.text.as_str())
            .collect()
    }
}

/// Shorthand for [`RuleSet::parse`]
pub fn parse(query: &str) -> RuleSet {
    RuleSet::parse(query)
}

impl FromStr for RuleSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RuleSet::parse(s))
    }
}

impl FromIterator<Term> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        RuleSet {
            terms: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_term() {
        let term = Term::parse("Jazz");
        assert_eq!(term.text, "jazz");
        assert!(!term.negated);
    }

    #[test]
    fn test_parse_exclude_term() {
        let term = Term::parse("!ROCK");
        assert_eq!(term.text, "rock");
        assert!(term.negated);
    }

    #[test]
    fn test_parse_bare_marker() {
        let term = Term::parse("!");
        assert_eq!(term, Term::exclude(""));
    }

    #[test]
    fn test_parse_double_marker_keeps_second() {
        let term = Term::parse("!!x");
        assert_eq!(term, Term::exclude("!x"));
    }

    #[test]
    fn test_parse_query() {
        let rules = RuleSet::parse("jazz !rock  live");
        assert_eq!(
            rules.terms,
            vec![
                Term::include("jazz"),
                Term::exclude("rock"),
                Term::include("live")
            ]
        );
        assert_eq!(rules.include_terms(), vec!["jazz", "live"]);
        assert_eq!(rules.exclude_terms(), vec!["rock"]);
    }

    #[test]
    fn test_parse_blank_queries() {
        assert!(RuleSet::parse("").is_empty());
        assert!(RuleSet::parse("   \t \n ").is_empty());
    }

    #[test]
    fn test_parse_mixed_whitespace() {
        let rules = RuleSet::parse("\tjazz\n\nlive ");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_display_is_canonical_query() {
        let rules = RuleSet::parse("  Jazz   !Rock ! ");
        assert_eq!(rules.to_string(), "jazz !rock !");
        assert_eq!(RuleSet::parse(&rules.to_string()), rules);
    }

    #[test]
    fn test_from_str() {
        let rules: RuleSet = "a !b".parse().unwrap();
        assert_eq!(rules.len(), 2);
    }
}
