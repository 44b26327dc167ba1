//! Scope matching for capability-based authorization.
//!
//! A scope is a string token of the form `resource:action:discriminator`.
//! A granted scope ending in `*` satisfies any required scope that shares
//! its literal prefix up to the marker; everything else is byte-wise exact
//! match. A scope set satisfies a required scope when at least one granted
//! scope does (logical OR, no combination logic).

use std::fmt::{Display, Formatter};

/// Wildcard marker recognized at the end of a granted scope.
const WILDCARD: char = '*';

/// A granted scope pattern, classified once at parse time.
///
/// The trailing-`*` check happens here rather than on every match, so the
/// matcher itself is a plain string comparison.
///
/// # Examples
///
/// ```rust
/// use lockbox::auth::scope::Scope;
///
/// assert_eq!(Scope::parse("secrets:get:captain:foo"), Scope::Exact("secrets:get:captain:foo".into()));
/// assert_eq!(Scope::parse("secrets:set:captain:*"), Scope::Prefix("secrets:set:captain:".into()));
/// assert_eq!(Scope::parse("*"), Scope::Prefix(String::new()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Satisfied only by a byte-identical required scope.
    Exact(String),
    /// Satisfied by any required scope starting with the stored prefix.
    Prefix(String),
}

impl Scope {
    /// Classify a granted scope string. Total for any well-formed string;
    /// a `*` anywhere but the final position is an ordinary byte.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix(WILDCARD) {
            Some(prefix) => Scope::Prefix(prefix.to_string()),
            None => Scope::Exact(raw.to_string()),
        }
    }

    /// Whether this granted scope satisfies the required scope.
    pub fn satisfies(&self, required: &str) -> bool {
        match self {
            Scope::Exact(scope) => scope == required,
            Scope::Prefix(prefix) => required.starts_with(prefix.as_str()),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Exact(scope) => write!(f, "{}", scope),
            Scope::Prefix(prefix) => write!(f, "{}{}", prefix, WILDCARD),
        }
    }
}

/// Whether any scope in the granted set satisfies the required scope.
pub fn satisfies(required: &str, granted: &[Scope]) -> bool {
    granted.iter().any(|scope| scope.satisfies(required))
}

/// The operations a caller can perform on a named secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretAction {
    Get,
    Set,
    Remove,
}

impl SecretAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretAction::Get => "get",
            SecretAction::Set => "set",
            SecretAction::Remove => "remove",
        }
    }
}

impl Display for SecretAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Required scope for performing `action` on the secret `name`.
///
/// Constructed deterministically as `secrets:<action>:<name>`.
pub fn required_scope(action: SecretAction, name: &str) -> String {
    format!("secrets:{}:{}", action.as_str(), name)
}

/// Required scope for the non-parameterized list operation. The result of
/// a list is additionally filtered per-item to names the caller could
/// individually `get`.
pub const LIST_SCOPE: &str = "secrets:list";

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(scopes: &[&str]) -> Vec<Scope> {
        scopes.iter().map(|s| Scope::parse(s)).collect()
    }

    #[test]
    fn exact_match_satisfies() {
        let set = granted(&["secrets:get:captain:foo"]);
        assert!(satisfies("secrets:get:captain:foo", &set));
        assert!(!satisfies("secrets:get:captain:bar", &set));
        assert!(!satisfies("secrets:set:captain:foo", &set));
    }

    #[test]
    fn trailing_wildcard_matches_prefix() {
        let set = granted(&["secrets:set:captain:*"]);
        assert!(satisfies("secrets:set:captain:foo", &set));
        assert!(satisfies("secrets:set:captain:nested/deep", &set));
        assert!(!satisfies("secrets:set:tennille:foo", &set));
        assert!(!satisfies("secrets:get:captain:foo", &set));
    }

    #[test]
    fn full_token_wildcard_matches_everything() {
        let set = granted(&["*"]);
        assert!(satisfies("secrets:get:anything", &set));
        assert!(satisfies("", &set));
    }

    #[test]
    fn wildcard_must_be_trailing() {
        // A `*` mid-token is an ordinary byte, not a glob.
        let set = granted(&["secrets:*:captain:foo"]);
        assert!(!satisfies("secrets:get:captain:foo", &set));
        assert!(satisfies("secrets:*:captain:foo", &set));
    }

    #[test]
    fn set_is_logical_or() {
        let set = granted(&["secrets:get:a", "secrets:get:b"]);
        assert!(satisfies("secrets:get:a", &set));
        assert!(satisfies("secrets:get:b", &set));
        assert!(!satisfies("secrets:get:c", &set));
        assert!(!satisfies("whatever", &[]));
    }

    #[test]
    fn prefix_includes_trailing_separator() {
        // The stored prefix ends with the colon, so a shorter name or a
        // sibling namespace never matches.
        let set = granted(&["secrets:get:captain:*"]);
        assert!(!satisfies("secrets:get:captain", &set));
        assert!(!satisfies("secrets:get:captain-two:foo", &set));
        assert!(satisfies("secrets:get:captain:", &set));
    }

    #[test]
    fn required_scope_construction() {
        assert_eq!(required_scope(SecretAction::Get, "captain:foo"), "secrets:get:captain:foo");
        assert_eq!(required_scope(SecretAction::Set, "a/b"), "secrets:set:a/b");
        assert_eq!(required_scope(SecretAction::Remove, "x"), "secrets:remove:x");
    }

    #[test]
    fn display_round_trips_parse() {
        for raw in ["secrets:get:foo", "secrets:set:captain:*", "*", ""] {
            assert_eq!(Scope::parse(raw).to_string(), raw.to_string());
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// satisfies(R, S) iff some granted scope equals R exactly or is
            /// a valid prefix-wildcard of R.
            #[test]
            fn satisfies_iff_exact_or_prefix(
                required in "[a-z:*/]{0,24}",
                raw_granted in proptest::collection::vec("[a-z:*/]{0,24}", 0..6),
            ) {
                let set: Vec<Scope> = raw_granted.iter().map(|s| Scope::parse(s)).collect();
                let expected = raw_granted.iter().any(|g| {
                    match g.strip_suffix('*') {
                        Some(prefix) => required.starts_with(prefix),
                        None => g == &required,
                    }
                });
                prop_assert_eq!(satisfies(&required, &set), expected);
            }

            /// A scope always satisfies itself when it carries no wildcard.
            #[test]
            fn exact_self_satisfaction(scope in "[a-z:/]{1,24}") {
                let set = vec![Scope::parse(&scope)];
                prop_assert!(satisfies(&scope, &set));
            }

            /// Matching is total: no input panics.
            #[test]
            fn total_on_arbitrary_strings(required in ".{0,40}", granted in ".{0,40}") {
                let set = vec![Scope::parse(&granted)];
                let _ = satisfies(&required, &set);
            }
        }
    }
}
