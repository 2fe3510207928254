//! Query parsing and matching
//!
//! A query is free text typed into the search box. It is split into terms
//! on whitespace and every term must hold for a row to stay visible.
//!
//! # Syntax
//!
//! ```text
//! word        Keep rows whose text contains "word"
//! !word       Hide rows whose text contains "word"
//! !           A bare marker is ignored, it never hides anything
//! ```
//!
//! Matching is case-insensitive and terms combine with AND logic, so
//! `jazz !rock !pop` keeps jazz rows that mention neither rock nor pop.
//!
//! # Examples
//!
//! ```
//! use event_search::query::RuleSet;
//!
//! let rules = RuleSet::parse("Jazz !rock");
//! assert!(rules.matches("Summer Jazz Festival"));
//! assert!(!rules.matches("Jazz meets Rock"));
//! ```

pub mod matcher;
pub mod parser;

pub use matcher::{exclusion_query, fold_case, matches};
pub use parser::{NEGATION_MARKER, RuleSet, Term, parse};
