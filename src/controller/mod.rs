//! Debounced filtering of a row list
//!
//! [`FilterController`] binds one query input to one list of rows. Keystrokes
//! arm a debounce timer; when the caller's event loop polls after the delay
//! has passed, the last typed value is parsed and every row's visibility is
//! recomputed in one pass.

pub mod debounce;

pub use debounce::{DEFAULT_DELAY, DebounceState, Debouncer};

use crate::clock::Clock;
use crate::query::{RuleSet, exclusion_query, fold_case};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

/// Handle to the text box holding the raw query
pub trait QueryInput {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
}

/// In-memory query input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl QueryInput for TextInput {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }
}

impl QueryInput for String {
    fn value(&self) -> String {
        self.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.clear();
        self.push_str(value);
    }
}

/// One displayed record and its visibility
#[derive(Debug, Clone)]
pub struct Row<T> {
    item: T,
    searchable: String,
    visible: bool,
}

impl<T> Row<T> {
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Lowercased text the query is matched against
    pub fn searchable_text(&self) -> &str {
        &self.searchable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Result of one filter application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterOutcome {
    pub visible: usize,
    pub hidden: usize,
    /// The default (unfiltered) view is shown only for an empty query
    pub empty_state_visible: bool,
}

/// Binds a query input to a list of rows
pub struct FilterController<T, I, C> {
    rows: Vec<Row<T>>,
    input: I,
    clock: C,
    debouncer: Debouncer,
    rules: RuleSet,
    last_query: String,
    empty_state_visible: bool,
    applications: usize,
}

impl<T, I: QueryInput, C: Clock> FilterController<T, I, C> {
    /// Bind `items` to `input`
    ///
    /// `search_field` picks the text each row is searched by. A value already
    /// present in the input (e.g. restored from a link) is applied right away.
    pub fn attach<F>(
        items: impl IntoIterator<Item = T>,
        input: I,
        clock: C,
        delay: Duration,
        search_field: F,
    ) -> Self
    where
        F: Fn(&T) -> String,
    {
        let rows = items
            .into_iter()
            .map(|item| {
                let searchable = fold_case(&search_field(&item)).into_owned();
                Row {
                    item,
                    searchable,
                    visible: true,
                }
            })
            .collect();

        let mut controller = Self {
            rows,
            input,
            clock,
            debouncer: Debouncer::new(delay),
            rules: RuleSet::new(),
            last_query: String::new(),
            empty_state_visible: true,
            applications: 0,
        };

        let initial = controller.input.value();
        if !initial.trim().is_empty() {
            debug!(query = %initial, "applying initial query");
            controller.apply_query(&initial);
        }
        controller
    }

    /// Record a keystroke and restart the debounce timer
    pub fn on_input(&mut self, raw: &str) {
        self.input.set_value(raw);
        let now = self.clock.now();
        if let Some(previous) = self.debouncer.arm(raw, now) {
            trace!(superseded = %previous, "debounce timer restarted");
        }
        trace!(value = %raw, deadline_ms = self.pending_deadline_ms(), "debounce timer armed");
    }

    /// Run the pending evaluation if its deadline has passed
    pub fn poll(&mut self) -> Option<FilterOutcome> {
        let value = self.debouncer.fire(self.clock.now())?;
        Some(self.apply_query(&value))
    }

    /// Empty the input and show every row, without waiting for the timer
    pub fn clear(&mut self) -> FilterOutcome {
        self.discard_pending();
        self.input.set_value("");
        self.apply_query("")
    }

    /// Hide rows containing any word of `phrase`, without waiting for the timer
    pub fn exclude(&mut self, phrase: &str) -> FilterOutcome {
        self.discard_pending();
        let query = exclusion_query(&self.input.value(), phrase);
        self.input.set_value(&query);
        self.apply_query(&query)
    }

    /// Apply the input's current value immediately
    pub fn apply_now(&mut self) -> FilterOutcome {
        self.discard_pending();
        let query = self.input.value();
        self.apply_query(&query)
    }

    /// Visibility summary of the current row state
    pub fn outcome(&self) -> FilterOutcome {
        let visible = self.rows.iter().filter(|r| r.visible).count();
        FilterOutcome {
            visible,
            hidden: self.rows.len() - visible,
            empty_state_visible: self.empty_state_visible,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the pending evaluation becomes due, on the controller's clock
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().filter(|r| r.visible).map(|r| &r.item)
    }

    /// Rules of the last completed application
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn empty_state_visible(&self) -> bool {
        self.empty_state_visible
    }

    /// Number of completed filter applications
    pub fn applications(&self) -> usize {
        self.applications
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Tear down the binding and hand back the items and the input
    pub fn detach(self) -> (Vec<T>, I) {
        let items = self.rows.into_iter().map(|r| r.item).collect();
        (items, self.input)
    }

    fn discard_pending(&mut self) {
        if let Some(value) = self.debouncer.cancel() {
            trace!(discarded = %value, "pending evaluation dropped");
        }
    }

    fn pending_deadline_ms(&self) -> u128 {
        self.debouncer.deadline().unwrap_or_default().as_millis()
    }

    fn apply_query(&mut self, query: &str) -> FilterOutcome {
        let rules = RuleSet::parse(query);
        for row in &mut self.rows {
            row.visible = rules.matches_folded(&row.searchable);
        }

        self.empty_state_visible = rules.is_empty();
        self.rules = rules;
        self.last_query = query.to_string();
        self.applications += 1;

        let outcome = self.outcome();
        debug!(
            query = %self.rules,
            visible = outcome.visible,
            hidden = outcome.hidden,
            "filter applied"
        );
        outcome
    }
}
