//! Display collaborator: somewhere a greeting can be written.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// A page that can look up elements by selector and replace their content.
pub trait Page: Send + Sync {
    /// Number of elements currently matching `selector`.
    fn matches(&self, selector: &str) -> usize;

    /// Replace the inner content of every element matching `selector`.
    fn set_inner_html(&self, selector: &str, content: &str);
}

/// In-memory page keyed by selector.
///
/// Each registered selector stands for one element; lookups are exact string
/// matches.
#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: Mutex<HashMap<String, String>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element reachable through `selector`, with empty content.
    pub fn with_element(self, selector: impl Into<String>) -> Self {
        self.insert(selector);
        self
    }

    pub fn insert(&self, selector: impl Into<String>) {
        self.lock().entry(selector.into()).or_default();
    }

    pub fn remove(&self, selector: &str) {
        self.lock().remove(selector);
    }

    /// Current content of the element at `selector`, if it exists.
    pub fn content(&self, selector: &str) -> Option<String> {
        self.lock().get(selector).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for MemoryPage {
    fn matches(&self, selector: &str) -> usize {
        usize::from(self.lock().contains_key(selector))
    }

    fn set_inner_html(&self, selector: &str, content: &str) {
        if let Some(element) = self.lock().get_mut(selector) {
            *element = content.to_string();
        }
    }
}
