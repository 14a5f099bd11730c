//! The side table of parser descriptions.
//!
//! A parser does not carry its description, the table does. The table never holds a
//! parser: it maps a [`ParserId`] to a string and the entry is dropped together with
//! the last handle of the parser it describes.
//!
//! ```
//! use parsnip::primitive::literal;
//! use parsnip::registry;
//!
//! let yo = literal("yo");
//! let id = yo.id();
//! assert_eq!(registry::describe(id).as_deref(), Some(r#"literal("yo")"#));
//!
//! drop(yo);
//! assert_eq!(registry::describe(id), None);
//! ```
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Identity of a parser value. Ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParserId(u64);

impl fmt::Display for ParserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

static DESCRIPTIONS: Lazy<Mutex<HashMap<ParserId, Arc<str>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn table() -> MutexGuard<'static, HashMap<ParserId, Arc<str>>> {
    // the map is never left half-updated, so a poisoned lock is still usable
    DESCRIPTIONS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn next_id() -> ParserId {
    ParserId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

pub(crate) fn register(id: ParserId, description: String) {
    table().insert(id, Arc::from(description));
}

pub(crate) fn forget(id: ParserId) {
    table().remove(&id);
}

/// Looks up the description of a live parser.
pub fn describe(id: ParserId) -> Option<String> {
    table().get(&id).map(|d| d.to_string())
}
