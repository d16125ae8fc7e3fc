//! Translation hook for UI strings.
//!
//! Localization itself is the host's problem; modules look strings up
//! through [`translate`] and ship the keys as fallback text.

use once_cell::sync::OnceCell;

/// Host-installed lookup. Returns `None` for unknown keys.
pub type LookupFn = fn(&str) -> Option<String>;

static LOOKUP: OnceCell<LookupFn> = OnceCell::new();

/// Install the process-wide lookup. Returns `false` if one is already set.
pub fn set_lookup(lookup: LookupFn) -> bool {
    LOOKUP.set(lookup).is_ok()
}

/// Translate `key`, falling back to the key itself.
pub fn translate(key: &str) -> String {
    LOOKUP
        .get()
        .and_then(|lookup| lookup(key))
        .unwrap_or_else(|| key.to_string())
}
