//! catalog.rs - The named-check store and the active profanity word set.
//!
//! A `CheckCatalog` is an explicit value owned by the caller and shared with
//! sessions through an `Arc`. Registration goes through an internal `RwLock`,
//! so it takes `&self` and is visible to every session holding the same
//! catalog. Entries are cloned out of the lock before a check runs; no lock
//! is ever held across an `.await`.
//!
//! A process-wide catalog (`CheckCatalog::global`) backs the free functions
//! `register_check`, `register_check_fn` and `register_profanity_list`, and
//! is what `Session::new` uses.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::checks::badwords::{normalize_words, DEFAULT_WORDS};
use crate::checks::{CheckContext, CheckKind, CheckResult, CustomCheck, FnCheck, WordSet};
use crate::errors::{CheckError, PatrolError};

#[derive(Default)]
struct CatalogState {
    /// Registration order of names; re-registering keeps the original slot.
    order: Vec<String>,
    entries: HashMap<String, CheckKind>,
    /// `None` until a custom list replaces the compiled-in default.
    profanity: Option<WordSet>,
}

/// Named checks plus the profanity word set they consult.
pub struct CheckCatalog {
    state: RwLock<CatalogState>,
}

lazy_static! {
    static ref GLOBAL_CATALOG: Arc<CheckCatalog> = Arc::new(CheckCatalog::with_builtins());
}

impl CheckCatalog {
    /// A catalog with nothing registered.
    pub fn empty() -> Self {
        Self {
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// A catalog holding the six built-in checks under their canonical names.
    pub fn with_builtins() -> Self {
        let catalog = Self::empty();
        for (name, kind) in CheckKind::builtins() {
            catalog.register(name, kind);
        }
        catalog
    }

    /// The process-wide catalog.
    pub fn global() -> Arc<CheckCatalog> {
        Arc::clone(&GLOBAL_CATALOG)
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("Check catalog lock was poisoned; continuing with last written state.");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Check catalog lock was poisoned; continuing with last written state.");
            poisoned.into_inner()
        })
    }

    /// Stores `kind` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, kind: CheckKind) {
        let name = name.into();
        let mut state = self.write();
        if state.entries.insert(name.clone(), kind).is_some() {
            debug!("Check '{}' re-registered; previous entry replaced.", name);
        } else {
            debug!("Check '{}' registered.", name);
            state.order.push(name);
        }
    }

    /// Registers a synchronous closure as a custom check.
    pub fn register_fn<F>(&self, name: impl Into<String>, check: F)
    where
        F: Fn(&str, &CheckContext) -> Result<CheckResult, CheckError> + Send + Sync + 'static,
    {
        self.register(name, CheckKind::custom(FnCheck(check)));
    }

    /// Registers a [`CustomCheck`] implementation.
    pub fn register_custom<C: CustomCheck + 'static>(&self, name: impl Into<String>, check: C) {
        self.register(name, CheckKind::custom(check));
    }

    /// Looks up a check by name.
    ///
    /// This is the one loud failure in the crate: asking for a name that was
    /// never registered is a programming error.
    pub fn get(&self, name: &str) -> Result<CheckKind, PatrolError> {
        self.read()
            .entries
            .get(name)
            .cloned()
            .ok_or_else(|| PatrolError::UnknownCheck(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.read().entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Replaces the active profanity list. The compiled-in default is not
    /// merged in; an empty list disables matching entirely.
    pub fn register_profanity_list<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = normalize_words(words);
        debug!("Registering custom profanity list with {} entries.", set.len());
        self.write().profanity = Some(Arc::new(set));
    }

    /// Drops any custom list, reverting to the compiled-in default.
    pub fn reset_profanity_list(&self) {
        self.write().profanity = None;
    }

    pub fn has_custom_profanity_list(&self) -> bool {
        self.read().profanity.is_some()
    }

    /// The word set the `badwords` check consults: the custom list if one was
    /// registered, otherwise the compiled-in default.
    pub fn word_set(&self) -> WordSet {
        match &self.read().profanity {
            Some(custom) => Arc::clone(custom),
            None => Arc::clone(&DEFAULT_WORDS),
        }
    }

    /// Quick probe against the custom list only; `false` while none is registered.
    ///
    /// Tokens are ASCII alphanumeric runs, which is coarser than the
    /// `badwords` tokenizer and meant for cheap pre-screening.
    pub fn contains_profanity(&self, value: &str) -> bool {
        let Some(custom) = self.read().profanity.clone() else {
            return false;
        };
        value
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| !token.is_empty() && custom.contains(token))
    }
}

impl Default for CheckCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for CheckCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("CheckCatalog")
            .field("checks", &state.order)
            .field("custom_profanity", &state.profanity.as_ref().map(|set| set.len()))
            .finish()
    }
}

/// Registers `kind` under `name` in the process-wide catalog.
pub fn register_check(name: impl Into<String>, kind: CheckKind) {
    GLOBAL_CATALOG.register(name, kind);
}

/// Registers a synchronous closure in the process-wide catalog.
pub fn register_check_fn<F>(name: impl Into<String>, check: F)
where
    F: Fn(&str, &CheckContext) -> Result<CheckResult, CheckError> + Send + Sync + 'static,
{
    GLOBAL_CATALOG.register_fn(name, check);
}

/// Replaces the profanity list of the process-wide catalog.
pub fn register_profanity_list<I, S>(words: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GLOBAL_CATALOG.register_profanity_list(words);
}
