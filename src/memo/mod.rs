// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Memo store: canonical form to canonical children.
//!
//! The store is owned by the caller and passed by handle to every exploration,
//! so one store can serve many roots and many runs. It is tagged with the
//! variant and characteristic it was computed for; children of a cone are
//! meaningless for a semigroup exploration and vice versa.
//!
//! ## Claims
//!
//! Expansion is a test-and-set: [`MemoStore::claim`] either hands the key to
//! the caller (who must later [`record`](MemoStore::record) or
//! [`release`](MemoStore::release) it), reports that someone else is working
//! on it, or returns the finished children. This is what keeps concurrent
//! explorers from expanding the same canonical form twice.
//!
//! ## Persistence
//!
//! Only finished entries are saved. The JSON form is
//! `{"variant": ..., "characteristic": ..., "entries": [{"node": M, "children": [M, ...]}]}`
//! with entries sorted by node and children sorted, so saving is deterministic.

use crate::blowup::Characteristic;
use crate::error::NashError;
use crate::normal_form::{CanonicalForm, Variant};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of [`MemoStore::claim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The caller now owns the expansion of this key.
    Claimed,
    /// Another worker is expanding this key.
    InProgress,
    /// Already expanded; these are the children.
    Done(Vec<CanonicalForm>),
}

#[derive(Debug, Clone)]
enum Entry {
    InProgress,
    Done(Vec<CanonicalForm>),
}

#[derive(Debug, Clone)]
pub struct MemoStore {
    variant: Variant,
    characteristic: Characteristic,
    entries: HashMap<CanonicalForm, Entry>,
}

#[derive(Serialize, Deserialize)]
struct MemoFile {
    variant: Variant,
    characteristic: Characteristic,
    entries: Vec<MemoRecord>,
}

#[derive(Serialize, Deserialize)]
struct MemoRecord {
    node: CanonicalForm,
    children: Vec<CanonicalForm>,
}

impl MemoStore {
    pub fn new(variant: Variant, characteristic: Characteristic) -> Self {
        Self {
            variant,
            characteristic,
            entries: HashMap::new(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn characteristic(&self) -> Characteristic {
        self.characteristic
    }

    /// Number of finished entries.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, Entry::Done(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children of a finished entry.
    pub fn children(&self, key: &CanonicalForm) -> Option<&[CanonicalForm]> {
        match self.entries.get(key) {
            Some(Entry::Done(children)) => Some(children.as_slice()),
            _ => None,
        }
    }

    pub fn contains(&self, key: &CanonicalForm) -> bool {
        self.children(key).is_some()
    }

    /// Test-and-set for expansion of `key`.
    pub fn claim(&mut self, key: &CanonicalForm) -> Claim {
        match self.entries.get(key) {
            Some(Entry::Done(children)) => Claim::Done(children.clone()),
            Some(Entry::InProgress) => Claim::InProgress,
            None => {
                self.entries.insert(key.clone(), Entry::InProgress);
                Claim::Claimed
            }
        }
    }

    /// Record the children of `key`, finishing a claim. Children are stored sorted
    /// and without duplicates.
    pub fn record(&mut self, key: CanonicalForm, mut children: Vec<CanonicalForm>) {
        children.sort();
        children.dedup();
        self.entries.insert(key, Entry::Done(children));
    }

    /// Give up a claim without recording anything, e.g. after a failed expansion.
    pub fn release(&mut self, key: &CanonicalForm) {
        if matches!(self.entries.get(key), Some(Entry::InProgress)) {
            self.entries.remove(key);
        }
    }

    /// Finished entries, sorted by key.
    pub fn entries(&self) -> Vec<(&CanonicalForm, &[CanonicalForm])> {
        let mut finished: Vec<(&CanonicalForm, &[CanonicalForm])> = self
            .entries
            .iter()
            .filter_map(|(k, e)| match e {
                Entry::Done(children) => Some((k, children.as_slice())),
                Entry::InProgress => None,
            })
            .collect();
        finished.sort_by(|a, b| a.0.cmp(b.0));
        finished
    }

    /// Refuse a store computed for a different blowup.
    pub fn check_compatible(
        &self,
        variant: Variant,
        characteristic: Characteristic,
    ) -> Result<(), NashError> {
        if self.variant != variant || self.characteristic != characteristic {
            return Err(NashError::invalid(format!(
                "memo store holds {} results in characteristic {}, not {} in characteristic {}",
                self.variant, self.characteristic, variant, characteristic
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, NashError> {
        let file = MemoFile {
            variant: self.variant,
            characteristic: self.characteristic,
            entries: self
                .entries()
                .into_iter()
                .map(|(node, children)| MemoRecord {
                    node: node.clone(),
                    children: children.to_vec(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn from_json(json: &str) -> Result<Self, NashError> {
        let file: MemoFile = serde_json::from_str(json)?;
        let mut store = MemoStore::new(file.variant, file.characteristic);
        for record in file.entries {
            store.record(record.node, record.children);
        }
        Ok(store)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NashError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), entries = self.len(), "saved memo store");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NashError> {
        let path = path.as_ref();
        let store = Self::from_json(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), entries = store.len(), "loaded memo store");
        Ok(store)
    }

    /// Load `path` if it exists, otherwise start empty.
    pub fn load_or_new(
        path: impl AsRef<Path>,
        variant: Variant,
        characteristic: Characteristic,
    ) -> Result<Self, NashError> {
        let path = path.as_ref();
        if path.exists() {
            let store = Self::load(path)?;
            store.check_compatible(variant, characteristic)?;
            Ok(store)
        } else {
            debug!(path = %path.display(), "no memo store yet");
            Ok(Self::new(variant, characteristic))
        }
    }
}
