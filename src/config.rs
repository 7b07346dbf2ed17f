// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exploration budget and run settings.
//!
//! Settings come from the environment and can be overridden on the command line:
//!
//! | variable              | meaning                                  | default |
//! |-----------------------|------------------------------------------|---------|
//! | `NASH_MAX_NODES`      | node expansions per exploration          | 10000   |
//! | `NASH_MAX_DEPTH`      | deepest level that is expanded           | 32      |
//! | `NASH_CHARACTERISTIC` | `0` or a prime                           | 0       |
//! | `NASH_WORKERS`        | worker threads (1 = sequential builder)  | 1       |

use crate::blowup::Characteristic;
use crate::error::NashError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_MAX_NODES: usize = 10_000;
pub const DEFAULT_MAX_DEPTH: usize = 32;

pub const ENV_MAX_NODES: &str = "NASH_MAX_NODES";
pub const ENV_MAX_DEPTH: &str = "NASH_MAX_DEPTH";
pub const ENV_CHARACTERISTIC: &str = "NASH_CHARACTERISTIC";
pub const ENV_WORKERS: &str = "NASH_WORKERS";

/// Explicit bound on an exploration.
///
/// `max_nodes` counts expansions performed by one call. Nodes at depth
/// `max_depth` are discovered but not expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationBudget {
    pub max_nodes: usize,
    pub max_depth: usize,
}

impl Default for ExplorationBudget {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExplorationBudget {
    pub fn new(max_nodes: usize, max_depth: usize) -> Self {
        Self {
            max_nodes,
            max_depth,
        }
    }

    pub fn with_max_nodes(self, max_nodes: usize) -> Self {
        Self { max_nodes, ..self }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub budget: ExplorationBudget,
    pub characteristic: Characteristic,
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            budget: ExplorationBudget::default(),
            characteristic: Characteristic::Zero,
            workers: 1,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, NashError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable lookup; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NashError> {
        let mut settings = Settings::default();
        if let Some(v) = lookup(ENV_MAX_NODES) {
            settings.budget.max_nodes = parse(ENV_MAX_NODES, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_DEPTH) {
            settings.budget.max_depth = parse(ENV_MAX_DEPTH, &v)?;
        }
        if let Some(v) = lookup(ENV_CHARACTERISTIC) {
            settings.characteristic = v.parse()?;
        }
        if let Some(v) = lookup(ENV_WORKERS) {
            settings.workers = parse(ENV_WORKERS, &v)?;
            if settings.workers == 0 {
                return Err(NashError::invalid(format!("{} must be at least 1", ENV_WORKERS)));
            }
        }
        Ok(settings)
    }
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T, NashError> {
    value
        .trim()
        .parse()
        .map_err(|_| NashError::invalid(format!("{}={:?} is not a valid number", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, NashError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.budget.max_nodes, 10_000);
        assert_eq!(s.budget.max_depth, 32);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("NASH_MAX_NODES", "50"),
            ("NASH_MAX_DEPTH", " 4 "),
            ("NASH_CHARACTERISTIC", "5"),
            ("NASH_WORKERS", "3"),
        ])
        .unwrap();
        assert_eq!(s.budget, ExplorationBudget::new(50, 4));
        assert_eq!(s.characteristic, Characteristic::Prime(5));
        assert_eq!(s.workers, 3);
    }

    #[test]
    fn test_malformed_values() {
        assert!(settings(&[("NASH_MAX_NODES", "many")]).is_err());
        assert!(settings(&[("NASH_CHARACTERISTIC", "6")]).is_err());
        assert!(settings(&[("NASH_WORKERS", "0")]).is_err());
    }
}
