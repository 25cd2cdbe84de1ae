use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigErr, Result};

const DEFAULT_APPLY_FLOOR: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// Cluster-wide settings bound to a driver on `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// The minimum amount of updates the master accumulates between two applies,
    /// the actual cadence is the greatest between this and the amount of known clients.
    pub apply_floor: NonZeroUsize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            apply_floor: DEFAULT_APPLY_FLOOR,
        }
    }
}

impl ClusterConfig {
    /// Parses a `ClusterConfig` from a json document, missing fields take their default value.
    ///
    /// # Arguments
    /// * `json` - The json document.
    ///
    /// # Returns
    /// The parsed configuration or a `ConfigErr::Malformed` error.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigErr::Malformed(e).into())
    }

    /// Returns the amount of updates to accumulate before applying them.
    ///
    /// # Arguments
    /// * `known_clients` - The amount of clients currently known by the transport.
    pub fn apply_every(&self, known_clients: usize) -> u64 {
        known_clients.max(self.apply_floor.get()) as u64
    }
}
