//! Encoder configuration.

use serde::{Deserialize, Serialize};

/// How `None` entries in a child list affect the declared list count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullChildPolicy {
    /// Drop nulls before counting; the header matches the nodes written.
    #[default]
    Skip,
    /// Count nulls in the header but write nothing for them.
    Count,
}

impl std::str::FromStr for NullChildPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(NullChildPolicy::Skip),
            "count" => Ok(NullChildPolicy::Count),
            other => Err(format!("unknown null child policy: {}", other)),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Null child handling.
    pub null_children: NullChildPolicy,
    /// Initial output buffer capacity in bytes.
    pub initial_capacity: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            null_children: NullChildPolicy::Skip,
            initial_capacity: 256,
        }
    }
}

impl EncoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_null_children(mut self, policy: NullChildPolicy) -> Self {
        self.null_children = policy;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
