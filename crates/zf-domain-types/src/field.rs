// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};

/// Form attributes populated from a selected candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAttribute {
    City,
    State,
    County,
}

impl FieldAttribute {
    /// Fill order used by the auto-fill engine
    pub const ALL: [FieldAttribute; 3] =
        [FieldAttribute::City, FieldAttribute::State, FieldAttribute::County];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldAttribute::City => "city",
            FieldAttribute::State => "state",
            FieldAttribute::County => "county",
        }
    }
}

impl std::fmt::Display for FieldAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
