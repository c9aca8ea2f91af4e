// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk JSON shape of a pre-parsed pipeline bundle (spec §6.3):
//! `{"steps": {id: StepDef, ...}, "starters": [id, ...]}`, exactly what
//! the (out-of-scope) parser hands the admitter.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use stepgraph_core::{StepDef, StepId};

#[derive(Debug, Deserialize)]
pub struct Bundle {
    pub steps: HashMap<StepId, StepDef>,
    pub starters: HashSet<StepId>,
}

impl Bundle {
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(std::io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_bundle() {
        let json = r#"{
            "steps": {
                "step-a": {
                    "id": "step-a", "name": "a", "language": "python",
                    "func": "run", "code": ""
                }
            },
            "starters": ["step-a"]
        }"#;
        let bundle: Bundle = serde_json::from_str(json).expect("parse bundle");
        assert_eq!(bundle.steps.len(), 1);
        assert!(bundle.starters.contains(&StepId::from_string("step-a")));
    }
}
