//! JSON export of converged tables.
//!
//! Trained tables live in memory for the life of the process; this
//! module lets a training run be dumped for inspection or reuse. Keys
//! are the base-3 state keys, so an export is independent of how the
//! states were enumerated.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TttError, TttResult};
use crate::policy_iteration::PolicyIterationAgent;
use crate::value_iteration::ValueIterationAgent;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainedTables {
    pub algorithm: String,
    pub discount: f64,
    /// State key to converged value, for every reachable state.
    pub values: BTreeMap<u16, f64>,
    /// State key to chosen square, for every non-terminal reachable
    /// state. Absent for value iteration, which keeps no action table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<BTreeMap<u16, u8>>,
}

impl TrainedTables {
    pub fn from_value_agent(agent: &ValueIterationAgent) -> TttResult<TrainedTables> {
        if !agent.is_trained() {
            return Err(TttError::NotTrained);
        }
        Ok(TrainedTables {
            algorithm: "value_iteration".to_string(),
            discount: crate::mdp::DISCOUNT,
            values: agent.values().iter().map(|(k, v)| (k.0, v)).collect(),
            policy: None,
        })
    }

    pub fn from_policy_agent(agent: &PolicyIterationAgent) -> TttResult<TrainedTables> {
        if !agent.is_trained() {
            return Err(TttError::NotTrained);
        }
        let policy = agent
            .policy()
            .iter()
            .filter_map(|(k, mv)| mv.map(|mv| (k.0, mv as u8)))
            .collect();
        Ok(TrainedTables {
            algorithm: "policy_iteration".to_string(),
            discount: crate::mdp::DISCOUNT,
            values: agent.values().iter().map(|(k, v)| (k.0, v)).collect(),
            policy: Some(policy),
        })
    }

    pub fn to_json(&self) -> TttResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> TttResult<TrainedTables> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: &Path) -> TttResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
