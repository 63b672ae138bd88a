//! Serde structs for process configuration files.
//!
//! A configuration document is a list of processes, each an ordered list of
//! stages. JSON and RON files hold the list at the top level; TOML files hold
//! it under a `processes` key (`[[processes]]` tables).

use serde::Deserialize;

/// A named production process: a chain of stages run in `stage` order.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessData {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<StageData>,
}

/// One stage of a process. Becomes one factory.
#[derive(Debug, Clone, Deserialize)]
pub struct StageData {
    pub name: String,
    pub stage: u32,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}
