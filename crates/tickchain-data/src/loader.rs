//! Loading pipeline: reads a process file, validates it, and builds an engine.
//!
//! Provides format detection (RON/JSON/TOML), deserialization helpers, and
//! the stage-to-factory construction used by the driver.

use crate::schema::{ProcessData, StageData};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tickchain_core::engine::Engine;
use tickchain_core::factory::Factory;
use tickchain_core::graph::GraphError;
use tickchain_core::item::{Inventory, ItemType, Quantity};
use tickchain_core::recipe::{Recipe, RecipeError};
use tickchain_core::sim::Ticks;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// Two stages of one process share a stage index.
    #[error("duplicate stage index {stage} in process '{process}'")]
    DuplicateStage { process: String, stage: u32 },

    /// An input or output name is empty after trimming.
    #[error("empty item name in stage {stage} of process '{process}'")]
    EmptyItemName { process: String, stage: u32 },

    /// The stage defaults cannot form a valid recipe.
    #[error(transparent)]
    Recipe(#[from] RecipeError),

    /// Wiring the built factories failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_list(&content, format, path, toml_key)
}

fn parse_list<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => {
            let table: toml::Value =
                toml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_err(format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_err(e.to_string()))
        }
    }
}

// ===========================================================================
// Engine construction
// ===========================================================================

/// Quantity and duration applied to every recipe built from a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDefaults {
    pub quantity: Quantity,
    pub duration: Ticks,
}

impl Default for StageDefaults {
    fn default() -> Self {
        Self {
            quantity: 1_000_000_000,
            duration: 50,
        }
    }
}

/// An engine built from configuration, ready to step.
#[derive(Debug)]
pub struct LoadedSimulation {
    pub engine: Engine,
    pub process_count: usize,
}

/// Build one factory per stage and chain adjacent stages of each process.
///
/// Stages are ordered by their `stage` index. The whole document is
/// validated before any factory is created, so an error never leaves a
/// partially built engine behind.
pub fn build_engine(
    processes: &[ProcessData],
    defaults: StageDefaults,
) -> Result<LoadedSimulation, DataLoadError> {
    let mut plans = Vec::with_capacity(processes.len());
    for process in processes {
        plans.push(plan_process(process, defaults)?);
    }

    let mut engine = Engine::new();
    for (process, stages) in processes.iter().zip(plans) {
        let mut previous = None;
        for (name, recipe) in stages {
            let id = engine.add_factory(Factory::new(recipe).with_name(name));
            if let Some(prev) = previous {
                engine.connect(prev, id)?;
            }
            previous = Some(id);
        }
        tracing::debug!(process = %process.name, stages = process.stages.len(), "built process");
    }

    tracing::info!(
        processes = processes.len(),
        factories = engine.graph.factory_count(),
        connections = engine.graph.connection_count(),
        "configuration loaded"
    );

    Ok(LoadedSimulation {
        engine,
        process_count: processes.len(),
    })
}

/// Sorted stages of one process, each paired with its recipe.
fn plan_process(
    process: &ProcessData,
    defaults: StageDefaults,
) -> Result<Vec<(String, Arc<Recipe>)>, DataLoadError> {
    let mut stages: Vec<&StageData> = process.stages.iter().collect();
    stages.sort_by_key(|s| s.stage);

    for pair in stages.windows(2) {
        if pair[0].stage == pair[1].stage {
            return Err(DataLoadError::DuplicateStage {
                process: process.name.clone(),
                stage: pair[1].stage,
            });
        }
    }

    stages
        .into_iter()
        .map(|stage| {
            let inputs = stage_inventory(process, stage, &stage.inputs, defaults.quantity)?;
            let outputs = stage_inventory(process, stage, &stage.outputs, defaults.quantity)?;
            let recipe = Recipe::new(inputs, outputs, defaults.duration)?.with_name(&stage.name);
            Ok::<_, DataLoadError>((stage.name.clone(), Arc::new(recipe)))
        })
        .collect()
}

/// Map every listed type to `quantity`. A type listed twice is still
/// required once.
fn stage_inventory(
    process: &ProcessData,
    stage: &StageData,
    names: &[String],
    quantity: Quantity,
) -> Result<Inventory, DataLoadError> {
    let mut types = BTreeSet::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            return Err(DataLoadError::EmptyItemName {
                process: process.name.clone(),
                stage: stage.stage,
            });
        }
        types.insert(ItemType::from(name));
    }
    Ok(types.into_iter().map(|item| (item, quantity)).collect())
}

/// Read a process file and build an engine from it.
pub fn load_file(path: &Path, defaults: StageDefaults) -> Result<LoadedSimulation, DataLoadError> {
    let processes: Vec<ProcessData> = deserialize_list(path, "processes")?;
    tracing::debug!(file = %path.display(), processes = processes.len(), "parsed configuration");
    build_engine(&processes, defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tickchain_core::test_utils::*;

    /// Create a unique temporary directory for a test.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tickchain_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    fn stage(name: &str, index: u32, inputs: &[&str], outputs: &[&str]) -> StageData {
        StageData {
            name: name.to_string(),
            stage: index,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn process(name: &str, stages: Vec<StageData>) -> ProcessData {
        ProcessData {
            name: name.to_string(),
            stages,
        }
    }

    const STEEL_JSON: &str = r#"[
        {
            "name": "Steel",
            "stages": [
                {"name": "Mine", "stage": 0, "inputs": [], "outputs": ["IronOre"]},
                {"name": "Smelt", "stage": 1, "inputs": ["IronOre"], "outputs": ["Steel"]}
            ]
        },
        {
            "name": "Coal",
            "stages": [
                {"name": "Dig", "stage": 0, "inputs": [], "outputs": ["Coal"]}
            ]
        }
    ]"#;

    // -----------------------------------------------------------------------
    // Format detection
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        let err = detect_format(Path::new("processes.yaml")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat { .. }));
        assert!(matches!(
            detect_format(Path::new("processes")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Engine construction
    // -----------------------------------------------------------------------

    #[test]
    fn stages_become_named_factories_in_order() {
        let processes = vec![process(
            "Steel",
            vec![
                stage("Smelt", 2, &["IronOre", "Coal"], &["Steel"]),
                stage("Mine", 1, &[], &["IronOre"]),
            ],
        )];

        let loaded = build_engine(&processes, StageDefaults::default()).unwrap();
        let engine = &loaded.engine;

        let names: Vec<_> = engine.graph.factories().map(|(_, f)| f.name().unwrap()).collect();
        assert_eq!(names, vec!["Mine", "Smelt"]);

        let order = engine.graph.order();
        let smelt = engine.factory(order[1]).unwrap().recipe().unwrap();
        assert_eq!(
            *smelt.inputs(),
            inventory(&[("Coal", 1_000_000_000), ("IronOre", 1_000_000_000)])
        );
        assert_eq!(*smelt.outputs(), inventory(&[("Steel", 1_000_000_000)]));
        assert_eq!(smelt.duration(), 50);
    }

    #[test]
    fn adjacent_stages_are_chained_within_a_process_only() {
        let processes = vec![
            process(
                "A",
                vec![stage("a0", 0, &[], &["X"]), stage("a1", 1, &["X"], &["Y"]), stage("a2", 2, &["Y"], &[])],
            ),
            process("B", vec![stage("b0", 0, &[], &["Z"]), stage("b1", 1, &["Z"], &[])]),
        ];

        let loaded = build_engine(&processes, StageDefaults::default()).unwrap();
        assert_eq!(loaded.process_count, 2);

        let graph = &loaded.engine.graph;
        let order = graph.order();
        assert_eq!(graph.factory_count(), 5);
        let pairs: Vec<_> = graph.connections().iter().map(|c| (c.from, c.to)).collect();
        assert_eq!(
            pairs,
            vec![(order[0], order[1]), (order[1], order[2]), (order[3], order[4])]
        );
    }

    #[test]
    fn item_names_are_trimmed_and_deduplicated() {
        let processes = vec![process("P", vec![stage("s", 0, &[" Coal ", "Coal"], &["\tSteel"])])];
        let defaults = StageDefaults {
            quantity: 7,
            duration: 3,
        };

        let loaded = build_engine(&processes, defaults).unwrap();
        let id = loaded.engine.graph.order()[0];
        let recipe = loaded.engine.factory(id).unwrap().recipe().unwrap();
        assert_eq!(*recipe.inputs(), inventory(&[("Coal", 7)]));
        assert_eq!(*recipe.outputs(), inventory(&[("Steel", 7)]));
        assert_eq!(recipe.duration(), 3);
    }

    #[test]
    fn duplicate_stage_index_rejected() {
        let processes = vec![process("Dup", vec![stage("a", 1, &[], &["X"]), stage("b", 1, &[], &["Y"])])];
        let err = build_engine(&processes, StageDefaults::default()).unwrap_err();
        match err {
            DataLoadError::DuplicateStage { process, stage } => {
                assert_eq!(process, "Dup");
                assert_eq!(stage, 1);
            }
            other => panic!("expected DuplicateStage, got {other:?}"),
        }
    }

    #[test]
    fn empty_item_name_rejected() {
        let processes = vec![process("P", vec![stage("s", 4, &["Coal", "  "], &[])])];
        let err = build_engine(&processes, StageDefaults::default()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::EmptyItemName { ref process, stage: 4 } if process == "P"
        ));
    }

    #[test]
    fn zero_default_duration_rejected() {
        let processes = vec![process("P", vec![stage("s", 0, &[], &["X"])])];
        let defaults = StageDefaults {
            duration: 0,
            ..StageDefaults::default()
        };
        let err = build_engine(&processes, defaults).unwrap_err();
        assert!(matches!(err, DataLoadError::Recipe(RecipeError::ZeroDuration)));
    }

    #[test]
    fn empty_document_builds_empty_engine() {
        let loaded = build_engine(&[], StageDefaults::default()).unwrap();
        assert_eq!(loaded.process_count, 0);
        assert_eq!(loaded.engine.graph.factory_count(), 0);
        assert_eq!(loaded.engine.report(), "");
    }

    #[test]
    fn loaded_chain_moves_material_downstream() {
        let processes = vec![process(
            "P",
            vec![stage("src", 0, &[], &["X"]), stage("dst", 1, &["X"], &["Y"])],
        )];
        let defaults = StageDefaults {
            quantity: 5,
            duration: 2,
        };
        let mut loaded = build_engine(&processes, defaults).unwrap();
        let order = loaded.engine.graph.order().to_vec();

        // src: start at 1, complete at 2; X moves and dst starts at 3.
        loaded.engine.run(3);
        assert_eq!(loaded.engine.factory(order[1]).unwrap().progress(), 1);
        assert_eq!(output_quantity(&loaded.engine, order[0], "X"), 0);
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    #[test]
    fn load_json_file() {
        let dir = make_test_dir("json");
        let path = dir.join("processes.json");
        fs::write(&path, STEEL_JSON).unwrap();

        let loaded = load_file(&path, StageDefaults::default()).unwrap();
        assert_eq!(loaded.process_count, 2);
        assert_eq!(loaded.engine.graph.factory_count(), 3);
        assert_eq!(loaded.engine.graph.connection_count(), 1);

        cleanup(&dir);
    }

    #[test]
    fn load_toml_file() {
        let dir = make_test_dir("toml");
        let path = dir.join("processes.toml");
        fs::write(
            &path,
            r#"
[[processes]]
name = "Steel"

[[processes.stages]]
name = "Mine"
stage = 0
outputs = ["IronOre"]

[[processes.stages]]
name = "Smelt"
stage = 1
inputs = ["IronOre"]
outputs = ["Steel"]
"#,
        )
        .unwrap();

        let loaded = load_file(&path, StageDefaults::default()).unwrap();
        assert_eq!(loaded.process_count, 1);
        assert_eq!(loaded.engine.graph.factory_count(), 2);
        assert_eq!(loaded.engine.graph.connection_count(), 1);

        cleanup(&dir);
    }

    #[test]
    fn load_ron_file() {
        let dir = make_test_dir("ron");
        let path = dir.join("processes.ron");
        fs::write(
            &path,
            r#"[(name: "Coal", stages: [(name: "Dig", stage: 0, inputs: [], outputs: ["Coal"])])]"#,
        )
        .unwrap();

        let loaded = load_file(&path, StageDefaults::default()).unwrap();
        assert_eq!(loaded.process_count, 1);
        assert_eq!(loaded.engine.graph.factory_count(), 1);

        cleanup(&dir);
    }

    #[test]
    fn toml_without_processes_key_is_parse_error() {
        let dir = make_test_dir("toml_missing_key");
        let path = dir.join("processes.toml");
        fs::write(&path, "name = \"oops\"\n").unwrap();

        let err = load_file(&path, StageDefaults::default()).unwrap_err();
        match err {
            DataLoadError::Parse { detail, .. } => assert!(detail.contains("processes")),
            other => panic!("expected Parse, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = make_test_dir("bad_json");
        let path = dir.join("processes.json");
        fs::write(&path, "[{\"name\": \"P\", \"stages\": [").unwrap();

        let err = load_file(&path, StageDefaults::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { ref file, .. } if *file == path));

        cleanup(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = make_test_dir("missing");
        let err = load_file(&dir.join("nope.json"), StageDefaults::default()).unwrap_err();
        assert!(matches!(err, DataLoadError::Io(_)));
        cleanup(&dir);
    }
}
