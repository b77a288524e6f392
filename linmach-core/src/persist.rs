//! Persistence of linear machines in a hierarchical store
//!
//! A machine occupies five datasets, at the store root or inside a group:
//!
//! | name | type | shape |
//! |------|------|-------|
//! | `weights` | f64 | `[n_inputs, n_outputs]` |
//! | `biases` | f64 | `[n_outputs]` |
//! | `input_sub` | f64 | `[n_inputs]` |
//! | `input_div` | f64 | `[n_inputs]` |
//! | `activation` | i64 | scalar |
//!
//! Floats are written and read as `f64`, so a save/load cycle is
//! bit-identical.

use tracing::{debug, warn};

use crate::core::activations::Activation;
use crate::core::matrix::Matrix;
use crate::error::{MachineError, Result};
use crate::machine::LinearMachine;
use crate::store::{Dataset, ElementType, HierarchicalStore, StoreError, join_path};

pub const WEIGHTS: &str = "weights";
pub const BIASES: &str = "biases";
pub const INPUT_SUB: &str = "input_sub";
pub const INPUT_DIV: &str = "input_div";
pub const ACTIVATION: &str = "activation";

/// Every dataset name a machine record uses
pub const RECORD_ENTRIES: [&str; 5] = [WEIGHTS, BIASES, INPUT_SUB, INPUT_DIV, ACTIVATION];

/// Save at the store root
pub fn save<S: HierarchicalStore + ?Sized>(machine: &LinearMachine, store: &mut S) -> Result<()> {
    save_to_group(machine, store, "")
}

/// Save inside `group` (empty for the root)
pub fn save_to_group<S: HierarchicalStore + ?Sized>(
    machine: &LinearMachine,
    store: &mut S,
    group: &str,
) -> Result<()> {
    machine.check_consistent().inspect_err(|e| {
        warn!(group, error = %e, "refusing to save machine with stale vectors");
    })?;
    store.write_array(&join_path(group, WEIGHTS), Dataset::matrix(machine.weights()))?;
    store.write_array(&join_path(group, BIASES), Dataset::vector(machine.biases().to_vec()))?;
    store.write_array(
        &join_path(group, INPUT_SUB),
        Dataset::vector(machine.input_subtraction().to_vec()),
    )?;
    store.write_array(
        &join_path(group, INPUT_DIV),
        Dataset::vector(machine.input_division().to_vec()),
    )?;
    store.write_scalar(&join_path(group, ACTIVATION), machine.activation().tag())?;

    debug!(group, shape = ?machine.shape(), activation = %machine.activation(), "machine saved");
    Ok(())
}

/// Load from the store root
pub fn load<S: HierarchicalStore + ?Sized>(store: &S) -> Result<LinearMachine> {
    load_from_group(store, "")
}

/// Load from `group` (empty for the root)
pub fn load_from_group<S: HierarchicalStore + ?Sized>(store: &S, group: &str) -> Result<LinearMachine> {
    let weights = read_float(store, group, WEIGHTS, 2)?;
    let (rows, cols) = (weights.shape()[0], weights.shape()[1]);
    let weights = Matrix::from_shape_vec(rows, cols, weights.into_f64().unwrap_or_default())
        .map_err(|e| MachineError::malformed(WEIGHTS, e.to_string()))?;

    let biases = read_vector(store, group, BIASES, cols)?;
    let input_sub = read_vector(store, group, INPUT_SUB, rows)?;
    let input_div = read_vector(store, group, INPUT_DIV, rows)?;

    let tag = store
        .read_scalar(&join_path(group, ACTIVATION))
        .map_err(|e| record_error(ACTIVATION, e))?;
    let activation = Activation::from_tag(tag)
        .ok_or_else(|| MachineError::malformed(ACTIVATION, format!("unknown activation tag {}", tag)))?;

    let machine = LinearMachine::from_parts(weights, biases, input_sub, input_div, activation)?;
    debug!(group, shape = ?machine.shape(), activation = %activation, "machine loaded");
    Ok(machine)
}

/// True if every record entry exists under `group`
pub fn has_record<S: HierarchicalStore + ?Sized>(store: &S, group: &str) -> bool {
    RECORD_ENTRIES
        .iter()
        .all(|name| store.contains(&join_path(group, name)))
}

fn read_float<S: HierarchicalStore + ?Sized>(
    store: &S,
    group: &str,
    name: &str,
    rank: usize,
) -> Result<Dataset> {
    let dataset = store
        .read_array(&join_path(group, name))
        .map_err(|e| record_error(name, e))?;
    if dataset.element_type() != ElementType::F64 || dataset.rank() != rank {
        return Err(MachineError::malformed(
            name,
            format!("expected rank-{} f64 array, found {}", rank, dataset.describe()),
        ));
    }
    Ok(dataset)
}

fn read_vector<S: HierarchicalStore + ?Sized>(
    store: &S,
    group: &str,
    name: &str,
    len: usize,
) -> Result<Vec<f64>> {
    let dataset = read_float(store, group, name, 1)?;
    if dataset.shape()[0] != len {
        return Err(MachineError::malformed(
            name,
            format!("expected length {}, found {}", len, dataset.shape()[0]),
        ));
    }
    Ok(dataset.into_f64().unwrap_or_default())
}

/// Missing or mistyped entries are record problems; anything else is the
/// store's.
fn record_error(name: &str, err: StoreError) -> MachineError {
    match err {
        StoreError::NotFound(_) => MachineError::malformed(name, "missing"),
        StoreError::TypeMismatch { expected, found, .. } => {
            MachineError::malformed(name, format!("expected {}, found {}", expected, found))
        }
        other => MachineError::Store(other),
    }
}

impl LinearMachine {
    /// See [`save`]
    pub fn save<S: HierarchicalStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        save(self, store)
    }

    /// See [`save_to_group`]
    pub fn save_to_group<S: HierarchicalStore + ?Sized>(&self, store: &mut S, group: &str) -> Result<()> {
        save_to_group(self, store, group)
    }

    /// See [`load`]
    pub fn load<S: HierarchicalStore + ?Sized>(store: &S) -> Result<Self> {
        load(store)
    }

    /// See [`load_from_group`]
    pub fn load_from_group<S: HierarchicalStore + ?Sized>(store: &S, group: &str) -> Result<Self> {
        load_from_group(store, group)
    }
}
