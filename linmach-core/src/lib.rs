//! # linmach-core - Linear Machines
//!
//! A feed-forward linear machine with per-input normalization and an
//! elementwise activation, plus its persistence in a hierarchical store.
//!
//! ```text
//! input → (x - sub) / div → · W → + b → f(·) → output
//! ```
//!
//! ## Modules
//!
//! - **core**: activations, dense matrix, shape validation
//! - **machine**: the [`Machine`] trait and [`LinearMachine`]
//! - **store**: hierarchical store trait, in-memory and file backends
//! - **persist**: mapping of a machine onto store datasets
//! - **config**: environment-driven settings
//!
//! ## Example
//!
//! ```
//! use linmach_core::prelude::*;
//!
//! let weights = Matrix::from_rows(&[[0.4, 0.1], [0.4, 0.2], [0.2, 0.7]]).unwrap();
//! let mut machine = LinearMachine::from_weights(weights);
//! machine.set_biases(&[0.3, -3.0]).unwrap();
//! machine.set_activation(Activation::Tanh);
//!
//! let mut output = [0.0; 2];
//! machine.forward(&[1.0, 1.0, 1.0], &mut output).unwrap();
//!
//! let mut store = MemoryStore::new();
//! machine.save(&mut store).unwrap();
//! assert_eq!(LinearMachine::load(&store).unwrap(), machine);
//! ```

pub mod error;
pub use error::{MachineError, Result};

pub mod config;
pub use config::StoreConfig;

pub mod core;
pub use crate::core::prelude::*;

pub mod machine;
pub use machine::{LinearMachine, Machine};

pub mod store;
pub use store::{Dataset, FileStore, HierarchicalStore, MemoryStore, OpenMode, StoreError};

pub mod persist;

/// Prelude module with common re-exports
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::core::prelude::*;
    pub use crate::error::{MachineError, Result};
    pub use crate::machine::{LinearMachine, Machine};
    pub use crate::store::{Dataset, FileStore, HierarchicalStore, MemoryStore, OpenMode, StoreError};
}
