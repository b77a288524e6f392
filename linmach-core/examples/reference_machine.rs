//! Example: build, evaluate and persist a linear machine
//!
//! Demonstrates:
//! 1. Building a machine from weights, biases and normalization
//! 2. Evaluating single rows and a batch
//! 3. Saving to a file store and loading it back
//!
//! Run: `cargo run -p linmach-core --example reference_machine`

use linmach_core::prelude::*;

fn main() -> Result<()> {
    println!("🚀 Linear machine walkthrough\n");

    // Example 1: Construction
    println!("1️⃣ Construction:");
    let weights = Matrix::from_rows(&[[0.4, 0.1], [0.4, 0.2], [0.2, 0.7]])?;
    let machine = LinearMachine::from_parts(
        weights,
        vec![0.3, -3.0],
        vec![0.0, 0.5, 0.5],
        vec![0.5, 1.0, 1.0],
        Activation::Tanh,
    )?;
    println!(
        "   {} inputs → {} outputs, activation {}",
        machine.input_size(),
        machine.output_size(),
        machine.activation()
    );
    println!();

    // Example 2: Evaluation
    println!("2️⃣ Evaluation:");
    let rows = [[1.0, 1.0, 1.0], [0.5, 0.2, 200.0], [-27.0, 35.77, 0.0], [12.0, 0.0, 0.0]];
    let mut output = [0.0; 2];
    for row in &rows {
        machine.forward(row, &mut output)?;
        println!("   {:?} → [{:.6}, {:.6}]", row, output[0], output[1]);
    }
    let batch = machine.forward_batch(&Matrix::from_rows(&rows)?)?;
    println!("   batch of {} rows evaluated", batch.rows());
    println!();

    // Example 3: Persistence
    println!("3️⃣ Persistence:");
    let path = std::env::temp_dir().join("linmach-reference.json");
    let mut store = FileStore::open(&path, OpenMode::Truncate)?;
    machine.save_to_group(&mut store, "reference")?;
    store.close()?;

    let store = FileStore::open(&path, OpenMode::ReadOnly)?;
    let loaded = LinearMachine::load_from_group(&store, "reference")?;
    println!("   saved to {}", path.display());
    println!("   datasets: {:?}", store.paths().collect::<Vec<_>>());
    println!("   reloaded machine identical: {}", loaded == machine);

    Ok(())
}
