//! Command implementations
//!
//! Each command opens the store, works on one machine record and reports
//! on stdout. Errors carry the file and group they concern.

use anyhow::{Context, Result, bail};
use colored::*;
use linmach_core::persist;
use linmach_core::prelude::*;
use std::path::Path;
use tracing::info;

use crate::parse::{parse_matrix, parse_vector};

/// Parameters accepted by `set`
#[derive(Debug, Default)]
pub struct SetArgs {
    pub weights: Option<String>,
    pub biases: Option<String>,
    pub input_sub: Option<String>,
    pub input_div: Option<String>,
    pub activation: Option<Activation>,
}

fn open(path: &Path, mode: OpenMode) -> Result<FileStore> {
    FileStore::open(path, mode).with_context(|| format!("cannot open store {}", path.display()))
}

fn load(store: &FileStore, group: &str) -> Result<LinearMachine> {
    LinearMachine::load_from_group(store, group)
        .with_context(|| format!("cannot load machine from {} (group '{}')", store.path().display(), group))
}

fn save(machine: &LinearMachine, mut store: FileStore, group: &str) -> Result<()> {
    machine.save_to_group(&mut store, group)?;
    let path = store.path().to_path_buf();
    store
        .close()
        .with_context(|| format!("cannot write store {}", path.display()))
}

pub fn new_command(
    path: &Path,
    group: &str,
    inputs: usize,
    outputs: usize,
    activation: Activation,
    force: bool,
) -> Result<()> {
    let mut machine = LinearMachine::new(inputs, outputs)?;
    machine.set_activation(activation);

    let store = open(path, OpenMode::ReadWrite)?;
    if persist::has_record(&store, group) && !force {
        bail!(
            "{} already holds a machine in group '{}' (use --force to replace it)",
            path.display(),
            group
        );
    }
    save(&machine, store, group)?;

    info!(path = %path.display(), group, inputs, outputs, "machine created");
    println!(
        "{} {}x{} {} machine in {}",
        "Created".green().bold(),
        inputs,
        outputs,
        activation.to_string().cyan(),
        path.display()
    );
    Ok(())
}

pub fn info_command(path: &Path, group: &str, json: bool) -> Result<()> {
    let store = open(path, OpenMode::ReadOnly)?;
    let machine = load(&store, group)?;

    if json {
        let doc = serde_json::json!({
            "inputs": machine.input_size(),
            "outputs": machine.output_size(),
            "activation": machine.activation(),
            "weights": machine.weights().iter_rows().collect::<Vec<_>>(),
            "biases": machine.biases(),
            "input_sub": machine.input_subtraction(),
            "input_div": machine.input_division(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}", "Linear machine".bold());
    println!("  {:<12} {}", "store:", path.display());
    println!("  {:<12} {}", "group:", if group.is_empty() { "/" } else { group });
    println!("  {:<12} {} → {}", "shape:", machine.input_size(), machine.output_size());
    println!("  {:<12} {}", "activation:", machine.activation().to_string().cyan());
    println!("  {:<12} {:?}", "biases:", machine.biases());
    println!("  {:<12} {:?}", "input_sub:", machine.input_subtraction());
    println!("  {:<12} {:?}", "input_div:", machine.input_division());
    println!("  weights:");
    for row in machine.weights().iter_rows() {
        println!("    {:?}", row);
    }
    Ok(())
}

pub fn set_command(path: &Path, group: &str, args: SetArgs) -> Result<()> {
    let store = open(path, OpenMode::ReadWrite)?;
    let mut machine = load(&store, group)?;

    if let Some(text) = &args.weights {
        machine.set_weights(parse_matrix(text).context("--weights")?);
    }
    if let Some(text) = &args.biases {
        machine.set_biases(&parse_vector(text)?).context("--biases")?;
    }
    if let Some(text) = &args.input_sub {
        machine.set_input_subtraction(&parse_vector(text)?).context("--input-sub")?;
    }
    if let Some(text) = &args.input_div {
        machine.set_input_division(&parse_vector(text)?).context("--input-div")?;
    }
    if let Some(activation) = args.activation {
        machine.set_activation(activation);
    }

    if !machine.is_consistent() {
        bail!(
            "new weights are {}x{} but biases/normalization were not updated to match \
             (pass them too, or use `resize` first)",
            machine.input_size(),
            machine.output_size()
        );
    }

    save(&machine, store, group)?;
    println!("{} {}", "Updated".green().bold(), path.display());
    Ok(())
}

pub fn resize_command(path: &Path, group: &str, inputs: usize, outputs: usize) -> Result<()> {
    let store = open(path, OpenMode::ReadWrite)?;
    let mut machine = load(&store, group)?;
    let before = machine.shape();
    machine.resize(inputs, outputs)?;
    save(&machine, store, group)?;

    info!(path = %path.display(), group, ?before, after = ?machine.shape(), "machine resized");
    println!(
        "{} {}x{} → {}x{}",
        "Resized".green().bold(),
        before.0,
        before.1,
        inputs,
        outputs
    );
    Ok(())
}

/// Evaluate each input row; returns the outputs in order
pub fn forward_command(path: &Path, group: &str, inputs: &[String]) -> Result<Vec<Vec<f64>>> {
    let store = open(path, OpenMode::ReadOnly)?;
    let machine = load(&store, group)?;

    let mut output = vec![0.0; machine.output_size()];
    let mut results = Vec::with_capacity(inputs.len());
    for text in inputs {
        let input = parse_vector(text)?;
        machine
            .forward(&input, &mut output)
            .with_context(|| format!("input [{}]", text))?;
        let row = output
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        println!("{}", row);
        results.push(output.clone());
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_set_forward() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");

        new_command(&path, "", 3, 2, Activation::Tanh, false).unwrap();
        set_command(
            &path,
            "",
            SetArgs {
                weights: Some("0.4,0.1;0.4,0.2;0.2,0.7".into()),
                biases: Some("0.3,-3.0".into()),
                input_sub: Some("0,0.5,0.5".into()),
                input_div: Some("0.5,1,1".into()),
                activation: None,
            },
        )
        .unwrap();

        let out = forward_command(&path, "", &["1,1,1".to_string()]).unwrap();
        let raw0: f64 = 2.0 * 0.4 + 0.5 * 0.4 + 0.5 * 0.2 + 0.3;
        assert!((out[0][0] - raw0.tanh()).abs() < 1e-12);
    }

    #[test]
    fn test_new_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        new_command(&path, "a", 2, 2, Activation::Identity, false).unwrap();
        assert!(new_command(&path, "a", 2, 2, Activation::Identity, false).is_err());
        new_command(&path, "a", 3, 1, Activation::Identity, true).unwrap();
        new_command(&path, "b", 1, 1, Activation::Logistic, false).unwrap();
    }

    #[test]
    fn test_rejected_new_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        assert!(new_command(&path, "", 0, 2, Activation::Identity, false).is_err());
        assert!(new_command(&path, "", usize::MAX, 2, Activation::Identity, false).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_set_rejects_stale_reshape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        new_command(&path, "", 3, 2, Activation::Identity, false).unwrap();

        let args = SetArgs {
            weights: Some("1,2;3,4".into()),
            ..SetArgs::default()
        };
        assert!(set_command(&path, "", args).is_err());

        // the stored machine is untouched
        let store = FileStore::open(&path, OpenMode::ReadOnly).unwrap();
        assert_eq!(LinearMachine::load(&store).unwrap().shape(), (3, 2));
    }

    #[test]
    fn test_resize_then_forward() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        new_command(&path, "g", 3, 2, Activation::Identity, false).unwrap();
        resize_command(&path, "g", 2, 1).unwrap();
        let out = forward_command(&path, "g", &["5,-5".to_string()]).unwrap();
        assert_eq!(out, vec![vec![0.0]]);
        assert!(forward_command(&path, "g", &["1,2,3".to_string()]).is_err());
    }
}
