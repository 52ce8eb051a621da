use std::path::{Path, PathBuf};

use actionpack_action::ActionRegistry;
use actionpack_core::{Inputs, ResultMap};
use anyhow::{Context, bail};
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Action name, as shown by `list`.
    pub action: String,

    /// Input assignment `name=value`. May be repeated.
    #[arg(short, long = "input", value_name = "NAME=VALUE")]
    pub inputs: Vec<String>,

    /// JSON or TOML file with inputs. `--input` values override it.
    #[arg(long)]
    pub inputs_file: Option<PathBuf>,
}

/// Merge the inputs file with the command-line assignments.
pub fn build_inputs(args: &RunArgs) -> anyhow::Result<Inputs> {
    let mut inputs = match &args.inputs_file {
        Some(path) => read_inputs_file(path)?,
        None => Inputs::new(),
    };
    let assignments = Inputs::parse_assignments(args.inputs.iter().map(String::as_str))?;
    for (name, value) in assignments.iter() {
        inputs.insert(name, value);
    }
    Ok(inputs)
}

fn read_inputs_file(path: &Path) -> anyhow::Result<Inputs> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let inputs = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Inputs::from_json(&text)?,
        Some("toml") => Inputs::from_toml(&text)?,
        _ => bail!(
            "unsupported inputs file {}: expected .json or .toml",
            path.display()
        ),
    };
    Ok(inputs)
}

/// Run the action and print its result map. Returns the result for the exit code.
pub async fn run(
    registry: &ActionRegistry,
    args: &RunArgs,
    format: &OutputFormat,
) -> anyhow::Result<ResultMap> {
    if registry.get(&args.action).is_none() {
        bail!("unknown action: {}", args.action);
    }
    let inputs = build_inputs(args)?;
    let result = registry.run(&args.action, &inputs).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            for (key, value) in result.iter() {
                println!("{key}: {value}");
            }
        }
    }
    Ok(result)
}
