use actionpack_action::ActionRegistry;
use anyhow::bail;
use clap::Args;

use crate::OutputFormat;
use crate::commands::print_inputs;

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Action name, as shown by `list`.
    pub action: String,
}

pub fn run(
    registry: &ActionRegistry,
    args: &DescribeArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let Some(action) = registry.get(&args.action) else {
        bail!("unknown action: {}", args.action);
    };
    let spec = action.spec();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(spec)?);
        }
        OutputFormat::Text => {
            println!("{}", spec.name);
            println!("{}", spec.description);
            println!();
            println!("Inputs:");
            print_inputs(&spec.inputs);
            println!();
            println!("Outputs:");
            for output in &spec.outputs {
                println!("  {:<20} {}", output.name, output.description);
            }
        }
    }
    Ok(())
}
