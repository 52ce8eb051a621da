use actionpack_action::ActionRegistry;

use crate::OutputFormat;

pub fn run(registry: &ActionRegistry, format: &OutputFormat) -> anyhow::Result<()> {
    let names = registry.list();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        OutputFormat::Text => {
            println!("{} actions:", names.len());
            for name in names {
                let description = registry
                    .get(name)
                    .map(|a| a.spec().description.clone())
                    .unwrap_or_default();
                println!("  {name:<28} {description}");
            }
        }
    }
    Ok(())
}
