pub mod describe;
pub mod list;
pub mod params;
pub mod run;

use actionpack_core::InputSpec;

/// One line per input: name, flags, default and description.
pub(crate) fn print_inputs(inputs: &[InputSpec]) {
    for input in inputs {
        let mut flags = Vec::new();
        if input.required {
            flags.push("required");
        }
        if input.encrypted {
            flags.push("encrypted");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        };
        let default = input
            .default
            .as_deref()
            .map(|d| format!(" [default: {d}]"))
            .unwrap_or_default();
        println!("  {}{flags}{default}", input.name);
        if !input.description.is_empty() {
            println!("      {}", input.description);
        }
    }
}
