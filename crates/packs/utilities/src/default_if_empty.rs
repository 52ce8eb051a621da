use actionpack_action::{Action, ActionError};
use actionpack_core::strings::{default_if_blank, is_blank, to_boolean};
use actionpack_core::{ActionSpec, InputSpec, Inputs, ResultMap, Validation};
use tracing::debug;

pub const INITIAL_VALUE: &str = "initialValue";
pub const DEFAULT_VALUE: &str = "defaultValue";
pub const TRIM: &str = "trim";

pub const DEFAULT_TRIM: &str = "true";

/// `initial`, or `default` when `initial` is empty.
///
/// With `trim` a whitespace-only `initial` counts as empty too.
pub fn default_if_blank_or_empty(initial: &str, default: &str, trim: bool) -> String {
    let missing = if trim {
        is_blank(initial)
    } else {
        initial.is_empty()
    };
    if missing { default } else { initial }.to_owned()
}

/// Replace an empty initial value with a default.
pub struct DefaultIfEmpty {
    spec: ActionSpec,
}

impl DefaultIfEmpty {
    pub fn new() -> Self {
        let spec = ActionSpec::new(
            "Default If Empty",
            "Returns the default value when the initial value is empty or blank.",
        )
        .input(InputSpec::new(INITIAL_VALUE).describe("The initial string."))
        .input(
            InputSpec::new(DEFAULT_VALUE)
                .required()
                .describe("The value used when the initial string is empty."),
        )
        .input(
            InputSpec::new(TRIM)
                .describe("true to treat a whitespace-only initial string as empty.")
                .default_value(DEFAULT_TRIM),
        );
        Self { spec }
    }
}

impl Default for DefaultIfEmpty {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DefaultIfEmpty {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let trim = default_if_blank(inputs.get(TRIM), DEFAULT_TRIM).trim();
        Validation::new()
            .required(DEFAULT_VALUE, inputs.get(DEFAULT_VALUE))
            .boolean(TRIM, trim)
            .finish()?;
        let trim = to_boolean(trim)?;

        let value =
            default_if_blank_or_empty(inputs.get(INITIAL_VALUE), inputs.get(DEFAULT_VALUE), trim);
        debug!(replaced = value != inputs.get(INITIAL_VALUE), "default applied");
        Ok(ResultMap::success(value))
    }
}
