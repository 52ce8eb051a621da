pub mod error;
pub mod inputs;
pub mod outputs;
pub mod spec;
pub mod strings;
pub mod validation;

pub use error::CoreError;
pub use inputs::Inputs;
pub use outputs::{EXCEPTION, RETURN_CODE, RETURN_RESULT, ResultMap, ReturnCode, STATUS_CODE};
pub use spec::{ActionSpec, InputSpec, MatchType, OutputSpec, ResponseSpec, ResponseType};
pub use validation::Validation;
