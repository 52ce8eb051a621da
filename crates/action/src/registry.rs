use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use actionpack_core::{Inputs, ResultMap};
use tracing::{debug, info, instrument, warn};

use crate::action::DynAction;
use crate::error::ActionError;

/// A registry that maps action names to their implementations.
///
/// Actions are stored behind `Arc<dyn DynAction>` so they can be shared
/// across tasks safely. The registry itself is not thread-safe for mutation;
/// it is intended to be built once at startup and then shared as an immutable
/// reference or wrapped in an `Arc`.
///
/// Besides lookup, the registry is where errors become result maps: [`run`]
/// never fails, it reports every problem through the returned map.
///
/// [`run`]: ActionRegistry::run
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn DynAction>>,
    defaults: HashMap<String, BTreeMap<String, String>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// Register an action. The `ActionSpec` name is the lookup key.
    ///
    /// If an action with the same name already exists, it is replaced.
    pub fn register(&mut self, action: Arc<dyn DynAction>) {
        let name = action.spec().name.clone();
        if self.actions.insert(name.clone(), action).is_some() {
            warn!(action = %name, "replacing previously registered action");
        }
    }

    /// Set configured input defaults for one action.
    ///
    /// These apply before the action's own defaults and only fill inputs that
    /// are missing or empty.
    pub fn set_defaults(&mut self, action: impl Into<String>, defaults: BTreeMap<String, String>) {
        self.defaults.insert(action.into(), defaults);
    }

    /// Look up an action by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DynAction>> {
        self.actions.get(name).cloned()
    }

    /// Return a sorted list of all registered action names.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Return the number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Return `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run an action by name and return its result map.
    #[instrument(skip(self, inputs), fields(action = %name))]
    pub async fn run(&self, name: &str, inputs: &Inputs) -> ResultMap {
        let Some(action) = self.get(name) else {
            warn!("unknown action");
            return ResultMap::from_error(&ActionError::NotFound(name.to_owned()));
        };

        let mut inputs = inputs.clone();
        if let Some(defaults) = self.defaults.get(name) {
            inputs.merge_defaults(defaults.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let spec = action.spec();
        debug!(inputs = ?spec.redact(&inputs), "running action");

        let missing = spec.missing_required(&inputs);
        if !missing.is_empty() {
            let messages = missing
                .iter()
                .map(|n| format!("The {n} input is required."))
                .collect();
            return ResultMap::from_error(&ActionError::InvalidInputs(messages));
        }

        let started = Instant::now();
        let result = match action.execute(&inputs).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "action failed");
                ResultMap::from_error(&e)
            }
        };

        info!(
            return_code = result.return_code(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "action finished"
        );
        result
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actionpack_core::{ActionSpec, InputSpec};

    use super::*;
    use crate::action::Action;

    struct StubAction {
        spec: ActionSpec,
    }

    impl StubAction {
        fn new(name: &str) -> Self {
            Self {
                spec: ActionSpec::new(name, "stub")
                    .input(InputSpec::new("host").required())
                    .input(InputSpec::new("port")),
            }
        }
    }

    impl Action for StubAction {
        fn spec(&self) -> &ActionSpec {
            &self.spec
        }

        async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
            if inputs.get("host") == "fail" {
                return Err(ActionError::Connection("refused".into()));
            }
            Ok(ResultMap::success(format!(
                "{}:{}",
                inputs.get("host"),
                inputs.get("port")
            )))
        }
    }

    #[test]
    fn empty_registry() {
        let reg = ActionRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.list().is_empty());
    }

    #[test]
    fn register_and_get() {
        let mut reg = ActionRegistry::new();
        reg.register(Arc::new(StubAction::new("Modify Cell")));
        reg.register(Arc::new(StubAction::new("Get Cell")));

        assert_eq!(reg.len(), 2);
        let action = reg.get("Get Cell").expect("action should exist");
        assert_eq!(action.spec().name, "Get Cell");
        assert!(reg.get("Delete Cell").is_none());
    }

    #[test]
    fn list_sorted() {
        let mut reg = ActionRegistry::new();
        reg.register(Arc::new(StubAction::new("b")));
        reg.register(Arc::new(StubAction::new("a")));
        reg.register(Arc::new(StubAction::new("c")));
        assert_eq!(reg.list(), vec!["a", "b", "c"]);
    }

    #[test]
    fn register_replaces_existing() {
        let mut reg = ActionRegistry::new();
        reg.register(Arc::new(StubAction::new("a")));
        reg.register(Arc::new(StubAction::new("a")));
        assert_eq!(reg.len(), 1);
    }

    #[tokio::test]
    async fn run_unknown_action_is_failure_map() {
        let reg = ActionRegistry::new();
        let result = reg.run("nope", &Inputs::new()).await;
        assert_eq!(result.return_code(), "-1");
        assert_eq!(result.return_result(), "action not found: nope");
    }

    #[tokio::test]
    async fn run_reports_missing_required_inputs() {
        let mut reg = ActionRegistry::new();
        reg.register(Arc::new(StubAction::new("a")));
        let result = reg.run("a", &Inputs::new()).await;
        assert_eq!(result.return_code(), "-1");
        assert_eq!(result.return_result(), "The host input is required.");
    }

    #[tokio::test]
    async fn run_applies_configured_defaults() {
        let mut reg = ActionRegistry::new();
        reg.register(Arc::new(StubAction::new("a")));
        reg.set_defaults(
            "a",
            BTreeMap::from([("port".to_owned(), "389".to_owned())]),
        );

        let result = reg.run("a", &Inputs::new().with("host", "h")).await;
        assert_eq!(result.return_result(), "h:389");

        let result = reg
            .run("a", &Inputs::new().with("host", "h").with("port", "636"))
            .await;
        assert_eq!(result.return_result(), "h:636");
    }

    #[tokio::test]
    async fn run_converts_errors() {
        let mut reg = ActionRegistry::new();
        reg.register(Arc::new(StubAction::new("a")));
        let result = reg.run("a", &Inputs::new().with("host", "fail")).await;
        assert_eq!(result.return_code(), "-1");
        assert_eq!(result.return_result(), "connection error: refused");
        assert!(result.exception().is_some());
    }
}
