use actionpack_core::{ActionSpec, Inputs, ResultMap};
use async_trait::async_trait;

use crate::error::ActionError;

/// Strongly-typed action trait with native `async fn`.
///
/// This trait is **not** object-safe because it uses native `async fn` methods
/// (which desugar to opaque `impl Future` return types). If you need dynamic
/// dispatch, use [`DynAction`] instead -- every `Action` automatically
/// implements `DynAction` via a blanket implementation.
///
/// Implementations apply their own defaults and validation. Returning an
/// error is equivalent to returning [`ResultMap::from_error`]; the registry
/// performs that conversion.
pub trait Action: Send + Sync {
    /// Metadata for this action. Its name is the action's unique name.
    fn spec(&self) -> &ActionSpec;

    /// Execute the action with the given inputs.
    fn execute(
        &self,
        inputs: &Inputs,
    ) -> impl std::future::Future<Output = Result<ResultMap, ActionError>> + Send;
}

/// Object-safe action trait for use behind `Arc<dyn DynAction>`.
///
/// Uses [`macro@async_trait`] to enable dynamic dispatch of async methods.
/// You generally should not implement this trait directly -- instead implement
/// [`Action`] and rely on the blanket implementation.
#[async_trait]
pub trait DynAction: Send + Sync {
    fn spec(&self) -> &ActionSpec;

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError>;
}

/// Blanket implementation: any type that implements [`Action`] also
/// implements [`DynAction`], bridging the static and dynamic dispatch worlds.
#[async_trait]
impl<T: Action + Sync> DynAction for T {
    fn spec(&self) -> &ActionSpec {
        Action::spec(self)
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        Action::execute(self, inputs).await
    }
}
