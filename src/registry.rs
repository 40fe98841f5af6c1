//! # Action Registry
//!
//! Rust cannot load executable code from a configuration file, so initializer
//! manifests reference configure actions by name. The [`ActionRegistry`] is
//! the table those references resolve against: application code registers an
//! action under a key, and a manifest's `configure = "key"` line picks it up.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::error::BoxError;
use crate::initializer::{AppHandle, Configure, FnConfigure};

/// Named configure actions available to loaded manifests.
pub struct ActionRegistry<A: AppHandle> {
    actions: HashMap<String, Arc<dyn Configure<A>>>,
}

impl<A: AppHandle> Default for ActionRegistry<A> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<A: AppHandle> ActionRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under a key. A later registration under the same
    /// key replaces the earlier one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        action: impl Configure<A> + 'static,
    ) -> &mut Self {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Register an async closure under a key.
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(Arc<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.register(name, FnConfigure::new(f))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Configure<A>>> {
        self.actions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn registered_actions_are_resolvable_by_name() {
        let mut registry = ActionRegistry::<AtomicUsize>::new();
        registry.register_fn("bump", |app: Arc<AtomicUsize>| async move {
            app.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(registry.len(), 1);
        assert!(registry.get("missing").is_none());

        let app = Arc::new(AtomicUsize::new(0));
        let action = registry.get("bump").expect("registered");
        action.configure(Arc::clone(&app)).await.unwrap();
        assert_eq!(app.load(Ordering::SeqCst), 1);
    }
}
