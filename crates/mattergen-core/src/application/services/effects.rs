//! Effect dispatch: named handler plugins and concurrent action execution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::EffectHandler},
    domain::{Action, BuildConfig, EffectRequest},
    error::{CoreError, CoreResult},
};

/// Capability name → handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn EffectHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn EffectHandler>) -> &mut Self {
        self.handlers.insert(handler.name().to_string(), handler);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, handler: impl EffectHandler + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn EffectHandler>> {
        self.handlers.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}

/// Runs the actions of one effect request.
pub struct EffectExecutor<'a> {
    config: &'a BuildConfig,
    registry: &'a HandlerRegistry,
}

impl<'a> EffectExecutor<'a> {
    pub fn new(config: &'a BuildConfig, registry: &'a HandlerRegistry) -> Self {
        Self { config, registry }
    }

    /// Run every action of `request` concurrently.
    ///
    /// Returns the owning file path once all actions finished. The first
    /// failing action fails the request.
    #[instrument(skip_all, fields(file = %request.file_path, actions = request.actions.len()))]
    pub async fn execute(&self, request: EffectRequest) -> CoreResult<String> {
        let EffectRequest {
            file_path,
            actions,
        } = request;

        try_join_all(actions.iter().map(|action| self.perform(&file_path, action))).await?;

        debug!("Effects performed");
        Ok(file_path)
    }

    async fn perform(&self, file_path: &str, action: &Action) -> CoreResult<()> {
        let Some(handler) = self.registry.get(&action.with) else {
            debug!(handler = %action.with, "No handler registered, skipping action");
            return Ok(());
        };

        handler
            .perform(self.config, &action.args)
            .await
            .map_err(|e| {
                CoreError::from(ApplicationError::EffectExecutionFailed {
                    file_path: file_path.to_string(),
                    handler: action.with.clone(),
                    reason: e.to_string(),
                })
            })
    }
}
