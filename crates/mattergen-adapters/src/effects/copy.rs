use async_trait::async_trait;
use mattergen_core::{application::ports::EffectHandler, domain::BuildConfig, error::CoreResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::{EffectError, ensure_parent, within_project};

const NAME: &str = "copy";

/// Plain file copy: `{ "from": "...", "to": "..." }`, both project-relative.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyHandler;

#[derive(Debug, Deserialize)]
struct CopyArgs {
    from: String,
    to: String,
}

impl CopyHandler {
    async fn run(&self, config: &BuildConfig, args: &Value) -> Result<(), EffectError> {
        let args = CopyArgs::deserialize(args)?;
        let from = within_project(config, &config.project_path(&args.from))?;
        let to = within_project(config, &config.project_path(&args.to))?;

        ensure_parent(&to).await?;
        tokio::fs::copy(&from, &to)
            .await
            .map_err(EffectError::io(&from))?;
        Ok(())
    }
}

#[async_trait]
impl EffectHandler for CopyHandler {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip_all, name = "copy_effect")]
    async fn perform(&self, config: &BuildConfig, args: &Value) -> CoreResult<()> {
        self.run(config, args).await.map_err(|e| e.into_core(NAME))
    }
}
