//! Dependency resolution: merge the host's direct dependencies into the
//! engine manifest through the external solver.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{DependencySolver, Filesystem},
    },
    domain::{BuildConfig, Dependencies, DomainError, Manifest},
    error::{CoreError, CoreResult},
};

/// Produces the engine manifest the build compiles against.
pub struct DependencyResolver<'a> {
    config: &'a BuildConfig,
    filesystem: &'a dyn Filesystem,
    solver: &'a dyn DependencySolver,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        config: &'a BuildConfig,
        filesystem: &'a dyn Filesystem,
        solver: &'a dyn DependencySolver,
    ) -> Self {
        Self {
            config,
            filesystem,
            solver,
        }
    }

    /// Resolve the merged engine manifest.
    ///
    /// Fails with `ManifestInvalid` when either manifest is unreadable or
    /// lacks direct dependencies, and with `DependencyResolutionFailed` when
    /// the solver cannot satisfy the combined constraints.
    #[instrument(skip_all, fields(host = %self.config.host_manifest_path().display()))]
    pub fn resolve(&self) -> CoreResult<Manifest> {
        let host_path = self.config.host_manifest_path();
        let host = self.read_manifest(&host_path)?;
        let extra = host
            .direct_constraints()
            .map_err(|e| manifest_invalid(&host_path, e))?;
        debug!(count = extra.len(), "Host direct dependencies");

        let engine_path = self.config.engine_manifest_path();
        let engine = self.read_manifest(&engine_path)?;
        let engine_direct = engine
            .require_direct()
            .map_err(|e| manifest_invalid(&engine_path, e))?;

        let resolved = self
            .solver
            .solve(&extra, &engine_path)
            .map_err(resolution_failed)?;

        let direct_names: BTreeSet<String> = engine_direct
            .into_keys()
            .chain(extra.iter().map(|c| c.name.clone()))
            .collect();
        let dependencies = Dependencies::partition(&resolved, &direct_names);

        info!(
            direct = dependencies.direct.len(),
            indirect = dependencies.indirect.len(),
            "Dependencies resolved"
        );
        Ok(engine.with_dependencies(&dependencies))
    }

    fn read_manifest(&self, path: &Path) -> CoreResult<Manifest> {
        let text = self.filesystem.read_to_string(path).map_err(|e| {
            CoreError::from(ApplicationError::ManifestInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        Manifest::parse(&text).map_err(|e| manifest_invalid(path, e))
    }
}

fn manifest_invalid(path: &Path, err: DomainError) -> CoreError {
    ApplicationError::ManifestInvalid {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

fn resolution_failed(err: CoreError) -> CoreError {
    match err {
        CoreError::Application(ApplicationError::DependencyResolutionFailed { .. }) => err,
        other => ApplicationError::DependencyResolutionFailed {
            reason: other.to_string(),
        }
        .into(),
    }
}
