//! Compiler facade: which version is selected, whether it is ready, and
//! compile calls gated on that state.
//!
//! Loading is split into three steps so that the owner of the facade never
//! holds it across an await point:
//!
//! 1. [`CompilerFacade::select`] records the selection and, when a load is
//!    needed, hands out a [`LoadTicket`];
//! 2. [`LoadTicket::run`] performs the load with any [`ModuleLoader`];
//! 3. [`CompilerFacade::complete`] applies the outcome, discarding it when
//!    another version was selected in the meantime.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::ast::ParsedAst;
use crate::error::LoadError;
use crate::loader::ModuleLoader;
use crate::module::LoadedCompiler;
use crate::output::{CompilerResult, StripTypesOutput, TransformOutput};
use crate::thrown::CompileError;
use crate::version::Version;

/// Load state of the selected compiler version.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// No version selected yet.
    Idle,
    /// Waiting for a load to finish.
    Loading { version: Version },
    /// Modules are initialized and callable.
    Ready { compiler: Arc<LoadedCompiler> },
    /// The load failed.
    Failed {
        version: Version,
        error: Arc<LoadError>,
    },
}

impl LoadState {
    /// Selected version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        match self {
            Self::Idle => None,
            Self::Loading { version } | Self::Failed { version, .. } => Some(version),
            Self::Ready { compiler } => Some(compiler.version()),
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Permission to load one version, issued by [`CompilerFacade::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    version: Version,
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Loads the ticket's version.
    pub async fn run<L: ModuleLoader>(self, loader: &L) -> LoadOutcome {
        debug!(version = %self.version, "loading swc");
        let result = loader.load(&self.version).await;
        LoadOutcome {
            ticket: self,
            result,
        }
    }
}

/// Result of [`LoadTicket::run`], to be handed to [`CompilerFacade::complete`].
#[derive(Debug)]
pub struct LoadOutcome {
    ticket: LoadTicket,
    result: Result<LoadedCompiler, LoadError>,
}

impl LoadOutcome {
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.ticket.version
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Owns the selected version, its load state, and every compiler loaded so far.
#[derive(Debug)]
pub struct CompilerFacade {
    state: LoadState,
    loaded: HashMap<Version, Arc<LoadedCompiler>>,
    generation: u64,
}

impl Default for CompilerFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerFacade {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            loaded: HashMap::new(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Selected version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.state.version()
    }

    /// Selects `version`.
    ///
    /// Returns a ticket when the version still has to be loaded. Selecting the
    /// version that is already loading or ready is a no-op, and a version
    /// loaded earlier becomes ready immediately.
    pub fn select(&mut self, version: Version) -> Option<LoadTicket> {
        match &self.state {
            LoadState::Loading { version: current } if *current == version => return None,
            LoadState::Ready { compiler } if *compiler.version() == version => return None,
            _ => {}
        }

        // Any outstanding ticket is stale from here on.
        self.generation += 1;

        if let Some(compiler) = self.loaded.get(&version) {
            debug!(%version, "using previously loaded swc");
            self.state = LoadState::Ready {
                compiler: Arc::clone(compiler),
            };
            return None;
        }

        self.state = LoadState::Loading {
            version: version.clone(),
        };
        Some(LoadTicket {
            version,
            generation: self.generation,
        })
    }

    /// Forces a new load of the selected version, e.g. after a failure.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        let LoadState::Failed { version, .. } = &self.state else {
            return None;
        };
        let version = version.clone();
        self.state = LoadState::Idle;
        self.select(version)
    }

    /// Applies a finished load.
    ///
    /// Returns `false` when the outcome is stale and was discarded.
    pub fn complete(&mut self, outcome: LoadOutcome) -> bool {
        let LoadOutcome { ticket, result } = outcome;
        if ticket.generation != self.generation || !self.state.is_loading() {
            debug!(version = %ticket.version, "discarding stale load result");
            return false;
        }

        self.state = match result {
            Ok(compiler) => {
                info!(version = %ticket.version, "swc ready");
                let compiler = Arc::new(compiler);
                self.loaded
                    .insert(ticket.version.clone(), Arc::clone(&compiler));
                LoadState::Ready { compiler }
            }
            Err(error) => {
                warn!(version = %ticket.version, "failed to load swc: {error}");
                LoadState::Failed {
                    version: ticket.version,
                    error: Arc::new(error),
                }
            }
        };
        true
    }

    /// Selects `version` and, when needed, loads it to completion.
    pub async fn load<L: ModuleLoader>(&mut self, version: Version, loader: &L) -> &LoadState {
        if let Some(ticket) = self.select(version) {
            let outcome = ticket.run(loader).await;
            self.complete(outcome);
        }
        &self.state
    }

    /// The ready compiler, or the error to show instead of output.
    pub fn compiler(&self) -> CompilerResult<&Arc<LoadedCompiler>> {
        match &self.state {
            LoadState::Ready { compiler } => Ok(compiler),
            LoadState::Idle | LoadState::Loading { .. } => Err(CompileError::loading()),
            LoadState::Failed { error, .. } => Err(CompileError::unavailable(error)),
        }
    }

    /// Whether the ready compiler has a type-stripping module.
    #[must_use]
    pub fn has_strip_types(&self) -> bool {
        self.compiler()
            .is_ok_and(|compiler| compiler.has_strip_types())
    }

    pub fn parse(&self, code: &str, config: &Value) -> CompilerResult<ParsedAst> {
        self.compiler()?.parse(code, config)
    }

    pub fn transform(
        &self,
        code: &str,
        file_name: &str,
        config: &Value,
    ) -> CompilerResult<TransformOutput> {
        self.compiler()?.transform(code, file_name, config)
    }

    pub fn strip_types(
        &self,
        code: &str,
        file_name: &str,
        config: &Value,
    ) -> CompilerResult<StripTypesOutput> {
        self.compiler()?.strip_types(code, file_name, config)
    }
}
