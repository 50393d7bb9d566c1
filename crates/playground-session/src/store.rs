//! Application state store.
//!
//! [`PlaygroundStore`] owns the session, the compiler facade and the local
//! store, and is the only place where they change. Every change is
//! persisted (code and configuration) and announced to subscribers.
//! Problems that the user should see are queued as [`Notice`]s instead of
//! being returned as errors.

use playground_compiler::{
    CompilerFacade, CompilerOutput, CompilerResult, EditorMarker, LoadOutcome, LoadState,
    LoadTicket, ModuleLoader, Version, diagnostic, supports_strip_types,
};
use playground_config::{CompilerConfig, ConfigDocument, ConfigError, default_config, parse_jsonc};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Result, SessionError};
use crate::report::issue_report_url;
use crate::restore::{Restored, restore};
use crate::share::{SharedSession, share_url};
use crate::state::SessionState;
use crate::storage::{CODE_KEY, CONFIG_KEY, KeyValueStore, save_or_warn};
use crate::view::{Controls, RenderedOutput, ViewMode, render_output};
use crate::workspace::compile;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: None,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description: Some(description.into()),
        }
    }
}

/// Something that can receive text for pasting elsewhere.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> std::io::Result<()>;
}

/// A change made to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    CodeChanged,
    ConfigChanged,
    VersionSelected(Version),
    CompilerStateChanged,
    StripTypesChanged(bool),
    ViewModeChanged(ViewMode),
    UrlReplaced(Url),
}

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Owns the session and everything derived from it.
pub struct PlaygroundStore<S: KeyValueStore> {
    state: SessionState,
    /// Last configuration that parsed; used for compiling.
    applied_config: Value,
    view_mode: ViewMode,
    facade: CompilerFacade,
    store: S,
    /// Current page address, replaced by [`PlaygroundStore::share`].
    page_url: Url,
    notices: Vec<Notice>,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> std::fmt::Debug for PlaygroundStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaygroundStore")
            .field("state", &self.state)
            .field("view_mode", &self.view_mode)
            .field("facade", &self.facade)
            .field("page_url", &self.page_url.as_str())
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> PlaygroundStore<S> {
    /// Restores the session for `page_url` (share link, then `store`, then
    /// defaults). No compiler is loaded yet.
    pub fn open(page_url: Url, store: S, default_version: &Version) -> Self {
        let shared = SharedSession::from_url(&page_url);
        let Restored { state, .. } = restore(&shared, &store, default_version);
        Self::with_state(state, page_url, store)
    }

    /// Store around an explicit session.
    pub fn with_state(state: SessionState, page_url: Url, store: S) -> Self {
        let applied_config = match state.config.parse() {
            Ok(value) => value,
            Err(err) => {
                warn!("restored configuration does not parse, compiling with defaults: {err}");
                default_config()
            }
        };
        Self {
            state,
            applied_config,
            view_mode: ViewMode::default(),
            facade: CompilerFacade::new(),
            store,
            page_url,
            notices: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn code(&self) -> &str {
        &self.state.code
    }

    pub fn config(&self) -> &ConfigDocument {
        &self.state.config
    }

    /// The configuration compile calls use.
    pub fn applied_config(&self) -> &Value {
        &self.applied_config
    }

    pub fn version(&self) -> &Version {
        &self.state.version
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn facade(&self) -> &CompilerFacade {
        &self.facade
    }

    pub fn load_state(&self) -> &LoadState {
        self.facade.state()
    }

    pub fn key_value_store(&self) -> &S {
        &self.store
    }

    /// Registers a listener called after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Removes and returns queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn emit(&mut self, event: &StoreEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn notify(&mut self, notice: Notice) {
        debug!(title = %notice.title, "notice");
        self.notices.push(notice);
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.state.code = code.into();
        save_or_warn(&mut self.store, CODE_KEY, &self.state.code);
        self.emit(&StoreEvent::CodeChanged);
    }

    /// Replaces the configuration text, e.g. from the JSON editor.
    ///
    /// Text that does not parse is rejected with a notice and the current
    /// configuration stays in effect.
    pub fn apply_config_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        match parse_jsonc(&text) {
            Ok(value) => {
                self.state.config = ConfigDocument::new(text);
                self.config_applied(value);
                true
            }
            Err(err) => {
                self.config_rejected(&err);
                false
            }
        }
    }

    /// Applies a structured edit such as [`ConfigDocument::set_compress`].
    ///
    /// A failed edit leaves the configuration untouched.
    pub fn edit_config(
        &mut self,
        edit: impl FnOnce(&mut ConfigDocument) -> playground_config::Result<()>,
    ) -> bool {
        let mut document = self.state.config.clone();
        let edited = edit(&mut document).and_then(|()| document.parse());
        match edited {
            Ok(value) => {
                self.state.config = document;
                self.config_applied(value);
                true
            }
            Err(err) => {
                self.config_rejected(&err);
                false
            }
        }
    }

    fn config_applied(&mut self, value: Value) {
        self.applied_config = value;
        save_or_warn(&mut self.store, CONFIG_KEY, self.state.config.text());
        self.emit(&StoreEvent::ConfigChanged);
    }

    fn config_rejected(&mut self, err: &ConfigError) {
        self.notify(Notice::error(err.user_message(), err.to_string()));
    }

    /// Selects a compiler version.
    ///
    /// Returns a ticket when the version still has to be loaded; pass its
    /// outcome to [`PlaygroundStore::complete_load`].
    pub fn select_version(&mut self, version: Version) -> Option<LoadTicket> {
        let strip_types = self.state.strip_types;
        self.state.set_version(version.clone());
        if strip_types != self.state.strip_types {
            self.emit(&StoreEvent::StripTypesChanged(false));
        }
        let ticket = self.facade.select(version.clone());
        self.emit(&StoreEvent::VersionSelected(version));
        ticket
    }

    /// Ticket for the session's version, if it is not loaded yet.
    pub fn load_ticket(&mut self) -> Option<LoadTicket> {
        self.facade.select(self.state.version.clone())
    }

    /// Applies a finished load. Stale outcomes are ignored.
    pub fn complete_load(&mut self, outcome: LoadOutcome) {
        if !self.facade.complete(outcome) {
            return;
        }
        let failure = match self.facade.state() {
            LoadState::Failed { error, .. } => Some(error.to_string()),
            _ => None,
        };
        if let Some(description) = failure {
            self.notify(Notice::error("Failed to load swc.", description));
        }
        self.emit(&StoreEvent::CompilerStateChanged);
    }

    /// Loads the session's version to completion.
    pub async fn load_compiler<L: ModuleLoader>(&mut self, loader: &L) -> &LoadState {
        if let Some(ticket) = self.load_ticket() {
            let outcome = ticket.run(loader).await;
            self.complete_load(outcome);
        }
        self.facade.state()
    }

    /// Retries a failed load.
    pub fn retry_load(&mut self) -> Option<LoadTicket> {
        self.facade.retry()
    }

    /// Switches the strip-types mode.
    ///
    /// Ignored (returns `false`) when the selected version cannot strip types.
    pub fn set_strip_types(&mut self, enabled: bool) -> bool {
        if enabled && !supports_strip_types(&self.state.version) {
            info!(version = %self.state.version, "strip types not available");
            return false;
        }
        if self.state.strip_types != enabled {
            self.state.strip_types = enabled;
            self.emit(&StoreEvent::StripTypesChanged(enabled));
        }
        true
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            self.view_mode = mode;
            self.emit(&StoreEvent::ViewModeChanged(mode));
        }
    }

    // ------------------------------------------------------------------
    // Derived
    // ------------------------------------------------------------------

    /// Compiles the session for the current view.
    pub fn compile(&self) -> CompilerResult<CompilerOutput> {
        compile(
            &self.facade,
            &self.state.code,
            &self.applied_config,
            self.view_mode,
            self.state.strip_types,
        )
    }

    /// What the output editor shows.
    pub fn output(&self) -> RenderedOutput {
        render_output(&self.compile())
    }

    /// Error markers for the input editor.
    pub fn markers(&self) -> Vec<EditorMarker> {
        match self.compile() {
            Ok(_) => Vec::new(),
            Err(err) => diagnostic::editor_markers(err.message()),
        }
    }

    /// State of the configuration form controls.
    pub fn controls(&self) -> Controls {
        let config: CompilerConfig = serde_json::from_value(self.applied_config.clone())
            .unwrap_or_else(|err| {
                debug!("configuration does not fit the form controls: {err}");
                CompilerConfig::default()
            });
        Controls::derive(&config, self.facade.has_strip_types())
    }

    // ------------------------------------------------------------------
    // Share and report
    // ------------------------------------------------------------------

    /// Share link for the current session.
    pub fn share_url(&self) -> Result<Url> {
        share_url(&self.page_url, &self.state)
    }

    /// Copies the share link to `clipboard` and makes it the page address.
    ///
    /// Without a clipboard nothing changes and a notice is queued.
    pub fn share(&mut self, clipboard: Option<&mut dyn Clipboard>) -> Option<Url> {
        let Some(clipboard) = clipboard else {
            self.notify(Notice::error(
                "Error",
                "Clipboard is not supported in your environment.",
            ));
            return None;
        };

        let url = match self.share_url() {
            Ok(url) => url,
            Err(err) => {
                self.notify(Notice::error("Error", err.user_message()));
                return None;
            }
        };

        if let Err(err) = clipboard.write_text(url.as_str()) {
            self.notify(Notice::error("Error", format!("Could not copy the URL: {err}")));
            return None;
        }

        self.page_url = url.clone();
        self.notify(Notice::success("URL is copied to clipboard."));
        self.emit(&StoreEvent::UrlReplaced(url.clone()));
        Some(url)
    }

    /// Issue form link for the current session.
    ///
    /// Too long code is refused with a notice asking to paste it manually.
    pub fn report_issue(&mut self) -> Option<Url> {
        let report = self
            .share_url()
            .and_then(|link| issue_report_url(&self.state, &link));
        match report {
            Ok(url) => Some(url),
            Err(err @ SessionError::CodeTooLong { .. }) => {
                self.notify(Notice::error("Code too long", err.user_message()));
                None
            }
            Err(err) => {
                self.notify(Notice::error("Error", err.user_message()));
                None
            }
        }
    }
}
