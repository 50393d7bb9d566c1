//! Session handling for the SWC playground.
//!
//! A session is the source code, the configuration text, the selected
//! compiler version and the strip-types switch. This crate moves it between
//! its homes and derives what the editors show:
//!
//! - [`share`] - share links (`code`, `config`, `version`, `strip-types`)
//! - [`storage`] - local persistence under `v1.code` / `v1.config`
//! - [`restore`] - startup precedence: link, then local store, then defaults
//! - [`report`] - issue tracker links
//! - [`view`] - output rendering, file names and form control state
//! - [`PlaygroundStore`] - the application state store tying it together

mod codec;
mod error;
pub mod report;
pub mod restore;
pub mod share;
mod state;
pub mod storage;
mod store;
pub mod view;
mod workspace;

pub use codec::{decode_text, encode_text};
pub use error::{Result, SessionError};
pub use report::{MAX_REPORT_CODE_LENGTH, issue_report_url};
pub use restore::{Origin, Restored, editor_config_text};
pub use share::{SharedSession, compact_config, share_url};
pub use state::SessionState;
pub use storage::{CODE_KEY, CONFIG_KEY, FileStore, KeyValueStore, MemoryStore};
pub use store::{Clipboard, Notice, NoticeLevel, PlaygroundStore, StoreEvent};
pub use view::{Controls, Language, RenderedOutput, ViewMode, render_output};
pub use workspace::compile;
