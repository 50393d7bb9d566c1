//! Library parts of the SWC playground command-line front-end.

pub mod clipboard;
pub mod logging;
pub mod output;
pub mod settings;
