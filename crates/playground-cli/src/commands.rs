use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use playground_compiler::diagnostic::editor_markers;
use playground_compiler::{CdnLoader, LoadState, RegistryClient, STRIP_TYPES_SINCE, Version};
use playground_config::{ConfigDocument, ConfigError, config_schema};
use playground_session::{
    Clipboard, FileStore, PlaygroundStore, ViewMode, editor_config_text, render_output,
};
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;

use playground_cli::clipboard::TerminalClipboard;
use playground_cli::output::{format_notice, version_row, write_text};
use playground_cli::settings::Settings;

use crate::cli::{
    ConfigCommand, InputArgs, OpenArgs, ShareArgs, ToggleArg, TransformArgs, VersionsArgs,
};

type Store = PlaygroundStore<FileStore>;

/// What every command needs besides its own arguments.
pub struct Runtime {
    pub settings: Settings,
    /// `--swc`, overriding the session's version.
    pub swc_version: Option<Version>,
}

impl Runtime {
    fn page_url(&self) -> Result<Url> {
        Url::parse(&self.settings.page_url)
            .with_context(|| format!("invalid page_url {:?}", self.settings.page_url))
    }

    /// The saved session.
    fn open_saved(&self) -> Result<Store> {
        Ok(self.open_at(self.page_url()?))
    }

    /// The session for `url`; link fields win over the saved session.
    fn open_at(&self, url: Url) -> Store {
        let data_dir = self.settings.data_dir();
        debug!("session data in {}", data_dir.display());
        PlaygroundStore::open(url, FileStore::new(data_dir), &self.settings.version())
    }

    /// Loads the session's compiler, retrying once on transient failures.
    async fn load(&self, store: &mut Store) -> Result<()> {
        let loader = CdnLoader::new(self.settings.loader_config())
            .context("create module loader")?;

        let ticket = match &self.swc_version {
            Some(version) => store.select_version(version.clone()),
            None => store.load_ticket(),
        };
        if let Some(ticket) = ticket {
            let span = info_span!("load", version = %ticket.version());
            info!(parent: &span, "loading swc");
            let outcome = ticket.run(&loader).instrument(span).await;
            store.complete_load(outcome);
        }

        let retryable = matches!(
            store.load_state(),
            LoadState::Failed { error, .. } if error.is_retryable()
        );
        if retryable && let Some(ticket) = store.retry_load() {
            warn!(version = %ticket.version(), "load failed, retrying once");
            store.take_notices();
            let outcome = ticket.run(&loader).await;
            store.complete_load(outcome);
        }

        print_notices(store);
        if let LoadState::Failed { version, error } = store.load_state() {
            bail!("swc {version}: {} ({error})", error.user_message());
        }
        Ok(())
    }
}

fn print_notices(store: &mut Store) {
    for notice in store.take_notices() {
        eprintln!("{}", format_notice(&notice));
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .context("read code from stdin")?;
        return Ok(code);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Puts the files named on the command line into the session.
fn apply_input(store: &mut Store, input: &InputArgs) -> Result<()> {
    if let Some(path) = &input.file {
        store.set_code(read_source(path)?);
    }
    if let Some(path) = &input.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        if !store.apply_config_text(text) {
            print_notices(store);
            bail!("configuration in {} is not valid", path.display());
        }
    }
    Ok(())
}

/// Prints the output pane; errors go to stderr and yield exit code 1.
fn emit(store: &Store, markers: bool) -> Result<i32> {
    let result = store.compile();
    let rendered = render_output(&result);
    match &result {
        Ok(_) => {
            debug!(path = rendered.path, "compiled");
            write_text(&mut io::stdout().lock(), &rendered.text)?;
            Ok(0)
        }
        Err(err) => {
            write_text(&mut io::stderr().lock(), &rendered.text)?;
            if markers {
                let markers = editor_markers(err.message());
                println!("{}", serde_json::to_string_pretty(&markers)?);
            }
            Ok(1)
        }
    }
}

fn require_strip_types(store: &mut Store) -> Result<()> {
    if !store.set_strip_types(true) {
        bail!(
            "swc {} cannot strip types; use {STRIP_TYPES_SINCE} or later",
            store.version()
        );
    }
    Ok(())
}

pub async fn run_transform(runtime: &Runtime, args: &TransformArgs) -> Result<i32> {
    let mut store = runtime.open_saved()?;
    apply_input(&mut store, &args.input)?;
    runtime.load(&mut store).await?;
    if args.strip_types {
        require_strip_types(&mut store)?;
    }
    emit(&store, args.markers)
}

pub async fn run_parse(runtime: &Runtime, args: &InputArgs) -> Result<i32> {
    let mut store = runtime.open_saved()?;
    apply_input(&mut store, args)?;
    store.set_view_mode(ViewMode::Ast);
    runtime.load(&mut store).await?;
    emit(&store, false)
}

pub async fn run_strip_types(runtime: &Runtime, args: &InputArgs) -> Result<i32> {
    let mut store = runtime.open_saved()?;
    apply_input(&mut store, args)?;
    runtime.load(&mut store).await?;
    require_strip_types(&mut store)?;
    if !store.controls().strip_types_enabled {
        bail!("swc {} was loaded without a type-stripping module", store.version());
    }
    emit(&store, false)
}

pub fn run_share(runtime: &Runtime, args: &ShareArgs) -> Result<i32> {
    let mut store = runtime.open_saved()?;
    apply_input(&mut store, &args.input)?;
    if let Some(version) = &runtime.swc_version {
        // Only the version goes into the link; nothing has to be loaded
        store.select_version(version.clone());
    }
    if args.strip_types {
        require_strip_types(&mut store)?;
    }

    let url = if args.copy {
        let mut clipboard = TerminalClipboard::detect();
        let shared = store.share(clipboard.as_mut().map(|c| c as &mut dyn Clipboard));
        print_notices(&mut store);
        match shared {
            Some(url) => url,
            None => store.share_url()?,
        }
    } else {
        store.share_url()?
    };
    println!("{url}");
    Ok(0)
}

pub async fn run_open(runtime: &Runtime, args: &OpenArgs) -> Result<i32> {
    let mut store = runtime.open_at(args.url.clone());
    info!(
        version = %store.version(),
        strip_types = store.state().strip_types,
        "opened share link"
    );

    if args.no_compile {
        eprintln!("swc {}", store.version());
        write_text(&mut io::stdout().lock(), store.code())?;
        write_text(
            &mut io::stdout().lock(),
            &editor_config_text(store.config().text()),
        )?;
        return Ok(0);
    }

    if args.ast {
        store.set_view_mode(ViewMode::Ast);
    }
    runtime.load(&mut store).await?;
    emit(&store, false)
}

pub fn run_report(runtime: &Runtime, args: &InputArgs) -> Result<i32> {
    let mut store = runtime.open_saved()?;
    apply_input(&mut store, args)?;
    if let Some(version) = &runtime.swc_version {
        store.select_version(version.clone());
    }
    let report = store.report_issue();
    print_notices(&mut store);
    match report {
        Some(url) => {
            println!("{url}");
            Ok(0)
        }
        None => Ok(1),
    }
}

pub async fn run_versions(runtime: &Runtime, args: &VersionsArgs) -> Result<i32> {
    let client = RegistryClient::new(runtime.settings.registry_url.as_str())
        .context("create registry client")?;
    let index = client.versions().await.context("fetch version list")?;

    if let Some(version) = &args.check {
        if index.contains(version) {
            println!("{}", version_row(version, index.latest.as_ref()));
            return Ok(0);
        }
        eprintln!("swc {version} is not published");
        return Ok(1);
    }

    for version in index
        .versions
        .iter()
        .filter(|version| args.all || version.is_stable())
        .take(args.limit)
    {
        println!("{}", version_row(version, index.latest.as_ref()));
    }
    Ok(0)
}

pub fn run_schema() -> Result<i32> {
    println!("{}", serde_json::to_string_pretty(&config_schema())?);
    Ok(0)
}

/// Bare words on the command line are strings; anything else is JSON.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn toggle(document: &mut ConfigDocument, option: ToggleArg, enabled: bool) -> Result<(), ConfigError> {
    match option {
        ToggleArg::Element => document.set_jsx_or_tsx(enabled),
        ToggleArg::Loose => document.set_loose(enabled),
        ToggleArg::Minify => document.set_minify(enabled),
        ToggleArg::Compress => document.set_compress(enabled),
        ToggleArg::Mangle => document.set_mangle(enabled),
        ToggleArg::Env => document.set_env(enabled),
    }
}

pub fn run_config(runtime: &Runtime, command: ConfigCommand) -> Result<i32> {
    let mut store = runtime.open_saved()?;

    let applied = match command {
        ConfigCommand::Show => {
            write_text(&mut io::stdout().lock(), store.config().text())?;
            return Ok(0);
        }
        ConfigCommand::Controls => {
            println!("{}", serde_json::to_string_pretty(&store.controls())?);
            return Ok(0);
        }
        ConfigCommand::Format => store.edit_config(ConfigDocument::format),
        ConfigCommand::Reset => store.apply_config_text(ConfigDocument::default().into_text()),
        ConfigCommand::Load { path } => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("read configuration {}", path.display()))?;
            store.apply_config_text(text)
        }
        ConfigCommand::Set { path, value } => {
            let value = parse_value(&value);
            store.edit_config(|document| document.set_path(&path, value))
        }
        ConfigCommand::Unset { path } => {
            store.edit_config(|document| document.remove_path(&path).map(|_| ()))
        }
        ConfigCommand::Syntax { syntax } => {
            store.edit_config(|document| document.set_syntax(syntax.into()))
        }
        ConfigCommand::Target { target } => {
            store.edit_config(|document| document.set_target(target.into()))
        }
        ConfigCommand::Module { kind } => {
            store.edit_config(|document| document.set_module_type(kind.into()))
        }
        ConfigCommand::SourceType { source_type } => {
            store.edit_config(|document| document.set_source_type(source_type.into()))
        }
        ConfigCommand::Toggle { option, state } => {
            store.edit_config(|document| toggle(document, option, state.enabled()))
        }
    };

    print_notices(&mut store);
    if !applied {
        return Ok(1);
    }
    debug!("configuration saved");
    write_text(&mut io::stdout().lock(), store.config().text())?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("\"automatic\""), json!("automatic"));
        assert_eq!(parse_value("automatic"), json!("automatic"));
        assert_eq!(parse_value("{\"a\": 1}"), json!({ "a": 1 }));
    }

    #[test]
    fn test_toggle_compress_installs_defaults() {
        let mut document = ConfigDocument::default();
        toggle(&mut document, ToggleArg::Compress, true).unwrap();
        let config = document.typed().unwrap();
        assert!(config.compress_enabled());
    }

    #[test]
    fn test_config_edits_persist() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Runtime {
            settings: Settings {
                data_dir: Some(dir.path().to_path_buf()),
                ..Settings::default()
            },
            swc_version: None,
        };
        let code = run_config(
            &runtime,
            ConfigCommand::Set {
                path: "jsc.loose".to_string(),
                value: "true".to_string(),
            },
        )
        .unwrap();
        assert_eq!(code, 0);

        let store = runtime.open_saved().unwrap();
        assert_eq!(store.applied_config()["jsc"]["loose"], json!(true));
    }
}
