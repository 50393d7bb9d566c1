//! CLI argument definitions for the SWC playground.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use playground_compiler::Version;
use playground_config::{EsVersion, IsModule, ModuleKind, Syntax};
use url::Url;

#[derive(Parser)]
#[command(
    name = "swc-playground",
    version,
    about = "SWC playground - compile, inspect and share snippets with any swc version",
    long_about = "Compile, inspect and share code snippets with any published swc version.\n\n\
                  The session (code and configuration) is saved between runs and can be\n\
                  exchanged with play.swc.rs through share links."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Compiler version to use (default: share link, then settings).
    #[arg(long = "swc", value_name = "VERSION", global = true)]
    pub swc_version: Option<Version>,

    /// Settings file (default: platform configuration folder).
    #[arg(long = "settings", value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile the session code and print the output.
    Transform(TransformArgs),

    /// Print the syntax tree of the session code as JSON.
    Parse(InputArgs),

    /// Remove TypeScript types only (swc 1.7.1 and later).
    StripTypes(InputArgs),

    /// Print a share link for the session.
    Share(ShareArgs),

    /// Open a share link and compile what it contains.
    Open(OpenArgs),

    /// Print a link to a prefilled bug report for the session.
    Report(InputArgs),

    /// List published swc versions.
    Versions(VersionsArgs),

    /// Print the JSON schema of the configuration.
    Schema,

    /// Show or edit the saved configuration.
    Config(ConfigArgs),
}

/// Where the code and configuration come from.
///
/// Files given here replace the saved session, like typing into the editors.
#[derive(Args)]
pub struct InputArgs {
    /// Source file ("-" for stdin). Uses the saved code when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file (.swcrc format, comments allowed).
    #[arg(long = "config", short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct TransformArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Strip types instead of transforming, when the version supports it.
    #[arg(long = "strip-types")]
    pub strip_types: bool,

    /// Print error locations as JSON editor markers on failure.
    #[arg(long = "markers")]
    pub markers: bool,
}

#[derive(Args)]
pub struct ShareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Include the strip-types switch in the link.
    #[arg(long = "strip-types")]
    pub strip_types: bool,

    /// Also copy the link to the clipboard (needs a terminal).
    #[arg(long = "copy")]
    pub copy: bool,
}

#[derive(Args)]
pub struct OpenArgs {
    /// Share link, e.g. https://play.swc.rs/?version=1.7.26&code=...
    #[arg(value_name = "URL")]
    pub url: Url,

    /// Show the syntax tree instead of compiled code.
    #[arg(long = "ast")]
    pub ast: bool,

    /// Print the restored code and configuration without compiling.
    #[arg(long = "no-compile")]
    pub no_compile: bool,
}

#[derive(Args)]
pub struct VersionsArgs {
    /// Check whether a version is published instead of listing.
    #[arg(long = "check", value_name = "VERSION")]
    pub check: Option<Version>,

    /// Include pre-release versions.
    #[arg(long = "all")]
    pub all: bool,

    /// Maximum number of versions to list.
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the saved configuration text.
    Show,

    /// Print the state of the configuration controls.
    Controls,

    /// Pretty-print the saved configuration (drops comments).
    Format,

    /// Replace the configuration with the default one.
    Reset,

    /// Replace the configuration text with a file's contents.
    Load {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Set a value by dotted path, e.g. `jsc.transform.react.runtime '"automatic"'`.
    Set {
        #[arg(value_name = "PATH")]
        path: String,
        /// JSON value; bare words are taken as strings.
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Remove a value by dotted path.
    Unset {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Choose the parser syntax.
    Syntax {
        #[arg(value_enum)]
        syntax: SyntaxArg,
    },

    /// Choose the output language version.
    Target {
        #[arg(value_enum)]
        target: TargetArg,
    },

    /// Choose the module output kind.
    Module {
        #[arg(value_enum)]
        kind: ModuleArg,
    },

    /// Choose how the input is parsed.
    SourceType {
        #[arg(value_enum)]
        source_type: SourceTypeArg,
    },

    /// Switch an option group on or off.
    Toggle {
        #[arg(value_enum)]
        option: ToggleArg,
        #[arg(value_enum)]
        state: SwitchArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SyntaxArg {
    Ecmascript,
    Typescript,
}

impl From<SyntaxArg> for Syntax {
    fn from(arg: SyntaxArg) -> Self {
        match arg {
            SyntaxArg::Ecmascript => Self::Ecmascript,
            SyntaxArg::Typescript => Self::Typescript,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TargetArg {
    Es3,
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Esnext,
}

impl From<TargetArg> for EsVersion {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Es3 => Self::Es3,
            TargetArg::Es5 => Self::Es5,
            TargetArg::Es2015 => Self::Es2015,
            TargetArg::Es2016 => Self::Es2016,
            TargetArg::Es2017 => Self::Es2017,
            TargetArg::Es2018 => Self::Es2018,
            TargetArg::Es2019 => Self::Es2019,
            TargetArg::Es2020 => Self::Es2020,
            TargetArg::Es2021 => Self::Es2021,
            TargetArg::Es2022 => Self::Es2022,
            TargetArg::Esnext => Self::EsNext,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModuleArg {
    Es6,
    Commonjs,
    Amd,
    Umd,
    Systemjs,
    Nodenext,
}

impl From<ModuleArg> for ModuleKind {
    fn from(arg: ModuleArg) -> Self {
        match arg {
            ModuleArg::Es6 => Self::Es6,
            ModuleArg::Commonjs => Self::CommonJs,
            ModuleArg::Amd => Self::Amd,
            ModuleArg::Umd => Self::Umd,
            ModuleArg::Systemjs => Self::SystemJs,
            ModuleArg::Nodenext => Self::NodeNext,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceTypeArg {
    Module,
    Script,
    Unknown,
}

impl From<SourceTypeArg> for IsModule {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Module => Self::Module,
            SourceTypeArg::Script => Self::Script,
            SourceTypeArg::Unknown => Self::Unknown,
        }
    }
}

/// Option groups with an on/off switch.
#[derive(Clone, Copy, ValueEnum)]
pub enum ToggleArg {
    /// JSX or TSX, depending on the syntax.
    Element,
    Loose,
    Minify,
    Compress,
    Mangle,
    Env,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SwitchArg {
    On,
    Off,
}

impl SwitchArg {
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_version_and_input() {
        let cli = Cli::try_parse_from([
            "swc-playground",
            "transform",
            "input.ts",
            "--config",
            ".swcrc",
            "--swc",
            "1.7.26",
        ])
        .unwrap();
        assert_eq!(cli.swc_version, Some(Version::new(1, 7, 26)));
        let Command::Transform(args) = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.input.file, Some(PathBuf::from("input.ts")));
        assert_eq!(args.input.config, Some(PathBuf::from(".swcrc")));
    }

    #[test]
    fn test_rejects_bad_version() {
        assert!(Cli::try_parse_from(["swc-playground", "parse", "--swc", "one"]).is_err());
    }

    #[test]
    fn test_config_toggle() {
        let cli =
            Cli::try_parse_from(["swc-playground", "config", "toggle", "compress", "on"]).unwrap();
        let Command::Config(ConfigArgs {
            command: ConfigCommand::Toggle { option, state },
        }) = cli.command
        else {
            panic!("expected config toggle");
        };
        assert!(matches!(option, ToggleArg::Compress));
        assert!(state.enabled());
    }
}
