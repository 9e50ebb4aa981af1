//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "catwalk",
    bin_name = "catwalk",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Resolve page streams and complete tastic data",
    long_about = "Catwalk works out which streams a page uses, resolves them \
                  concurrently through registered handlers and completes tastic \
                  configuration against its schema.",
    after_help = "EXAMPLES:\n\
        \x20 catwalk resolve --node node.json --page page.json\n\
        \x20 catwalk view --node node.json --page page.json --locale de_DE\n\
        \x20 catwalk usage --node node.json --page page.json\n\
        \x20 catwalk route cart checkout",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the streams of a node, optionally scoped to one page.
    #[command(
        visible_alias = "r",
        about = "Resolve stream data",
        after_help = "EXAMPLES:\n\
            \x20 catwalk resolve --node node.json\n\
            \x20 catwalk resolve --node node.json --page page.json --debug\n\
            \x20 catwalk resolve --node node.json --parameters params.json"
    )]
    Resolve(ResolveArgs),

    /// Show which streams a page uses and the limits they need.
    #[command(about = "Analyse stream usage")]
    Usage(UsageArgs),

    /// Complete the tastic configuration of a page.
    #[command(
        about = "Complete page data",
        after_help = "EXAMPLES:\n\
            \x20 catwalk complete --page page.json\n\
            \x20 catwalk complete --page page.json --field-data field-data.json --locale de_DE"
    )]
    Complete(CompleteArgs),

    /// Complete a page and resolve its streams in one go.
    #[command(about = "Build the full page view")]
    View(ViewArgs),

    /// List the tastic definitions found in the tastics directory.
    #[command(visible_alias = "ls", about = "List tastic definitions")]
    Tastics(TasticsArgs),

    /// Show where an action request would be dispatched.
    #[command(
        about = "Route an action",
        after_help = "EXAMPLES:\n\
            \x20 catwalk route cart checkout\n\
            \x20 catwalk route cart add --response hook-response.json"
    )]
    Route(RouteArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 catwalk init           # platform config directory\n\
            \x20 catwalk init --local   # .catwalk.toml in the current directory"
    )]
    Init(InitArgs),

    /// Inspect the active configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 catwalk config get context.locale\n\
            \x20 catwalk config list\n\
            \x20 catwalk config path"
    )]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 catwalk completions bash > ~/.local/share/bash-completion/completions/catwalk\n\
            \x20 catwalk completions zsh  > ~/.zfunc/_catwalk"
    )]
    Completions(CompletionsArgs),
}

// ── shared argument groups ────────────────────────────────────────────────────

/// Where the request context comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct ContextArgs {
    /// Context document (locale, project, session). Defaults to the
    /// `[context]` configuration section.
    #[arg(long = "context", value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Override the locale of the context.
    #[arg(short = 'l', long = "locale", value_name = "LOCALE")]
    pub locale: Option<String>,
}

// ── resolve ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Node document declaring the streams.
    #[arg(short = 'n', long = "node", value_name = "FILE")]
    pub node: PathBuf,

    /// Page document. Without it every stream of the node is resolved.
    #[arg(short = 'p', long = "page", value_name = "FILE")]
    pub page: Option<PathBuf>,

    /// Parameters per stream id, merged over stream configuration.
    #[arg(long = "parameters", value_name = "FILE")]
    pub parameters: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Include trace and source location in failure payloads.
    #[arg(long = "debug")]
    pub debug: bool,
}

// ── usage ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsageArgs {
    #[arg(short = 'n', long = "node", value_name = "FILE")]
    pub node: PathBuf,

    #[arg(short = 'p', long = "page", value_name = "FILE")]
    pub page: PathBuf,
}

// ── complete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompleteArgs {
    #[arg(short = 'p', long = "page", value_name = "FILE")]
    pub page: PathBuf,

    /// Node document; its configuration is completed too when given.
    #[arg(short = 'n', long = "node", value_name = "FILE")]
    pub node: Option<PathBuf>,

    /// Tastic field data keyed by tastic id.
    #[arg(long = "field-data", value_name = "FILE")]
    pub field_data: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,
}

// ── view ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[arg(short = 'n', long = "node", value_name = "FILE")]
    pub node: PathBuf,

    #[arg(short = 'p', long = "page", value_name = "FILE")]
    pub page: PathBuf,

    #[arg(long = "field-data", value_name = "FILE")]
    pub field_data: Option<PathBuf>,

    #[arg(long = "parameters", value_name = "FILE")]
    pub parameters: Option<PathBuf>,

    #[command(flatten)]
    pub context: ContextArgs,

    #[arg(long = "debug")]
    pub debug: bool,
}

// ── tastics ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasticsArgs {
    /// Print the full definition of one tastic type.
    #[arg(value_name = "TASTIC_TYPE")]
    pub tastic_type: Option<String>,
}

// ── route ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Action namespace, e.g. `cart`.
    pub namespace: String,

    /// Action name, e.g. `checkout`.
    pub action: String,

    /// Hook response to classify.
    #[arg(long = "response", value_name = "FILE")]
    pub response: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.catwalk.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `stream.debug`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}
