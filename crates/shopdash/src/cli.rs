//! Clap derive structures for the `shopdash` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopdash -- manage a product catalogue from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "shopdash",
    version,
    about = "Manage a product catalogue from the command line",
    long_about = "Sign in to a product catalogue API, page through products,\n\
        and add, edit, or delete them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "SHOPDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "SHOPDASH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHOPDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SHOPDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List, view, add, edit, and delete products
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long, env = "SHOPDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List one page of products
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Show a single product
    Get {
        /// Product ID
        id: u64,
    },

    /// Add a product
    Add(ProductFields),

    /// Edit a product; omitted fields keep their current value
    Edit {
        /// Product ID
        id: u64,

        #[command(flatten)]
        fields: ProductPatch,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: u64,
    },
}

/// Fields for a new product.
#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub price: f64,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub category_id: u64,

    /// Image URL (repeatable)
    #[arg(long = "image", required = true)]
    pub images: Vec<String>,
}

/// Optional overrides for an existing product.
#[derive(Debug, Args)]
pub struct ProductPatch {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category_id: Option<u64>,

    /// Replace the image list (repeatable)
    #[arg(long = "image")]
    pub images: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
