//! Clap derive structures for the `backoffice` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// backoffice -- manage an admin backend from the command line
#[derive(Debug, Parser)]
#[command(
    name = "backoffice",
    version,
    about = "Manage users, roles, content and files of an admin backend",
    long_about = "Command-line client for the backoffice admin REST API.\n\n\
        Every resource command goes through the same table and form layer\n\
        an admin UI uses: paged lists, search filters and validated forms.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "BACKOFFICE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend root URL (overrides profile)
    #[arg(long, short = 'u', env = "BACKOFFICE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides keyring and profile)
    #[arg(long, env = "BACKOFFICE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BACKOFFICE_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BACKOFFICE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BACKOFFICE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Log in and store the session token
    Login(LoginArgs),

    /// Manage admin users
    #[command(alias = "u")]
    Users(ResourceArgs),

    /// Manage roles
    Roles(ResourceArgs),

    /// Manage permissions
    #[command(alias = "perm")]
    Permissions(ResourceArgs),

    /// Manage posts
    Posts(PostsArgs),

    /// Manage categories
    #[command(alias = "cat")]
    Categories(ResourceArgs),

    /// Manage navigation menus
    Menus(MenusArgs),

    /// Browse operation and login logs
    Logs(LogsArgs),

    /// Manage uploaded files
    Files(FilesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username, then a prompt)
    #[arg(long)]
    pub username: Option<String>,

    /// Print the token instead of storing it in the keyring
    #[arg(long)]
    pub print_token: bool,
}

// ── Shared resource arguments ────────────────────────────────────────

/// Paging, sorting and filtering for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (defaults to the configured page size)
    #[arg(long, short = 's')]
    pub size: Option<u32>,

    /// Sort expression, e.g. "id:desc,createdAt:asc"
    #[arg(long)]
    pub sort: Option<String>,

    /// Only records created at or after "YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    pub created_from: Option<String>,

    /// Search filter as KEY=VALUE (repeatable)
    #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
    pub filters: Vec<String>,
}

/// Field values for create and update commands.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Field value as KEY=VALUE; VALUE is parsed as JSON when it can be
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Read field values from a JSON object file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record id
        id: u64,
    },

    /// Create a record
    Create(FieldArgs),

    /// Update a record
    Update {
        /// Record id
        id: u64,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: u64,
    },
}

// ── Resource-specific commands ───────────────────────────────────────

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// Download the bulk-import spreadsheet template
    Template {
        /// Output path
        #[arg(long, short = 'O', default_value = "template.xlsx")]
        out: PathBuf,
    },

    #[command(flatten)]
    Crud(ResourceCommand),
}

#[derive(Debug, Args)]
pub struct MenusArgs {
    #[command(subcommand)]
    pub command: MenusCommand,
}

#[derive(Debug, Subcommand)]
pub enum MenusCommand {
    /// Show the menu tree with links
    Tree,

    #[command(flatten)]
    Crud(ResourceCommand),
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List login attempts
    Logins(ListArgs),

    #[command(flatten)]
    Crud(ResourceCommand),
}

#[derive(Debug, Args)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// Upload a file
    Upload {
        /// Local file path
        path: PathBuf,

        /// MIME type sent with the upload
        #[arg(long)]
        mime: Option<String>,
    },

    /// Look up a file by content hash
    Hash {
        /// Content hash
        hash: String,
    },

    #[command(flatten)]
    Crud(ResourceCommand),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
