//! Command line options

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::bulk::{BulkAction, ResourceKind, DEFAULT_CONCURRENCY};
use crate::config::Overrides;
use crate::http::databases::DatabaseEngine;
use crate::logs::{LogFormat, LogLevel};
use crate::output::OutputFormat;

/// Command-line client for the Coolify API
#[derive(Parser, Debug)]
#[command(name = "coolifyme", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path of the config file
    #[arg(long, global = true, env = "COOLIFYME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// API token, overrides profile and environment
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API base URL, e.g. https://coolify.example.com/api/v1
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Shorthand for --output json
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, env = "COOLIFYME_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Force colored output
    #[arg(long, global = true, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Retries for failed read requests
    #[arg(long, global = true, default_value_t = 3)]
    pub retries: u32,
}

impl GlobalArgs {
    /// Invocation-time overrides for config resolution
    pub fn overrides(&self) -> Overrides {
        let output_format = if self.json {
            Some(OutputFormat::Json)
        } else {
            self.output
        };
        let color = match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Overrides {
            profile: self.profile.clone(),
            api_token: self.token.clone(),
            base_url: self.base_url.clone(),
            output_format,
            log_level: self.log_level,
            color,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage connection profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Show or change global settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Manage applications
    #[command(subcommand)]
    #[command(alias = "app")]
    Apps(AppsCommand),

    /// Manage services
    #[command(subcommand)]
    #[command(alias = "svc")]
    Services(ServicesCommand),

    /// Manage databases
    #[command(subcommand)]
    #[command(alias = "db")]
    Databases(DatabasesCommand),

    /// Manage servers
    #[command(subcommand)]
    Servers(ServersCommand),

    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Inspect teams
    #[command(subcommand)]
    Teams(TeamsCommand),

    /// Manage private SSH keys
    #[command(subcommand)]
    Keys(KeysCommand),

    /// Trigger and follow deployments
    #[command(subcommand)]
    Deploy(DeployCommand),

    /// Manage and synchronize environment variables
    #[command(subcommand)]
    Env(EnvCommand),

    /// Run one action across many resources
    Bulk(BulkArgs),

    /// Platform-level operations
    #[command(subcommand)]
    System(SystemCommand),

    /// List every resource
    Resources,

    /// Print CLI version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Create a profile from --token and --base-url
    Create {
        name: String,
        /// Make it the default profile
        #[arg(long)]
        default: bool,
    },
    /// Replace token and/or URL of a profile with --token / --base-url
    Update { name: String },
    /// Delete a profile
    Delete { name: String },
    /// List profiles
    #[command(alias = "ls")]
    List,
    /// Set the default profile
    Use { name: String },
    /// Show a profile with its token masked
    Show { name: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Set a global setting (output_format, color_output, log_level)
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

/// Options shared by the create commands of deployable resources
#[derive(Args, Debug, Clone)]
pub struct PlacementArgs {
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub server: String,
    #[arg(long, default_value = "production")]
    pub environment: String,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Deploy right after creation
    #[arg(long)]
    pub instant_deploy: bool,
}

#[derive(Subcommand, Debug)]
pub enum AppsCommand {
    /// List applications
    #[command(alias = "ls")]
    List,
    /// Show an application
    Get { uuid: String },
    /// Create an application
    #[command(subcommand)]
    Create(CreateAppCommand),
    /// Update an application
    Update {
        uuid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        domains: Option<String>,
        #[arg(long)]
        git_branch: Option<String>,
        #[arg(long)]
        git_repository: Option<String>,
        #[arg(long)]
        ports_exposes: Option<String>,
    },
    /// Delete an application
    Delete { uuid: String },
    /// Start (deploy) an application
    Start {
        uuid: String,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        instant: bool,
    },
    /// Stop an application
    Stop { uuid: String },
    /// Restart an application
    Restart { uuid: String },
    /// Show the application's container logs
    Logs {
        uuid: String,
        #[arg(short = 'n', long, default_value_t = 100)]
        lines: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum CreateAppCommand {
    /// From a public git repository
    Public {
        #[command(flatten)]
        placement: PlacementArgs,
        #[arg(long)]
        git_repository: String,
        #[arg(long, default_value = "main")]
        git_branch: String,
        #[arg(long, default_value = "nixpacks")]
        build_pack: String,
        #[arg(long, default_value = "3000")]
        ports_exposes: String,
        #[arg(long)]
        domains: Option<String>,
    },
    /// From a Dockerfile
    Dockerfile {
        #[command(flatten)]
        placement: PlacementArgs,
        /// Path of the Dockerfile to upload
        #[arg(long)]
        dockerfile: PathBuf,
        #[arg(long)]
        ports_exposes: Option<String>,
        #[arg(long)]
        domains: Option<String>,
    },
    /// From a registry image
    Image {
        #[command(flatten)]
        placement: PlacementArgs,
        #[arg(long)]
        image: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, default_value = "80")]
        ports_exposes: String,
        #[arg(long)]
        domains: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServicesCommand {
    /// List services
    #[command(alias = "ls")]
    List,
    /// Show a service
    Get { uuid: String },
    /// Create a service from a one-click type or a compose file
    Create {
        #[command(flatten)]
        placement: PlacementArgs,
        /// One-click service type, e.g. plausible
        #[arg(long = "type")]
        service_type: Option<String>,
        /// Docker compose file to upload
        #[arg(long)]
        compose_file: Option<PathBuf>,
    },
    /// Update a service
    Update {
        uuid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        compose_file: Option<PathBuf>,
    },
    /// Delete a service
    Delete { uuid: String },
    /// Start a service
    Start { uuid: String },
    /// Stop a service
    Stop { uuid: String },
    /// Restart a service
    Restart { uuid: String },
}

#[derive(Subcommand, Debug)]
pub enum DatabasesCommand {
    /// List databases
    #[command(alias = "ls")]
    List,
    /// Show a database
    Get { uuid: String },
    /// Create a database
    Create {
        #[arg(value_enum)]
        engine: DatabaseEngine,
        #[command(flatten)]
        placement: PlacementArgs,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        public_port: Option<u16>,
    },
    /// Update a database
    Update {
        uuid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        public_port: Option<u16>,
    },
    /// Delete a database
    Delete {
        uuid: String,
        #[arg(long)]
        delete_volumes: bool,
    },
    /// Start a database
    Start { uuid: String },
    /// Stop a database
    Stop { uuid: String },
    /// Restart a database
    Restart { uuid: String },
}

#[derive(Subcommand, Debug)]
pub enum ServersCommand {
    /// List servers
    #[command(alias = "ls")]
    List,
    /// Show a server
    Get { uuid: String },
    /// Register a server
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        ip: String,
        #[arg(long, default_value_t = 22)]
        port: u16,
        #[arg(long, default_value = "root")]
        user: String,
        #[arg(long)]
        private_key: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        build_server: bool,
        #[arg(long)]
        validate: bool,
    },
    /// Update a server
    Update {
        uuid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete a server
    Delete { uuid: String },
    /// Validate connectivity to a server
    Validate { uuid: String },
    /// Resources deployed on a server
    Resources { uuid: String },
    /// Domains routed to a server
    Domains { uuid: String },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List projects
    #[command(alias = "ls")]
    List,
    /// Show a project
    Get { uuid: String },
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a project
    Update {
        uuid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete { uuid: String },
    /// Show an environment of a project
    Environment { uuid: String, environment: String },
}

#[derive(Subcommand, Debug)]
pub enum TeamsCommand {
    /// List teams
    #[command(alias = "ls")]
    List,
    /// Show a team
    Get { id: i64 },
    /// List members of a team, or of the current team
    Members { id: Option<i64> },
    /// Show the current team
    Current,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// List private keys
    #[command(alias = "ls")]
    List,
    /// Show a private key
    Get { uuid: String },
    /// Upload a private key
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// File containing the PEM encoded key
        #[arg(long)]
        key_file: PathBuf,
    },
    /// Update a private key
    Update {
        uuid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        key_file: Option<PathBuf>,
    },
    /// Delete a private key
    Delete { uuid: String },
}

#[derive(Subcommand, Debug)]
pub enum DeployCommand {
    /// Deploy one or more applications
    #[command(alias = "application")]
    App {
        #[arg(required = true)]
        uuids: Vec<String>,
        /// Rebuild without cache
        #[arg(long)]
        force: bool,
        /// Tag or branch to deploy
        #[arg(long, alias = "tag")]
        branch: Option<String>,
        /// Pull request number to deploy as a preview
        #[arg(long)]
        pr: Option<u64>,
        /// Follow the deployments until they finish
        #[arg(short, long)]
        watch: bool,
    },
    /// Deploy a service
    Service { uuid: String },
    /// Show a deployment
    Status { deployment_uuid: String },
    /// Follow a deployment until it finishes
    Watch { deployment_uuid: String },
    /// List running deployments, or the deployments of one application
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        take: Option<u32>,
    },
}

/// Which resource owns the variables
#[derive(Args, Debug, Clone)]
pub struct EnvTarget {
    /// Application (or service with --service) uuid
    pub uuid: String,

    /// Target a service instead of an application
    #[arg(long)]
    pub service: bool,
}

#[derive(Subcommand, Debug)]
pub enum EnvCommand {
    /// List variables
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        target: EnvTarget,
        /// Print values instead of masking them
        #[arg(long)]
        show_values: bool,
    },
    /// Create or update a variable
    Set {
        #[command(flatten)]
        target: EnvTarget,
        /// KEY=VALUE
        pair: String,
        #[arg(long)]
        build_time: bool,
        #[arg(long)]
        preview: bool,
        #[arg(long)]
        literal: bool,
    },
    /// Delete a variable by key
    Delete {
        #[command(flatten)]
        target: EnvTarget,
        key: String,
    },
    /// Write the Platform's variables to a .env file
    Export {
        #[command(flatten)]
        target: EnvTarget,
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Upload a .env file
    Import {
        #[command(flatten)]
        target: EnvTarget,
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
    /// Reconcile a .env file and the Platform in both directions
    Sync {
        #[command(flatten)]
        target: EnvTarget,
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove variables from a .env file that the Platform does not have
    Cleanup {
        #[command(flatten)]
        target: EnvTarget,
        #[arg(short, long, default_value = ".env")]
        file: PathBuf,
        /// Keep a timestamped copy of the original file
        #[arg(long)]
        backup: bool,
        #[arg(long)]
        dry_run: bool,
    },
}

impl EnvCommand {
    /// Resource whose variables the command reads or writes
    pub fn target(&self) -> &EnvTarget {
        match self {
            EnvCommand::List { target, .. }
            | EnvCommand::Set { target, .. }
            | EnvCommand::Delete { target, .. }
            | EnvCommand::Export { target, .. }
            | EnvCommand::Import { target, .. }
            | EnvCommand::Sync { target, .. }
            | EnvCommand::Cleanup { target, .. } => target,
        }
    }
}

#[derive(Args, Debug)]
pub struct BulkArgs {
    #[arg(value_enum)]
    pub action: BulkAction,

    #[arg(long, value_enum, default_value_t = ResourceKind::Applications)]
    pub kind: ResourceKind,

    /// Only resources whose name contains this text
    #[arg(long)]
    pub filter: Option<String>,

    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// List the selected resources without acting on them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum SystemCommand {
    /// Platform version
    Version,
    /// Platform health check
    Health,
    /// Enable the API
    EnableApi,
    /// Disable the API
    DisableApi,
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
    fn test_json_flag_overrides_output() {
        let cli = Cli::parse_from(["coolifyme", "--json", "apps", "list"]);
        assert_eq!(cli.global.overrides().output_format, Some(OutputFormat::Json));

        let cli = Cli::parse_from(["coolifyme", "apps", "list", "--no-color", "-p", "prod"]);
        let overrides = cli.global.overrides();
        assert_eq!(overrides.color, Some(false));
        assert_eq!(overrides.profile.as_deref(), Some("prod"));
    }
}
