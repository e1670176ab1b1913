//! Command-line arguments (clap derive).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "flowreg")]
#[command(about = "Flow registry administration console", long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Registry URL, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Keep the session token in memory only
    #[arg(long, global = true)]
    pub no_store: bool,
}

/// Flow registry administration console
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in with a username and password
    Login {
        /// Registry username
        username: String,

        /// Password (read from FLOWREG_PASSWORD or stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Logout,

    /// Show the identity behind the current session
    Whoami,

    /// Check whether a console URL may be visited
    Navigate {
        /// Console URL, e.g. /administration/users
        url: String,
    },

    /// Bucket administration
    Buckets {
        /// Bucket subcommand
        #[command(subcommand)]
        command: BucketsCommand,
    },

    /// Flows and other versioned items
    Droplets {
        /// Droplet subcommand
        #[command(subcommand)]
        command: DropletsCommand,
    },

    /// User administration
    Users {
        /// User subcommand
        #[command(subcommand)]
        command: UsersCommand,
    },

    /// Group administration
    Groups {
        /// Group subcommand
        #[command(subcommand)]
        command: GroupsCommand,
    },
}

/// Search and sort options shared by every list command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Keep rows matching this term; repeat to narrow further
    #[arg(short, long = "search")]
    pub search: Vec<String>,

    /// Match whole field values instead of substrings
    #[arg(long)]
    pub exact: bool,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

/// Bucket administration
#[derive(Debug, Subcommand)]
pub enum BucketsCommand {
    /// List buckets
    List {
        /// Search and sort options
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a bucket
    Create {
        /// Bucket name
        name: String,
    },
    /// Delete buckets by identifier
    Delete {
        /// Bucket identifiers
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Flows and other versioned items
#[derive(Debug, Subcommand)]
pub enum DropletsCommand {
    /// List droplets, optionally in one bucket
    List {
        /// Bucket identifier
        #[arg(short, long)]
        bucket: Option<String>,

        /// Search and sort options
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one droplet with its versions
    Show {
        /// Bucket identifier
        bucket: String,
        /// Droplet type path segment, e.g. flows
        droplet_type: String,
        /// Droplet identifier
        id: String,
    },
    /// Delete one droplet
    Delete {
        /// Bucket identifier
        bucket: String,
        /// Droplet type path segment
        droplet_type: String,
        /// Droplet identifier
        id: String,
    },
}

/// User administration
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users and groups
    List {
        /// Search and sort options
        #[command(flatten)]
        list: ListArgs,
    },
    /// Add a user
    Add {
        /// Login identity
        identity: String,
    },
}

/// Group administration
#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List groups
    List {
        /// Search and sort options
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show a group and its members
    Show {
        /// Group identifier
        id: String,
    },
    /// Add users to a group
    AddMembers {
        /// Group identifier
        group: String,
        /// Users to add
        #[arg(required = true)]
        users: Vec<String>,
    },
    /// Remove users from a group
    RemoveMembers {
        /// Group identifier
        group: String,
        /// Users to remove
        #[arg(required = true)]
        users: Vec<String>,
    },
}

impl Commands {
    /// Console URL whose gate the command must pass, if any.
    pub fn gated_url(&self) -> Option<&'static str> {
        match self {
            Self::Buckets {
                command: BucketsCommand::Create { .. } | BucketsCommand::Delete { .. },
            } => Some("/administration/workflow"),
            Self::Users { .. } | Self::Groups { .. } => Some("/administration/users"),
            _ => None,
        }
    }
}
