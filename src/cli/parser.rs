use crate::core::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for repmax
/// Workout log with friends' feed, backed by SQLite
#[derive(Parser)]
#[command(
    name = "repmax",
    version = env!("CARGO_PKG_VERSION"),
    about = "1 Rep Max: log workouts, keep templates and follow your friends' training",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update, fast password hashing)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check the configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in; offers to resume an unfinished workout
    Signin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out
    Signout,

    /// Show the signed-in account
    Whoami,

    /// List, add or remove friends (by email or user id)
    Friends {
        #[arg(long, value_name = "EMAIL_OR_ID", conflicts_with = "remove")]
        add: Option<String>,

        #[arg(long, value_name = "EMAIL_OR_ID")]
        remove: Option<String>,
    },

    /// Recent workouts from you and your friends
    Feed,

    /// Your finished workouts, newest first
    History,

    /// Delete one of your workouts
    Delete {
        /// Workout id (see `history`)
        id: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Exercises you can add: catalog plus your custom ones
    Exercises,

    /// Manage workout templates
    Template {
        #[arg(
            long,
            value_name = "NAME",
            conflicts_with_all = ["list", "delete"],
            requires = "exercises"
        )]
        add: Option<String>,

        /// Exercise names for --add
        #[arg(value_name = "EXERCISE")]
        exercises: Vec<String>,

        #[arg(long)]
        list: bool,

        #[arg(long, value_name = "ID")]
        delete: Option<String>,
    },

    /// Start a workout (interactive)
    Workout {
        #[arg(long, value_name = "NAME", help = "Start from a saved template")]
        template: Option<String>,
    },

    /// Continue an unfinished workout, or save it with --end
    Resume {
        #[arg(long)]
        end: bool,
    },

    /// Export your workout history
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f', help = "Overwrite output file without confirmation")]
        force: bool,
    },
}
