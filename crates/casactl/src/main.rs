//! Casa Control - CLI client for the casa household backend.
//!
//! Every subcommand is one view over the backend: validate input, issue
//! one HTTP call, render the response.

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use casactl::client::ApiClient;
use casactl::commands;
use casactl::logging::LogEntry;
use casa_common::config::CasaConfig;
use casa_common::types::InviteAction;
use casa_common::ui::colors;

#[derive(Parser)]
#[command(name = "casactl")]
#[command(about = "Casa - household coordination from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides $CASA_API and the config file)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        username: String,
        email: String,
        /// Read from the terminal when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Complete registration with the emailed token
    VerifyEmail { token: String },

    /// Request a password reset email
    ResetPassword { email: String },

    /// Set a new password with a reset token
    ChangePassword {
        token: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Household groups
    Groups {
        #[command(subcommand)]
        command: GroupsCommand,
    },

    /// Registered users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },

    /// Invites and chore alerts
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },

    /// Shared bill ledger
    Bills {
        #[command(subcommand)]
        command: BillsCommand,
    },

    /// Shared calendar
    Events {
        #[command(subcommand)]
        command: EventsCommand,
    },

    /// Shared grocery list
    Grocery {
        #[command(subcommand)]
        command: GroceryCommand,
    },
}

#[derive(Subcommand)]
enum GroupsCommand {
    /// List your groups
    List,

    /// Create a group and invite members
    Create {
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        notes: Option<String>,
        /// User to invite (id, username or email); repeatable
        #[arg(long = "invite")]
        invites: Vec<String>,
    },

    /// One group with your balance position
    Show { group_id: String },
}

#[derive(Subcommand)]
enum UsersCommand {
    /// Search users by username or email
    Search { query: String },
}

#[derive(Subcommand)]
enum NotifyCommand {
    /// Pending invites and chore alerts
    List,

    /// Accept a group invite
    Accept { id: String },

    /// Decline a group invite
    Decline { id: String },

    /// Retire a chore alert
    Read { id: String },

    /// Poll for new notifications until interrupted
    Watch,
}

#[derive(Subcommand)]
enum BillsCommand {
    /// Transaction history and your net balance
    List { group_id: String },

    /// Record an expense split between members
    Add {
        group_id: String,
        amount: f64,
        /// What the money was for
        #[arg(long = "for")]
        description: String,
        /// Member sharing the bill (id, username or email); repeatable
        #[arg(long = "split-with")]
        split_with: Vec<String>,
    },
}

#[derive(Subcommand)]
enum EventsCommand {
    /// Events for a group, optionally bounded
    List {
        group_id: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },

    /// Schedule an event
    Add {
        group_id: String,
        title: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Attendee (id, username or email); repeatable
        #[arg(long = "with")]
        with: Vec<String>,
        #[arg(long = "describe")]
        description: Option<String>,
        /// weekly or biweekly
        #[arg(long)]
        repeat: Option<String>,
    },

    /// Change fields on an event
    Edit {
        group_id: String,
        event_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long = "describe")]
        description: Option<String>,
    },

    /// Delete an event
    Remove { group_id: String, event_id: String },
}

#[derive(Subcommand)]
enum GroceryCommand {
    /// Current grocery requests
    List { group_id: String },

    /// Request an item
    Add {
        group_id: String,
        item: String,
        #[arg(long)]
        place: String,
        #[arg(long)]
        qty: Option<String>,
    },

    /// Rewrite your own request
    Edit {
        group_id: String,
        item_id: String,
        #[arg(long)]
        item: String,
        #[arg(long)]
        place: String,
        #[arg(long)]
        qty: Option<String>,
    },

    /// Delete a request
    Remove { group_id: String, item_id: String },

    /// Offer to buy an item
    Claim {
        group_id: String,
        item_id: String,
        /// When you plan to shop
        #[arg(long)]
        when: Option<String>,
    },

    /// Withdraw your claim
    Unclaim { group_id: String, item_id: String },
}

async fn run(cli: Cli) -> Result<()> {
    let config = CasaConfig::load()?;
    let base_url = ApiClient::discover_base_url(cli.api.as_deref(), &config);
    let client = ApiClient::new(base_url);

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&client, &username, &email, password).await,
        Commands::Login { email, password } => {
            commands::auth::login(&client, &email, password).await
        }
        Commands::VerifyEmail { token } => commands::auth::verify_email(&client, &token).await,
        Commands::ResetPassword { email } => {
            commands::auth::reset_password(&client, &email).await
        }
        Commands::ChangePassword { token, password } => {
            commands::auth::change_password(&client, &token, password).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(),

        Commands::Groups { command } => match command {
            GroupsCommand::List => commands::groups::list(&client).await,
            GroupsCommand::Create {
                name,
                address,
                notes,
                invites,
            } => commands::groups::create(&client, &name, &address, notes, invites).await,
            GroupsCommand::Show { group_id } => {
                commands::groups::show(&client, &group_id).await
            }
        },

        Commands::Users { command } => match command {
            UsersCommand::Search { query } => commands::groups::search(&client, &query).await,
        },

        Commands::Notify { command } => match command {
            NotifyCommand::List => commands::notify::list(&client).await,
            NotifyCommand::Accept { id } => {
                commands::notify::respond(&client, &id, InviteAction::Accept).await
            }
            NotifyCommand::Decline { id } => {
                commands::notify::respond(&client, &id, InviteAction::Decline).await
            }
            NotifyCommand::Read { id } => commands::notify::read(&client, &id).await,
            NotifyCommand::Watch => {
                commands::notify::watch(&client, config.watch.interval_secs).await
            }
        },

        Commands::Bills { command } => match command {
            BillsCommand::List { group_id } => commands::bills::list(&client, &group_id).await,
            BillsCommand::Add {
                group_id,
                amount,
                description,
                split_with,
            } => commands::bills::add(&client, &group_id, amount, &description, split_with).await,
        },

        Commands::Events { command } => match command {
            EventsCommand::List { group_id, from, to } => {
                commands::events::list(&client, &group_id, from, to).await
            }
            EventsCommand::Add {
                group_id,
                title,
                start,
                end,
                with,
                description,
                repeat,
            } => {
                commands::events::add(
                    &client, &group_id, &title, &start, &end, with, description, repeat,
                )
                .await
            }
            EventsCommand::Edit {
                group_id,
                event_id,
                title,
                start,
                end,
                description,
            } => {
                commands::events::edit(
                    &client, &group_id, &event_id, title, start, end, description,
                )
                .await
            }
            EventsCommand::Remove { group_id, event_id } => {
                commands::events::remove(&client, &group_id, &event_id).await
            }
        },

        Commands::Grocery { command } => match command {
            GroceryCommand::List { group_id } => {
                commands::grocery::list(&client, &group_id).await
            }
            GroceryCommand::Add {
                group_id,
                item,
                place,
                qty,
            } => commands::grocery::add(&client, &group_id, &item, &place, qty).await,
            GroceryCommand::Edit {
                group_id,
                item_id,
                item,
                place,
                qty,
            } => commands::grocery::edit(&client, &group_id, &item_id, &item, &place, qty).await,
            GroceryCommand::Remove { group_id, item_id } => {
                commands::grocery::remove(&client, &group_id, &item_id).await
            }
            GroceryCommand::Claim {
                group_id,
                item_id,
                when,
            } => commands::grocery::claim(&client, &group_id, &item_id, when).await,
            GroceryCommand::Unclaim { group_id, item_id } => {
                commands::grocery::unclaim(&client, &group_id, &item_id).await
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let started = Instant::now();

    let result = run(cli).await;
    let exit_code = if result.is_ok() { 0 } else { 1 };

    let entry = LogEntry::finish(started, exit_code, result.as_ref().err());
    let _ = entry.write();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}error:{} {err:#}", colors::ERR, colors::RESET);
            ExitCode::from(1)
        }
    }
}
