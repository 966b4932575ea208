//! ticketbridge CLI — drives the `client` crate against a running server.
//!
//! The session snapshot is persisted to a JSON file, so login state
//! survives between invocations exactly like a browser session would.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use client::net::api::{ApiError, HttpApi};
use client::net::types::ProfileUpdate;
use client::state::auth::{AuthController, AuthOutcome};
use client::storage::FileStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `ticketbridge login` first")]
    NotLoggedIn,
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Operation(String),
}

#[derive(Parser, Debug)]
#[command(name = "ticketbridge", about = "Ticketbridge booking API CLI")]
struct Cli {
    #[arg(long, env = "TICKETBRIDGE_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Where the session snapshot (token + user) is persisted.
    #[arg(long, env = "TICKETBRIDGE_SESSION_FILE", default_value = ".ticketbridge-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in.
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with email and password.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and erase the persisted session.
    Logout,
    /// Show the current user.
    Me,
    /// Update profile fields.
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List all events.
    Events,
    /// Show one event.
    Event { id: Uuid },
    /// Book seats for an event.
    Book {
        event_id: Uuid,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
    },
    /// List your tickets.
    Tickets,
    /// Cancel one of your tickets.
    Cancel { id: Uuid },
}

struct Session {
    api: Arc<HttpApi>,
    controller: AuthController,
}

impl Session {
    fn open(base_url: &str, session_file: PathBuf) -> Result<Self, CliError> {
        let api = Arc::new(HttpApi::new(base_url)?);
        let store = Arc::new(FileStore::new(session_file));
        let controller = AuthController::new(api.clone(), store);
        controller.initialize_auth();
        Ok(Self { api, controller })
    }

    fn token(&self) -> Result<String, CliError> {
        self.controller.snapshot().token.ok_or(CliError::NotLoggedIn)
    }
}

fn require_success(outcome: AuthOutcome) -> Result<String, CliError> {
    if outcome.success {
        Ok(outcome.message)
    } else {
        Err(CliError::Operation(outcome.message))
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let session = Session::open(&cli.base_url, cli.session_file)?;

    match cli.command {
        Command::Register { username, email, password } => {
            let outcome = session.controller.register(&username, &email, &password).await;
            println!("{}", require_success(outcome)?);
            Ok(())
        }
        Command::Login { email, password } => {
            let outcome = session.controller.login(&email, &password).await;
            println!("{}", require_success(outcome)?);
            Ok(())
        }
        Command::Logout => {
            session.controller.logout().await;
            println!("Logged out");
            Ok(())
        }
        Command::Me => run_me(&session),
        Command::Profile { first_name, last_name, phone } => {
            if first_name.is_none() && last_name.is_none() && phone.is_none() {
                return Err(CliError::Operation(
                    "nothing to update; pass at least one field".into(),
                ));
            }
            let fields = ProfileUpdate { first_name, last_name, phone };
            let outcome = session.controller.update_profile(&fields).await;
            println!("{}", require_success(outcome)?);
            Ok(())
        }
        Command::Events => run_events(&session).await,
        Command::Event { id } => {
            let event = session.api.get_event(id).await?;
            print_event(&event);
            Ok(())
        }
        Command::Book { event_id, quantity } => {
            let token = session.token()?;
            let (message, ticket) = session.api.book_ticket(&token, event_id, quantity).await?;
            println!("{message}: ticket {} x{}", ticket.id, ticket.quantity);
            Ok(())
        }
        Command::Tickets => run_tickets(&session).await,
        Command::Cancel { id } => {
            let token = session.token()?;
            let message = session.api.cancel_ticket(&token, id).await?;
            println!("{message}");
            Ok(())
        }
    }
}

fn run_me(session: &Session) -> Result<(), CliError> {
    let state = session.controller.snapshot();
    if !state.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let Some(user) = state.user.as_ref() else {
        return Err(CliError::NotLoggedIn);
    };
    println!("{} <{}>", state.full_name(), user.email);
    println!("username: {}", user.username);
    println!("role:     {:?}", user.role);
    if let Some(phone) = &user.profile.phone {
        println!("phone:    {phone}");
    }
    Ok(())
}

async fn run_events(session: &Session) -> Result<(), CliError> {
    let events = session.api.list_events().await?;
    if events.is_empty() {
        println!("no events");
        return Ok(());
    }
    for event in events {
        println!(
            "{}  {}  {} @ {}  ({} seats, {} cents)",
            event.id, event.date, event.name, event.venue, event.capacity, event.price_cents
        );
    }
    Ok(())
}

async fn run_tickets(session: &Session) -> Result<(), CliError> {
    let token = session.token()?;
    let tickets = session.api.my_tickets(&token).await?;
    if tickets.is_empty() {
        println!("no tickets");
        return Ok(());
    }
    for ticket in tickets {
        println!(
            "{}  event {}  x{}  {:?}  {}",
            ticket.id, ticket.event_id, ticket.quantity, ticket.status, ticket.created_at
        );
    }
    Ok(())
}

fn print_event(event: &client::net::types::EventRecord) {
    println!("{}", event.name);
    println!("id:       {}", event.id);
    println!("when:     {}", event.date);
    println!("venue:    {}", event.venue);
    println!("price:    {} cents", event.price_cents);
    println!("capacity: {}", event.capacity);
    if !event.description.is_empty() {
        println!("\n{}", event.description);
    }
}
