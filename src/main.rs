use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use nmq::api::{load_snapshot, HttpApi};
use nmq::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use nmq::console::{render_review_table, Console, ConsoleOutcome};
use nmq::models::AppState;
use nmq::services::{AnswerStore, JsonFileAnswerStore};
use nmq::wizard::review::compile_review;
use nmq::wizard::{Catalog, WizardSession};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    let api = match HttpApi::new(config::get_api_base_url(), config::get_api_token(), config::get_http_timeout()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(%e, "Failed to create HTTP client");
            eprintln!("{}: {}", yansi::Paint::new("Failed to create HTTP client").red(), e);
            process::exit(1);
        }
    };
    let catalog = match Catalog::standard() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(%e, "Question catalog is inconsistent");
            eprintln!("{}: {}", yansi::Paint::new("Question catalog is inconsistent").red(), e);
            process::exit(1);
        }
    };
    AppState::new(api, JsonFileAnswerStore::new(config::get_answers_file()), catalog)
        .with_idle_timeout(config::get_session_idle_timeout())
}

async fn start_server(state: AppState, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            sweeper.evict_idle_sessions();
        }
    });
    let app = nmq::routes::build_router(state);
    tracing::info!(%addr, "Starting quick setup server");
    println!(
        "{} {}",
        yansi::Paint::new("Quick setup API running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

async fn run_setup(state: AppState, network_id: Option<String>) {
    let snapshot = match load_snapshot(&*state.api).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", yansi::Paint::new("Could not load networks").red(), e.user_message());
            process::exit(1);
        }
    };
    if let Some(net) = network_id.as_deref() {
        if snapshot.network(net).is_none() {
            eprintln!("{} '{}'", yansi::Paint::new("Unknown network").red(), net);
            process::exit(1);
        }
    }
    let mut session = WizardSession::new(state.catalog.clone(), snapshot, network_id);
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(stdin.lock(), io::stdout());
    if !interactive {
        console = console.without_spinner();
    }
    match console.run(&mut session, &*state.api, &*state.store).await {
        Ok(ConsoleOutcome::Completed { tour_type, .. }) => {
            if let Some(tour) = tour_type {
                println!("{} {}", yansi::Paint::new("Guided tour:").dim(), tour.as_str());
            }
        }
        Ok(ConsoleOutcome::Cancelled) => process::exit(130),
        Err(e) => {
            eprintln!("{}", yansi::Paint::new(e.to_string()).red());
            process::exit(1);
        }
    }
}

async fn show_answers(state: AppState, network_id: &str) {
    let saved = match state.store.load(network_id).await {
        Ok(Some(saved)) => saved,
        Ok(None) => {
            println!("No saved answers for network '{}'", network_id);
            return;
        }
        Err(e) => {
            eprintln!("{}: {}", yansi::Paint::new("Failed to read answers file").red(), e);
            process::exit(1);
        }
    };
    // Names are nicer than ids, but ids are fine when the server is unreachable
    let snapshot = load_snapshot(&*state.api).await.unwrap_or_else(|e| {
        tracing::warn!(%e, "Showing raw ids; could not load resources");
        Default::default()
    });
    let lines = compile_review(&saved.answers, &state.catalog, &snapshot);
    println!("{} {}", yansi::Paint::new("Saved at").bold(), saved.saved_at);
    println!("\n{}\n", render_review_table(&lines));
}

#[derive(Parser)]
#[command(
    name = "nmq",
    author,
    version,
    about = "Quick setup for mesh network gateways",
    long_about = r#"nmq walks you through the common gateway setups of a mesh network: remote access, internet gateways and site-to-site connections.

Each step may create gateways or attach users through the management API configured with API_BASE_URL and API_TOKEN. Completed answers are saved to ANSWERS_FILE.

Examples:
  1) Interactive setup:
      nmq setup --network-id office
  2) Serve the JSON API:
      nmq serve --host 127.0.0.1 --port 8080
  3) Show what was chosen last time:
      nmq answers office
"#,
    after_help = "Use `nmq <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the setup wizard in the terminal
    Setup {
        /// Work against this network and skip the network question
        #[arg(long)]
        network_id: Option<String>,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Start the JSON API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Validate configuration (env vars / API credentials)
    #[command(
        about = "Validate configuration and ensure API connectivity.",
        long_about = "Validate the environment variables nmq needs, then check the configured API token by listing networks on the management server."
    )]
    CheckConfig {
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Show the answers saved for a network
    Answers {
        network_id: String,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        nmq::api::set_silent(true);
    }

    // Serve by default
    let Some(command) = cli.command else {
        let state = build_state_from_env(None);
        start_server(state, DEFAULT_HOST, DEFAULT_PORT).await;
        return;
    };

    match command {
        Commands::Setup { network_id, env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            run_setup(state, network_id).await;
        }
        Commands::Serve { host, port, env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            start_server(state, &host, port).await;
        }
        Commands::CheckConfig { env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            let mut ok = true;
            if std::env::var("API_BASE_URL").map(|v| v.trim().is_empty()).unwrap_or(true) {
                eprintln!(
                    "{} {}",
                    yansi::Paint::new("API_BASE_URL is not configured; using").yellow(),
                    state.api.base_url()
                );
            }
            if config::get_api_token().trim().is_empty() {
                eprintln!("{}", yansi::Paint::new("API_TOKEN is not configured").red());
                ok = false;
            }
            if !ok {
                process::exit(1);
            }
            match load_snapshot(&*state.api).await {
                Ok(snapshot) => {
                    println!(
                        "{} ({} networks, {} nodes, {} users)",
                        yansi::Paint::new("Configuration looks valid").green(),
                        snapshot.networks.len(),
                        snapshot.nodes.len(),
                        snapshot.users.len()
                    );
                    println!("Answers file: {}", state.store.path().display());
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Configuration appears invalid").red(), e.user_message());
                    process::exit(1);
                }
            }
        }
        Commands::Answers { network_id, env_file } => {
            let state = build_state_from_env(env_file.as_deref());
            show_answers(state, &network_id).await;
        }
    }
}

