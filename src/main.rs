use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use recipe_book::config::{ClientConfig, ConfigError};
use recipe_book::forms::{LoginForm, RegisterForm, SubmitError, submit_login, submit_register};
use recipe_book::net::{ApiError, HttpRecipeApi};
use recipe_book::state::view::{HeaderBadge, RecipeView};
use recipe_book::state::{RecipeSync, SessionManager, SharedSession};
use recipe_book::storage::FileStorage;
use tokio::task::LocalSet;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("{0}")]
    Submit(SubmitError),
}

impl From<SubmitError> for CliError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Api(api) => Self::Api(api),
            invalid @ SubmitError::Invalid(_) => Self::Submit(invalid),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "recipe-book", about = "Family recipe book client")]
struct Cli {
    /// Recipe API base URL (overrides RECIPE_API_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Directory holding the saved session (overrides RECIPE_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Sign in with an existing account.
    Login(LoginArgs),
    /// Sign out and forget the saved session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// List the signed-in user's recipes.
    Recipes,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    username: String,

    #[arg(long, env = "RECIPE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    username: String,

    #[arg(long, env = "RECIPE_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, env = "RECIPE_PASSWORD_CONFIRM", hide_env_values = true)]
    password_confirm: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    LocalSet::new().run_until(run(cli)).await
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?.with_overrides(cli.base_url.as_deref(), cli.data_dir)?;
    let api = Rc::new(HttpRecipeApi::from_config(&config)?);
    let session: SharedSession<FileStorage> =
        Rc::new(RefCell::new(SessionManager::new(FileStorage::new(&config.data_dir))));
    let sync = RecipeSync::install(&session, Rc::clone(&api));

    let outcome = session.borrow_mut().restore_on_startup();
    debug!(?outcome, data_dir = %config.data_dir.display(), "startup restore");

    let show_recipes = match cli.command {
        Command::Register(args) => {
            let form = RegisterForm {
                username: args.username,
                password: args.password,
                password_confirm: args.password_confirm,
            };
            submit_register(&session, api.as_ref(), &form).await?;
            true
        }
        Command::Login(args) => {
            let form = LoginForm { username: args.username, password: args.password };
            submit_login(&session, api.as_ref(), &form).await?;
            true
        }
        Command::Logout => {
            session.borrow_mut().logout();
            false
        }
        Command::Whoami => false,
        Command::Recipes => true,
    };

    sync.settle().await;

    let guard = session.borrow();
    let session = &*guard;
    println!("{}", HeaderBadge::from_session(session));
    if show_recipes && session.is_logged_in() {
        if let Some(e) = session.fetch_error() {
            eprintln!("could not load recipes: {e}");
        }
        println!("{}", RecipeView::from_session(session));
    }
    Ok(())
}
