mod cmd;
mod context;
mod output;
mod prompt;

use clap::{Parser, Subcommand};
use context::{Context, Globals};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lagoon-assist",
    about = "Routine Lagoon operations: list, delete, deploy, login links and SSH keys",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding .lagoon-assist/ and .lagoon.yml (default: $HOME)
    #[arg(long, global = true, env = "LAGOON_ASSIST_HOME")]
    home: Option<PathBuf>,

    /// Lagoon instance to target
    #[arg(long, short = 'l', global = true, env = "LAGOON_INSTANCE")]
    instance: Option<String>,

    /// Lagoon project to target
    #[arg(long, short = 'p', global = true, env = "LAGOON_PROJECT")]
    project: Option<String>,

    /// Lagoon CLI binary name or path
    #[arg(long, global = true, env = "LAGOON_ASSIST_LAGOON_BIN")]
    lagoon_bin: Option<String>,

    /// git binary name or path
    #[arg(long, global = true, env = "LAGOON_ASSIST_GIT_BIN")]
    git_bin: Option<String>,

    /// Output as JSON
    #[arg(long, short = 'j', global = true)]
    json: bool,

    /// Show debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured Lagoon instances
    Instances,

    /// List projects on the instance
    Projects,

    /// List environments of the project
    Environments {
        /// Add a pull request link column for pr-N environments
        #[arg(long)]
        links: bool,
    },

    /// List all users on the instance
    Users,

    /// Delete one or more environments (protected ones are refused)
    Delete {
        #[arg(required = true)]
        environments: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Generate a one-time login link for an environment
    LoginLink { environment: String },

    /// Clear the application cache of an environment
    ClearCache { environment: String },

    /// Deploy a branch of the project
    Deploy { branch: String },

    /// List branches of the project's git remote
    Branches {
        /// Remote to query instead of the project's git URL
        #[arg(long)]
        git_url: Option<String>,
    },

    /// Print the GitHub pull request URL of a pr-N environment
    PrUrl {
        environment: String,
        git_url: String,
    },

    /// Set the SSH key an instance authenticates with
    SshKey {
        instance: String,
        /// Path to the private key
        path: PathBuf,
    },

    /// Interactive menu (default)
    Menu,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let globals = Globals {
        home: cli.home,
        instance: cli.instance,
        project: cli.project,
        lagoon_bin: cli.lagoon_bin,
        git_bin: cli.git_bin,
        json: cli.json,
    };

    let result = Context::load(globals).and_then(|mut ctx| {
        match cli.command.unwrap_or(Commands::Menu) {
            Commands::Instances => cmd::instance::list(&ctx),
            Commands::Projects => cmd::project::list(&ctx),
            Commands::Environments { links } => cmd::environment::list(&ctx, links),
            Commands::Users => cmd::user::list(&ctx),
            Commands::Delete { environments, yes } => {
                cmd::environment::delete(&ctx, &environments, yes)
            }
            Commands::LoginLink { environment } => cmd::environment::login_link(&ctx, &environment),
            Commands::ClearCache { environment } => {
                cmd::environment::clear_cache(&ctx, &environment)
            }
            Commands::Deploy { branch } => cmd::deploy::deploy(&ctx, &branch),
            Commands::Branches { git_url } => cmd::deploy::branches(&ctx, git_url.as_deref()),
            Commands::PrUrl {
                environment,
                git_url,
            } => cmd::environment::pr_url(&ctx, &environment, &git_url),
            Commands::SshKey { instance, path } => {
                cmd::instance::configure_ssh_key(&ctx, &instance, &path)
            }
            Commands::Menu => cmd::menu::run(&mut ctx),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
