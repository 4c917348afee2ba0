//! Management commands behind the `portfolio_site` binary.

use clap::{Parser, Subcommand};

use crate::{
    entry::{EntryPoint, ListenerEntry},
    errors::StartupError,
    settings::AppConfig,
    startup::Application,
};

pub mod menu;
pub mod sample_data;
pub mod shell;
pub mod static_files;
pub mod steps;
pub mod superuser;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio_site",
    version,
    about = "Portfolio site server and management commands",
    long_about = "Runs the portfolio site and its maintenance tasks.\n\
                  With no command an interactive menu is shown."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server
    #[command(alias = "serve")]
    Runserver {
        /// Port to listen on (all interfaces)
        port: Option<u16>,
    },
    /// Apply database migrations
    Migrate,
    /// Copy static assets into the collected static root
    #[command(alias = "static")]
    Collectstatic,
    /// Create an admin account
    #[command(alias = "superuser")]
    Createsuperuser {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "SUPERUSER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Run the test suite with the testing profile
    Test {
        /// Extra arguments passed to `cargo test`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Initialize everything and report problems
    Check,
    /// Interactive SQL shell against the configured database
    Shell,
    /// Print the route table
    Urls,
    /// Insert sample skills, projects and site configuration
    #[command(name = "create_sample_data")]
    CreateSampleData,
    /// First-time setup: migrate, collect static files, optionally create an admin
    Setup {
        /// Skip the superuser prompt
        #[arg(long)]
        no_input: bool,
    },
    /// Deployment build under the production profile: migrate then collect static files
    Build,
    /// Serve a single request from CGI environment variables
    Cgi,
    /// Show the interactive menu
    Menu,
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Loads the configuration and initializes the application.
pub async fn load_application() -> Result<Application, StartupError> {
    let config = AppConfig::new()?;
    crate::telemetry::init(&config.logging);
    Application::build(config).await
}

/// Runs one command and returns the process exit code.
pub async fn run(cli: Cli) -> i32 {
    let command = match cli.command {
        Some(command) => command,
        None => match menu::prompt_stdin() {
            Ok(Some(command)) => command,
            Ok(None) => {
                println!("👋 Goodbye!");
                return 0;
            }
            Err(e) => {
                eprintln!("❌ Could not read menu choice: {e}");
                return 1;
            }
        },
    };

    match execute(command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            1
        }
    }
}

async fn execute(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Runserver { port } => runserver(port).await.map(|_| 0),
        Command::Migrate => steps::migrate().await.map(|_| 0),
        Command::Collectstatic => steps::collectstatic().await.map(|_| 0),
        Command::Createsuperuser { email, password } => {
            let app = load_application().await?;
            superuser::create_superuser(&app, email, password).await.map(|_| 0)
        }
        Command::Test { args } => steps::run_tests(&args).await,
        Command::Check => steps::check().await.map(|_| 0),
        Command::Shell => {
            let app = load_application().await?;
            shell::run(&app).await.map(|_| 0)
        }
        Command::Urls => {
            print_urls();
            Ok(0)
        }
        Command::CreateSampleData => {
            let app = load_application().await?;
            sample_data::create_sample_data(&app).await.map(|_| 0)
        }
        Command::Setup { no_input } => steps::setup(no_input).await.map(|_| 0),
        Command::Build => steps::build().await.map(|_| 0),
        Command::Cgi => steps::cgi().await.map(|_| 0),
        Command::Menu => match menu::prompt_stdin()? {
            Some(Command::Menu) | None => Ok(0),
            Some(command) => Box::pin(execute(command)).await,
        },
        Command::External(args) => {
            let name = args.first().map(String::as_str).unwrap_or_default();
            eprintln!("Unknown command: '{name}'");
            eprintln!("Type 'portfolio_site help' for usage.");
            Ok(1)
        }
    }
}

async fn runserver(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::new()?;
    if let Some(port) = port {
        config.server.port = port;
    }
    crate::telemetry::init(&config.logging);

    let address = config.server.address();
    let port = config.server.port;
    let app = Application::build(config).await?;
    let entry = ListenerEntry::bind(&address)?;

    println!("🚀 Starting portfolio development server on port {port}...");
    println!("🌐 Access at: http://127.0.0.1:{port}/");
    println!("💡 Press Ctrl+C to stop the server");
    println!("{}", "-".repeat(50));

    entry.run(app).await?;
    Ok(())
}

/// Route table lines, in match order.
pub fn url_lines() -> Vec<String> {
    let public = crate::dispatcher::ROUTE_TABLE
        .iter()
        .map(|(path, methods, name)| format!("{path:<45} {methods:<18} {name}"));
    let assets = std::iter::once(format!("{:<45} {:<18} {}", "/static/<path>", "GET", "static"));
    let admin = crate::routes::ADMIN_ROUTE_TABLE
        .iter()
        .map(|(path, methods)| format!("{path:<45} {methods:<18} admin"));

    public.chain(assets).chain(admin).collect()
}

fn print_urls() {
    println!("🔗 URL patterns:");
    for line in url_lines() {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_an_alias_for_runserver() {
        let cli = Cli::try_parse_from(["portfolio_site", "serve", "9000"]).unwrap();
        assert_eq!(cli.command, Some(Command::Runserver { port: Some(9000) }));
    }

    #[test]
    fn static_and_superuser_aliases_resolve() {
        let cli = Cli::try_parse_from(["portfolio_site", "static"]).unwrap();
        assert_eq!(cli.command, Some(Command::Collectstatic));

        let cli = Cli::try_parse_from(["portfolio_site", "superuser", "--email", "a@b.com"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Createsuperuser { email: Some(_), .. })));
    }

    #[test]
    fn no_arguments_means_menu() {
        let cli = Cli::try_parse_from(["portfolio_site"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn unknown_commands_are_forwarded() {
        let cli = Cli::try_parse_from(["portfolio_site", "makemigrations", "main"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::External(vec!["makemigrations".into(), "main".into()]))
        );
    }

    #[tokio::test]
    async fn unknown_commands_exit_non_zero() {
        let code = execute(Command::External(vec!["frobnicate".into()])).await.unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn url_table_lists_public_and_admin_routes() {
        let lines = url_lines();
        assert!(lines.iter().any(|l| l.starts_with("/for-loop/")));
        assert!(lines.iter().any(|l| l.starts_with("/admin/login")));
    }
}
