//! Postboard CLI - log in and browse posts from the terminal.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use postboard_config_and_utils::{init_logging, Config, Paths};
use tracing::debug;

/// Postboard CLI - Manage your Postboard session and read posts.
#[derive(Parser)]
#[command(name = "postboard")]
#[command(about = "Postboard CLI for authentication and browsing posts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the configured level
    #[arg(long, global = true, env = "POSTBOARD_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
        /// Account password (prompted without echo when omitted)
        #[arg(short, long, env = "POSTBOARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Logout and clear session
    Logout,

    /// Check authentication status
    Status,

    /// Show the logged-in user's profile
    Whoami,

    /// Browse posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// List posts
    List,
    /// Show a post
    Show {
        /// Post ID
        id: String,
    },
}

async fn run(cli: Cli, config: Config, paths: Paths) -> anyhow::Result<()> {
    let app = commands::App::start(config, &paths).await?;
    let format = cli.format;

    match cli.command {
        Commands::Login { email, password } => {
            commands::login(&app, email, password, &format).await
        }
        Commands::Logout => commands::logout(&app, &format).await,
        Commands::Status => commands::status(&app, &format).await,
        Commands::Whoami => commands::whoami(&app, &format).await,
        Commands::Posts { command } => match command {
            PostCommands::List => commands::posts_list(&app, &format).await,
            PostCommands::Show { id } => commands::posts_show(&app, &id, &format).await,
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    let setup = Paths::new().and_then(|paths| Config::load(&paths).map(|config| (paths, config)));
    let (paths, config) = match setup {
        Ok(loaded) => loaded,
        Err(e) => {
            output::print_error(&format!("Failed to load configuration: {}", e), &format);
            std::process::exit(1);
        }
    };

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_logging(&level, Some(paths.log_file()));
    debug!(api_url = %config.api_url, "Starting postboard");

    if let Err(e) = run(cli, config, paths).await {
        output::print_error(&format!("{:#}", e), &format);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_flags() {
        let cli = Cli::try_parse_from(["postboard", "login", "--email", "a@b.c"]).unwrap();
        match cli.command {
            Commands::Login { email, .. } => assert_eq!(email.as_deref(), Some("a@b.c")),
            _ => panic!("expected login"),
        }
        assert_eq!(cli.format, output::OutputFormat::Text);
    }

    #[test]
    fn test_parse_posts_show_with_global_format() {
        let cli = Cli::try_parse_from(["postboard", "posts", "show", "7", "--format", "json"])
            .unwrap();
        assert_eq!(cli.format, output::OutputFormat::Json);
        match cli.command {
            Commands::Posts {
                command: PostCommands::Show { id },
            } => assert_eq!(id, "7"),
            _ => panic!("expected posts show"),
        }
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["postboard"]).is_err());
    }
}
