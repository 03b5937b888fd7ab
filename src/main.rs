use campus_qa::Result;
use campus_qa::commands::{
    ask_question, build_knowledge_base, serve_http, show_config, show_status,
};
use campus_qa::engine::DEFAULT_TOP_K;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "campus-qa")]
#[command(about = "Retrieval-augmented question answering for campus information")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration
    Config {
        /// Write the config file with defaults if it does not exist
        #[arg(long)]
        init: bool,
    },
    /// Seed topic records and build the knowledge base
    Build,
    /// Ask a single question from the command line
    Ask {
        /// The question to answer
        question: String,
        /// Number of nearest chunks to retrieve
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Show connectivity and knowledge-base status
    Status,
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { init } => {
            show_config(init)?;
        }
        Commands::Build => {
            build_knowledge_base().await?;
        }
        Commands::Ask { question, top_k } => {
            ask_question(&question, top_k).await?;
        }
        Commands::Status => {
            show_status().await?;
        }
        Commands::Serve { port } => {
            serve_http(port).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["campus-qa", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Status);
        }
    }

    #[test]
    fn ask_command_with_question() {
        let cli = Cli::try_parse_from(["campus-qa", "ask", "What are the hostel fees?"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Ask { question, top_k } = parsed.command {
                assert_eq!(question, "What are the hostel fees?");
                assert_eq!(top_k, DEFAULT_TOP_K);
            }
        }
    }

    #[test]
    fn ask_command_with_top_k() {
        let cli = Cli::try_parse_from(["campus-qa", "ask", "fees?", "--top-k", "3"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Ask { top_k, .. } = parsed.command {
                assert_eq!(top_k, 3);
            }
        }
    }

    #[test]
    fn serve_command_with_port() {
        let cli = Cli::try_parse_from(["campus-qa", "serve", "--port", "9000"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Serve { port } = parsed.command {
                assert_eq!(port, 9000);
            }
        }
    }

    #[test]
    fn config_init_flag() {
        let cli = Cli::try_parse_from(["campus-qa", "config", "--init"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { init } = parsed.command {
                assert!(init);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["campus-qa", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["campus-qa", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
