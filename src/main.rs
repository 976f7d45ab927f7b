use anyhow::Result;
use clap::{Parser, Subcommand};
use maverick::api::ChatRequest;
use maverick::client::ChatClient;
use maverick::config::Config;
use maverick::gateway;
use maverick::session::BrandContext;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// `Maverick` — marketing content assistant with a chat gateway.
#[derive(Parser, Debug)]
#[command(name = "maverick")]
#[command(version = "0.1.0")]
#[command(about = "Marketing content assistant with a chat gateway.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the chat gateway server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (default: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
    },

    /// Send one message to a running gateway and print the reply
    Chat {
        message: String,

        /// Gateway base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Session id to continue (reuses its stored brand context)
        #[arg(long)]
        session: Option<String>,

        /// Brand name for the brand context
        #[arg(long)]
        brand_name: Option<String>,

        /// Brand voice (e.g. "playful", "formal")
        #[arg(long)]
        brand_voice: Option<String>,

        /// Target audience description
        #[arg(long)]
        audience: Option<String>,

        /// Industry the brand operates in
        #[arg(long)]
        industry: Option<String>,
    },

    /// Probe a running gateway's health endpoint
    Health {
        /// Gateway base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let mut config = Config::load_or_init()?;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            gateway::run_gateway(config).await
        }
        Commands::Chat {
            message,
            url,
            session,
            brand_name,
            brand_voice,
            audience,
            industry,
        } => {
            let brand_context = BrandContext {
                brand_name,
                brand_voice,
                target_audience: audience,
                industry,
            };
            let request = ChatRequest {
                message,
                history: None,
                brand_context: (!brand_context.is_empty()).then_some(brand_context),
                session_id: session,
            };

            let client = ChatClient::new(url);
            match client.send_message(&request).await {
                Ok(envelope) => {
                    if let Some(response) = envelope.response {
                        println!("{response}");
                    }
                    if let Some(session_id) = envelope.session_id {
                        println!("\n(session: {session_id})");
                    }
                    Ok(())
                }
                Err(error) => {
                    eprintln!("{error}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Health { url } => {
            let client = ChatClient::new(url);
            if client.health_check().await {
                println!("ok");
                Ok(())
            } else {
                eprintln!("gateway is unreachable or unhealthy");
                std::process::exit(1);
            }
        }
    }
}
