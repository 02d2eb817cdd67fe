use anyhow::{Context, Result};
use clap::Parser;
use pubmed_proxy::{ClientConfig, PubMedClient, server};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "pubmed-proxy",
    about = "HTTP proxy for PubMed search, summaries and abstracts",
    version
)]
struct Args {
    /// Address to bind
    #[arg(long, env = "PUBMED_PROXY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PUBMED_PROXY_PORT", default_value_t = 8000)]
    port: u16,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Contact email sent with every NCBI request
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pubmed-proxy")]
    tool: String,

    /// Override the E-utilities base URL
    #[arg(long, env = "NCBI_BASE_URL")]
    base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "PUBMED_PROXY_TIMEOUT_SECS", default_value_t = 20)]
    timeout: u64,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .with_tool(&self.tool)
            .with_timeout_seconds(self.timeout);

        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(email) = &self.email {
            config = config.with_email(email);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }

        config
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = args.client_config();
    if config.email.is_none() {
        warn!("NCBI_EMAIL is not set; NCBI asks tools to identify a contact address");
    }
    info!(
        base_url = config.effective_base_url(),
        tool = config.effective_tool(),
        has_api_key = config.api_key.is_some(),
        "Starting PubMed proxy"
    );

    let client = PubMedClient::with_config(config).context("failed to build HTTP client")?;

    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;

    server::serve(listener, client, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}
