use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vendorank_api::{QueryService, RestApi, ServiceConfig};
use vendorank_core::DatasetLoader;
use vendorank_similarity::{Embedder, HashEmbedder, DEFAULT_HASH_DIM, DEFAULT_THRESHOLD, DEFAULT_TOP_N};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmbedderKind {
    /// sentence-transformers/all-MiniLM-L6-v2 (requires the `fastembed` feature)
    Minilm,
    /// Lexical trigram hashing
    Hash,
}

impl EmbedderKind {
    fn default_for_build() -> Self {
        if cfg!(feature = "fastembed") {
            EmbedderKind::Minilm
        } else {
            EmbedderKind::Hash
        }
    }
}

/// Ranks software vendors by capability similarity and trust signals
#[derive(Parser, Debug)]
#[command(name = "vendorank")]
#[command(about = "Vendor qualification service", long_about = None)]
struct Args {
    /// Path to the vendor table (CSV)
    #[arg(short, long, default_value = "data/G2 software - CRM Category Product Overviews.csv")]
    data_path: PathBuf,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Number of vendors returned per query
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Minimum cosine similarity before the exact-match boost
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Embedding backend
    #[arg(long, value_enum, default_value_t = EmbedderKind::default_for_build())]
    embedder: EmbedderKind,

    /// Dimension of the hash embedder
    #[arg(long, default_value_t = DEFAULT_HASH_DIM)]
    hash_dim: usize,

    /// Cache directory for downloaded model files
    #[arg(long)]
    model_cache: Option<PathBuf>,

    /// Per-request scoring timeout in seconds
    #[arg(long, default_value_t = 30)]
    embed_timeout_secs: u64,

    /// Include internal error messages in 500 responses (development only)
    #[arg(long)]
    expose_errors: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn build_embedder(args: &Args) -> anyhow::Result<Arc<dyn Embedder>> {
    match args.embedder {
        EmbedderKind::Hash => {
            warn!("Using the lexical hash embedder: similarity ignores synonyms and paraphrases");
            Ok(Arc::new(HashEmbedder::new(args.hash_dim)))
        }
        #[cfg(feature = "fastembed")]
        EmbedderKind::Minilm => Ok(Arc::new(vendorank_similarity::SentenceEmbedder::new(
            args.model_cache.clone(),
        )?)),
        #[cfg(not(feature = "fastembed"))]
        EmbedderKind::Minilm => {
            if args.model_cache.is_some() {
                warn!("--model-cache is ignored without the `fastembed` feature");
            }
            anyhow::bail!("the MiniLM embedder needs a build with `--features fastembed`; pass `--embedder hash` otherwise")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting vendorank v{}", env!("CARGO_PKG_VERSION"));
    info!("Vendor table: {:?}", args.data_path);

    let config = ServiceConfig {
        threshold: args.threshold,
        top_n: args.top_n,
        embed_timeout: Duration::from_secs(args.embed_timeout_secs),
        expose_internal_errors: args.expose_errors,
    };
    config.validate()?;
    if config.expose_internal_errors {
        warn!("Internal error details will be sent to callers");
    }

    let catalog = Arc::new(DatasetLoader::load(&args.data_path)?);
    let embedder = build_embedder(&args)?;
    info!("Embedder: {} ({} dimensions)", embedder.model_name(), embedder.dimension());

    let service = Arc::new(QueryService::new(catalog, embedder, config)?);

    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(service, &host, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("vendorank started successfully");
    info!("HTTP API: http://{}:{}/vendor_qualification", args.host, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
