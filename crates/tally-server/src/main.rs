//! Static file server for the Tally counter demo.
//!
//! Serves the SPA shell with history-API fallback routing and the
//! cross-origin isolation headers the WASM module needs. All routing
//! rules live in [`resolve`]; this binary is just the axum shell.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod resolve;

use resolve::{Resolution, SiteLayout};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tally demo static server")]
struct Args {
    /// TCP listener for browser clients (e.g. 0.0.0.0:8000)
    #[arg(long, default_value = "0.0.0.0:8000")]
    listen: SocketAddr,
    /// Directory holding index.html and the script files
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,
    /// Compiled WASM module served for every .wasm request
    #[arg(long, default_value = "build/tally_web_bg.wasm")]
    wasm_artifact: PathBuf,
    /// Entry document served for SPA routes
    #[arg(long, default_value = "index.html")]
    index: String,
}

struct AppState {
    layout: SiteLayout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let state = Arc::new(AppState {
        layout: SiteLayout {
            public_dir: args.public_dir,
            wasm_artifact: args.wasm_artifact,
            index_document: args.index,
        },
    });

    let app = Router::new()
        .route("/", get(serve_path))
        .fallback(get(serve_path))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("bind {}", args.listen))?;
    info!("tally server listening on {}", args.listen);
    info!("routes: / and /counter (counter widget), /test (test route), *.wasm (compiled module)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install ctrl-c handler");
        })
        .await?;

    Ok(())
}

async fn serve_path(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let pathname = uri.path();
    info!(%pathname, "request");

    match state.layout.resolve(pathname) {
        Resolution::File { path, mime } => match tokio::fs::read(&path).await {
            Ok(bytes) => isolated_response(mime, bytes),
            Err(err) => {
                warn!(%err, path = %path.display(), "file read failed");
                (StatusCode::NOT_FOUND, "File not found").into_response()
            }
        },
        Resolution::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// 200 response carrying the COOP/COEP pair that keeps the document
/// cross-origin isolated (required for the WASM module's features).
fn isolated_response(mime: &'static str, bytes: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    headers.insert(
        "cross-origin-embedder-policy",
        HeaderValue::from_static("require-corp"),
    );
    headers.insert(
        "cross-origin-opener-policy",
        HeaderValue::from_static("same-origin"),
    );
    response
}
