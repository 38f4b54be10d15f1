//! Shopstand application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis
//! 3. Build router with API routes + static page serving
//! 4. Apply session gate + security headers middleware
//! 5. Start Axum server
//!
//! Also supports a `hash-password` subcommand for generating the
//! `ADMIN_PASSWORD_HASH` value.

use shopstand::{
    auth::middleware::{session_gate, AppState},
    auth::verify::hash_password,
    config::Config,
    middleware::security_headers,
    routes,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

fn print_hash_password_usage() {
    eprintln!("Usage: shopstand hash-password <password>");
    eprintln!();
    eprintln!("Generate an argon2 hash for ADMIN_PASSWORD_HASH.");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  shopstand hash-password mysecretpassword");
    eprintln!();
    eprintln!("Then set in .env:");
    eprintln!("  ADMIN_EMAIL=admin@site.com");
    eprintln!("  ADMIN_PASSWORD_HASH=<output>");
}

#[tokio::main]
async fn main() {
    // Check for hash-password subcommand
    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "hash-password" {
        if args.len() != 3 {
            print_hash_password_usage();
            std::process::exit(1);
        }

        match hash_password(&args[2]) {
            Ok(hash) => {
                println!("{}", hash);
            }
            Err(e) => {
                eprintln!("Error hashing password: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting shopstand on {}", config.bind_addr);

    // Connect to Redis
    let redis_client = redis::Client::open(config.redis_url.as_str()).expect("Invalid Redis URL");

    // Verify Redis connection
    let _con = redis_client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Connected to Redis");

    // Build shared state
    let state = AppState {
        redis: redis_client,
        config: Arc::new(config.clone()),
    };

    // Build router:
    // - API routes (with state)
    // - Static page serving (fallback)
    // - Session gate ahead of everything, including the static fallback
    // - Security headers middleware
    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    // CorsLayer::new() with no allowed origins rejects all CORS preflight requests.
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .merge(routes::page_router())
        .fallback_service(ServeDir::new("static"))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_gate,
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start server
    axum::serve(listener, app).await.expect("Server error");
}
