//! Trek server binary — wires settings, tools, agents, and the HTTP
//! boundary together.
//!
//! The agent registry ships empty by default: decision backends are
//! external collaborators that embedders register before serving. Pass
//! `--demo` to register a scripted specialist lineup (planner, hotels,
//! sightseeing) for exercising the API end to end without a reasoning
//! backend.

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trek_agents::{AgentDescriptor, AgentRegistry, ScriptedAgent, ScriptedStep};
use trek_runtime::{Orchestrator, RuntimeConfig, SessionManager};
use trek_server::{AppState, build_router};
use trek_settings::TrekSettings;
use trek_tools::travel::{BookingConfig, register_travel_tools};
use trek_tools::{ToolInvoker, ToolRegistry, providers::ReqwestHttpClient};

/// Trek orchestrator server.
#[derive(Parser, Debug)]
#[command(name = "trek", about = "Trek multi-agent travel orchestrator")]
struct Cli {
    /// Host to bind (overrides settings if specified).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings if specified).
    #[arg(long)]
    port: Option<u16>,

    /// Register the scripted demo agent lineup.
    #[arg(long)]
    demo: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trek=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_tools(settings: &TrekSettings) -> Arc<ToolInvoker> {
    let mut registry = ToolRegistry::new();
    let http: Arc<dyn trek_tools::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let config = BookingConfig::new(settings.booking.rapidapi_key.clone())
        .with_base_url(settings.booking.base_url.clone());
    register_travel_tools(&mut registry, http, &config);
    Arc::new(ToolInvoker::with_timeout(
        Arc::new(registry),
        settings.runtime.tool_timeout_ms,
    ))
}

/// Scripted stand-ins for the specialist lineup, for exercising the API
/// without a reasoning backend.
fn demo_registry() -> Result<AgentRegistry> {
    let mut registry = AgentRegistry::new();
    registry
        .register(AgentDescriptor::always(
            "planner",
            "Overall trip planning and coordination",
            Arc::new(ScriptedAgent::new([
                ScriptedStep::reply("Where would you like to go, and on which dates?"),
                ScriptedStep::finish(
                    "Great — I've noted the basics. One of our specialists takes it from here.",
                ),
            ])),
        ))
        .context("registering planner")?;
    registry
        .register(AgentDescriptor::new(
            "hotels",
            "Hotel search around a known destination",
            |snap| snap.contains("trip.destination"),
            Arc::new(ScriptedAgent::new([ScriptedStep::finish(
                "Here are some stays to consider once you confirm your dates.",
            )
            .with_tool_call(
                "search_hotels",
                serde_json::json!({"location": "Singapore"}),
            )])),
        ))
        .context("registering hotels")?;
    registry
        .register(AgentDescriptor::always(
            "sightseeing",
            "Attractions and local tips",
            Arc::new(ScriptedAgent::new([ScriptedStep::finish(
                "Top sights noted — ask me again any time.",
            )
            .with_tool_call(
                "search_attractions",
                serde_json::json!({"location": "Singapore"}),
            )])),
        ))
        .context("registering sightseeing")?;
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = trek_settings::load_settings().unwrap_or_default();
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    // The effective (CLI-overridden) settings become the global view.
    let _ = trek_settings::init_settings(settings.clone());

    let invoker = build_tools(&settings);

    let registry = if cli.demo {
        info!("registering demo agent lineup");
        demo_registry()?
    } else {
        AgentRegistry::new()
    };

    let orchestrator = Arc::new(Orchestrator::new(Arc::new(registry)));
    let manager = Arc::new(SessionManager::new(
        orchestrator,
        invoker,
        RuntimeConfig {
            decision_timeout_ms: settings.runtime.decision_timeout_ms,
        },
    ));

    let router = build_router(AppState::new(manager)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "trek server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server error")?;

    Ok(())
}
