use std::sync::Arc;
use text_enrichment_worker::{
    api::{build_router, AppState},
    config::Config,
    enrichment::EventEnrichmentService,
    generator::TestDataGenerator,
    messaging::{EnrichmentWorker, MessageConsumer, MessageProducer, NatsConsumer, NatsProducer},
    nlp::{NlpBackend, TextEnrichmentEngine},
    processing::EnrichmentProcessor,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "text_enrichment_worker=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!(
        "Starting text enrichment worker v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Build the enrichment pipeline. No statistical models are wired in
    // yet, so both sub-engines run their rule-based fallbacks.
    let backend = NlpBackend::default();
    let engine = Arc::new(TextEnrichmentEngine::new(&backend));
    let service = Arc::new(EventEnrichmentService::new(engine.clone()));
    let processor = Arc::new(EnrichmentProcessor::new(service));
    tracing::info!(models = engine.models_used(), "enrichment pipeline ready");

    // Connect messaging when enabled; startup survives a missing broker
    // so the HTTP surface stays usable for debugging.
    let mut producer: Option<Arc<dyn MessageProducer>> = None;
    let mut consumer: Option<Arc<dyn MessageConsumer>> = None;
    if config.messaging.enabled {
        match NatsProducer::new(&config.messaging.nats).await {
            Ok(p) => producer = Some(Arc::new(p)),
            Err(e) => tracing::warn!("NATS producer unavailable: {}", e),
        }
        match NatsConsumer::new(&config.messaging.nats).await {
            Ok(c) => consumer = Some(Arc::new(c)),
            Err(e) => tracing::warn!("NATS consumer unavailable: {}", e),
        }
    } else {
        tracing::info!("Messaging disabled in configuration");
    }

    // Spawn the worker loop when both ends of the pipe exist
    let worker_handle = match (producer.clone(), consumer.clone()) {
        (Some(producer), Some(consumer)) => {
            let worker = EnrichmentWorker::new(
                processor.clone(),
                producer,
                consumer,
                config.messaging.clone(),
            );
            tracing::info!(
                input = %config.messaging.input_subject,
                output_prefix = %config.messaging.output_prefix,
                "worker loop starting"
            );
            Some(tokio::spawn(async move {
                if let Err(e) = worker.run().await {
                    tracing::error!("Worker loop failed: {}", e);
                }
            }))
        }
        _ => {
            if config.messaging.enabled {
                tracing::warn!("Messaging unavailable, running HTTP-only");
            }
            None
        }
    };

    // Application state for the HTTP API
    let mut app_state = AppState::new(processor, engine);
    if let Some(producer) = producer {
        let generator = Arc::new(TestDataGenerator::new(
            producer,
            config.messaging.input_subject.clone(),
        ));
        app_state = app_state.with_generator(generator, config.generator.clone());
    }

    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Enrichment: http://{}/v1/enrich", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = async {
            match worker_handle {
                Some(handle) => {
                    let _ = handle.await;
                }
                None => futures::future::pending().await,
            }
        } => {
            tracing::warn!("Worker loop stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
