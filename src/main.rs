use brand_canon::config::{load_config, AppConfig, SourceConfig};
use brand_canon::input::{load_connections, load_products};
use brand_canon::storage::{ResultSink, SqliteSink};
use brand_canon::utils::RecordKey;
use brand_canon::{assign_brands, build_graph, BrandCatalog, BrandMatcher, BrandRelationshipMap};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".into());
    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // Without a graph nothing can be matched, so input errors end the session.
    let connections = match load_connections(&config.connections_path) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load brand connections: {}", e);
            return;
        }
    };
    let graph = match build_graph(&connections) {
        Ok(g) => Arc::new(g),
        Err(e) => {
            error!("Failed to build brand graph: {}", e);
            return;
        }
    };
    info!("Loaded {} brands from {} connections", graph.len(), connections.len());

    let matcher = match BrandMatcher::new(&config.matching) {
        Ok(m) => m,
        Err(e) => {
            error!("Invalid matching configuration: {}", e);
            return;
        }
    };
    let catalog = match BrandCatalog::new(matcher, &graph) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to compile brand patterns: {}", e);
            return;
        }
    };

    let sink = match SqliteSink::new(&config.database_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    // Sources share the read-only graph and catalog and are processed concurrently
    let tasks: Vec<_> = config
        .sources
        .iter()
        .map(|source| process_source(source, graph.clone(), catalog.clone(), sink.clone()))
        .collect();
    join_all(tasks).await;

    info!("Brand assignment finished.");
}

/// Loads one source's products, assigns brands and writes the results.
async fn process_source(
    source_cfg: &SourceConfig,
    graph: Arc<BrandRelationshipMap>,
    catalog: Arc<BrandCatalog>,
    sink: Arc<Mutex<SqliteSink>>,
) {
    let label = format!("{}/{}", source_cfg.source, source_cfg.country);
    info!("Processing source: {}", label);

    let mut products = match load_products(&source_cfg.items_path) {
        Ok(p) => p,
        Err(e) => {
            warn!("Failed to load products for {}: {}", label, e);
            return;
        }
    };

    match sink
        .lock()
        .await
        .mapped_source_ids(&source_cfg.source, &source_cfg.country)
    {
        Ok(mapped) => {
            for product in products.iter_mut() {
                if mapped.contains(&product.source_id) {
                    product.already_mapped = true;
                }
            }
        }
        Err(e) => warn!("Mapped lookup failed for {}: {:?}", label, e),
    }

    let assignment = match tokio::task::spawn_blocking(move || {
        assign_brands(&products, &catalog, &graph)
    })
    .await
    {
        Ok(a) => a,
        Err(e) => {
            error!("Assignment task for {} failed: {}", label, e);
            return;
        }
    };

    let mut saved = 0;
    {
        let sink = sink.lock().await;
        for assigned in &assignment.results {
            let key = RecordKey::new(&source_cfg.source, &source_cfg.country, &assigned.source_id);
            match sink.save_result(&key, &assigned.result) {
                Ok(()) => saved += 1,
                Err(e) => warn!("DB save error for {}: {:?}", key.key(), e),
            }
        }
    }

    info!(
        "Finished {}: processed = {}, skipped = {}, matched = {}, unmatched = {}, invalid = {}, saved = {}",
        label,
        assignment.processed,
        assignment.skipped,
        assignment.matched,
        assignment.unmatched,
        assignment.errors.len(),
        saved
    );
}
