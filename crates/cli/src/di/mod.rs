use pdns_cof_api::AppState;
use pdns_cof_application::ports::KeyValueStore;
use pdns_cof_application::services::{AggregationStore, QueryEngine};
use pdns_cof_application::use_cases::{
    FullQueryUseCase, GetInfoUseCase, IngestObservationUseCase, QueryRecordsUseCase,
};
use pdns_cof_domain::{Config, ExclusionList, Normalizer};
use pdns_cof_infrastructure::registry::load_registry;
use std::sync::Arc;
use tracing::info;

/// Everything the subcommands need, wired once from the configuration.
pub struct Services {
    pub ingest: Arc<IngestObservationUseCase>,
    pub query: Arc<QueryRecordsUseCase>,
    pub full_query: Arc<FullQueryUseCase>,
    pub get_info: Arc<GetInfoUseCase>,
}

impl Services {
    pub fn new(config: &Config, kv: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let registry = Arc::new(load_registry(&config.registry)?);

        let exclusions = ExclusionList::new(config.ingest.exclude_substrings.iter().cloned());
        info!(patterns = exclusions.len(), "Exclusion list ready");
        let normalizer = Arc::new(Normalizer::new(registry.clone(), exclusions));

        let store = Arc::new(
            AggregationStore::new(kv)
                .with_counter_policy(config.ingest.counter_policy)
                .with_histograms(config.ingest.histograms),
        );
        let engine = Arc::new(QueryEngine::with_config(
            store.clone(),
            registry,
            &config.query,
        ));

        Ok(Self {
            ingest: Arc::new(IngestObservationUseCase::new(normalizer, store.clone())),
            query: Arc::new(QueryRecordsUseCase::new(engine.clone())),
            full_query: Arc::new(FullQueryUseCase::new(engine)),
            get_info: Arc::new(GetInfoUseCase::new(store)),
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            query: self.query.clone(),
            full_query: self.full_query.clone(),
            get_info: self.get_info.clone(),
            version: Arc::from(env!("CARGO_PKG_VERSION")),
        }
    }
}
