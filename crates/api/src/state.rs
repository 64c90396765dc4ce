use pdns_cof_application::use_cases::{FullQueryUseCase, GetInfoUseCase, QueryRecordsUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryRecordsUseCase>,
    pub full_query: Arc<FullQueryUseCase>,
    pub get_info: Arc<GetInfoUseCase>,
    pub version: Arc<str>,
}
