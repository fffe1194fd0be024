use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    api::ApiClient, config::AppConfig, dashboard::DashboardSnapshot, error::AppResult,
    middleware::auth::AdminToken,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub public: ApiClient,
    pub dashboard: watch::Receiver<Arc<DashboardSnapshot>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        dashboard: watch::Receiver<Arc<DashboardSnapshot>>,
    ) -> AppResult<Self> {
        let public = ApiClient::public(&config)?;
        Ok(Self {
            config: Arc::new(config),
            public,
            dashboard,
        })
    }

    /// Client carrying the caller's credentials.
    pub fn admin_client(&self, token: &AdminToken) -> ApiClient {
        self.public.with_token(token.as_str())
    }
}
