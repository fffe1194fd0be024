//! Dashboard snapshot and the background poller that keeps it fresh.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    api::ApiClient,
    error::AppResult,
    models::{DashboardStats, Order, SalesPoint, TopProduct},
    routes::params::AnalyticsPeriod,
    services::{analytics_service, order_service},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const RECENT_ORDERS: u64 = 5;
const TOP_PRODUCTS: u64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
    pub top_products: Vec<TopProduct>,
    pub sales: Vec<SalesPoint>,
    /// Names of the reads that failed and were replaced by defaults.
    pub degraded: Vec<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

async fn or_default<T, F>(name: &'static str, read: F, degraded: &Mutex<Vec<String>>) -> T
where
    T: Default,
    F: Future<Output = AppResult<T>>,
{
    match read.await {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                read = name,
                transient = err.is_transient(),
                error = %err,
                "dashboard read failed, using default"
            );
            degraded
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(name.to_string());
            T::default()
        }
    }
}

/// Issues every dashboard read at once. A failing read is replaced by its
/// default and never holds up the others.
pub async fn fetch_snapshot(client: &ApiClient) -> DashboardSnapshot {
    let degraded = Mutex::new(Vec::new());

    let (stats, recent_orders, top_products, sales) = tokio::join!(
        or_default("stats", analytics_service::dashboard(client), &degraded),
        or_default(
            "recent_orders",
            order_service::recent_orders(client, RECENT_ORDERS),
            &degraded
        ),
        or_default(
            "top_products",
            analytics_service::top_products(client, TOP_PRODUCTS),
            &degraded
        ),
        or_default(
            "sales",
            analytics_service::sales(client, AnalyticsPeriod::Month),
            &degraded
        ),
    );

    let mut degraded = degraded
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    degraded.sort();

    DashboardSnapshot {
        stats,
        recent_orders,
        top_products,
        sales,
        degraded,
        fetched_at: Some(Utc::now()),
    }
}

/// Fixed-interval refresh of the dashboard, scoped to a cancellation token.
pub struct DashboardPoller {
    rx: watch::Receiver<Arc<DashboardSnapshot>>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl DashboardPoller {
    /// Fetches immediately, then every `interval` until `token` is cancelled.
    pub fn spawn(client: ApiClient, interval: Duration, token: CancellationToken) -> Self {
        let (tx, rx) = watch::channel(Arc::new(DashboardSnapshot::default()));
        let shutdown = token.clone();

        let handle = tokio::spawn(async move {
            tracing::info!(
                interval_secs = interval.as_secs(),
                backend = client.base_url(),
                authenticated = client.is_authenticated(),
                "dashboard poller started"
            );
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let snapshot = tokio::select! {
                    _ = shutdown.cancelled() => break,
                    snapshot = fetch_snapshot(&client) => snapshot,
                };
                tracing::debug!(degraded = snapshot.degraded.len(), "dashboard refreshed");
                if tx.send(Arc::new(snapshot)).is_err() {
                    break;
                }
            }
            tracing::info!("dashboard poller stopped");
        });

        Self { rx, token, handle }
    }

    pub fn latest(&self) -> Arc<DashboardSnapshot> {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.rx.clone()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels the poller and waits for the task to finish. An in-flight
    /// refresh is dropped rather than published.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(err) = self.handle.await {
            tracing::error!(error = %err, "dashboard poller task failed");
        }
    }
}
