use crate::{
    api::ApiClient,
    error::AppResult,
    models::{CustomerAnalytics, DashboardStats, SalesPoint, TopProduct},
    normalize::{RawCustomerAnalytics, RawDashboardStats, RawSalesPoint, RawTopProduct},
    routes::params::AnalyticsPeriod,
};

pub async fn dashboard(client: &ApiClient) -> AppResult<DashboardStats> {
    let raw: RawDashboardStats = client.get("analytics/dashboard").await?;
    Ok(raw.into())
}

pub async fn sales(client: &ApiClient, period: AnalyticsPeriod) -> AppResult<Vec<SalesPoint>> {
    let raw: Vec<RawSalesPoint> = client
        .get_paged("analytics/sales", &[("period", period)])
        .await?
        .items;
    Ok(raw.into_iter().map(SalesPoint::from).collect())
}

pub async fn top_products(client: &ApiClient, limit: u64) -> AppResult<Vec<TopProduct>> {
    let raw: Vec<RawTopProduct> = client
        .get_paged("analytics/products", &[("limit", limit)])
        .await?
        .items;
    let mut products: Vec<TopProduct> = raw.into_iter().map(TopProduct::from).collect();
    products.sort_by(|a, b| b.sold.cmp(&a.sold));
    products.truncate(limit as usize);
    Ok(products)
}

pub async fn customers(client: &ApiClient) -> AppResult<CustomerAnalytics> {
    let raw: RawCustomerAnalytics = client.get("analytics/customers").await?;
    Ok(raw.into())
}

pub async fn revenue(client: &ApiClient, period: AnalyticsPeriod) -> AppResult<Vec<SalesPoint>> {
    let raw: Vec<RawSalesPoint> = client
        .get_paged("analytics/revenue", &[("period", period)])
        .await?
        .items;
    Ok(raw.into_iter().map(SalesPoint::from).collect())
}
