use crate::{api::ApiClient, error::AppResult, models::StoreSettings};

pub async fn get_settings(client: &ApiClient) -> AppResult<StoreSettings> {
    client.get("admin/settings").await
}

pub async fn update_settings(
    client: &ApiClient,
    settings: &StoreSettings,
) -> AppResult<StoreSettings> {
    let updated: StoreSettings = client.put("admin/settings", settings).await?;
    tracing::info!(store = %updated.store_name, "settings updated");
    Ok(updated)
}
