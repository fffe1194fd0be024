use crate::{
    api::ApiClient,
    error::AppResult,
    models::Category,
    normalize::RawCategory,
};

pub async fn list_categories(client: &ApiClient) -> AppResult<Vec<Category>> {
    let raw: Vec<RawCategory> = client.get_list("categories").await?;
    Ok(raw.into_iter().map(Category::from).collect())
}

/// Nested categories; roots first, children inline.
pub async fn category_tree(client: &ApiClient) -> AppResult<Vec<Category>> {
    let raw: Vec<RawCategory> = client.get_list("categories/tree").await?;
    Ok(raw.into_iter().map(Category::from).collect())
}

pub async fn get_category(client: &ApiClient, id: &str) -> AppResult<Category> {
    let raw: RawCategory = client.get(&format!("categories/{id}")).await?;
    Ok(raw.into())
}
