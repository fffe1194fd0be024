//! Backend response unwrapping.
//!
//! The store backend answers in several shapes depending on the endpoint:
//! `{success, data, message}`, a doubly nested `{data: {data: ...}}`,
//! `{data: [...], pagination: {...}}`, a collection under a named key such as
//! `{products: [...]}`, or the raw payload itself. Everything is funnelled
//! through here so the rest of the crate only ever sees the payload.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

const ENVELOPE_KEYS: [&str; 10] = [
    "success",
    "data",
    "message",
    "pagination",
    "meta",
    "status",
    "total",
    "page",
    "limit",
    "totalPages",
];

const COLLECTION_KEYS: [&str; 6] = [
    "products",
    "orders",
    "categories",
    "brands",
    "items",
    "data",
];

/// A list payload together with whatever paging information came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
}

impl<T> Paged<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationInfo {
    page: Option<u64>,
    #[serde(alias = "perPage", alias = "per_page")]
    limit: Option<u64>,
    #[serde(alias = "totalItems", alias = "count")]
    total: Option<u64>,
    #[serde(alias = "pages", alias = "total_pages")]
    total_pages: Option<u64>,
}

pub fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    let payload = extract_payload(value)?;
    Ok(serde_json::from_value(payload)?)
}

pub fn unwrap_list<T: DeserializeOwned>(value: Value) -> AppResult<Vec<T>> {
    Ok(unwrap_paged(value)?.items)
}

pub fn unwrap_paged<T: DeserializeOwned>(value: Value) -> AppResult<Paged<T>> {
    let mut pagination = PaginationInfo::default();
    let mut current = value;

    let items = loop {
        match current {
            Value::Array(items) => break items,
            Value::Null => break Vec::new(),
            Value::Object(mut map) => {
                ensure_success(&map)?;
                merge_pagination(&mut pagination, &map);
                match take_collection(&mut map) {
                    Some(next) => current = next,
                    None => {
                        return Err(AppError::Upstream {
                            status: 200,
                            message: "expected a list payload".into(),
                        });
                    }
                }
            }
            _ => {
                return Err(AppError::Upstream {
                    status: 200,
                    message: "expected a list payload".into(),
                });
            }
        }
    };

    let items = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()?;

    Ok(Paged {
        items,
        page: pagination.page,
        limit: pagination.limit,
        total: pagination.total,
        total_pages: pagination.total_pages,
    })
}

fn extract_payload(value: Value) -> AppResult<Value> {
    let mut current = value;
    loop {
        match current {
            Value::Object(mut map) => {
                ensure_success(&map)?;
                if !is_envelope(&map) {
                    return Ok(Value::Object(map));
                }
                current = map.remove("data").unwrap_or(Value::Null);
            }
            other => return Ok(other),
        }
    }
}

fn ensure_success(map: &Map<String, Value>) -> AppResult<()> {
    if matches!(map.get("success"), Some(Value::Bool(false))) {
        let message = map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("request was not successful")
            .to_string();
        return Err(AppError::Upstream {
            status: 200,
            message,
        });
    }
    Ok(())
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("data") && map.keys().all(|key| ENVELOPE_KEYS.contains(&key.as_str()))
}

fn take_collection(map: &mut Map<String, Value>) -> Option<Value> {
    COLLECTION_KEYS.iter().find_map(|key| map.remove(*key))
}

fn merge_pagination(into: &mut PaginationInfo, map: &Map<String, Value>) {
    let source = map
        .get("pagination")
        .or_else(|| map.get("meta"))
        .cloned()
        .unwrap_or_else(|| Value::Object(map.clone()));
    if let Ok(info) = serde_json::from_value::<PaginationInfo>(source) {
        into.page = into.page.or(info.page);
        into.limit = into.limit.or(info.limit);
        into.total = into.total.or(info.total);
        into.total_pages = into.total_pages.or(info.total_pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        name: String,
    }

    #[test]
    fn unwraps_success_envelope() {
        let value = json!({ "success": true, "data": { "name": "a" } });
        let thing: Thing = unwrap_envelope(value).unwrap();
        assert_eq!(thing.name, "a");
    }

    #[test]
    fn unwraps_doubly_nested_data() {
        let value = json!({ "data": { "data": { "name": "b" }, "message": "ok" } });
        let thing: Thing = unwrap_envelope(value).unwrap();
        assert_eq!(thing.name, "b");
    }

    #[test]
    fn raw_object_passes_through() {
        let thing: Thing = unwrap_envelope(json!({ "name": "c" })).unwrap();
        assert_eq!(thing.name, "c");
    }

    #[test]
    fn unsuccessful_envelope_is_an_error() {
        let err = unwrap_envelope::<Thing>(json!({ "success": false, "message": "nope" }))
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { ref message, .. } if message == "nope"));
    }

    #[test]
    fn list_under_named_key_with_pagination() {
        let value = json!({
            "success": true,
            "data": {
                "products": [{ "name": "x" }, { "name": "y" }],
                "pagination": { "page": 2, "limit": 2, "total": 6, "totalPages": 3 }
            }
        });
        let paged: Paged<Thing> = unwrap_paged(value).unwrap();
        assert_eq!(paged.items.len(), 2);
        assert_eq!(paged.page, Some(2));
        assert_eq!(paged.total, Some(6));
        assert_eq!(paged.total_pages, Some(3));
    }

    #[test]
    fn raw_array_is_a_list() {
        let items: Vec<Thing> = unwrap_list(json!([{ "name": "z" }])).unwrap();
        assert_eq!(items, vec![Thing { name: "z".into() }]);
    }

    #[test]
    fn object_without_collection_is_rejected() {
        assert!(unwrap_list::<Thing>(json!({ "name": "solo" })).is_err());
    }
}
