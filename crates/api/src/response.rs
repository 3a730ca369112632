//! Shared response envelope types for API handlers.
//!
//! Every response wraps its payload under a key named after the resource:
//! `{"shop": {...}}`, `{"shops": [...], "metadata": {...}}`. Use these types
//! instead of ad-hoc `serde_json::json!` to keep the shape consistent.

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use misarfeh_core::filters::Metadata;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// `{ "<key>": T }` response envelope.
#[derive(Debug)]
pub struct Envelope<T> {
    pub key: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(key: &'static str, data: T) -> Self {
        Self { key, data }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.data)?;
        map.end()
    }
}

/// `{ "<key>": [T], "metadata": {...} }` list envelope.
#[derive(Debug)]
pub struct ListEnvelope<T> {
    pub key: &'static str,
    pub items: Vec<T>,
    pub metadata: Metadata,
}

impl<T> ListEnvelope<T> {
    pub fn new(key: &'static str, (items, metadata): (Vec<T>, Metadata)) -> Self {
        Self {
            key,
            items,
            metadata,
        }
    }
}

impl<T: Serialize> Serialize for ListEnvelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.key, &self.items)?;
        map.serialize_entry("metadata", &self.metadata)?;
        map.end()
    }
}

/// `201 Created` with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, envelope: Envelope<T>) -> Response {
    (StatusCode::CREATED, [(LOCATION, location)], Json(envelope)).into_response()
}

/// `{"message": "<resource> successfully deleted"}`.
pub fn deleted(resource: &str) -> Json<Envelope<String>> {
    Json(Envelope::new(
        "message",
        format!("{resource} successfully deleted"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_uses_resource_key() {
        let value = serde_json::to_value(Envelope::new("shop", json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"shop": {"id": 1}}));
    }

    #[test]
    fn list_envelope_carries_metadata() {
        let value = serde_json::to_value(ListEnvelope::new(
            "shops",
            (vec![1, 2], Metadata::calculate(2, 1, 20)),
        ))
        .unwrap();
        assert_eq!(value["shops"], json!([1, 2]));
        assert_eq!(value["metadata"]["total_records"], 2);
        assert_eq!(value["metadata"]["last_page"], 1);
    }

    #[test]
    fn empty_list_has_empty_metadata() {
        let value = serde_json::to_value(ListEnvelope::<i32>::new(
            "comments",
            (vec![], Metadata::default()),
        ))
        .unwrap();
        assert_eq!(value, json!({"comments": [], "metadata": {}}));
    }

    #[test]
    fn deleted_message() {
        let Json(body) = deleted("shop");
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"message": "shop successfully deleted"})
        );
    }
}
