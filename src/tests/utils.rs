use crate::app::AppState;
use crate::config::Config;
use crate::db::connection::Database;
use crate::domain::listing::{ListingFields, PropertyType, DEFAULT_CITY};
use astra::{Body, Response};
use std::io::Read;
use uuid::Uuid;

fn temp_path(prefix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}", Uuid::new_v4()))
}

/// A fresh database file with the production schema.
pub fn init_test_db() -> Database {
    let path = temp_path("listings_test").with_extension("sqlite");
    Database::open(path.to_string_lossy().into_owned())
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"))
}

/// Full application state over a fresh database and upload dir, agents seeded.
pub fn init_test_state() -> AppState {
    let config = Config {
        database_path: temp_path("app_test")
            .with_extension("sqlite")
            .to_string_lossy()
            .into_owned(),
        upload_dir: temp_path("uploads_test"),
        max_upload_bytes: 1024,
        session_ttl_secs: 3600,
        ..Config::default()
    };
    AppState::init(config).unwrap_or_else(|e| panic!("App initialization failed: {e:#}"))
}

pub fn sample_fields(street: &str, kind: PropertyType, price: u64, rooms: u32) -> ListingFields {
    ListingFields {
        title: format!("{rooms} rooms on {street}"),
        description: "Bright, renovated, close to the park".into(),
        property_type: kind,
        price,
        rooms,
        size_sqm: 90,
        street: street.into(),
        city: DEFAULT_CITY.into(),
        balcony: true,
        air_conditioning: true,
        parking: false,
        elevator: false,
        renovated: true,
        agent_name: "איתמר".into(),
        images: Vec::new(),
        videos: Vec::new(),
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(resp)).unwrap()
}

pub fn json_body(value: &serde_json::Value) -> Body {
    Body::from(value.to_string())
}
