// src/api/properties.rs
use astra::Request;
use serde_json::json;

use crate::api::params::{optional, parse_query, read_body, MAX_FORM_BYTES};
use crate::app::AppState;
use crate::db::listings::ListingRepository;
use crate::domain::listing::{ListingFields, ListingFilter, PropertyType};
use crate::errors::ServerError;
use crate::responses::{json_response, message_response, ResultResp};

/// GET /api/properties with optional filters.
pub fn list(req: Request, state: &AppState) -> ResultResp {
    let (parts, _) = req.into_parts();
    let params = parse_query(&parts);

    let filter = ListingFilter {
        property_type: optional::<String>(&params, "property_type")?
            .map(|raw| raw.parse::<PropertyType>())
            .transpose()?,
        min_price: optional(&params, "min_price")?,
        max_price: optional(&params, "max_price")?,
        rooms: optional(&params, "rooms")?,
        street: optional(&params, "street")?,
    };

    let listings = ListingRepository::new(&state.db).list(&filter)?;
    json_response(200, &listings)
}

/// GET /api/properties/sale and /api/properties/rent
pub fn list_kind(state: &AppState, kind: PropertyType) -> ResultResp {
    let listings = ListingRepository::new(&state.db).list(&ListingFilter::of_type(kind))?;
    json_response(200, &listings)
}

pub fn get(state: &AppState, id: &str) -> ResultResp {
    let listing = ListingRepository::new(&state.db).get(id)?;
    json_response(200, &listing)
}

pub fn create(req: Request, state: &AppState) -> ResultResp {
    let fields = read_fields(req)?;
    let id = ListingRepository::new(&state.db).create(fields)?;

    json_response(
        201,
        &json!({ "id": id, "message": "Property created successfully" }),
    )
}

pub fn update(req: Request, state: &AppState, id: &str) -> ResultResp {
    let fields = read_fields(req)?;
    ListingRepository::new(&state.db).update(id, fields)?;
    message_response(200, "Property updated successfully")
}

pub fn delete(state: &AppState, id: &str) -> ResultResp {
    ListingRepository::new(&state.db).delete(id)?;
    message_response(200, "Property deleted successfully")
}

fn read_fields(req: Request) -> Result<ListingFields, ServerError> {
    let body = read_body(req.into_body(), MAX_FORM_BYTES)?;
    ListingFields::from_json(&body)
}
