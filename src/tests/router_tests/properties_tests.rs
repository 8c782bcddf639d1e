use super::{get, send};
use crate::errors::ServerError;
use crate::tests::utils::{body_json, body_string, init_test_state, json_body};
use astra::Body;
use http::{Method, Request};
use serde_json::{json, Value};

fn listing(street: &str, kind: &str, price: u64, rooms: u32) -> Value {
    json!({
        "title": format!("{rooms} rooms on {street}"),
        "description": "Sunny and quiet",
        "property_type": kind,
        "price": price,
        "rooms": rooms,
        "size_sqm": 100,
        "street": street,
        "balcony": true,
        "agent_name": "מתן",
        "images": ["/uploads/a.jpg", "/uploads/b.jpg"],
        "videos": []
    })
}

fn create(state: &crate::app::AppState, body: &Value) -> String {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/properties")
        .header("Content-Type", "application/json")
        .body(json_body(body))
        .unwrap();

    let resp = send(state, req);
    assert_eq!(resp.status(), 201);

    let payload = body_json(resp);
    assert_eq!(payload["message"], "Property created successfully");
    payload["id"].as_str().unwrap().to_string()
}

fn ids(resp: astra::Response) -> Vec<String> {
    body_json(resp)
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn create_then_get_returns_the_listing() {
    let state = init_test_state();
    let body = listing("Ben Zvi 24", "sale", 1_500_000, 3);
    let id = create(&state, &body);

    let resp = get(&state, &format!("/api/properties/{id}"));
    assert_eq!(resp.status(), 200);

    let stored = body_json(resp);
    assert_eq!(stored["id"], id.as_str());
    assert_eq!(stored["title"], body["title"]);
    assert_eq!(stored["price"], 1_500_000);
    assert_eq!(stored["images"], body["images"]);
    assert_eq!(stored["city"], "בית שמש");
    assert_eq!(stored["created_at"], stored["updated_at"]);
    assert!(stored.get("_id").is_none());
}

#[test]
fn create_ignores_client_id_and_timestamps() {
    let state = init_test_state();
    let mut body = listing("Ben Zvi 24", "sale", 1, 1);
    body["id"] = json!("client-chosen");
    body["created_at"] = json!("2000-01-01T00:00:00.000000Z");

    let id = create(&state, &body);
    assert_ne!(id, "client-chosen");

    let stored = body_json(get(&state, &format!("/api/properties/{id}")));
    assert_ne!(stored["created_at"], "2000-01-01T00:00:00.000000Z");
}

#[test]
fn create_with_missing_fields_is_422() {
    let state = init_test_state();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/properties")
        .header("Content-Type", "application/json")
        .body(json_body(&json!({ "title": "only a title" })))
        .unwrap();

    let resp = send(&state, req);
    assert_eq!(resp.status(), 422);
    assert!(body_json(resp)["detail"].as_str().unwrap().contains("invalid listing body"));
}

#[test]
fn create_with_unknown_kind_is_422() {
    let state = init_test_state();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/properties")
        .body(json_body(&listing("Herzl 1", "auction", 1, 1)))
        .unwrap();

    assert_eq!(send(&state, req).status(), 422);
}

#[test]
fn unknown_id_is_404() {
    let state = init_test_state();
    let resp = get(&state, "/api/properties/invalid-id");
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["detail"], "Property not found");
}

#[test]
fn price_filters_are_inclusive_bounds() {
    let state = init_test_state();
    let id = create(&state, &listing("Ben Zvi 24", "sale", 1_500_000, 3));

    let hits = ids(get(&state, "/api/properties?max_price=2000000"));
    assert!(hits.contains(&id));

    let hits = ids(get(&state, "/api/properties?min_price=2000000"));
    assert!(hits.is_empty());
}

#[test]
fn filters_combine_and_street_is_case_insensitive() {
    let state = init_test_state();
    let sale = create(&state, &listing("Nahal Sorek 4", "sale", 2_100_000, 5));
    let rent = create(&state, &listing("nahal dolev 9", "rent", 6_000, 3));
    create(&state, &listing("Herzl 1", "sale", 900_000, 3));

    assert_eq!(
        ids(get(&state, "/api/properties?property_type=sale&min_price=1000000")),
        [sale.clone()]
    );
    assert_eq!(
        ids(get(&state, "/api/properties?street=NAHAL&rooms=3")),
        [rent.clone()]
    );

    // Newest first.
    assert_eq!(ids(get(&state, "/api/properties?street=nahal")), [rent, sale]);
}

#[test]
fn hebrew_street_filter_is_url_decoded() {
    let state = init_test_state();
    let id = create(&state, &listing("בן צבי 24", "sale", 1, 1));
    create(&state, &listing("Herzl 1", "sale", 1, 1));

    // street=בן
    let hits = ids(get(&state, "/api/properties?street=%D7%91%D7%9F"));
    assert_eq!(hits, [id]);
}

#[test]
fn empty_filters_are_ignored_and_bad_numbers_rejected() {
    let state = init_test_state();
    create(&state, &listing("Herzl 1", "sale", 1, 1));

    let hits = ids(get(&state, "/api/properties?property_type=&min_price=&street="));
    assert_eq!(hits.len(), 1);

    assert_eq!(get(&state, "/api/properties?rooms=three").status(), 422);
    assert_eq!(get(&state, "/api/properties?min_price=-1").status(), 422);
    assert_eq!(get(&state, "/api/properties?property_type=lease").status(), 422);
    assert_eq!(
        get(&state, "/api/properties?max_price=18446744073709551615").status(),
        422
    );
}

#[test]
fn price_above_integer_range_is_422() {
    let state = init_test_state();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/properties")
        .body(json_body(&listing("Herzl 1", "sale", u64::MAX, 1)))
        .unwrap();
    assert_eq!(send(&state, req).status(), 422);
}

#[test]
fn store_failure_is_500_without_leaking_details() {
    let state = init_test_state();
    state
        .db
        .with_conn(|conn| {
            conn.execute_batch("drop table listings")?;
            Ok::<_, ServerError>(())
        })
        .unwrap();

    let resp = get(&state, "/api/properties");
    assert_eq!(resp.status(), 500);

    let body = body_string(resp);
    let payload: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(payload, json!({ "detail": "Internal Server Error" }));
    assert!(!body.contains("no such table"));
}

#[test]
fn sale_and_rent_shortcuts() {
    let state = init_test_state();
    let sale = create(&state, &listing("Herzl 1", "sale", 1, 1));
    let rent = create(&state, &listing("Herzl 2", "rent", 1, 1));

    assert_eq!(ids(get(&state, "/api/properties/sale")), [sale]);
    assert_eq!(ids(get(&state, "/api/properties/rent")), [rent]);
}

#[test]
fn update_replaces_fields_and_advances_updated_at() {
    let state = init_test_state();
    let id = create(&state, &listing("Herzl 1", "sale", 1_000_000, 3));
    let before = body_json(get(&state, &format!("/api/properties/{id}")));

    let mut changed = listing("Herzl 1", "rent", 5_500, 3);
    changed["id"] = json!("hijack");
    changed["created_at"] = json!("2000-01-01T00:00:00.000000Z");

    let req = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/properties/{id}"))
        .body(json_body(&changed))
        .unwrap();
    let resp = send(&state, req);
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["message"], "Property updated successfully");

    let after = body_json(get(&state, &format!("/api/properties/{id}")));
    assert_eq!(after["id"], id.as_str());
    assert_eq!(after["property_type"], "rent");
    assert_eq!(after["price"], 5_500);
    assert_eq!(after["created_at"], before["created_at"]);
    assert!(after["updated_at"].as_str().unwrap() >= before["updated_at"].as_str().unwrap());

    assert_eq!(get(&state, "/api/properties/hijack").status(), 404);
}

#[test]
fn update_unknown_id_is_404() {
    let state = init_test_state();
    let req = Request::builder()
        .method(Method::PUT)
        .uri("/api/properties/nope")
        .body(json_body(&listing("Herzl 1", "sale", 1, 1)))
        .unwrap();

    assert_eq!(send(&state, req).status(), 404);
}

#[test]
fn delete_then_get_is_404() {
    let state = init_test_state();
    let id = create(&state, &listing("Herzl 1", "sale", 1, 1));

    let delete = |id: &str| {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/properties/{id}"))
            .body(Body::empty())
            .unwrap();
        send(&state, req)
    };

    let resp = delete(&id);
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["message"], "Property deleted successfully");

    assert_eq!(get(&state, &format!("/api/properties/{id}")).status(), 404);
    assert_eq!(delete(&id).status(), 404);
}
