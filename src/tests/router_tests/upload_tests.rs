use super::{get, send};
use crate::tests::utils::{body_json, body_string, init_test_state};
use astra::{Body, Response};
use http::{Method, Request};

fn upload(state: &crate::app::AppState, field: &str, filename: &str, data: &[u8]) -> Response {
    let mut body = format!(
        "--XBOUNDARY\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header("Content-Type", "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))
        .unwrap();
    send(state, req)
}

#[test]
fn uploaded_file_is_served_back() {
    let state = init_test_state();
    let resp = upload(&state, "file", "salon.PNG", b"not really a png");
    assert_eq!(resp.status(), 200);

    let stored = body_json(resp);
    let filename = stored["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_ne!(filename, "salon.png");
    assert_eq!(stored["url"], format!("/uploads/{filename}"));

    let resp = get(&state, &format!("/uploads/{filename}"));
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "image/png"
    );
    assert_eq!(body_string(resp), "not really a png");
}

#[test]
fn upload_without_file_is_400() {
    let state = init_test_state();
    assert_eq!(upload(&state, "other", "a.png", b"x").status(), 400);
    assert_eq!(upload(&state, "file", "", b"x").status(), 400);
}

#[test]
fn oversized_upload_is_413() {
    let state = init_test_state();
    // init_test_state caps uploads at 1 KiB.
    let resp = upload(&state, "file", "big.bin", &vec![0u8; 2048]);
    assert_eq!(resp.status(), 413);
}

#[test]
fn missing_upload_is_404() {
    let state = init_test_state();
    assert_eq!(get(&state, "/uploads/nothing.png").status(), 404);
    assert_eq!(get(&state, "/uploads/..").status(), 404);
}
