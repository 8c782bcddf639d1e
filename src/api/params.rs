// src/api/params.rs

//! Request decoding: query strings, bodies, url-encoded and multipart forms.

use astra::Body;
use bytes::Bytes;
use futures::executor::block_on;
use futures::stream;
use http::request::Parts;
use http::HeaderMap;
use multer::Multipart;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use crate::errors::ServerError;

/// Bodies of JSON and plain form requests.
pub const MAX_FORM_BYTES: u64 = 1024 * 1024;

/// Decoded query parameters. Later duplicates win.
pub fn parse_query(parts: &Parts) -> HashMap<String, String> {
    parts
        .uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Parse an optional parameter. Absent or blank values are `None`.
pub fn optional<T>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, ServerError>
where
    T: FromStr,
{
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServerError::Validation(format!("invalid value for {key}: {raw:?}"))),
    }
}

/// Read the whole body, refusing anything larger than `limit` bytes.
pub fn read_body(mut body: Body, limit: u64) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    body.reader()
        .take(limit + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    if buf.len() as u64 > limit {
        return Err(ServerError::PayloadTooLarge(limit));
    }
    Ok(buf)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn content_type(headers: &HeaderMap) -> Option<mime::Mime> {
    headers
        .get(http::header::CONTENT_TYPE)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// One field of a submitted form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

impl FormPart {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Decode a form body sent either as `multipart/form-data` or
/// `application/x-www-form-urlencoded`.
pub fn parse_form(headers: &HeaderMap, body: &[u8]) -> Result<Vec<FormPart>, ServerError> {
    let Some(ct) = content_type(headers) else {
        return Err(ServerError::BadRequest("missing Content-Type".into()));
    };

    match (ct.type_(), ct.subtype()) {
        (mime::MULTIPART, mime::FORM_DATA) => {
            let boundary = ct
                .get_param(mime::BOUNDARY)
                .ok_or_else(|| ServerError::BadRequest("multipart body without boundary".into()))?;
            parse_multipart(boundary.as_str(), body)
        }
        (mime::APPLICATION, mime::WWW_FORM_URLENCODED) => Ok(url::form_urlencoded::parse(body)
            .map(|(name, value)| FormPart {
                name: name.into_owned(),
                filename: None,
                data: value.into_owned().into_bytes(),
            })
            .collect()),
        _ => Err(ServerError::BadRequest(format!(
            "unsupported Content-Type {}",
            ct.essence_str()
        ))),
    }
}

/// Collect every part of a `multipart/form-data` body that has already been
/// read into memory.
pub fn parse_multipart(boundary: &str, body: &[u8]) -> Result<Vec<FormPart>, ServerError> {
    let data = Bytes::copy_from_slice(body);
    let stream = stream::once(async move { Ok::<_, std::io::Error>(data) });
    let mut multipart = Multipart::new(stream, boundary);

    block_on(async {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field
                .name()
                .map(str::to_string)
                .ok_or_else(|| ServerError::BadRequest("multipart part without a name".into()))?;
            let filename = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(malformed)?;

            parts.push(FormPart {
                name,
                filename,
                data: data.to_vec(),
            });
        }
        Ok::<_, ServerError>(parts)
    })
}

fn malformed(err: multer::Error) -> ServerError {
    ServerError::BadRequest(format!("malformed multipart body: {err}"))
}
