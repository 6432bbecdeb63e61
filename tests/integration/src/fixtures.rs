//! Request bodies and response shapes used by the API tests

use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use serde::Deserialize;
use serde_json::{json, Value};

pub const PASSWORD: &str = "SecurePass1";

/// Registration body for a user named `username`
pub fn register_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": email(username),
        "password": PASSWORD,
    })
}

pub fn login_body(username: &str) -> Value {
    json!({ "email": email(username), "password": PASSWORD })
}

pub fn email(username: &str) -> String {
    format!("{username}@example.com")
}

/// Poll body with one option per media name; no media means no options
pub fn poll_body(title: &str, places_number: i64, media: &[String]) -> Value {
    let mut body = json!({
        "title": title,
        "description": "Pick one",
        "media_type": "IMAGE",
        "places_number": places_number,
    });
    if !media.is_empty() {
        let options: Vec<Value> = media
            .iter()
            .enumerate()
            .map(|(i, name)| option_body(&format!("Option {}", i + 1), name))
            .collect();
        body["options"] = Value::Array(options);
    }
    body
}

pub fn option_body(label: &str, media: &str) -> Value {
    json!({ "label": label, "media": { "name": media } })
}

/// Encoded PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([40, 120, 200]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png fixture");
    bytes.into_inner()
}

#[derive(Debug, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionBody {
    pub id: String,
    pub label: String,
    pub media: Media,
}

#[derive(Debug, Deserialize)]
pub struct PollBody {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub places_number: i32,
    pub creator_id: String,
    pub options: Vec<OptionBody>,
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}
