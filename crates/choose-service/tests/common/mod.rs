//! Shared fixtures: a service context over the in-memory repositories,
//! a temporary media root and a notifier that keeps what it was given.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use choose_common::{AccountTokenGenerator, JwtService, LocalObjectStore};
use choose_core::{MediaType, Notification, Notifier, Snowflake, SnowflakeGenerator};
use choose_db::MemoryDatabase;
use choose_service::dto::{
    ActivateRequest, CreateOptionRequest, CreatePollRequest, MediaRef, RegisterRequest,
};
use choose_service::{AccountService, MediaService, ServiceContext};
use image::{ImageFormat, RgbImage};
use tempfile::TempDir;

pub const PASSWORD: &str = "SecurePass1";

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Token carried by the link of the most recent notification
    pub fn last_token(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let url = &sent.last().expect("no notification sent").context["url"];
        url.split("token=").nth(1).expect("link has a token").to_string()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub notifier: Arc<RecordingNotifier>,
    pub media_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let db = MemoryDatabase::new();
        let media_dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());

        let ctx = ServiceContext::builder()
            .account_repo(Arc::new(db.accounts()))
            .poll_repo(Arc::new(db.polls()))
            .option_repo(Arc::new(db.options()))
            .object_store(Arc::new(LocalObjectStore::new(media_dir.path(), "/media/")))
            .notifier(notifier.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret", 900, 86_400)))
            .account_tokens(Arc::new(
                AccountTokenGenerator::new("token-secret", 3).unwrap(),
            ))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap();

        Self {
            ctx,
            notifier,
            media_dir,
        }
    }

    /// Register and activate an account, returning its id
    pub async fn active_account(&self, username: &str) -> Snowflake {
        let accounts = AccountService::new(&self.ctx);
        let created = accounts
            .register(RegisterRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();
        accounts
            .activate(ActivateRequest {
                token: self.notifier.last_token(),
            })
            .await
            .unwrap();
        created.id.parse().unwrap()
    }

    /// Store a small PNG through media intake and return its name
    pub async fn upload(&self) -> String {
        MediaService::new(&self.ctx)
            .accept_image(png(8, 8), Some("image/png"))
            .await
            .unwrap()
            .name
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]))
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub fn poll_request(title: &str, places: i64) -> CreatePollRequest {
    CreatePollRequest {
        title: title.to_string(),
        description: None,
        image: None,
        media_type: MediaType::Image,
        places_number: places,
        options: None,
    }
}

pub fn option_request(label: &str, media: &str) -> CreateOptionRequest {
    CreateOptionRequest {
        label: label.to_string(),
        media: MediaRef {
            name: media.to_string(),
        },
    }
}
