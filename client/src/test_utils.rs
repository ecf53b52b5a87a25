//! Shared fixtures for unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared_libs::json_templates::{FullUrls, PhotoDetail, PhotoSummary, ThumbUrls, User};

use crate::{error::FetchError, gallery::PageCursor, media::PhotoSource};

pub fn summary(id: &str) -> PhotoSummary {
    PhotoSummary {
        id: id.to_string(),
        urls: ThumbUrls {
            thumb: format!("https://images.example/{id}/thumb.jpg"),
        },
        user: User {
            name: format!("author of {id}"),
        },
        alt_description: Some(format!("alt for {id}")),
    }
}

/// `count` summaries with ids `{prefix}-0`, `{prefix}-1`, ...
pub fn summaries(prefix: &str, count: usize) -> Vec<PhotoSummary> {
    (0..count).map(|i| summary(&format!("{prefix}-{i}"))).collect()
}

pub fn detail(id: &str, title: Option<&str>, description: Option<&str>) -> PhotoDetail {
    PhotoDetail {
        id: id.to_string(),
        urls: FullUrls {
            full: format!("https://images.example/{id}/full.jpg"),
        },
        title: title.map(str::to_string),
        description: description.map(str::to_string),
        user: User {
            name: format!("author of {id}"),
        },
        alt_description: None,
    }
}

/// Scripted, in-memory photo source that records every call made against it.
///
/// Pages without a script are empty, photos without a script answer 404.
#[derive(Default)]
pub struct FakeSource {
    pages: Mutex<HashMap<u32, Vec<PhotoSummary>>>,
    failing_pages: Mutex<HashSet<u32>>,
    details: Mutex<HashMap<String, PhotoDetail>>,
    list_calls: Mutex<Vec<(u32, u32)>>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> FakeSource {
        FakeSource::default()
    }

    pub fn shared(self) -> Arc<FakeSource> {
        Arc::new(self)
    }

    pub fn with_page(self, page: u32, items: Vec<PhotoSummary>) -> Self {
        self.pages.lock().unwrap().insert(page, items);
        self
    }

    /// The next request for `page` fails, later ones succeed.
    pub fn fail_page_once(self, page: u32) -> Self {
        self.failing_pages.lock().unwrap().insert(page);
        self
    }

    pub fn with_detail(self, photo: PhotoDetail) -> Self {
        self.details.lock().unwrap().insert(photo.id.clone(), photo);
        self
    }

    /// `(page, per_page)` of every listing request, in order.
    pub fn list_calls(&self) -> Vec<(u32, u32)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoSource for FakeSource {
    async fn list_photos(
        &self,
        page: PageCursor,
        per_page: u32,
    ) -> Result<Vec<PhotoSummary>, FetchError> {
        self.list_calls.lock().unwrap().push((page.get(), per_page));

        if self.failing_pages.lock().unwrap().remove(&page.get()) {
            return Err(FetchError::status(
                StatusCode::SERVICE_UNAVAILABLE,
                "scripted failure",
            ));
        }

        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&page.get())
            .cloned()
            .unwrap_or_default())
    }

    async fn get_photo(&self, id: &str) -> Result<PhotoDetail, FetchError> {
        self.detail_calls.lock().unwrap().push(id.to_string());

        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::status(StatusCode::NOT_FOUND, "Couldn't find Photo"))
    }
}

/// A source whose requests never complete.
pub struct StalledSource;

#[async_trait]
impl PhotoSource for StalledSource {
    async fn list_photos(
        &self,
        _page: PageCursor,
        _per_page: u32,
    ) -> Result<Vec<PhotoSummary>, FetchError> {
        std::future::pending().await
    }

    async fn get_photo(&self, _id: &str) -> Result<PhotoDetail, FetchError> {
        std::future::pending().await
    }
}
