//! Records exchanged with the photo api.
//!
//! Only the fields the gallery actually reads are modelled, everything else the
//! api sends is ignored during deserialization.

use serde::{Deserialize, Serialize};

pub type Id = String;

/// Number of photos requested per listing page.
pub const PAGE_SIZE: u32 = 12;

/// Query string of `GET /photos`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListPhotosQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub client_id: String,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

/// Query string of `GET /photos/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GetPhotoQuery {
    #[serde(default)]
    pub client_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ThumbUrls {
    pub thumb: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FullUrls {
    pub full: String,
}

/// One entry of the listing endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhotoSummary {
    pub id: Id,
    pub urls: ThumbUrls,
    pub user: User,
    #[serde(default)]
    pub alt_description: Option<String>,
}

/// The single-photo record.
///
/// The api does include `id` here but nothing relies on it, the detail loader
/// fills it in from the requested id when it is missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhotoDetail {
    #[serde(default)]
    pub id: Id,
    pub urls: FullUrls,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub user: User,
    #[serde(default)]
    pub alt_description: Option<String>,
}

/// Error body the api returns alongside non-2xx statuses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}
