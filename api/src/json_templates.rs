use serde::Serialize;

/// Every size the real api hands out, the stub points them all at placeholder images.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StubUser {
    pub username: String,
    pub name: String,
}

/// A photo as the stub serves it, shaped like the real api's record.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StubPhoto {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt_description: Option<String>,
    pub urls: Urls,
    pub user: StubUser,
}
