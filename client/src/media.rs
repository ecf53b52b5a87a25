use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use shared_libs::json_templates::{
    ErrorResponse, GetPhotoQuery, ListPhotosQuery, PhotoDetail, PhotoSummary,
};

use crate::{config::Config, error::FetchError, gallery::PageCursor};

/// Read access to a photo provider.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Fetch one page of the listing, an empty page means there is nothing further.
    async fn list_photos(
        &self,
        page: PageCursor,
        per_page: u32,
    ) -> Result<Vec<PhotoSummary>, FetchError>;

    /// Fetch the full record of a single photo.
    async fn get_photo(&self, id: &str) -> Result<PhotoDetail, FetchError>;
}

/// A [`PhotoSource`] backed by the Unsplash http api (or anything that speaks it).
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: reqwest::Client,
    config: Config,
}

impl UnsplashClient {
    pub fn new(config: Config) -> UnsplashClient {
        UnsplashClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Join path segments onto the configured base url, each segment is percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.config.api_base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T, Q>(&self, url: Url, query: &Q) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET {}", url);

        let res = self.http.get(url).query(query).send().await?;
        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(err) if !err.errors.is_empty() => err.errors.join(", "),
                _ => String::from_utf8_lossy(&body).trim().to_string(),
            };
            return Err(FetchError::status(status, message));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PhotoSource for UnsplashClient {
    async fn list_photos(
        &self,
        page: PageCursor,
        per_page: u32,
    ) -> Result<Vec<PhotoSummary>, FetchError> {
        let query = ListPhotosQuery {
            page: page.get(),
            per_page,
            client_id: self.config.api_key.clone(),
        };
        self.get_json(self.endpoint(&["photos"]), &query).await
    }

    async fn get_photo(&self, id: &str) -> Result<PhotoDetail, FetchError> {
        let query = GetPhotoQuery {
            client_id: self.config.api_key.clone(),
        };
        let mut photo: PhotoDetail = self.get_json(self.endpoint(&["photos", id]), &query).await?;
        if photo.id.is_empty() {
            photo.id = id.to_string();
        }
        Ok(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_relative_to_the_base() {
        let client = UnsplashClient::new(Config::new("k"));
        assert_eq!(
            client.endpoint(&["photos"]).as_str(),
            "https://api.unsplash.com/photos"
        );

        let client = UnsplashClient::new(
            Config::new("k")
                .with_base_url("http://localhost:3030/v1/")
                .unwrap(),
        );
        assert_eq!(
            client.endpoint(&["photos", "abc123"]).as_str(),
            "http://localhost:3030/v1/photos/abc123"
        );
    }

    #[test]
    fn ids_cannot_escape_their_segment() {
        let client = UnsplashClient::new(Config::new("k"));
        assert_eq!(
            client.endpoint(&["photos", "a/b?c"]).as_str(),
            "https://api.unsplash.com/photos/a%2Fb%3Fc"
        );
    }
}
