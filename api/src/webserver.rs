use std::{convert::Infallible, future::Future, net::SocketAddr, sync::Arc};

use log::{debug, info};
use shared_libs::json_templates::{ErrorResponse, GetPhotoQuery, ListPhotosQuery};
use warp::{http::StatusCode, reject::Reject, Filter, Rejection, Reply};

use crate::catalog::Catalog;

#[derive(Debug)]
pub struct CustomError(String, StatusCode);

impl CustomError {
    pub fn new(msg: String, status: StatusCode) -> CustomError {
        CustomError(msg, status)
    }
}

impl Reject for CustomError {}

fn error_reply(msg: String, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse { errors: vec![msg] }),
        status,
    )
}

/// Turn rejections into the json error bodies the real api sends.
pub async fn handle_custom_error(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(CustomError(msg, status)) = err.find::<CustomError>() {
        Ok(error_reply(msg.clone(), *status))
    } else if err.is_not_found() {
        Ok(error_reply(String::from("Not found"), StatusCode::NOT_FOUND))
    } else {
        Err(err)
    }
}

pub struct AppState {
    access_key: String,
    catalog: Catalog,
}

impl AppState {
    fn authorize(&self, client_id: &str) -> Result<(), Rejection> {
        if client_id.is_empty() || client_id != self.access_key {
            debug!("rejecting request with client_id {:?}", client_id);
            return Err(warp::reject::custom(CustomError::new(
                String::from("OAuth error: The access token is invalid"),
                StatusCode::UNAUTHORIZED,
            )));
        }
        Ok(())
    }
}

pub async fn list_photos(
    query: ListPhotosQuery,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    state.authorize(&query.client_id)?;

    let page = state.catalog.page(query.page, query.per_page);
    debug!(
        "page {} ({} per page): {} photos",
        query.page,
        query.per_page,
        page.len()
    );
    Ok(warp::reply::json(&page))
}

pub async fn get_photo(
    id: String,
    query: GetPhotoQuery,
    state: Arc<AppState>,
) -> Result<impl Reply, Rejection> {
    state.authorize(&query.client_id)?;

    match state.catalog.get(&id) {
        Some(photo) => Ok(warp::reply::json(photo)),
        None => Err(warp::reject::custom(CustomError::new(
            String::from("Couldn't find Photo"),
            StatusCode::NOT_FOUND,
        ))),
    }
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// The stand-in photo api.
pub struct WebServer {
    address: SocketAddr,
    state: Arc<AppState>,
}

impl WebServer {
    pub fn builder() -> WebServerBuilder {
        WebServerBuilder::default()
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone + Send + Sync + 'static
    {
        let list = warp::path!("photos")
            .and(warp::get())
            .and(warp::query::<ListPhotosQuery>())
            .and(with_state(self.state.clone()))
            .and_then(list_photos);

        let detail = warp::path!("photos" / String)
            .and(warp::get())
            .and(warp::query::<GetPhotoQuery>())
            .and(with_state(self.state.clone()))
            .and_then(get_photo);

        list.or(detail).recover(handle_custom_error)
    }

    pub async fn run(self) {
        info!(
            "serving {} photos on http://{}",
            self.state.catalog.len(),
            self.address
        );
        warp::serve(self.routes()).run(self.address).await;
    }

    /// Bind to the configured address (port 0 picks a free one), returning where it ended up.
    pub fn bind(self) -> (SocketAddr, impl Future<Output = ()> + 'static) {
        warp::serve(self.routes()).bind_ephemeral(self.address)
    }
}

pub struct WebServerBuilder {
    address: SocketAddr,
    access_key: Option<String>,
    catalog: Option<Catalog>,
}

impl Default for WebServerBuilder {
    fn default() -> Self {
        WebServerBuilder {
            address: SocketAddr::from(([127, 0, 0, 1], 3030)),
            access_key: None,
            catalog: None,
        }
    }
}

impl WebServerBuilder {
    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> WebServer {
        WebServer {
            address: self.address,
            state: Arc::new(AppState {
                access_key: self.access_key.unwrap_or_else(|| String::from("stub-access-key")),
                catalog: self.catalog.unwrap_or_else(|| Catalog::generate(60)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn server(size: usize) -> WebServer {
        WebServer::builder()
            .access_key("k")
            .catalog(Catalog::generate(size))
            .build()
    }

    async fn get(server: &WebServer, path: &str) -> (StatusCode, Value) {
        let res = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&server.routes())
            .await;
        let body = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (res.status(), body)
    }

    #[tokio::test]
    async fn lists_a_page() {
        let server = server(20);
        let (status, body) = get(&server, "/photos?page=2&per_page=12&client_id=k").await;

        assert_eq!(status, StatusCode::OK);
        let photos = body.as_array().unwrap();
        assert_eq!(photos.len(), 8);
        assert_eq!(photos[0]["id"], "stub00013");
        assert!(photos[0]["urls"]["thumb"].is_string());
        assert!(photos[0]["user"]["name"].is_string());
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let server = server(20);
        let (status, body) = get(&server, "/photos?page=3&per_page=12&client_id=k").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn returns_a_single_photo() {
        let server = server(3);
        let (status, body) = get(&server, "/photos/stub00001?client_id=k").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "stub00001");
        assert!(body["urls"]["full"].is_string());
    }

    #[tokio::test]
    async fn unknown_photo_is_404_with_error_body() {
        let server = server(3);
        let (status, body) = get(&server, "/photos/nope?client_id=k").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0], "Couldn't find Photo");
    }

    #[tokio::test]
    async fn wrong_or_missing_key_is_401() {
        let server = server(3);

        let (status, body) = get(&server, "/photos?page=1&client_id=nope").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["errors"][0].as_str().unwrap().contains("access token"));

        let (status, _) = get(&server, "/photos/stub00001?client_id=").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn other_paths_are_404() {
        let server = server(3);
        let (status, _) = get(&server, "/users/someone?client_id=k").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
