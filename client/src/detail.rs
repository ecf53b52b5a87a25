use std::sync::Arc;

use log::{debug, error};
use shared_libs::json_templates::{Id, PhotoDetail};

use crate::{
    error::FetchError,
    lifetime::Lifetime,
    media::PhotoSource,
    render::{DetailView, PhotoCard},
};

/// A single-photo fetch issued by a [`DetailLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    generation: u64,
    pub id: Id,
}

impl DetailRequest {
    pub async fn fetch(&self, source: &dyn PhotoSource) -> Result<PhotoDetail, FetchError> {
        source.get_photo(&self.id).await
    }
}

/// Clears the flag it guards when dropped, whichever way the scope is left.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn hold(flag: &'a mut bool) -> LoadingGuard<'a> {
        *flag = true;
        LoadingGuard(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// State of the detail view: the photo for one id, and whether it is still being fetched.
pub struct DetailLoader {
    source: Arc<dyn PhotoSource>,
    id: Option<Id>,
    photo: Option<PhotoDetail>,
    loading: bool,
    lifetime: Lifetime,
}

impl DetailLoader {
    pub fn new(source: Arc<dyn PhotoSource>) -> DetailLoader {
        DetailLoader {
            source,
            id: None,
            photo: None,
            loading: false,
            lifetime: Lifetime::new(),
        }
    }

    /// Point the view at `id`, a fetch is only issued when the id differs from the current one.
    pub fn set_id(&mut self, id: &str) -> Option<DetailRequest> {
        if self.lifetime.is_active() && self.id.as_deref() == Some(id) {
            return None;
        }
        Some(self.begin_load(id))
    }

    /// Mark the view as loading `id`, any request issued before this one goes stale.
    pub fn begin_load(&mut self, id: &str) -> DetailRequest {
        let generation = self.lifetime.begin();
        self.id = Some(id.to_string());
        self.photo = None;
        self.loading = true;
        debug!("loading details for photo {}", id);

        DetailRequest {
            generation,
            id: id.to_string(),
        }
    }

    /// Apply the outcome of `request`, returns false if the response was stale and dropped.
    pub fn apply_detail(
        &mut self,
        request: &DetailRequest,
        result: Result<PhotoDetail, FetchError>,
    ) -> bool {
        if !self.lifetime.is_current(request.generation) {
            debug!("discarding stale details for photo {}", request.id);
            return false;
        }

        self.loading = false;
        match result {
            Ok(mut photo) => {
                if photo.id.is_empty() {
                    photo.id = request.id.clone();
                }
                self.photo = Some(photo);
            }
            Err(e) => error!("error fetching photo details for {}: {}", request.id, e),
        }

        true
    }

    /// Fetch and apply the record for `id` in one step.
    pub async fn load_detail(&mut self, id: &str) {
        let request = self.begin_load(id);
        let source = self.source.clone();

        let result = {
            let _loading = LoadingGuard::hold(&mut self.loading);
            request.fetch(source.as_ref()).await
        };

        self.apply_detail(&request, result);
    }

    /// Tear the view down, the loading flag is cleared and late responses are ignored.
    pub fn cancel(&mut self) {
        self.lifetime.end();
        self.loading = false;
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn photo(&self) -> Option<&PhotoDetail> {
        self.photo.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> DetailView {
        if self.loading {
            return DetailView::loading();
        }
        match &self.photo {
            Some(photo) => DetailView::loaded(PhotoCard::from_detail(photo)),
            None => DetailView::failed(),
        }
    }
}
