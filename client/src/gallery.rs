use std::{fmt, sync::Arc};

use log::{debug, error, info};
use shared_libs::json_templates::PhotoSummary;

use crate::{
    config::Config,
    error::FetchError,
    lifetime::Lifetime,
    media::PhotoSource,
    render::{CardView, GalleryView},
};

/// The next page to request from the listing endpoint, pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageCursor(u32);

impl PageCursor {
    pub const FIRST: PageCursor = PageCursor(1);

    pub fn new(page: u32) -> PageCursor {
        PageCursor(page.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    fn advance(&mut self) {
        self.0 = self.0.saturating_add(1);
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        PageCursor::FIRST
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// An empty page came back, nothing further is requested for this gallery.
    Exhausted,
}

/// How many cards fit across, and how many rows of cards fit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
}

impl GridLayout {
    pub fn new(columns: usize, rows: usize) -> GridLayout {
        GridLayout {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout::new(4, 3)
    }
}

/// A page fetch issued by a [`GalleryLoader`], tagged with the lifetime it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    generation: u64,
    pub page: PageCursor,
    pub per_page: u32,
}

impl PageRequest {
    pub async fn fetch(&self, source: &dyn PhotoSource) -> Result<Vec<PhotoSummary>, FetchError> {
        source.list_photos(self.page, self.per_page).await
    }
}

/// Infinite-scroll state of the gallery view.
///
/// Photos are only ever appended. Fetches happen one at a time, a new one can only
/// start from [`LoadState::Idle`], and a response is only applied if it answers the
/// request that is currently outstanding.
pub struct GalleryLoader {
    source: Arc<dyn PhotoSource>,
    per_page: u32,
    layout: GridLayout,
    photos: Vec<PhotoSummary>,
    cursor: PageCursor,
    state: LoadState,
    last_error: Option<String>,
    scroll_offset: usize,
    lifetime: Lifetime,
}

impl GalleryLoader {
    pub fn new(source: Arc<dyn PhotoSource>, config: &Config, layout: GridLayout) -> GalleryLoader {
        GalleryLoader {
            source,
            per_page: config.page_size,
            layout,
            photos: Vec::new(),
            cursor: PageCursor::FIRST,
            state: LoadState::Idle,
            last_error: None,
            scroll_offset: 0,
            lifetime: Lifetime::new(),
        }
    }

    /// Start a fresh gallery lifetime and request the first page.
    pub fn mount(&mut self) -> Option<PageRequest> {
        self.lifetime.begin();
        self.photos.clear();
        self.cursor = PageCursor::FIRST;
        self.state = LoadState::Idle;
        self.last_error = None;
        self.scroll_offset = 0;

        self.begin_load()
    }

    /// Tear the view down, responses still in flight will be ignored.
    pub fn cancel(&mut self) {
        self.lifetime.end();
        if self.state == LoadState::Loading {
            self.state = LoadState::Idle;
        }
    }

    /// Move to [`LoadState::Loading`] and hand back the request to run, if a fetch may start now.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if !self.lifetime.is_active() {
            debug!("gallery is not mounted, not loading page {}", self.cursor);
            return None;
        }

        match self.state {
            LoadState::Idle => {}
            LoadState::Loading => {
                debug!("page {} is already loading", self.cursor);
                return None;
            }
            LoadState::Exhausted => {
                debug!("gallery is exhausted, not loading page {}", self.cursor);
                return None;
            }
        }

        self.state = LoadState::Loading;
        debug!("loading page {} ({} per page)", self.cursor, self.per_page);

        Some(PageRequest {
            generation: self.lifetime.generation(),
            page: self.cursor,
            per_page: self.per_page,
        })
    }

    /// Apply the outcome of `request`, returns false if the response was stale and dropped.
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<PhotoSummary>, FetchError>,
    ) -> bool {
        if !self.lifetime.is_current(request.generation)
            || self.state != LoadState::Loading
            || request.page != self.cursor
        {
            debug!("discarding stale response for page {}", request.page);
            return false;
        }

        match result {
            Ok(items) if items.is_empty() => {
                info!("page {} was empty, no more photos to load", request.page);
                self.state = LoadState::Exhausted;
                self.last_error = None;
            }
            Ok(items) => {
                debug!("page {} returned {} photos", request.page, items.len());
                self.photos.extend(items);
                self.cursor.advance();
                self.state = LoadState::Idle;
                self.last_error = None;
            }
            Err(e) => {
                error!("failed to load photos for page {}: {}", request.page, e);
                self.state = LoadState::Idle;
                self.last_error = Some(e.to_string());
            }
        }

        true
    }

    /// Fetch and apply the next page in one step.
    pub async fn load_next_page(&mut self) {
        let Some(request) = self.begin_load() else {
            return;
        };

        let source = self.source.clone();
        let result = request.fetch(source.as_ref()).await;
        self.apply_page(&request, result);
    }

    /// The sentinel row came fully into view.
    pub fn on_sentinel_visible(&mut self) -> Option<PageRequest> {
        if self.state != LoadState::Idle {
            return None;
        }
        self.begin_load()
    }

    /// Scroll the viewport by `delta` rows, firing the sentinel trigger if it ends up in view.
    pub fn scroll_by(&mut self, delta: isize) -> Option<PageRequest> {
        let target = if delta.is_negative() {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        };
        self.scroll_offset = target.min(self.max_scroll_offset());

        if self.sentinel_visible() {
            self.on_sentinel_visible()
        } else {
            None
        }
    }

    pub fn scroll_to_top(&mut self) {
        debug!("scrolling gallery to top");
        self.scroll_offset = 0;
    }

    fn card_rows(&self) -> usize {
        self.photos.len().div_ceil(self.layout.columns)
    }

    /// The last valid offset still shows the sentinel row at the bottom of the screen.
    fn max_scroll_offset(&self) -> usize {
        (self.card_rows() + 1).saturating_sub(self.layout.rows)
    }

    /// The sentinel sits in the row after the last card, it counts as visible once that whole row is on screen.
    pub fn sentinel_visible(&self) -> bool {
        self.scroll_offset + self.layout.rows >= self.card_rows() + 1
    }

    pub fn photos(&self) -> &[PhotoSummary] {
        &self.photos
    }

    /// The photo behind the 1-based card number shown on screen.
    pub fn photo(&self, number: usize) -> Option<&PhotoSummary> {
        number.checked_sub(1).and_then(|i| self.photos.get(i))
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn is_active(&self) -> bool {
        self.lifetime.is_active()
    }

    pub fn view(&self) -> GalleryView {
        let columns = self.layout.columns;
        let first_row = self.scroll_offset.min(self.card_rows());
        let last_row = (self.scroll_offset + self.layout.rows).min(self.card_rows());

        let start = (first_row * columns).min(self.photos.len());
        let end = (last_row * columns).min(self.photos.len());

        let rows = self.photos[start..end]
            .chunks(columns)
            .enumerate()
            .map(|(row, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(col, photo)| {
                        CardView::from_summary((first_row + row) * columns + col + 1, photo)
                    })
                    .collect()
            })
            .collect();

        GalleryView {
            rows,
            first_row: (first_row + 1).min(last_row),
            last_row,
            total_rows: self.card_rows(),
            count: self.photos.len(),
            loading: self.state == LoadState::Loading,
            exhausted: self.state == LoadState::Exhausted,
            failed: self.last_error.is_some(),
            sentinel_visible: self.sentinel_visible(),
        }
    }
}
