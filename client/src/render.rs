use handlebars::{no_escape, Handlebars, RenderError, TemplateError};
use serde::Serialize;
use shared_libs::json_templates::{PhotoDetail, PhotoSummary};

const GALLERY_TEMPLATE: &str = "\
== Photo Gallery ==
{{#each rows}}
{{#each this}}  [{{number}}] {{author}}  {{thumb_url}}{{#if alt}}  \"{{alt}}\"{{/if}}
{{/each}}
{{/each}}
{{#if loading}}  ... loading photos ...
{{/if}}
{{#if exhausted}}No more photos to load.
{{/if}}
{{#if failed}}Failed to load photos.
{{/if}}
{{#if sentinel_visible}}  ---
{{/if}}
rows {{first_row}}-{{last_row}} of {{total_rows}}, {{count}} photos
";

const DETAIL_TEMPLATE: &str = "\
[Go Back]
== Detail of Photo ==
{{#if loading}}  ... loading ...
{{/if}}
{{#with photo}}
{{title}}
By: {{author}}
Description: {{description}}
Image: {{image_url}} ({{alt}})
{{/with}}
{{#if failed}}Failed to load photo details.
{{/if}}";

const NOT_FOUND_TEMPLATE: &str = "Page Not Found\n";

const NO_TITLE: &str = "No title available";
const NO_DESCRIPTION: &str = "No description available";
const NO_ALT: &str = "Photo";

/// One card in the gallery grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub number: usize,
    pub id: String,
    pub author: String,
    pub thumb_url: String,
    pub alt: String,
}

impl CardView {
    pub fn from_summary(number: usize, photo: &PhotoSummary) -> CardView {
        CardView {
            number,
            id: photo.id.clone(),
            author: photo.user.name.clone(),
            thumb_url: photo.urls.thumb.clone(),
            alt: photo.alt_description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    /// Rows of cards inside the viewport
    pub rows: Vec<Vec<CardView>>,
    /// 1-based row number of the first row shown
    pub first_row: usize,
    pub last_row: usize,
    pub total_rows: usize,
    pub count: usize,
    pub loading: bool,
    pub exhausted: bool,
    pub failed: bool,
    pub sentinel_visible: bool,
}

/// The loaded photo as shown on the detail view, fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoCard {
    pub title: String,
    pub author: String,
    pub description: String,
    pub image_url: String,
    pub alt: String,
}

impl PhotoCard {
    pub fn from_detail(photo: &PhotoDetail) -> PhotoCard {
        fn or_fallback(value: &Option<String>, fallback: &str) -> String {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => fallback.to_string(),
            }
        }

        PhotoCard {
            title: or_fallback(&photo.title, NO_TITLE),
            author: photo.user.name.clone(),
            description: or_fallback(&photo.description, NO_DESCRIPTION),
            image_url: photo.urls.full.clone(),
            alt: or_fallback(&photo.alt_description, NO_ALT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub loading: bool,
    pub photo: Option<PhotoCard>,
    pub failed: bool,
}

impl DetailView {
    pub fn loading() -> DetailView {
        DetailView {
            loading: true,
            photo: None,
            failed: false,
        }
    }

    pub fn loaded(photo: PhotoCard) -> DetailView {
        DetailView {
            loading: false,
            photo: Some(photo),
            failed: false,
        }
    }

    pub fn failed() -> DetailView {
        DetailView {
            loading: false,
            photo: None,
            failed: true,
        }
    }
}

/// Turns view models into terminal text.
pub struct Renderer {
    bars: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Renderer, TemplateError> {
        let mut bars = Handlebars::new();
        // output goes to a terminal, not a browser
        bars.register_escape_fn(no_escape);
        bars.register_template_string("gallery", GALLERY_TEMPLATE)?;
        bars.register_template_string("detail", DETAIL_TEMPLATE)?;
        bars.register_template_string("not_found", NOT_FOUND_TEMPLATE)?;
        Ok(Renderer { bars })
    }

    pub fn gallery(&self, view: &GalleryView) -> Result<String, RenderError> {
        self.bars.render("gallery", view)
    }

    pub fn detail(&self, view: &DetailView) -> Result<String, RenderError> {
        self.bars.render("detail", view)
    }

    pub fn not_found(&self) -> Result<String, RenderError> {
        self.bars.render("not_found", &())
    }
}
