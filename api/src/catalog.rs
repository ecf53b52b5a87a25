use crate::json_templates::{StubPhoto, StubUser, Urls};

/// The api refuses to hand out more than this many photos per page.
pub const MAX_PER_PAGE: u32 = 30;

const AUTHORS: [&str; 5] = [
    "Ansel Adams",
    "Dorothea Lange",
    "Vivian Maier",
    "Fan Ho",
    "Saul Leiter",
];

const SUBJECTS: [&str; 6] = [
    "harbour at dawn",
    "empty street in the rain",
    "mountain ridge under snow",
    "market stall",
    "lighthouse",
    "field of sunflowers",
];

/// A fixed, ordered set of photos served by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    photos: Vec<StubPhoto>,
}

impl Catalog {
    /// Build `size` photos, deterministic so tests can rely on ids and contents.
    ///
    /// Every third photo has a title and every second a description, so both the
    /// present and the missing case show up on any page.
    pub fn generate(size: usize) -> Catalog {
        let photos = (0..size)
            .map(|i| {
                let id = format!("stub{:05}", i + 1);
                let author = AUTHORS[i % AUTHORS.len()];
                let subject = SUBJECTS[i % SUBJECTS.len()];
                let image = |variant: &str| format!("https://picsum.photos/seed/{id}/{variant}");

                StubPhoto {
                    id: id.clone(),
                    width: 4000,
                    height: 3000,
                    title: (i % 3 == 0).then(|| format!("Study no. {}", i + 1)),
                    description: (i % 2 == 0).then(|| format!("A {} photographed by {}.", subject, author)),
                    alt_description: Some(subject.to_string()),
                    urls: Urls {
                        raw: image("4000/3000"),
                        full: image("2000/1500"),
                        regular: image("1080/810"),
                        small: image("400/300"),
                        thumb: image("200/150"),
                    },
                    user: StubUser {
                        username: author.to_lowercase().replace(' ', "_"),
                        name: author.to_string(),
                    },
                }
            })
            .collect();

        Catalog { photos }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// One page of the catalog, pages past the end are empty.
    ///
    /// Page 0 is treated as page 1 and `per_page` is clamped to `1..=MAX_PER_PAGE`.
    pub fn page(&self, page: u32, per_page: u32) -> &[StubPhoto] {
        let per_page = per_page.clamp(1, MAX_PER_PAGE) as usize;
        let start = (page.max(1) as usize - 1).saturating_mul(per_page);

        if start >= self.photos.len() {
            return &[];
        }
        let end = (start + per_page).min(self.photos.len());
        &self.photos[start..end]
    }

    pub fn get(&self, id: &str) -> Option<&StubPhoto> {
        self.photos.iter().find(|p| p.id == id)
    }
}
