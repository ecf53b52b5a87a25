use log::debug;
use shared_libs::json_templates::Id;

pub const GALLERY_PATH: &str = "/photos";

/// Redirects are followed at most this many times before giving up on a path.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Gallery,
    Detail { id: Id },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Show(Route),
    Redirect(&'static str),
}

impl Route {
    /// Match a path against the routing table.
    ///
    /// Matching ignores the query string, the fragment, a trailing slash and the
    /// case of the literal `photos` segment. The id is taken as written.
    pub fn recognize(path: &str) -> Resolution {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        let path = path.strip_suffix('/').unwrap_or(path);

        let segments: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };

        match segments.as_slice() {
            [] => Resolution::Redirect(GALLERY_PATH),
            [photos] if photos.eq_ignore_ascii_case("photos") => Resolution::Show(Route::Gallery),
            [photos, id] if photos.eq_ignore_ascii_case("photos") && !id.is_empty() => {
                Resolution::Show(Route::Detail { id: id.to_string() })
            }
            _ => Resolution::Show(Route::NotFound),
        }
    }

    pub fn detail_path(id: &str) -> String {
        format!("{}/{}", GALLERY_PATH, id)
    }
}

/// Browser-style history: a list of visited paths and a cursor into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(initial: &str) -> History {
        History {
            entries: vec![initial.to_string()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Add a new entry after the current one, dropping anything that was ahead of it.
    pub fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index += 1;
    }

    pub fn replace(&mut self, path: &str) {
        self.entries[self.index] = path.to_string();
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps the current history entry onto a [`Route`], following redirects in place.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: History,
}

impl Navigator {
    pub fn new(start: &str) -> Navigator {
        let mut navigator = Navigator {
            history: History::new(start),
        };
        navigator.settle();
        navigator
    }

    pub fn navigate(&mut self, path: &str) -> Route {
        self.history.push(path);
        self.settle()
    }

    /// Step back one entry, `None` when already at the first one.
    pub fn back(&mut self) -> Option<Route> {
        self.history.back().then(|| self.settle())
    }

    pub fn forward(&mut self) -> Option<Route> {
        self.history.forward().then(|| self.settle())
    }

    pub fn current(&self) -> Route {
        match Route::recognize(self.history.current()) {
            Resolution::Show(route) => route,
            Resolution::Redirect(_) => Route::NotFound,
        }
    }

    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Resolve the current entry, replacing it with the redirect target where there is one.
    fn settle(&mut self) -> Route {
        for _ in 0..MAX_REDIRECTS {
            match Route::recognize(self.history.current()) {
                Resolution::Show(route) => return route,
                Resolution::Redirect(to) => {
                    debug!("redirecting {} to {}", self.history.current(), to);
                    self.history.replace(to);
                }
            }
        }
        Route::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(route: Route) -> Resolution {
        Resolution::Show(route)
    }

    fn detail(id: &str) -> Route {
        Route::Detail { id: id.to_string() }
    }

    #[test]
    fn routing_table() {
        assert_eq!(Route::recognize("/"), Resolution::Redirect("/photos"));
        assert_eq!(Route::recognize(""), Resolution::Redirect("/photos"));
        assert_eq!(Route::recognize("/photos"), show(Route::Gallery));
        assert_eq!(Route::recognize("/photos/abc123"), show(detail("abc123")));
        assert_eq!(Route::recognize("/unknown/path"), show(Route::NotFound));
        assert_eq!(Route::recognize("/photo"), show(Route::NotFound));
        assert_eq!(Route::recognize("/photos/a/b"), show(Route::NotFound));
    }

    #[test]
    fn matching_ignores_decoration() {
        assert_eq!(Route::recognize("/photos/"), show(Route::Gallery));
        assert_eq!(Route::recognize("/photos?page=3"), show(Route::Gallery));
        assert_eq!(Route::recognize("/Photos/AbC#top"), show(detail("AbC")));
        assert_eq!(Route::recognize("photos/xyz/"), show(detail("xyz")));
        assert_eq!(Route::recognize("/photos//"), show(Route::NotFound));
    }

    #[test]
    fn root_redirect_replaces_the_entry() {
        let navigator = Navigator::new("/");
        assert_eq!(navigator.current(), Route::Gallery);
        assert_eq!(navigator.current_path(), "/photos");
        assert_eq!(navigator.history().len(), 1);
    }

    #[test]
    fn back_returns_to_previous_entry() {
        let mut navigator = Navigator::new("/photos");
        navigator.navigate("/photos/x");
        assert_eq!(navigator.navigate("/photos/abc123"), detail("abc123"));

        assert_eq!(navigator.back(), Some(detail("x")));
        assert_eq!(navigator.current_path(), "/photos/x");
        assert_eq!(navigator.back(), Some(Route::Gallery));
        assert_eq!(navigator.back(), None);
        assert_eq!(navigator.current(), Route::Gallery);
    }

    #[test]
    fn back_from_detail_opened_first_is_a_no_op() {
        let mut navigator = Navigator::new("/photos/abc123");
        assert_eq!(navigator.back(), None);
        assert_eq!(navigator.current(), detail("abc123"));
    }

    #[test]
    fn navigating_drops_forward_entries() {
        let mut navigator = Navigator::new("/photos");
        navigator.navigate("/photos/a");
        navigator.back();
        assert_eq!(navigator.forward(), Some(detail("a")));
        navigator.back();

        navigator.navigate("/photos/b");
        assert_eq!(navigator.forward(), None);
        assert_eq!(navigator.history().len(), 2);
    }

    #[test]
    fn unknown_paths_stay_in_history() {
        let mut navigator = Navigator::new("/photos");
        assert_eq!(navigator.navigate("/unknown/path"), Route::NotFound);
        assert_eq!(navigator.current_path(), "/unknown/path");
        assert_eq!(navigator.back(), Some(Route::Gallery));
    }

    #[test]
    fn detail_path() {
        assert_eq!(Route::detail_path("abc123"), "/photos/abc123");
    }
}
