#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Create,
    PosterDisplay,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Create => "/",
            Route::PosterDisplay => "/poster-display",
        }
    }

    /// Unknown paths land on the form.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/poster-display" => Route::PosterDisplay,
            _ => Route::Create,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::from_path("/"), Route::Create);
        assert_eq!(Route::from_path("/poster-display"), Route::PosterDisplay);
        assert_eq!(Route::from_path("/poster-display/"), Route::PosterDisplay);
        assert_eq!(Route::from_path("/poster-display?x=1"), Route::PosterDisplay);
    }

    #[test]
    fn unknown_paths_fall_back_to_form() {
        assert_eq!(Route::from_path("/admin"), Route::Create);
        assert_eq!(Route::from_path(""), Route::Create);
    }
}
