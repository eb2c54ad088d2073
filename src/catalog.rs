// catalog.rs - the ordered list of artworks shown on the ring
//
// Order matters: entry i sits at angle 2*pi*i/N and the arrow keys / auto-rotate
// walk the entries in this order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub image: String,
    pub title: String,
    pub artist: String,
}

impl CatalogEntry {
    pub fn new(image: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no entries")]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

const BUILTIN: [(&str, &str, &str); 6] = [
    ("AIDA_MULUNEH_I-IN-THE-OTHER_2017.jpg", "I IN THE OTHER", "Aida Muluneh"),
    ("AIDA_MULUNEH_BOTH-SIDES_2017.jpg", "BOTH SIDES", "Aida Muluneh"),
    (
        "THE-DEW-AT-DAWN_19_AIDA_MULUNEH_FN_60X80-scaled.jpg",
        "THE DEW AT DAWN",
        "Aida Muluneh",
    ),
    (
        "AIDA-MULUNEH_The-barriers-within_2021-scaled.jpg",
        "The-barriers",
        "Aida Muluneh",
    ),
    (
        "AIDA_MULUNEH_EVERYBODY-KNOWS-ABOUT-MISSISSIPPI_2017.jpg",
        "EVERYBODY KNOWS ABOUT MISSISSIPPI",
        "Aida Muluneh",
    ),
    ("This-is-Where-I-am-Cover.jpg", "This is Where I am Cover", "Aida Muluneh"),
];

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The six works the gallery ships with.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|(image, title, artist)| CatalogEntry::new(*image, *title, *artist))
                .collect(),
        )
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(text)?;
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Explicit path, then `assets/catalog.json`, then the built-in list.
    pub fn load_or_builtin(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => crate::config::find_asset(Path::new("catalog.json")),
        };

        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::load(&path) {
            Ok(catalog) => {
                log::info!(
                    "{}",
                    crate::i18n::tr_with(
                        "log.catalog_loaded",
                        &[
                            ("path", path.display().to_string()),
                            ("count", catalog.len().to_string())
                        ]
                    )
                );
                catalog
            }
            Err(e) => {
                log::warn!(
                    "{}",
                    crate::i18n::tr_with("error.catalog", &[("err", e.to_string())])
                );
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_six_ordered_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get(0).unwrap().title, "I IN THE OTHER");
        assert_eq!(catalog.get(5).unwrap().title, "This is Where I am Cover");
        assert!(catalog.entries().iter().all(|e| e.artist == "Aida Muluneh"));
    }

    #[test]
    fn parses_json_array() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"image": "a.jpg", "title": "A", "artist": "X"},
                {"image": "b.jpg", "title": "B", "artist": "Y"}
            ]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1), Some(&CatalogEntry::new("b.jpg", "B", "Y")));
    }

    #[test]
    fn empty_json_array_is_rejected() {
        assert!(matches!(Catalog::from_json_str("[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn missing_field_is_a_json_error() {
        let result = Catalog::from_json_str(r#"[{"image": "a.jpg", "title": "A"}]"#);
        assert!(matches!(result, Err(CatalogError::Json(_))));
    }

    #[test]
    fn unreadable_path_falls_back_to_builtin() {
        let catalog = Catalog::load_or_builtin(Some(Path::new("/no/such/catalog.json")));
        assert_eq!(catalog, Catalog::builtin());
    }

    #[test]
    fn empty_catalog_is_constructible() {
        let catalog = Catalog::new(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.get(0).is_none());
    }
}
