//! Genre classification of a series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Genre of a series.
///
/// Each variant carries two labels: the one used by the metadata source
/// (OMDb, English) and the one shown to users (Portuguese). The canonical
/// name (`ACTION`, `SCIENCE_FICTION`, ...) is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Action,
    Romance,
    Comedy,
    Drama,
    Crime,
    Thriller,
    Horror,
    ScienceFiction,
    Fantasy,
    Adventure,
    Animation,
    Documentary,
}

/// Raised when no category matches a label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("Unrecognized category: {0}")]
    NotFound(String),
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 12] = [
        Category::Action,
        Category::Romance,
        Category::Comedy,
        Category::Drama,
        Category::Crime,
        Category::Thriller,
        Category::Horror,
        Category::ScienceFiction,
        Category::Fantasy,
        Category::Adventure,
        Category::Animation,
        Category::Documentary,
    ];

    /// Label used by the metadata source.
    pub fn source_label(self) -> &'static str {
        match self {
            Category::Action => "Action",
            Category::Romance => "Romance",
            Category::Comedy => "Comedy",
            Category::Drama => "Drama",
            Category::Crime => "Crime",
            Category::Thriller => "Thriller",
            Category::Horror => "Horror",
            Category::ScienceFiction => "Sci-Fi",
            Category::Fantasy => "Fantasy",
            Category::Adventure => "Adventure",
            Category::Animation => "Animation",
            Category::Documentary => "Documentary",
        }
    }

    /// Label shown to users.
    pub fn display_label(self) -> &'static str {
        match self {
            Category::Action => "Ação",
            Category::Romance => "Romance",
            Category::Comedy => "Comédia",
            Category::Drama => "Drama",
            Category::Crime => "Crime",
            Category::Thriller => "Suspense",
            Category::Horror => "Terror",
            Category::ScienceFiction => "Ficção Científica",
            Category::Fantasy => "Fantasia",
            Category::Adventure => "Aventura",
            Category::Animation => "Animação",
            Category::Documentary => "Documentário",
        }
    }

    /// Canonical name, as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Action => "ACTION",
            Category::Romance => "ROMANCE",
            Category::Comedy => "COMEDY",
            Category::Drama => "DRAMA",
            Category::Crime => "CRIME",
            Category::Thriller => "THRILLER",
            Category::Horror => "HORROR",
            Category::ScienceFiction => "SCIENCE_FICTION",
            Category::Fantasy => "FANTASY",
            Category::Adventure => "ADVENTURE",
            Category::Animation => "ANIMATION",
            Category::Documentary => "DOCUMENTARY",
        }
    }

    /// Look up by the metadata source label (case-insensitive).
    pub fn from_source_label(text: &str) -> Result<Self, CategoryError> {
        Self::find(text, |c| c.source_label())
    }

    /// Look up by the display label (case-insensitive).
    pub fn from_display_label(text: &str) -> Result<Self, CategoryError> {
        Self::find(text, |c| c.display_label())
    }

    /// Look up by either label (case-insensitive).
    pub fn from_label(text: &str) -> Result<Self, CategoryError> {
        Self::from_source_label(text).or_else(|_| Self::from_display_label(text))
    }

    fn find(text: &str, label: impl Fn(Category) -> &'static str) -> Result<Self, CategoryError> {
        let wanted = text.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| label(*c).to_lowercase() == wanted)
            .ok_or_else(|| CategoryError::NotFound(text.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

/// Parses the canonical name.
impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError::NotFound(s.to_string()))
    }
}
