//! Categories and genres: classification tags sharing one name/slug field group.

/// Which classification table a [`Taxon`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Genre,
}

impl Taxonomy {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Taxonomy::Category => "categories",
            Taxonomy::Genre => "genres",
        }
    }

    /// Human-readable singular label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Taxonomy::Category => "Category",
            Taxonomy::Genre => "Genre",
        }
    }
}

/// A category or genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Input data for creating a category or genre.
#[derive(Debug, Clone)]
pub struct NewTaxon {
    pub name: String,
    pub slug: String,
}
