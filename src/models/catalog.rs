use serde::{Deserialize, Serialize};

/// One row of a simple lookup catalog: body parts, categories, equipment.
/// All three share the same wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
}

/// Which lookup catalog a Library screen operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    BodyParts,
    Categories,
    Equipment,
}

impl CatalogKind {
    /// API path segment for this catalog.
    pub fn path(&self) -> &'static str {
        match self {
            CatalogKind::BodyParts => "body-parts",
            CatalogKind::Categories => "categories",
            CatalogKind::Equipment => "equipment",
        }
    }

    /// Display title for this catalog.
    pub fn title(&self) -> &'static str {
        match self {
            CatalogKind::BodyParts => "Body Parts",
            CatalogKind::Categories => "Categories",
            CatalogKind::Equipment => "Equipment",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            CatalogKind::BodyParts => CatalogKind::Categories,
            CatalogKind::Categories => CatalogKind::Equipment,
            CatalogKind::Equipment => CatalogKind::BodyParts,
        }
    }
}
