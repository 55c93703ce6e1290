use serde::{Deserialize, Serialize};

use shopkeeper_core::{CategoryId, Entity};

/// Named grouping entity that products reference.
///
/// Names are unique; the uniqueness constraint lives in the store and
/// duplicate inserts surface as `StoreError::UniqueViolation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

/// A category that has not been persisted yet (no identity assigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
