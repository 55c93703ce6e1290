//! Storage collaborator traits for the catalog write path.
//!
//! Stores are synchronous and return either a value/absence or a
//! [`StoreError`]. They are passed into the coordinator explicitly at
//! construction; nothing in this crate reaches for ambient state.

use std::sync::Arc;

use shopkeeper_core::{CategoryId, ProductId, StoreError};

use crate::category::{Category, NewCategory};
use crate::product::{NewProduct, Product};

/// Category persistence operations.
///
/// `insert` enforces name uniqueness and reports a duplicate as
/// [`StoreError::UniqueViolation`] — the coordinator treats that signal as
/// authoritative and retries as a lookup.
pub trait CategoryStore: Send + Sync {
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;
    fn find_by_name(&self, name: &str) -> Result<Option<Category>, StoreError>;
    fn exists_by_name(&self, name: &str) -> Result<bool, StoreError>;
    /// Persist a new category, assigning its identity.
    fn insert(&self, category: NewCategory) -> Result<Category, StoreError>;
    /// Persist changed fields of an existing category. `None` means the row
    /// no longer exists.
    fn update(&self, category: &Category) -> Result<Option<Category>, StoreError>;
    fn delete(&self, id: CategoryId) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<Category>, StoreError>;
}

/// Product persistence operations, including the filtered lookups the query
/// surface is built from.
pub trait ProductStore: Send + Sync {
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    /// Persist a new product, assigning its identity.
    fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;
    /// Persist changed fields of an existing product. `None` means the row
    /// no longer exists.
    fn update(&self, product: &Product) -> Result<Option<Product>, StoreError>;
    fn delete(&self, id: ProductId) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<Product>, StoreError>;
    fn find_by_category_name(&self, category: &str) -> Result<Vec<Product>, StoreError>;
    fn find_by_brand(&self, brand: &str) -> Result<Vec<Product>, StoreError>;
    fn find_by_category_and_brand(
        &self,
        category: &str,
        brand: &str,
    ) -> Result<Vec<Product>, StoreError>;
    fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError>;
    fn find_by_brand_and_name(&self, brand: &str, name: &str)
        -> Result<Vec<Product>, StoreError>;
    fn count_by_brand_and_name(&self, brand: &str, name: &str) -> Result<u64, StoreError>;
}

impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        (**self).find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        (**self).find_by_name(name)
    }

    fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        (**self).exists_by_name(name)
    }

    fn insert(&self, category: NewCategory) -> Result<Category, StoreError> {
        (**self).insert(category)
    }

    fn update(&self, category: &Category) -> Result<Option<Category>, StoreError> {
        (**self).update(category)
    }

    fn delete(&self, id: CategoryId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn list(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list()
    }
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id)
    }

    fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product)
    }

    fn update(&self, product: &Product) -> Result<Option<Product>, StoreError> {
        (**self).update(product)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn find_by_category_name(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_category_name(category)
    }

    fn find_by_brand(&self, brand: &str) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_brand(brand)
    }

    fn find_by_category_and_brand(
        &self,
        category: &str,
        brand: &str,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_category_and_brand(category, brand)
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_name(name)
    }

    fn find_by_brand_and_name(
        &self,
        brand: &str,
        name: &str,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_brand_and_name(brand, name)
    }

    fn count_by_brand_and_name(&self, brand: &str, name: &str) -> Result<u64, StoreError> {
        (**self).count_by_brand_and_name(brand, name)
    }
}
