//! Catalog write coordinator.
//!
//! Translates add/update requests into a consistent pair of persisted records
//! (category, product). Both stores are explicit constructor dependencies;
//! the service holds no other state and performs no retries beyond the
//! single uniqueness-race recovery in [`CatalogService::resolve_or_create_category`].

use shopkeeper_core::{CategoryId, DomainError, DomainResult, ProductId, StoreError};

use crate::category::{Category, NewCategory};
use crate::product::{NewProduct, Product};
use crate::request::{AddProductRequest, UpdateProductRequest};
use crate::store::{CategoryStore, ProductStore};

pub struct CatalogService<C, P> {
    categories: C,
    products: P,
}

impl<C, P> CatalogService<C, P>
where
    C: CategoryStore,
    P: ProductStore,
{
    pub fn new(categories: C, products: P) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// Look up a category by exact name, creating it when absent.
    ///
    /// Returns an existing category unchanged (same identity, no mutation).
    /// "Not found" on lookup is an expected branch. A concurrent creation of
    /// the same name loses the storage-level uniqueness race; the winner's
    /// row is authoritative and is returned from a second lookup.
    pub fn resolve_or_create_category(&self, name: &str) -> DomainResult<Category> {
        if let Some(existing) = self.categories.find_by_name(name)? {
            return Ok(existing);
        }

        match self.categories.insert(NewCategory::new(name)) {
            Ok(created) => Ok(created),
            Err(StoreError::UniqueViolation(detail)) => {
                match self.categories.find_by_name(name)? {
                    Some(existing) => Ok(existing),
                    // Duplicate reported but the winner vanished before the
                    // re-read; surface the store's own signal.
                    None => Err(StoreError::UniqueViolation(detail).into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create a product, resolving its embedded category name first.
    ///
    /// The returned product's category reference is always valid and already
    /// persisted at the time the product is persisted. No price/inventory
    /// bounds are checked.
    pub fn add_product(&self, request: AddProductRequest) -> DomainResult<Product> {
        let category = self.resolve_or_create_category(&request.category)?;
        let product = self.products.insert(NewProduct {
            name: request.name,
            brand: request.brand,
            price: request.price,
            inventory: request.inventory,
            description: request.description,
            category,
        })?;
        Ok(product)
    }

    /// Overwrite every field of an existing product (full replacement).
    ///
    /// An empty persist result is reported as `NotFound` — the update target
    /// vanished between fetch and persist.
    pub fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> DomainResult<Product> {
        let mut existing = self.products.find_by_id(id)?.ok_or(DomainError::NotFound)?;
        let category = self.resolve_or_create_category(&request.category)?;

        existing.name = request.name;
        existing.brand = request.brand;
        existing.price = request.price;
        existing.inventory = request.inventory;
        existing.description = request.description;
        existing.category = category;

        self.products
            .update(&existing)?
            .ok_or(DomainError::NotFound)
    }

    pub fn product(&self, id: ProductId) -> DomainResult<Product> {
        self.products.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        let existing = self.products.find_by_id(id)?.ok_or(DomainError::NotFound)?;
        self.products.delete(existing.id)?;
        Ok(())
    }

    pub fn products(&self) -> DomainResult<Vec<Product>> {
        Ok(self.products.list()?)
    }

    pub fn products_by_category(&self, category: &str) -> DomainResult<Vec<Product>> {
        Ok(self.products.find_by_category_name(category)?)
    }

    pub fn products_by_brand(&self, brand: &str) -> DomainResult<Vec<Product>> {
        Ok(self.products.find_by_brand(brand)?)
    }

    pub fn products_by_category_and_brand(
        &self,
        category: &str,
        brand: &str,
    ) -> DomainResult<Vec<Product>> {
        Ok(self.products.find_by_category_and_brand(category, brand)?)
    }

    pub fn products_by_name(&self, name: &str) -> DomainResult<Vec<Product>> {
        Ok(self.products.find_by_name(name)?)
    }

    pub fn products_by_brand_and_name(
        &self,
        brand: &str,
        name: &str,
    ) -> DomainResult<Vec<Product>> {
        Ok(self.products.find_by_brand_and_name(brand, name)?)
    }

    pub fn count_products_by_brand_and_name(&self, brand: &str, name: &str) -> DomainResult<u64> {
        Ok(self.products.count_by_brand_and_name(brand, name)?)
    }

    /// Create a category explicitly; duplicate names are an error here,
    /// unlike the resolve-or-create path.
    pub fn add_category(&self, category: NewCategory) -> DomainResult<Category> {
        if self.categories.exists_by_name(&category.name)? {
            return Err(DomainError::already_exists(category.name));
        }
        match self.categories.insert(category) {
            Ok(created) => Ok(created),
            Err(StoreError::UniqueViolation(name)) => Err(DomainError::already_exists(name)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn category(&self, id: CategoryId) -> DomainResult<Category> {
        self.categories
            .find_by_id(id)?
            .ok_or(DomainError::NotFound)
    }

    pub fn category_by_name(&self, name: &str) -> DomainResult<Category> {
        self.categories
            .find_by_name(name)?
            .ok_or(DomainError::NotFound)
    }

    pub fn categories(&self) -> DomainResult<Vec<Category>> {
        Ok(self.categories.list()?)
    }

    /// Rename an existing category. An empty persist result is reported as
    /// `NotFound`, a name collision as `AlreadyExists`.
    pub fn update_category(&self, id: CategoryId, name: String) -> DomainResult<Category> {
        let mut existing = self
            .categories
            .find_by_id(id)?
            .ok_or(DomainError::NotFound)?;
        existing.name = name;

        match self.categories.update(&existing) {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(DomainError::NotFound),
            Err(StoreError::UniqueViolation(name)) => Err(DomainError::already_exists(name)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete_category(&self, id: CategoryId) -> DomainResult<()> {
        let existing = self
            .categories
            .find_by_id(id)?
            .ok_or(DomainError::NotFound)?;
        self.categories.delete(existing.id)?;
        Ok(())
    }
}
