//! In-memory store implementations.
//!
//! Intended for tests/dev. Not optimized for performance. All three store
//! handles share one [`InMemoryDb`] behind a single lock, the dev/test
//! analog of a connection pool, so referential checks see one consistent
//! state.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use shopkeeper_catalog::{Category, CategoryStore, NewCategory, NewProduct, Product, ProductStore};
use shopkeeper_core::{CategoryId, ImageId, ProductId, StoreError};
use shopkeeper_media::{Image, ImageStore, NewImage};

#[derive(Debug, Clone)]
struct ProductRow {
    id: i64,
    name: String,
    brand: String,
    price: rust_decimal::Decimal,
    inventory: i32,
    description: String,
    category_id: i64,
}

#[derive(Debug, Default)]
struct State {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, ProductRow>,
    images: BTreeMap<i64, Image>,
    category_seq: i64,
    product_seq: i64,
    image_seq: i64,
}

impl State {
    /// Materialize a product row by joining its category, the way a SQL
    /// backend would.
    fn product(&self, row: &ProductRow) -> Result<Product, StoreError> {
        let category = self
            .categories
            .get(&row.category_id)
            .cloned()
            .ok_or_else(|| StoreError::constraint("product references a missing category"))?;

        Ok(Product {
            id: ProductId::from_i64(row.id),
            name: row.name.clone(),
            brand: row.brand.clone(),
            price: row.price,
            inventory: row.inventory,
            description: row.description.clone(),
            category,
        })
    }

    fn products_where(
        &self,
        predicate: impl Fn(&ProductRow, &Category) -> bool,
    ) -> Result<Vec<Product>, StoreError> {
        let mut out = Vec::new();
        for row in self.products.values() {
            let product = self.product(row)?;
            if predicate(row, &product.category) {
                out.push(product);
            }
        }
        Ok(out)
    }
}

/// Shared in-memory database backing the store handles.
#[derive(Debug, Default)]
pub struct InMemoryDb {
    state: RwLock<State>,
}

impl InMemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn read(db: &InMemoryDb) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
    db.state
        .read()
        .map_err(|_| StoreError::unavailable("lock poisoned"))
}

fn write(db: &InMemoryDb) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
    db.state
        .write()
        .map_err(|_| StoreError::unavailable("lock poisoned"))
}

#[derive(Clone)]
pub struct InMemoryCategoryStore {
    db: Arc<InMemoryDb>,
}

impl InMemoryCategoryStore {
    pub fn new(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }
}

impl CategoryStore for InMemoryCategoryStore {
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(read(&self.db)?.categories.get(&id.as_i64()).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        Ok(read(&self.db)?
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        Ok(read(&self.db)?.categories.values().any(|c| c.name == name))
    }

    fn insert(&self, category: NewCategory) -> Result<Category, StoreError> {
        let mut state = write(&self.db)?;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(StoreError::unique_violation(category.name));
        }

        state.category_seq += 1;
        let created = Category {
            id: CategoryId::from_i64(state.category_seq),
            name: category.name,
        };
        state.categories.insert(created.id.as_i64(), created.clone());
        Ok(created)
    }

    fn update(&self, category: &Category) -> Result<Option<Category>, StoreError> {
        let mut state = write(&self.db)?;
        if state
            .categories
            .values()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(StoreError::unique_violation(category.name.clone()));
        }
        if !state.categories.contains_key(&category.id.as_i64()) {
            return Ok(None);
        }

        state
            .categories
            .insert(category.id.as_i64(), category.clone());
        Ok(Some(category.clone()))
    }

    fn delete(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut state = write(&self.db)?;
        if state
            .products
            .values()
            .any(|p| p.category_id == id.as_i64())
        {
            return Err(StoreError::constraint("category is referenced by products"));
        }
        state.categories.remove(&id.as_i64());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Category>, StoreError> {
        Ok(read(&self.db)?.categories.values().cloned().collect())
    }
}

#[derive(Clone)]
pub struct InMemoryProductStore {
    db: Arc<InMemoryDb>,
}

impl InMemoryProductStore {
    pub fn new(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }
}

impl ProductStore for InMemoryProductStore {
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = read(&self.db)?;
        match state.products.get(&id.as_i64()) {
            Some(row) => Ok(Some(state.product(row)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut state = write(&self.db)?;
        if !state
            .categories
            .contains_key(&product.category.id.as_i64())
        {
            return Err(StoreError::constraint("unknown category reference"));
        }

        state.product_seq += 1;
        let row = ProductRow {
            id: state.product_seq,
            name: product.name,
            brand: product.brand,
            price: product.price,
            inventory: product.inventory,
            description: product.description,
            category_id: product.category.id.as_i64(),
        };
        let stored = state.product(&row)?;
        state.products.insert(row.id, row);
        Ok(stored)
    }

    fn update(&self, product: &Product) -> Result<Option<Product>, StoreError> {
        let mut state = write(&self.db)?;
        if !state.products.contains_key(&product.id.as_i64()) {
            return Ok(None);
        }
        if !state
            .categories
            .contains_key(&product.category.id.as_i64())
        {
            return Err(StoreError::constraint("unknown category reference"));
        }

        let row = ProductRow {
            id: product.id.as_i64(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            inventory: product.inventory,
            description: product.description.clone(),
            category_id: product.category.id.as_i64(),
        };
        let stored = state.product(&row)?;
        state.products.insert(row.id, row);
        Ok(Some(stored))
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut state = write(&self.db)?;
        if state.images.values().any(|i| i.product_id == id) {
            return Err(StoreError::constraint("product is referenced by images"));
        }
        state.products.remove(&id.as_i64());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let state = read(&self.db)?;
        state.products_where(|_, _| true)
    }

    fn find_by_category_name(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        let state = read(&self.db)?;
        state.products_where(|_, c| c.name == category)
    }

    fn find_by_brand(&self, brand: &str) -> Result<Vec<Product>, StoreError> {
        let state = read(&self.db)?;
        state.products_where(|row, _| row.brand == brand)
    }

    fn find_by_category_and_brand(
        &self,
        category: &str,
        brand: &str,
    ) -> Result<Vec<Product>, StoreError> {
        let state = read(&self.db)?;
        state.products_where(|row, c| c.name == category && row.brand == brand)
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        let state = read(&self.db)?;
        state.products_where(|row, _| row.name == name)
    }

    fn find_by_brand_and_name(
        &self,
        brand: &str,
        name: &str,
    ) -> Result<Vec<Product>, StoreError> {
        let state = read(&self.db)?;
        state.products_where(|row, _| row.brand == brand && row.name == name)
    }

    fn count_by_brand_and_name(&self, brand: &str, name: &str) -> Result<u64, StoreError> {
        let state = read(&self.db)?;
        Ok(state
            .products
            .values()
            .filter(|row| row.brand == brand && row.name == name)
            .count() as u64)
    }
}

#[derive(Clone)]
pub struct InMemoryImageStore {
    db: Arc<InMemoryDb>,
}

impl InMemoryImageStore {
    pub fn new(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }
}

impl ImageStore for InMemoryImageStore {
    fn find_by_id(&self, id: ImageId) -> Result<Option<Image>, StoreError> {
        Ok(read(&self.db)?.images.get(&id.as_i64()).cloned())
    }

    fn insert(&self, image: NewImage) -> Result<Image, StoreError> {
        let mut state = write(&self.db)?;
        if !state
            .products
            .contains_key(&image.product_id.as_i64())
        {
            return Err(StoreError::constraint("unknown product reference"));
        }

        state.image_seq += 1;
        let created = Image {
            id: ImageId::from_i64(state.image_seq),
            file_name: image.file_name,
            file_type: image.file_type,
            data: image.data,
            download_url: String::new(),
            product_id: image.product_id,
        };
        state.images.insert(created.id.as_i64(), created.clone());
        Ok(created)
    }

    fn update(&self, image: &Image) -> Result<Option<Image>, StoreError> {
        let mut state = write(&self.db)?;
        if !state.images.contains_key(&image.id.as_i64()) {
            return Ok(None);
        }

        state.images.insert(image.id.as_i64(), image.clone());
        Ok(Some(image.clone()))
    }

    fn delete(&self, id: ImageId) -> Result<(), StoreError> {
        write(&self.db)?.images.remove(&id.as_i64());
        Ok(())
    }

    fn find_by_product(&self, product_id: ProductId) -> Result<Vec<Image>, StoreError> {
        Ok(read(&self.db)?
            .images
            .values()
            .filter(|i| i.product_id == product_id)
            .cloned()
            .collect())
    }
}
