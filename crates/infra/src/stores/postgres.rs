//! Postgres-backed store implementations.
//!
//! The store traits are synchronous; each call bridges onto the current
//! tokio runtime (`block_in_place`, so callers must run on a multi-thread
//! runtime). Category name uniqueness and the category/product/image
//! references are enforced by the schema in `migrations/`; the mapping below
//! translates the driver's constraint codes into typed store failures.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use shopkeeper_catalog::{Category, CategoryStore, NewCategory, NewProduct, Product, ProductStore};
use shopkeeper_core::{CategoryId, ImageId, ProductId, StoreError};
use shopkeeper_media::{Image, ImageStore, NewImage};

/// Postgres unique_violation / foreign_key_violation SQLSTATE codes.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn db_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StoreError::unique_violation(db.message()),
            Some(FOREIGN_KEY_VIOLATION) => return StoreError::constraint(db.message()),
            _ => {}
        }
    }
    StoreError::unavailable(e.to_string())
}

/// Run a query future to completion from sync trait code.
fn wait<T>(
    fut: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, StoreError> {
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|_| StoreError::unavailable("no tokio runtime"))?;
    tokio::task::block_in_place(|| handle.block_on(fut)).map_err(db_err)
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::from_i64(row.try_get("id")?),
        name: row.try_get("name")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_i64(row.try_get("id")?),
        name: row.try_get("name")?,
        brand: row.try_get("brand")?,
        price: row.try_get("price")?,
        inventory: row.try_get("inventory")?,
        description: row.try_get("description")?,
        category: Category {
            id: CategoryId::from_i64(row.try_get("category_id")?),
            name: row.try_get("category_name")?,
        },
    })
}

fn image_from_row(row: &PgRow) -> Result<Image, sqlx::Error> {
    Ok(Image {
        id: ImageId::from_i64(row.try_get("id")?),
        file_name: row.try_get("file_name")?,
        file_type: row.try_get("file_type")?,
        data: row.try_get("data")?,
        download_url: row.try_get("download_url")?,
        product_id: ProductId::from_i64(row.try_get("product_id")?),
    })
}

const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.brand,
        p.price,
        p.inventory,
        p.description,
        c.id AS category_id,
        c.name AS category_name
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

#[derive(Clone)]
pub struct PostgresCategoryStore {
    pool: PgPool,
}

impl PostgresCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CategoryStore for PostgresCategoryStore {
    fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        wait(async {
            sqlx::query("SELECT id, name FROM categories WHERE id = $1")
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?
                .map(|row| category_from_row(&row))
                .transpose()
        })
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        wait(async {
            sqlx::query("SELECT id, name FROM categories WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?
                .map(|row| category_from_row(&row))
                .transpose()
        })
    }

    fn exists_by_name(&self, name: &str) -> Result<bool, StoreError> {
        wait(async {
            let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM categories WHERE name = $1) AS present")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
            row.try_get("present")
        })
    }

    fn insert(&self, category: NewCategory) -> Result<Category, StoreError> {
        tracing::debug!(name = %category.name, "inserting category");
        wait(async {
            let row = sqlx::query("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await?;
            category_from_row(&row)
        })
    }

    fn update(&self, category: &Category) -> Result<Option<Category>, StoreError> {
        wait(async {
            sqlx::query("UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name")
                .bind(category.id.as_i64())
                .bind(&category.name)
                .fetch_optional(&self.pool)
                .await?
                .map(|row| category_from_row(&row))
                .transpose()
        })
    }

    fn delete(&self, id: CategoryId) -> Result<(), StoreError> {
        tracing::debug!(%id, "deleting category");
        wait(async {
            sqlx::query("DELETE FROM categories WHERE id = $1")
                .bind(id.as_i64())
                .execute(&self.pool)
                .await
                .map(|_| ())
        })
    }

    fn list(&self) -> Result<Vec<Category>, StoreError> {
        wait(async {
            sqlx::query("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(category_from_row)
                .collect()
        })
    }
}

#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn fetch_where(
        &self,
        clause: &str,
        binds: &[&str],
    ) -> Result<Vec<Product>, StoreError> {
        let sql = format!("{PRODUCT_SELECT} WHERE {clause} ORDER BY p.id");
        wait(async {
            let mut query = sqlx::query(&sql);
            for bind in binds {
                query = query.bind(*bind);
            }
            query
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(product_from_row)
                .collect()
        })
    }
}

impl ProductStore for PostgresProductStore {
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
        wait(async {
            sqlx::query(&sql)
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?
                .map(|row| product_from_row(&row))
                .transpose()
        })
    }

    fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        tracing::debug!(name = %product.name, brand = %product.brand, "inserting product");
        let id = wait(async {
            let row = sqlx::query(
                r#"
                INSERT INTO products (name, brand, price, inventory, description, category_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(&product.name)
            .bind(&product.brand)
            .bind(product.price)
            .bind(product.inventory)
            .bind(&product.description)
            .bind(product.category.id.as_i64())
            .fetch_one(&self.pool)
            .await?;
            row.try_get::<i64, _>("id")
        })?;

        Ok(Product {
            id: ProductId::from_i64(id),
            name: product.name,
            brand: product.brand,
            price: product.price,
            inventory: product.inventory,
            description: product.description,
            category: product.category,
        })
    }

    fn update(&self, product: &Product) -> Result<Option<Product>, StoreError> {
        let updated = wait(async {
            sqlx::query(
                r#"
                UPDATE products
                SET name = $2, brand = $3, price = $4, inventory = $5,
                    description = $6, category_id = $7
                WHERE id = $1
                RETURNING id
                "#,
            )
            .bind(product.id.as_i64())
            .bind(&product.name)
            .bind(&product.brand)
            .bind(product.price)
            .bind(product.inventory)
            .bind(&product.description)
            .bind(product.category.id.as_i64())
            .fetch_optional(&self.pool)
            .await
        })?;

        Ok(updated.map(|_| product.clone()))
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        tracing::debug!(%id, "deleting product");
        wait(async {
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id.as_i64())
                .execute(&self.pool)
                .await
                .map(|_| ())
        })
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("{PRODUCT_SELECT} ORDER BY p.id");
        wait(async {
            sqlx::query(&sql)
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(product_from_row)
                .collect()
        })
    }

    fn find_by_category_name(&self, category: &str) -> Result<Vec<Product>, StoreError> {
        self.fetch_where("c.name = $1", &[category])
    }

    fn find_by_brand(&self, brand: &str) -> Result<Vec<Product>, StoreError> {
        self.fetch_where("p.brand = $1", &[brand])
    }

    fn find_by_category_and_brand(
        &self,
        category: &str,
        brand: &str,
    ) -> Result<Vec<Product>, StoreError> {
        self.fetch_where("c.name = $1 AND p.brand = $2", &[category, brand])
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        self.fetch_where("p.name = $1", &[name])
    }

    fn find_by_brand_and_name(
        &self,
        brand: &str,
        name: &str,
    ) -> Result<Vec<Product>, StoreError> {
        self.fetch_where("p.brand = $1 AND p.name = $2", &[brand, name])
    }

    fn count_by_brand_and_name(&self, brand: &str, name: &str) -> Result<u64, StoreError> {
        wait(async {
            let row = sqlx::query(
                "SELECT COUNT(*) AS total FROM products WHERE brand = $1 AND name = $2",
            )
            .bind(brand)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
            row.try_get::<i64, _>("total").map(|n| n as u64)
        })
    }
}

#[derive(Clone)]
pub struct PostgresImageStore {
    pool: PgPool,
}

impl PostgresImageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const IMAGE_SELECT: &str =
    "SELECT id, file_name, file_type, data, download_url, product_id FROM images";

impl ImageStore for PostgresImageStore {
    fn find_by_id(&self, id: ImageId) -> Result<Option<Image>, StoreError> {
        let sql = format!("{IMAGE_SELECT} WHERE id = $1");
        wait(async {
            sqlx::query(&sql)
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?
                .map(|row| image_from_row(&row))
                .transpose()
        })
    }

    fn insert(&self, image: NewImage) -> Result<Image, StoreError> {
        tracing::debug!(file_name = %image.file_name, product_id = %image.product_id, "inserting image");
        wait(async {
            let row = sqlx::query(
                r#"
                INSERT INTO images (file_name, file_type, data, download_url, product_id)
                VALUES ($1, $2, $3, '', $4)
                RETURNING id, file_name, file_type, data, download_url, product_id
                "#,
            )
            .bind(&image.file_name)
            .bind(&image.file_type)
            .bind(&image.data)
            .bind(image.product_id.as_i64())
            .fetch_one(&self.pool)
            .await?;
            image_from_row(&row)
        })
    }

    fn update(&self, image: &Image) -> Result<Option<Image>, StoreError> {
        wait(async {
            sqlx::query(
                r#"
                UPDATE images
                SET file_name = $2, file_type = $3, data = $4, download_url = $5
                WHERE id = $1
                RETURNING id, file_name, file_type, data, download_url, product_id
                "#,
            )
            .bind(image.id.as_i64())
            .bind(&image.file_name)
            .bind(&image.file_type)
            .bind(&image.data)
            .bind(&image.download_url)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| image_from_row(&row))
            .transpose()
        })
    }

    fn delete(&self, id: ImageId) -> Result<(), StoreError> {
        tracing::debug!(%id, "deleting image");
        wait(async {
            sqlx::query("DELETE FROM images WHERE id = $1")
                .bind(id.as_i64())
                .execute(&self.pool)
                .await
                .map(|_| ())
        })
    }

    fn find_by_product(&self, product_id: ProductId) -> Result<Vec<Image>, StoreError> {
        let sql = format!("{IMAGE_SELECT} WHERE product_id = $1 ORDER BY id");
        wait(async {
            sqlx::query(&sql)
                .bind(product_id.as_i64())
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(image_from_row)
                .collect()
        })
    }
}
