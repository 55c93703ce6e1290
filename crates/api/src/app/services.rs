//! Service construction and store selection.
//!
//! `USE_PERSISTENT_STORES=true` wires the services to Postgres (running the
//! schema migrations on startup); anything else wires the in-memory stores
//! used for dev and tests. Both service objects share one product store so
//! image attachment sees the same products the catalog writes.

use std::sync::Arc;

use sqlx::PgPool;

use shopkeeper_catalog::{CatalogService, CategoryStore, ProductStore};
use shopkeeper_infra::{
    InMemoryCategoryStore, InMemoryDb, InMemoryImageStore, InMemoryProductStore,
    PostgresCategoryStore, PostgresImageStore, PostgresProductStore,
};
use shopkeeper_media::{ImageService, ImageStore};

pub type Catalog = CatalogService<Arc<dyn CategoryStore>, Arc<dyn ProductStore>>;
pub type Images = ImageService<Arc<dyn ImageStore>, Arc<dyn ProductStore>>;

pub struct AppServices {
    pub catalog: Catalog,
    pub images: Images,
}

pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        build_persistent_services().await
    } else {
        build_in_memory_services()
    }
}

fn build_in_memory_services() -> AppServices {
    let db = InMemoryDb::new();
    let categories: Arc<dyn CategoryStore> = Arc::new(InMemoryCategoryStore::new(db.clone()));
    let products: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new(db.clone()));
    let images: Arc<dyn ImageStore> = Arc::new(InMemoryImageStore::new(db));

    AppServices {
        catalog: CatalogService::new(categories, products.clone()),
        images: ImageService::new(images, products),
    }
}

async fn build_persistent_services() -> AppServices {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    sqlx::migrate!("../infra/migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    let categories: Arc<dyn CategoryStore> = Arc::new(PostgresCategoryStore::new(pool.clone()));
    let products: Arc<dyn ProductStore> = Arc::new(PostgresProductStore::new(pool.clone()));
    let images: Arc<dyn ImageStore> = Arc::new(PostgresImageStore::new(pool));

    AppServices {
        catalog: CatalogService::new(categories, products.clone()),
        images: ImageService::new(images, products),
    }
}
