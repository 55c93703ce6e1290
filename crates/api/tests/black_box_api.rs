use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = shopkeeper_api::app::build_app().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn widget_body(category: &str) -> serde_json::Value {
    json!({
        "name": "Widget",
        "brand": "Acme",
        "price": "2.30",
        "inventory": 1,
        "description": "desc",
        "category": category,
    })
}

#[tokio::test]
async fn health_is_available() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle_create_read_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create: the embedded category is created alongside the product.
    let res = client
        .post(format!("{}/api/v1/products", srv.base_url))
        .json(&widget_body("Gadgets"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], "2.30");
    assert_eq!(created["category"]["name"], "Gadgets");
    let id = created["id"].as_i64().unwrap();

    let res = client
        .get(format!("{}/api/v1/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    // Full replacement update with a brand-new category.
    let res = client
        .put(format!("{}/api/v1/products/{}", srv.base_url, id))
        .json(&json!({
            "name": "Widget Pro",
            "brand": "Acme",
            "price": "9.99",
            "inventory": 5,
            "description": "improved",
            "category": "NewCat",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["id"].as_i64().unwrap(), id);
    assert_eq!(updated["name"], "Widget Pro");
    assert_eq!(updated["price"], "9.99");
    assert_eq!(updated["inventory"], 5);
    assert_eq!(updated["category"]["name"], "NewCat");

    // Both categories exist now.
    let res = client
        .get(format!("{}/api/v1/categories", srv.base_url))
        .send()
        .await
        .unwrap();
    let categories: serde_json::Value = res.json().await.unwrap();
    assert_eq!(categories["items"].as_array().unwrap().len(), 2);

    let res = client
        .delete(format!("{}/api/v1/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/v1/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_reuses_an_existing_category() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/categories", srv.base_url))
        .json(&json!({ "name": "Gadgets" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let category: serde_json::Value = res.json().await.unwrap();

    let res = client
        .post(format!("{}/api/v1/products", srv.base_url))
        .json(&widget_body("Gadgets"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: serde_json::Value = res.json().await.unwrap();
    assert_eq!(product["category"]["id"], category["id"]);

    let res = client
        .get(format!("{}/api/v1/categories", srv.base_url))
        .send()
        .await
        .unwrap();
    let categories: serde_json::Value = res.json().await.unwrap();
    assert_eq!(categories["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_category_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/categories", srv.base_url))
        .json(&json!({ "name": "Gadgets" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/api/v1/categories", srv.base_url))
        .json(&json!({ "name": "Gadgets" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_exists");
}

#[tokio::test]
async fn category_lookup_by_name() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/categories?name=Gadgets", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    client
        .post(format!("{}/api/v1/categories", srv.base_url))
        .json(&json!({ "name": "Gadgets" }))
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{}/api/v1/categories?name=Gadgets", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Gadgets");
}

#[tokio::test]
async fn missing_targets_and_malformed_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/api/v1/products/1", srv.base_url))
        .json(&widget_body("NewCat"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The failed update must not have created its category as a side effect.
    let res = client
        .get(format!("{}/api/v1/categories", srv.base_url))
        .send()
        .await
        .unwrap();
    let categories: serde_json::Value = res.json().await.unwrap();
    assert!(categories["items"].as_array().unwrap().is_empty());

    let res = client
        .get(format!("{}/api/v1/products/not-a-number", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = client
        .delete(format!("{}/api/v1/categories/42", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn filtered_product_queries_and_count() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [
        widget_body("Gadgets"),
        widget_body("Gadgets"),
        json!({
            "name": "Hammer",
            "brand": "Forge",
            "price": "15.00",
            "inventory": 3,
            "description": "steel",
            "category": "Tools",
        }),
    ] {
        let res = client
            .post(format!("{}/api/v1/products", srv.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let list = |url: String| {
        let client = client.clone();
        async move {
            let res = client.get(url).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            let body: serde_json::Value = res.json().await.unwrap();
            body["items"].as_array().unwrap().len()
        }
    };

    assert_eq!(list(format!("{}/api/v1/products", srv.base_url)).await, 3);
    assert_eq!(
        list(format!("{}/api/v1/products?category=Gadgets", srv.base_url)).await,
        2
    );
    assert_eq!(
        list(format!("{}/api/v1/products?brand=Forge", srv.base_url)).await,
        1
    );
    assert_eq!(
        list(format!(
            "{}/api/v1/products?category=Gadgets&brand=Acme",
            srv.base_url
        ))
        .await,
        2
    );
    assert_eq!(
        list(format!("{}/api/v1/products?name=Hammer", srv.base_url)).await,
        1
    );
    assert_eq!(
        list(format!(
            "{}/api/v1/products?brand=Acme&name=Widget",
            srv.base_url
        ))
        .await,
        2
    );

    let res = client
        .get(format!(
            "{}/api/v1/products/count?brand=Acme&name=Widget",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);

    let res = client
        .get(format!(
            "{}/api/v1/products?category=Gadgets&name=Widget",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

fn png_part() -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(b"AXAXAXAX".to_vec())
        .file_name("foo.png")
        .mime_str("image/png")
        .unwrap()
}

#[tokio::test]
async fn image_upload_download_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Upload against a missing product is rejected up front.
    let form = reqwest::multipart::Form::new()
        .text("product_id", "1")
        .part("file", png_part());
    let res = client
        .post(format!("{}/api/v1/images/upload", srv.base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!("{}/api/v1/products", srv.base_url))
        .json(&widget_body("Gadgets"))
        .send()
        .await
        .unwrap();
    let product: serde_json::Value = res.json().await.unwrap();
    let product_id = product["id"].as_i64().unwrap();

    let form = reqwest::multipart::Form::new()
        .text("product_id", product_id.to_string())
        .part("file", png_part());
    let res = client
        .post(format!("{}/api/v1/images/upload", srv.base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    let image_id = items[0]["image_id"].as_i64().unwrap();
    let download_url = items[0]["download_url"].as_str().unwrap().to_string();
    assert_eq!(download_url, format!("/api/v1/images/download/{image_id}"));
    assert_eq!(items[0]["image_name"], "foo.png");

    // Metadata route carries everything but the bytes.
    let res = client
        .get(format!("{}/api/v1/images/{}", srv.base_url, image_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let meta: serde_json::Value = res.json().await.unwrap();
    assert_eq!(meta["file_type"], "image/png");
    assert_eq!(meta["size_bytes"], 8);
    assert_eq!(meta["product_id"].as_i64().unwrap(), product_id);

    let res = client
        .get(format!("{}{}", srv.base_url, download_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE],
        "image/png"
    );
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"AXAXAXAX");

    // Replace content in place; id and URL survive.
    let form = reqwest::multipart::Form::new().part(
        "file",
        reqwest::multipart::Part::bytes(vec![9, 9, 9])
            .file_name("foo-v2.jpg")
            .mime_str("image/jpeg")
            .unwrap(),
    );
    let res = client
        .put(format!("{}/api/v1/images/{}", srv.base_url, image_id))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let replaced: serde_json::Value = res.json().await.unwrap();
    assert_eq!(replaced["id"].as_i64().unwrap(), image_id);
    assert_eq!(replaced["file_name"], "foo-v2.jpg");
    assert_eq!(replaced["download_url"], download_url);

    let res = client
        .delete(format!("{}/api/v1/images/{}", srv.base_url, image_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}{}", srv.base_url, download_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
