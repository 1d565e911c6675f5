//! Integration tests for `GET /api/product`.

use order_proxy_integration_tests::{MockUpstream, TestProxy};
use serde_json::json;

#[tokio::test]
async fn test_missing_id_never_reaches_upstream() {
    let upstream = MockUpstream::json(&json!({"id": 1, "name": "X"})).await;
    let proxy = TestProxy::start(&upstream).await;

    for uri in ["/api/product", "/api/product?id="] {
        let (status, body) = proxy.get_json(uri).await;
        assert_eq!(status, 400, "{uri}");
        assert_eq!(
            body,
            json!({"success": false, "message": "Product ID is required"})
        );
    }

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_id_is_forwarded() {
    let upstream = MockUpstream::json(&json!({"id": 4470988, "name": "Kexcelled"})).await;
    let proxy = TestProxy::start(&upstream).await;

    proxy.get("/api/product?id=4470988").await;

    let request = upstream.last_request().unwrap();
    assert_eq!(request.path, "/v4/Product/GetProductDetail");
    assert_eq!(
        request.query_pairs(),
        vec![("id".to_string(), "4470988".to_string())]
    );
}

#[tokio::test]
async fn test_wrapped_and_bare_envelopes_agree() {
    let wrapped = MockUpstream::json(&json!({
        "res": {"resCode": "200"},
        "product": {"id": 1, "name": "X"}
    }))
    .await;
    let bare = MockUpstream::json(&json!({"id": 1, "name": "X"})).await;

    let (wrapped_status, wrapped_body) = TestProxy::start(&wrapped)
        .await
        .get_json("/api/product?id=1")
        .await;
    let (bare_status, bare_body) = TestProxy::start(&bare)
        .await
        .get_json("/api/product?id=1")
        .await;

    assert_eq!(wrapped_status, 200);
    assert_eq!(bare_status, 200);
    assert_eq!(wrapped_body["product"], json!({"id": 1, "name": "X"}));
    assert_eq!(wrapped_body["product"], bare_body["product"]);
}

#[tokio::test]
async fn test_detail_is_passed_through_whole() {
    let product = json!({
        "id": 9,
        "name": "Y",
        "sku": "Y-9",
        "cost": 10,
        "variants": [{"id": 91}, {"id": 92}]
    });
    let upstream = MockUpstream::json(&json!({"res": {"resCode": "200"}, "product": product})).await;
    let proxy = TestProxy::start(&upstream).await;

    let (status, body) = proxy.get_json("/api/product?id=9").await;

    assert_eq!(status, 200);
    assert_eq!(body["product"], product);
}

#[tokio::test]
async fn test_unrecognized_body_is_not_found() {
    let upstream = MockUpstream::json(&json!({
        "res": {"resCode": "404", "resDesc": "Product not exist"}
    }))
    .await;
    let proxy = TestProxy::start(&upstream).await;

    let (status, body) = proxy.get_json("/api/product?id=404").await;

    assert_eq!(status, 404);
    assert_eq!(
        body,
        json!({"success": false, "message": "Product not exist"})
    );
}

#[tokio::test]
async fn test_upstream_not_found_is_mirrored() {
    let upstream = MockUpstream::start(404, "").await;
    let proxy = TestProxy::start(&upstream).await;

    let (status, body) = proxy.get_json("/api/product?id=1").await;

    assert_eq!(status, 404);
    assert_eq!(body["message"], "API Error: 404 - check API credentials");
}
