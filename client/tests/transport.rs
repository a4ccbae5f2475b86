//! Integration tests.

use nnews_client::{ImageUpload, NewsConfig, NewsContext, NewsError};
use nnews_shared::{ArticleQuery, TagInput};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn context_for(server: &MockServer) -> NewsContext {
    NewsContext::new(NewsConfig::new(server.uri()).with_bearer_token("secret"))
        .expect("context builds")
}

#[tokio::test]
async fn sends_configured_headers_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tag"))
        .and(header("Authorization", "Bearer secret"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"title": "Tech", "slug": "tech"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tagId": 5, "title": "Tech", "slug": "tech"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tag = context_for(&server)
        .tag_api()
        .create_tag(&TagInput::new("Tech").with_slug("tech"))
        .await
        .expect("create tag");

    assert_eq!(tag.tag_id, Some(5));
}

#[tokio::test]
async fn list_query_string_and_custom_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/article"))
        .and(query_param("page", "3"))
        .and(query_param("pageSize", "20"))
        .and(query_param("categoryId", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "page": 3,
            "pageSize": 20,
            "totalCount": 41,
            "totalPages": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = NewsConfig {
        base_path: "/v2/".to_string(),
        ..NewsConfig::new(server.uri())
    };
    let store = NewsContext::new(config).expect("context").article_store();
    let page = store
        .fetch(ArticleQuery::page(3, 20).with_category(8))
        .await
        .expect("fetch articles");

    assert!(page.is_empty());
    assert!(page.has_previous());
    assert!(!page.has_next());
}

#[tokio::test]
async fn image_upload_is_multipart_without_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Image/uploadImage"))
        .respond_with(ResponseTemplate::new(200).set_body_string("uploads/cover.png"))
        .expect(1)
        .mount(&server)
        .await;

    let reference = context_for(&server)
        .article_api()
        .upload_image(ImageUpload::new("cover.png", "image/png", b"\x89PNG".to_vec()))
        .await
        .expect("upload");
    assert_eq!(reference, "uploads/cover.png");

    let requests = server.received_requests().await.expect("recording enabled");
    let upload = &requests[0];
    let content_type = upload
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"cover.png\""));
    assert!(body.contains("image/png"));
}

#[tokio::test]
async fn non_success_statuses_become_status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tag/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Tag not found"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/category/1"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Category has articles"})),
        )
        .mount(&server)
        .await;

    let context = context_for(&server);
    let missing = context.tag_api().get_tag(99).await.expect_err("missing tag");
    assert_eq!(
        missing,
        NewsError::Status {
            status: 404,
            message: "Tag not found".to_string(),
        }
    );

    let conflict = context
        .category_store()
        .delete(1)
        .await
        .expect_err("conflict");
    assert_eq!(conflict.message(), "Category has articles");
}

#[tokio::test]
async fn malformed_payloads_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/article/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articleId": 4,
            "title": "Bad date",
            "status": 0,
            "dateAt": "next tuesday"
        })))
        .mount(&server)
        .await;

    let err = context_for(&server)
        .article_api()
        .get_article(4)
        .await
        .expect_err("bad date");
    assert!(matches!(err, NewsError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let context = NewsContext::new(NewsConfig::new("http://127.0.0.1:9")).expect("context");
    let err = context.tag_api().list_tags().await.expect_err("nothing listens");
    assert!(matches!(err, NewsError::Network(_)));
}

#[test]
fn invalid_api_url_is_rejected() {
    let result = NewsContext::new(NewsConfig::new("not a url"));
    assert!(matches!(result, Err(NewsError::Validation(_))));
}
