use axum::Json;
use serde_json::{json, Value};

pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello World!" }))
}

#[cfg(test)]
mod tests {
    use crate::server::greeter_router;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(method: Method, uri: &str) -> (StatusCode, Option<String>, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-anything", "ignored")
            .body(Body::empty())
            .unwrap();

        let response = greeter_router().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root_returns_fixed_message() {
        let (status, content_type, body) = call(Method::GET, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, json!({"message": "Hello World!"}));
    }

    #[tokio::test]
    async fn test_method_and_query_do_not_matter() {
        for (method, uri) in [
            (Method::POST, "/"),
            (Method::PUT, "/"),
            (Method::GET, "/?name=someone&x=1"),
        ] {
            let (status, _, body) = call(method, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"message": "Hello World!"}));
        }
    }
}
