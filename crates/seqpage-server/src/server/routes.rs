use crate::server::handler::{create_page, health};
use crate::server::state::AppState;
use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/create-page", get(create_page))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::DatabaseRegistry;
    use crate::server::state::Backend;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use seqpage::{MAX_PAGES_PER_REQUEST, MemoryStore, PageCreator};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn registry() -> DatabaseRegistry {
        DatabaseRegistry::new("ileen")
            .with_database("ileen", "db-ileen")
            .with_database("lucy", "db-lucy")
    }

    fn app(store: &Arc<MemoryStore>) -> Router {
        let creator = PageCreator::new(store.clone());
        router(AppState::new(
            Backend::Ready(creator),
            registry(),
            "구매자",
            MAX_PAGES_PER_REQUEST,
        ))
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn creates_pages_continuing_the_sequence() {
        let store = Arc::new(MemoryStore::new());
        store.seed("db-lucy", 7);

        let (status, body) = send(app(&store), "/create-page?db=lucy&count=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["next_number"], 8);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains('8') && message.contains('3'));
        assert_eq!(store.sequences("db-lucy"), vec![7, 8, 9, 10]);
        assert!(store.created("db-lucy").iter().all(|p| p.title_property == "구매자"));
    }

    #[tokio::test]
    async fn empty_database_gets_sequence_one() {
        let store = Arc::new(MemoryStore::new());

        let (status, body) = send(app(&store), "/create-page?db=ileen&count=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next_number"], 1);
        assert_eq!(store.sequences("db-ileen"), vec![1]);
    }

    #[tokio::test]
    async fn defaults_to_default_database_and_one_page() {
        let store = Arc::new(MemoryStore::new());
        store.seed("db-ileen", 41);

        let (status, _) = send(app(&store), "/create-page").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.sequences("db-ileen"), vec![41, 42]);
        assert!(store.sequences("db-lucy").is_empty());
    }

    #[tokio::test]
    async fn selector_is_case_insensitive() {
        let store = Arc::new(MemoryStore::new());

        let (status, _) = send(app(&store), "/create-page?db=LUCY").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.sequences("db-lucy"), vec![1]);
    }

    #[tokio::test]
    async fn invalid_count_falls_back_to_one() {
        let store = Arc::new(MemoryStore::new());

        for uri in [
            "/create-page?db=lucy&count=abc",
            "/create-page?db=lucy&count=",
            "/create-page?db=lucy&count=-2",
        ] {
            let (status, body) = send(app(&store), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["count"], 1, "{uri}");
        }
        assert_eq!(store.sequences("db-lucy"), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn repeated_parameters_use_first_value() {
        let store = Arc::new(MemoryStore::new());

        let (status, body) =
            send(app(&store), "/create-page?db=lucy&count=2&count=3&db=ileen").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(store.sequences("db-lucy"), vec![1, 2]);
        assert!(store.sequences("db-ileen").is_empty());
    }

    #[tokio::test]
    async fn count_at_limit_is_accepted() {
        let store = Arc::new(MemoryStore::new());

        let (status, _) = send(app(&store), "/create-page?db=lucy&count=100").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.sequences("db-lucy"), (1..=100).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn count_over_limit_is_refused_without_calls() {
        let store = Arc::new(MemoryStore::new());

        let (status, body) = send(app(&store), "/create-page?db=lucy&count=101").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_database_is_not_found_without_calls() {
        let store = Arc::new(MemoryStore::new());

        let (status, body) = send(app(&store), "/create-page?db=nobody&count=2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("nobody"));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_database_wins_over_count_limit() {
        let store = Arc::new(MemoryStore::new());

        let (status, _) = send(app(&store), "/create-page?db=nobody&count=500").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let store = Arc::new(MemoryStore::new());
        store.fail_after("db-lucy", 1);

        let (status, body) = send(app(&store), "/create-page?db=lucy&count=3").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("injected failure"));
        assert!(body.get("next_number").is_none());
        assert_eq!(store.sequences("db-lucy"), vec![1]);
    }

    #[tokio::test]
    async fn misconfigured_server_rejects_every_request() {
        let app = router(AppState::new(
            Backend::Misconfigured(vec!["NOTION_API_KEY"]),
            registry(),
            "구매자",
            MAX_PAGES_PER_REQUEST,
        ));

        for uri in ["/create-page", "/create-page?db=lucy&count=3", "/create-page?db=x"] {
            let (status, body) = send(app.clone(), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert!(body["message"].as_str().unwrap().contains("NOTION_API_KEY"));
        }
    }

    #[tokio::test]
    async fn empty_registry_is_misconfigured_without_calls() {
        let store = Arc::new(MemoryStore::new());
        let app = router(AppState::new(
            Backend::Ready(PageCreator::new(store.clone())),
            DatabaseRegistry::new("ileen"),
            "구매자",
            MAX_PAGES_PER_REQUEST,
        ));

        let (status, _) = send(app, "/create-page").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let store = Arc::new(MemoryStore::new());

        let (status, body) = send(app(&store), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }
}
