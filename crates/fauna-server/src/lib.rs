//! HTTP server for the fauna wildlife population tracker.
//!
//! Exposes volunteer submission and employee report endpoints over the
//! population ledger, with role-gated access checked before any domain
//! logic runs.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{bearer_token, Identity, IdentityProvider, StaticIdentityProvider};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::FaunaServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use fauna_reports::ReportYears;
    use fauna_store::{InMemoryStore, WildlifeStore};
    use fauna_types::{InitialPopulation, Role, SettlementId, SpeciesId, UserAccount, UserId};

    use super::*;

    struct Fixture {
        router: Router,
        riverside: SettlementId,
        deer: SpeciesId,
    }

    /// One settlement with a 100-deer baseline, volunteer `maria` assigned
    /// to it, employee `inspector` with no settlement.
    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let mun = store.insert_municipality("Cedar Valley").unwrap();
        let riverside = store.insert_settlement(mun.id, "Riverside").unwrap().id;
        let deer = store.insert_species("Red Deer").unwrap().id;
        store
            .insert_initial_population(InitialPopulation {
                settlement_id: riverside,
                species_id: deer,
                count: 100,
            })
            .unwrap();

        let accounts = vec![
            UserAccount::new(UserId(1), "maria")
                .with_role(Role::Volunteer)
                .assigned_to(riverside),
            UserAccount::new(UserId(2), "inspector").with_role(Role::Employee),
        ];
        let state = AppState::new(
            store,
            ReportYears::default(),
            Arc::new(StaticIdentityProvider::new(accounts)),
        );
        Fixture {
            router: build_router(state),
            riverside,
            deer,
        }
    }

    fn get_as(user: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {user}"))
            .body(Body::empty())
            .unwrap()
    }

    fn post_json_as(user: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {user}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let f = fixture();
        let response = f
            .router
            .oneshot(
                Request::builder()
                    .uri("/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submission_then_duplicate_conflict() {
        let f = fixture();
        let body = json!({ "species_id": f.deer, "year": 2024, "delta": -20 });

        let response = f
            .router
            .clone()
            .oneshot(post_json_as("maria", "/v1/changes", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["change"]["delta"], json!(-20));

        let response = f
            .router
            .oneshot(post_json_as("maria", "/v1/changes", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let rejection = body_json(response).await;
        assert_eq!(rejection["error"], "duplicate_entry");
        // The submitted input is echoed for form redisplay.
        assert_eq!(rejection["input"]["year"], 2024);
    }

    #[tokio::test]
    async fn negative_population_is_a_field_level_rejection() {
        let f = fixture();
        let body = json!({ "species_id": f.deer, "year": 2024, "delta": -150 });
        let response = f
            .router
            .oneshot(post_json_as("maria", "/v1/changes", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let rejection = body_json(response).await;
        assert_eq!(rejection["error"], "negative_population");
        // The reason names the computed before-count.
        assert!(rejection["reason"].as_str().unwrap().contains("100"));
    }

    #[tokio::test]
    async fn submission_requires_volunteer_with_settlement() {
        let f = fixture();
        let body = json!({ "species_id": f.deer, "year": 2024, "delta": 1 });

        // No credentials at all.
        let response = f
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/changes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Employees cannot submit.
        let response = f
            .router
            .oneshot(post_json_as("inspector", "/v1/changes", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn reports_require_employee_role() {
        let f = fixture();
        let response = f
            .router
            .clone()
            .oneshot(get_as("maria", "/v1/reports/matrix?year=2024"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = f
            .router
            .oneshot(get_as("inspector", "/v1/reports/matrix?year=2024"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let matrix = body_json(response).await;
        assert_eq!(matrix["rows"][0]["settlement_name"], "Riverside");
        assert_eq!(matrix["rows"][0]["cells"][0], json!(100));
    }

    #[tokio::test]
    async fn drill_down_reports_stay_empty_without_filters() {
        let f = fixture();
        let response = f
            .router
            .clone()
            .oneshot(get_as("inspector", "/v1/reports/growth?year=2024"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let growth = body_json(response).await;
        assert_eq!(growth["figures"], Value::Null);

        let uri = format!(
            "/v1/reports/municipality-total?year=2024&species_id={}",
            serde_json::to_string(&f.deer).unwrap()
        );
        let response = f.router.oneshot(get_as("inspector", &uri)).await.unwrap();
        let total = body_json(response).await;
        assert_eq!(total["total"], Value::Null);
    }

    #[tokio::test]
    async fn history_lists_own_settlement_changes() {
        let f = fixture();
        let body = json!({ "species_id": f.deer, "year": 2024, "delta": -5 });
        f.router
            .clone()
            .oneshot(post_json_as("maria", "/v1/changes", body))
            .await
            .unwrap();

        let response = f
            .router
            .oneshot(get_as("maria", "/v1/changes/mine"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let history = body_json(response).await;
        assert_eq!(history["settlement_id"], json!(f.riverside));
        assert_eq!(history["settlement_name"], "Riverside");
        assert_eq!(history["items"][0]["species_name"], "Red Deer");
        assert_eq!(history["items"][0]["delta"], -5);
    }
}
