//! Generic resource endpoints
//!
//! One pair of handlers serves every registered resource:
//! - `GET /api/r1/{resource}/` lists records, with whitelist-checked
//!   equality filters and `limit`/`offset` paging
//! - `GET /api/r1/{resource}/{id}/` fetches one record by numeric id
//!
//! The handlers look the resource up in the registry, enforce its access
//! policy, compile the request parameters and shape the raw records with the
//! resource's descriptor. Nothing here knows about concrete entities.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::api::middleware::{authorize, ApiError, AppState};
use crate::resource::{compile_filters, parse_paging, RegisteredResource};

/// Build the resource router mounted under the API namespace.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{resource}", get(list_resource))
        .route("/{resource}/", get(list_resource))
        .route("/{resource}/{id}", get(get_resource))
        .route("/{resource}/{id}/", get(get_resource))
}

fn lookup<'a>(state: &'a AppState, resource: &str) -> Result<&'a RegisteredResource, ApiError> {
    state
        .registry
        .get(resource)
        .ok_or_else(|| ApiError::not_found(format!("Unknown resource: {resource}")))
}

/// GET /api/r1/{resource}/ - List records
async fn list_resource(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &resource)?;
    authorize(&entry.descriptor, &state, &headers)?;

    let filters = compile_filters(&entry.descriptor, &params)?;
    let page = parse_paging(&params)?;

    let result = entry
        .source
        .list(&filters, &page)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let objects: Vec<Value> = result
        .records
        .iter()
        .map(|record| entry.descriptor.shape(record))
        .collect();

    Ok(Json(json!({
        "meta": {
            "limit": page.limit,
            "offset": page.offset,
            "total_count": result.total,
        },
        "objects": objects,
    })))
}

/// GET /api/r1/{resource}/{id}/ - Get one record
async fn get_resource(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &resource)?;
    authorize(&entry.descriptor, &state, &headers)?;

    let record = entry
        .source
        .get(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("No {resource} with id {id}")))?;

    Ok(Json(entry.descriptor.shape(&record)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::api::{build_router, AppState};
    use crate::catalog::AppVariant;
    use crate::db::{fixtures, DbPool};

    const FRONT_TOKEN: &str = "front-token";

    struct Seed {
        author: i64,
        photo: i64,
        plain: i64,
        illustrated: i64,
    }

    async fn seed(pool: &DbPool) -> Seed {
        let culture = fixtures::insert_category(pool, "Culture", "culture").await.unwrap();
        let photo = fixtures::insert_photo(pool, "Cover", "cover").await.unwrap();
        fixtures::insert_photo(pool, "Spare", "spare").await.unwrap();
        let author = fixtures::insert_author(pool, "Ann", "ann").await.unwrap();
        fixtures::insert_user(pool, "alice").await.unwrap();

        let plain = fixtures::insert_publishable(pool, "Plain", "plain", culture, None)
            .await
            .unwrap();
        let illustrated =
            fixtures::insert_publishable(pool, "Illustrated", "illustrated", culture, Some(photo))
                .await
                .unwrap();
        fixtures::attach_author(pool, illustrated, author).await.unwrap();
        fixtures::insert_listing(pool, illustrated, true).await.unwrap();
        fixtures::insert_article(pool, plain, "Body text").await.unwrap();
        fixtures::insert_article(pool, illustrated, "Other body").await.unwrap();

        Seed {
            author,
            photo,
            plain,
            illustrated,
        }
    }

    async fn server(variant: AppVariant) -> (TestServer, Seed) {
        let pool = fixtures::setup_pool().await;
        let seed = seed(&pool).await;

        let config = crate::config::Config::default();
        let registry = variant.build_registry(&pool, &config).unwrap();
        let state = AppState {
            registry: Arc::new(registry),
            templates: Arc::new(crate::api::pages::load_templates().unwrap()),
            variant,
            api_token: Some(FRONT_TOKEN.to_string()),
            site_domain: config.site.domain.clone(),
        };

        let app = build_router(state, "http://localhost:3000");
        (TestServer::new(app).unwrap(), seed)
    }

    fn bearer() -> (header::HeaderName, HeaderValue) {
        (
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer front-token"),
        )
    }

    #[tokio::test]
    async fn scribble_photo_list_has_exactly_the_declared_fields() {
        let (server, _) = server(AppVariant::Scribble).await;
        let response = server.get("/api/r1/photo/").await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["meta"]["total_count"], 2);

        let photo = &body["objects"][0];
        let mut keys: Vec<&str> = photo.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "app_data",
                "created",
                "description",
                "height",
                "id",
                "image",
                "important_bottom",
                "important_left",
                "important_right",
                "important_top",
                "slug",
                "title",
                "width",
            ]
        );
    }

    #[tokio::test]
    async fn front_photo_hides_slug_everywhere() {
        let (server, seed) = server(AppVariant::Front).await;

        let list = server.get("/api/r1/photo/").add_header(bearer().0, bearer().1).await;
        assert_eq!(list.status_code(), StatusCode::OK);
        let body: Value = list.json();
        assert!(body["objects"][0].get("slug").is_none());

        // the exclusion also applies to photos embedded in publishables
        let detail = server
            .get(&format!("/api/r1/publishable/{}/", seed.illustrated))
            .add_header(bearer().0, bearer().1)
            .await;
        let publishable: Value = detail.json();
        assert_eq!(publishable["photo"]["id"], seed.photo);
        assert!(publishable["photo"].get("slug").is_none());
    }

    #[tokio::test]
    async fn whitelisted_filter_restricts_the_result() {
        let (server, seed) = server(AppVariant::Scribble).await;

        let response = server.get("/api/r1/article/?title=Plain").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["meta"]["total_count"], 1);
        assert_eq!(body["objects"][0]["id"], seed.plain);

        let none = server.get("/api/r1/article/?title=Absent").await;
        let body: Value = none.json();
        assert_eq!(body["meta"]["total_count"], 0);
        assert_eq!(body["objects"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected_not_ignored() {
        let (server, _) = server(AppVariant::Scribble).await;
        let response = server.get("/api/r1/article/?body=Foo").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn derived_fields_are_not_filterable() {
        let (server, _) = server(AppVariant::Scribble).await;
        for query in ["url=http://x/", "upper_title=PLAIN"] {
            let response = server.get(&format!("/api/r1/article/?{query}")).await;
            assert_eq!(
                response.status_code(),
                StatusCode::BAD_REQUEST,
                "{query} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn front_rejects_every_filter() {
        let (server, _) = server(AppVariant::Front).await;
        let response = server
            .get("/api/r1/photo/?title=Cover")
            .add_header(bearer().0, bearer().1)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn relation_filters_compare_related_ids() {
        let (server, seed) = server(AppVariant::Scribble).await;

        let by_author = server
            .get(&format!("/api/r1/publishable/?authors={}", seed.author))
            .await;
        let body: Value = by_author.json();
        assert_eq!(body["meta"]["total_count"], 1);
        assert_eq!(body["objects"][0]["id"], seed.illustrated);

        let by_photo = server
            .get(&format!("/api/r1/publishable/?photo={}", seed.photo))
            .await;
        let body: Value = by_photo.json();
        assert_eq!(body["meta"]["total_count"], 1);
    }

    #[tokio::test]
    async fn publishable_embeds_relations_by_value() {
        let (server, seed) = server(AppVariant::Scribble).await;

        let detail = server
            .get(&format!("/api/r1/publishable/{}/", seed.illustrated))
            .await;
        assert_eq!(detail.status_code(), StatusCode::OK);
        let body: Value = detail.json();

        assert_eq!(body["photo"]["title"], "Cover");
        assert_eq!(body["category"]["tree_path"], "culture");
        assert_eq!(body["authors"][0]["name"], "Ann");
        assert_eq!(body["listings"][0]["commercial"], true);
        // nested listings are shaped by the listing descriptor
        assert!(body["listings"][0].get("publishable_id").is_none());
        // storage-level references stay internal
        assert!(body.get("photo_id").is_none());
        assert!(body.get("category_id").is_none());
    }

    #[tokio::test]
    async fn publishable_without_photo_embeds_null() {
        let (server, seed) = server(AppVariant::Scribble).await;
        let detail = server.get(&format!("/api/r1/publishable/{}/", seed.plain)).await;
        let body: Value = detail.json();
        assert!(body["photo"].is_null());
        assert!(body["authors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn article_carries_extension_and_derived_fields() {
        let (server, seed) = server(AppVariant::Scribble).await;
        let detail = server.get(&format!("/api/r1/article/{}/", seed.plain)).await;
        assert_eq!(detail.status_code(), StatusCode::OK);
        let body: Value = detail.json();

        assert_eq!(body["content"], "Body text");
        assert_eq!(body["upper_title"], "PLAIN");
        assert_eq!(body["url"], "http://example.com/culture/plain/");
        assert!(body.get("created").is_some());
        assert!(body.get("updated").is_some());
    }

    #[tokio::test]
    async fn front_articles_have_upper_title_but_no_url() {
        let (server, seed) = server(AppVariant::Front).await;
        let detail = server
            .get(&format!("/api/r1/article/{}/", seed.plain))
            .add_header(bearer().0, bearer().1)
            .await;
        let body: Value = detail.json();
        assert_eq!(body["upper_title"], "PLAIN");
        assert!(body.get("url").is_none());
    }

    #[tokio::test]
    async fn publishable_detail_covers_plain_items_article_detail_does_not() {
        let (server, seed) = server(AppVariant::Scribble).await;
        // every article is also reachable as a publishable
        let as_publishable = server
            .get(&format!("/api/r1/publishable/{}/", seed.plain))
            .await;
        assert_eq!(as_publishable.status_code(), StatusCode::OK);
        let body: Value = as_publishable.json();
        // the publishable resource does not expose article fields
        assert!(body.get("content").is_none());
    }

    #[tokio::test]
    async fn front_requires_the_bearer_token() {
        let (server, _) = server(AppVariant::Front).await;

        let denied = server.get("/api/r1/photo/").await;
        assert_eq!(denied.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = denied.json();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let wrong = server
            .get("/api/r1/photo/")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"))
            .await;
        assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

        let allowed = server.get("/api/r1/photo/").add_header(bearer().0, bearer().1).await;
        assert_eq!(allowed.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn scribble_is_open() {
        let (server, _) = server(AppVariant::Scribble).await;
        let response = server.get("/api/r1/user/").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["objects"][0]["username"], "alice");
    }

    #[tokio::test]
    async fn scribble_only_resources_are_absent_from_front() {
        let (front, _) = server(AppVariant::Front).await;
        for name in ["category", "user"] {
            let response = front
                .get(&format!("/api/r1/{name}/"))
                .add_header(bearer().0, bearer().1)
                .await;
            assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{name}");
        }
    }

    #[tokio::test]
    async fn unknown_resource_and_unknown_id_are_not_found() {
        let (server, _) = server(AppVariant::Scribble).await;
        assert_eq!(
            server.get("/api/r1/widget/").await.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            server.get("/api/r1/photo/99999/").await.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn paging_is_windowed_with_meta() {
        let (server, _) = server(AppVariant::Scribble).await;
        let response = server.get("/api/r1/photo/?limit=1&offset=1").await;
        let body: Value = response.json();
        assert_eq!(body["meta"]["limit"], 1);
        assert_eq!(body["meta"]["offset"], 1);
        assert_eq!(body["meta"]["total_count"], 2);
        assert_eq!(body["objects"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn paths_work_with_and_without_trailing_slash() {
        let (server, seed) = server(AppVariant::Scribble).await;
        assert_eq!(server.get("/api/r1/photo").await.status_code(), StatusCode::OK);
        assert_eq!(server.get("/api/r1/photo/").await.status_code(), StatusCode::OK);
        assert_eq!(
            server
                .get(&format!("/api/r1/photo/{}", seed.photo))
                .await
                .status_code(),
            StatusCode::OK
        );
    }
}
