//! OpenAPI documentation and schema generation
//!
//! Uses utoipa for compile-time spec generation. The spec is served at
//! `/openapi.json` and browsable at `/swagger-ui` when enabled.

use utoipa::OpenApi;

/// OpenAPI documentation for the moji2anki REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "moji2anki REST API",
        version = "0.1.0",
        description = "Task API that packages MOJi dictionary word lists into Anki .apkg decks",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    paths(
        crate::api::routes::create_apkg,
        crate::api::routes::progress_log,
        crate::api::routes::download_apkg,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::api::routes::CreateApkgResponse,
        crate::api::routes::ProgressLogResponse,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "decks", description = "Deck generation tasks - create, poll progress, download archives"),
        (name = "system", description = "System endpoints - health check, OpenAPI spec"),
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_doc_generates() {
        let spec = ApiDoc::openapi();
        assert!(!spec.paths.paths.is_empty());
    }

    #[test]
    fn openapi_spec_covers_all_task_endpoints() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/create-apkg/"));
        assert!(paths.contains(&"/progress-log/{task_id}"));
        assert!(paths.contains(&"/download-apkg/{task_id}"));
        assert!(paths.contains(&"/health"));
    }

    #[test]
    fn openapi_spec_serializes_to_json() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).expect("should serialize to JSON");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(
            value["openapi"].as_str().unwrap().starts_with("3."),
            "should be an OpenAPI 3.x document"
        );
    }
}
