// --- File: crates/services/sheetbook_backend/src/lib.rs ---
//! Assembles the HTTP application: routes under `/api` plus the tower-http layers.

use axum::{http::StatusCode, response::Response, Router};
use sheetbook_common::error_response;
use sheetbook_config::AppConfig;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

/// Builds the full application for `config`.
pub fn app(config: Arc<AppConfig>) -> Router {
    let api_router = sheetbook_common::routes().merge(sheetbook_sheets::routes(config.clone()));

    #[allow(unused_mut)] // mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use sheetbook_sheets::doc::SheetsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Sheetbook API",
                version = "0.1.0",
                description = "Booking intake into Google Sheets",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SheetsApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    with_layers(app, config.server.debug)
}

/// Panic catching and permissive CORS always; request tracing in debug mode.
pub fn with_layers(router: Router, debug: bool) -> Router {
    let router = router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive());

    if debug {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Handler panicked: {}", detail);

    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
