use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{superadmin_auth_middleware, tenant_admin_auth_middleware};
use crate::models::{Appointment, Invoice, Memorial};
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(public_routes())
        // Tenant admin (token scoped to the tenant in the path)
        .merge(tenant_admin_routes(state.clone()))
        .merge(legacy_memorial_routes(state.clone()))
        // Superadmin
        .route("/superadmin/login", post(elevated::superadmin_login_post))
        .merge(superadmin_routes(state.clone()))
        // Static uploads (memorial photos, generated documents)
        .nest_service("/uploads", ServeDir::new(&config.storage.uploads_dir))
        .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/tenants", get(public::tenant_directory))
        .route("/api/signup", post(public::signup_post))
        .route("/api/admin/login", post(auth::admin_login_post))
        .route("/api/auth/refresh", post(auth::refresh_post))
        .route("/api/auth/reset-request", post(auth::reset_request_post))
        .route("/api/auth/reset-confirm", post(auth::reset_confirm_post))
        .route("/api/tenant/:slug", get(public::tenant_get))
        .route("/api/tenant/:slug/status", get(public::tenant_status))
        .route("/api/tenants/mark-paid", post(public::mark_paid_post))
        // Public memorial pages
        .route("/api/:tenantSlug/memorials", get(public::public_memorials_list))
        .route("/api/:tenantSlug/memorial/:id", get(public::public_memorial_get))
}

fn tenant_admin_routes(state: AppState) -> Router<AppState> {
    use protected::{collection_get, collection_post, record_delete, record_get, record_patch};

    Router::new()
        .route("/api/tenant/:slug/settings", post(protected::settings_post))
        .route("/api/:tenantSlug/admin/overview", get(protected::overview_get))
        .route(
            "/api/:tenantSlug/admin/memorials",
            get(collection_get::<Memorial>).post(protected::memorial_create),
        )
        .route(
            "/api/:tenantSlug/admin/memorials/:id",
            get(record_get::<Memorial>)
                .patch(record_patch::<Memorial>)
                .delete(record_delete::<Memorial>),
        )
        .route(
            "/api/:tenantSlug/admin/appointments",
            get(collection_get::<Appointment>).post(collection_post::<Appointment>),
        )
        .route(
            "/api/:tenantSlug/admin/appointments/:id",
            get(record_get::<Appointment>)
                .patch(record_patch::<Appointment>)
                .delete(record_delete::<Appointment>),
        )
        .route(
            "/api/:tenantSlug/admin/accounting/invoices",
            get(collection_get::<Invoice>).post(collection_post::<Invoice>),
        )
        .route(
            "/api/:tenantSlug/admin/accounting/invoices/:id",
            get(record_get::<Invoice>)
                .patch(record_patch::<Invoice>)
                .delete(record_delete::<Invoice>),
        )
        .route("/api/:tenantSlug/admin/pdf/from-form", post(protected::pdf_from_form_post))
        .route_layer(from_fn_with_state(state, tenant_admin_auth_middleware))
}

fn legacy_memorial_routes(state: AppState) -> Router<AppState> {
    use protected::{collection_get, collection_post, legacy, record_get};

    Router::new()
        .route(
            "/api/memorials/:tenant",
            get(collection_get::<Memorial>).post(collection_post::<Memorial>),
        )
        .route("/api/memorials/:tenant/:id", get(record_get::<Memorial>))
        .route("/api/memorials/:tenant/update", post(legacy::legacy_update_post))
        .route("/api/memorials/:tenant/delete", post(legacy::legacy_delete_post))
        .route_layer(from_fn_with_state(state, tenant_admin_auth_middleware))
}

fn superadmin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/superadmin/api/tenants",
            get(elevated::tenant_list).post(elevated::tenant_create),
        )
        .route(
            "/superadmin/api/tenants/:slug",
            get(elevated::tenant_show)
                .put(elevated::tenant_update)
                .delete(elevated::tenant_delete),
        )
        .route("/superadmin/api/tenant/:slug", put(elevated::tenant_update))
        .route_layer(from_fn_with_state(state, superadmin_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-auth-token"),
            HeaderName::from_static("x-webhook-secret"),
        ]);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    base.allow_origin(AllowOrigin::list(origins))
}
