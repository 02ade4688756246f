pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_auth;
use crate::state::AppState;
use crate::students::handlers;

pub fn build_router(state: AppState) -> Router {
    // Every student route sits behind the auth guard; /health stays public.
    let students = Router::new()
        .route(
            "/",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/:id",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route("/send-email/:id", post(handlers::send_student_email))
        .route("/evaluate/:id", post(handlers::evaluate_student))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/students", students)
        .with_state(state)
}
