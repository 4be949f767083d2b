use crate::{config::ServerConfiguration, state::AppState};
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

mod handler;

pub fn create_router(state: AppState, server_config: &ServerConfiguration) -> Router {
    Router::new()
        .nest("/users", handler::users::routes())
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[instrument(skip_all, fields(port = %server_config.port))]
pub async fn run(state: AppState, server_config: ServerConfiguration) -> eyre::Result<()> {
    let router = create_router(state, &server_config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", server_config.port)).await?;

    info!("inbox server listening");
    axum::serve(listener, router).await?;

    Ok(())
}
