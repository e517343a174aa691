use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::{debug, info};

use super::container::Container;
use super::controller::{invalid_parameter_response, AskController, AskParams};

pub const ASK_PATH: &str = "/api/ai/ask";

pub fn build_router(container: Arc<Container>) -> axum::Router {
    axum::Router::new()
        .route(ASK_PATH, get(ask))
        .with_state(container)
}

async fn ask(
    State(container): State<Arc<Container>>,
    params: Result<Query<AskParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            debug!("Rejected query parameters: {rejection}");
            return invalid_parameter_response();
        }
    };

    AskController::new(&container).respond(params).await
}

/// Serve the gateway on an already-bound listener until the process exits.
pub async fn serve(container: Arc<Container>, listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Gateway listening on http://{addr}{ASK_PATH}");
    axum::serve(listener, build_router(container)).await?;
    Ok(())
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    Ok(TcpListener::bind(addr).await?)
}
