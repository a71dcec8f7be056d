//! HTTP server for the grading endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use services::{ClassifierGrader, GRADE_PATH, Grader, grade_router};

use crate::cli::ServeArgs;
use crate::error::AppError;

/// Serve `POST /api/grade` until interrupted.
///
/// # Errors
///
/// Returns an error for invalid classifier settings, an unavailable address,
/// or a server failure.
pub async fn serve(args: &ServeArgs, fallback_key: Option<String>) -> Result<(), AppError> {
    let config = args.classifier.resolve(fallback_key)?;
    let grader: Arc<dyn Grader> = Arc::new(ClassifierGrader::new(config)?);

    let listener = TcpListener::bind(args.bind)
        .await
        .map_err(|source| AppError::Bind {
            addr: args.bind,
            source,
        })?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, path = GRADE_PATH, "grading endpoint listening");

    axum::serve(listener, grade_router(grader))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("grading endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
