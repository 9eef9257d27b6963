//! Probe and metadata handlers for the server's own endpoints.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use axum::{http::StatusCode, Extension, Json};
use serde_json::{json, Value};
use tracing::info;

/// Delay before the readiness probe starts reporting positive.
const READY_DELAY: Duration = Duration::from_secs(2);

/// Lock-free readiness flag: written once by a background timer, read
/// concurrently by every probe request.
#[derive(Clone)]
pub struct Ready(Arc<AtomicBool>);

impl Ready {
    /// Create the flag and spawn the timer that flips it once.
    pub fn spawn() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let writer = flag.clone();
        tokio::spawn(async move {
            info!("waiting for readiness window");
            tokio::time::sleep(READY_DELAY).await;
            writer.store(true, Ordering::Release);
            info!("readiness probe is positive");
        });
        Ready(flag)
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Liveness probe.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: 503 until the service settles after startup.
pub async fn readiness(Extension(ready): Extension<Ready>) -> StatusCode {
    if ready.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Build metadata served on the root path.
pub async fn metadata() -> Json<Value> {
    Json(json!({
        "release": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_COMMIT").unwrap_or("unknown"),
        "buildTime": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}
