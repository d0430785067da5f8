//! Liveness, readiness and a detailed health report.
//!
//! These answer plain JSON with real HTTP status codes for load balancers, outside
//! the business envelope.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;
use crate::config::StorageBackend;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub database: DatabaseCheck,
    pub uploads: UploadCheck,
}

#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// State of the background upload pipeline.
#[derive(Debug, Serialize)]
pub struct UploadCheck {
    pub backend: &'static str,
    pub worker_running: bool,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
pub struct ProbeStatus {
    pub status: &'static str,
}

fn backend_name(backend: StorageBackend) -> &'static str {
    match backend {
        StorageBackend::S3 => "s3",
        StorageBackend::Local => "local",
    }
}

/// GET /api/health
///
/// 503 when the database is unreachable or the upload worker has stopped.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let latency = persistence::db::ping(&state.pool).await.ok();
    let connected = latency.is_some();

    let uploads = UploadCheck {
        backend: backend_name(state.config.storage.backend),
        worker_running: !state.uploads.is_closed(),
        pending: state.uploads.pending(),
    };
    let healthy = connected && uploads.worker_running;

    let report = HealthReport {
        status: if healthy { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        database: DatabaseCheck {
            connected,
            latency_ms: latency.map(|d| d.as_millis() as u64),
        },
        uploads,
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

/// GET /api/health/live
pub async fn live() -> Json<ProbeStatus> {
    Json(ProbeStatus { status: "alive" })
}

/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<ProbeStatus>, StatusCode> {
    persistence::db::ping(&state.pool)
        .await
        .map(|_| Json(ProbeStatus { status: "ready" }))
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(connected: bool) -> HealthReport {
        HealthReport {
            status: if connected { "healthy" } else { "unhealthy" },
            version: "0.3.0",
            uptime_secs: 12,
            database: DatabaseCheck {
                connected,
                latency_ms: connected.then_some(3),
            },
            uploads: UploadCheck {
                backend: backend_name(StorageBackend::Local),
                worker_running: true,
                pending: 2,
            },
        }
    }

    #[test]
    fn test_report_shape() {
        let json = serde_json::to_value(report(true)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["uptime_secs"], 12);
        assert_eq!(json["database"]["latency_ms"], 3);
        assert_eq!(json["uploads"]["backend"], "local");
        assert_eq!(json["uploads"]["pending"], 2);
    }

    #[test]
    fn test_disconnected_omits_latency() {
        let json = serde_json::to_value(report(false)).unwrap();
        assert_eq!(json["database"]["connected"], false);
        assert!(json["database"].get("latency_ms").is_none());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(backend_name(StorageBackend::S3), "s3");
        assert_eq!(backend_name(StorageBackend::Local), "local");
    }
}
