//! Readiness and liveness probes.
//!
//! The process moves through three phases: `starting` until the listener is
//! bound, `ready` while serving, and `draining` once a shutdown signal has
//! been received. Readiness only passes while `ready`; liveness fails once
//! `draining` so orchestrators stop routing before in-flight requests finish.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Lifecycle phase reported by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthPhase {
    Starting,
    Ready,
    Draining,
}

impl HealthPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Ready,
            _ => Self::Draining,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Starting => 0,
            Self::Ready => 1,
            Self::Draining => 2,
        }
    }
}

/// Body returned by both probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthPhase,
}

/// Shared lifecycle state read by the probes.
#[derive(Debug, Default)]
pub struct HealthState {
    phase: AtomicU8,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> HealthPhase {
        HealthPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Move to `ready`. Has no effect once draining.
    pub fn mark_ready(&self) {
        let _ = self.phase.compare_exchange(
            HealthPhase::Starting.as_u8(),
            HealthPhase::Ready.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Move to `draining`; both probes fail from here on.
    pub fn begin_draining(&self) {
        self.phase.store(HealthPhase::Draining.as_u8(), Ordering::Release);
    }
}

fn report(passing: bool, status: HealthPhase) -> HttpResponse {
    let mut response = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthReport { status })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Serving traffic", body = HealthReport),
        (status = 503, description = "Starting or draining", body = HealthReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let phase = state.phase();
    report(phase == HealthPhase::Ready, phase)
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is up", body = HealthReport),
        (status = 503, description = "Shutdown in progress", body = HealthReport)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    let phase = state.phase();
    report(phase != HealthPhase::Draining, phase)
}
