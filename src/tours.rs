//! Tour scheduling workflow: create, list, cancel.
//!
//! A tour starts `scheduled`; the tenant can cancel it, the agent-facing
//! flow confirms and completes it. Persistence is a single attempt per
//! call, matching the rest of the client.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::{KeyatError, Result};
use crate::models::{Tour, TourStatus};

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_MEETING_POINT: &str = "Property main entrance";

/// What the scheduling form submits. Property, date and time are required;
/// notes are optional.
#[derive(Debug, Clone)]
pub struct TourRequest {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub preferred_date: DateTime<Utc>,
    pub viewing_time: String,
    pub notes: Option<String>,
}

impl TourRequest {
    /// `viewing_time` must be `HH:MM`, 24-hour. The date is deliberately
    /// not range-checked here; the form's minimum-date attribute is a UI
    /// hint only.
    fn validate(&self) -> Result<()> {
        let mut parts = self.viewing_time.splitn(2, ':');
        let valid = match (parts.next(), parts.next()) {
            (Some(h), Some(m)) if h.len() == 2 && m.len() == 2 => {
                matches!(h.parse::<u8>(), Ok(0..=23)) && matches!(m.parse::<u8>(), Ok(0..=59))
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(KeyatError::InvalidInput(format!(
                "viewing time must be HH:MM, got {:?}",
                self.viewing_time
            )))
        }
    }
}

impl Tour {
    /// Build the row the scheduling form persists. No agent is assigned at
    /// this point; meeting point and duration take their defaults.
    pub fn from_request(request: &TourRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id: request.property_id,
            tenant_id: request.tenant_id,
            agent_id: None,
            preferred_date: request.preferred_date,
            viewing_time: request.viewing_time.clone(),
            notes: request.notes.clone(),
            status: TourStatus::Scheduled,
            meeting_point: DEFAULT_MEETING_POINT.to_string(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            created_at: Utc::now(),
        }
    }
}

/// Persist a new tour for the tenant. The row always starts `scheduled`.
pub async fn schedule_tour(backend: &dyn Backend, request: &TourRequest) -> Result<Tour> {
    request.validate()?;
    let tour = Tour::from_request(request);
    let persisted = backend.insert_tour(&tour).await?;
    info!(tour = %persisted.id, property = %persisted.property_id, "tour scheduled");
    Ok(persisted)
}

/// The tenant's tours, soonest first.
pub async fn list_tours(backend: &dyn Backend, tenant_id: Uuid) -> Result<Vec<Tour>> {
    backend.list_tours(tenant_id).await
}

/// Move a tour to `next` after checking the transition is legal. Only the
/// status field is written.
pub async fn transition_tour(backend: &dyn Backend, id: Uuid, next: TourStatus) -> Result<Tour> {
    let current = backend.get_tour(id).await?;
    if !current.status.can_transition_to(next) {
        return Err(KeyatError::InvalidTransition {
            from: current.status,
            to: next,
        });
    }
    let updated = backend.set_tour_status(id, next).await?;
    info!(tour = %id, from = ?current.status, to = ?next, "tour status updated");
    Ok(updated)
}

/// Tenant-side cancellation.
pub async fn cancel_tour(backend: &dyn Backend, id: Uuid) -> Result<Tour> {
    transition_tour(backend, id, TourStatus::Cancelled).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn request() -> TourRequest {
        TourRequest {
            property_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            preferred_date: "2026-09-12T00:00:00Z".parse().unwrap(),
            viewing_time: "14:30".to_string(),
            notes: Some("Prefer afternoon".to_string()),
        }
    }

    #[tokio::test]
    async fn scheduling_persists_a_scheduled_row() {
        let backend = MemoryBackend::new();
        let req = request();

        let tour = schedule_tour(&backend, &req).await.unwrap();
        assert_eq!(tour.status, TourStatus::Scheduled);
        assert_eq!(tour.property_id, req.property_id);
        assert_eq!(tour.tenant_id, req.tenant_id);
        assert_eq!(tour.viewing_time, "14:30");
        assert_eq!(tour.meeting_point, DEFAULT_MEETING_POINT);
        assert_eq!(tour.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert_eq!(tour.agent_display(), "Agent TBA");

        let listed = list_tours(&backend, req.tenant_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, tour.id);
    }

    #[tokio::test]
    async fn bad_viewing_time_is_rejected_before_persisting() {
        let backend = MemoryBackend::new();
        let mut req = request();
        req.viewing_time = "2pm".to_string();

        let err = schedule_tour(&backend, &req).await.unwrap_err();
        assert!(matches!(err, KeyatError::InvalidInput(_)));
        assert!(list_tours(&backend, req.tenant_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_flips_status_and_nothing_else() {
        let backend = MemoryBackend::new();
        let tour = schedule_tour(&backend, &request()).await.unwrap();

        let cancelled = cancel_tour(&backend, tour.id).await.unwrap();
        assert_eq!(cancelled.status, TourStatus::Cancelled);
        assert_eq!(cancelled.id, tour.id);
        assert_eq!(cancelled.property_id, tour.property_id);
        assert_eq!(cancelled.tenant_id, tour.tenant_id);
        assert_eq!(cancelled.preferred_date, tour.preferred_date);
        assert_eq!(cancelled.viewing_time, tour.viewing_time);
        assert_eq!(cancelled.notes, tour.notes);
        assert_eq!(cancelled.meeting_point, tour.meeting_point);
        assert_eq!(cancelled.duration_minutes, tour.duration_minutes);
        assert_eq!(cancelled.created_at, tour.created_at);
    }

    #[tokio::test]
    async fn cancelled_tour_cannot_be_cancelled_again() {
        let backend = MemoryBackend::new();
        let tour = schedule_tour(&backend, &request()).await.unwrap();
        cancel_tour(&backend, tour.id).await.unwrap();

        let err = cancel_tour(&backend, tour.id).await.unwrap_err();
        assert!(matches!(
            err,
            KeyatError::InvalidTransition {
                from: TourStatus::Cancelled,
                to: TourStatus::Cancelled,
            }
        ));
    }

    #[tokio::test]
    async fn confirm_then_complete() {
        let backend = MemoryBackend::new();
        let tour = schedule_tour(&backend, &request()).await.unwrap();

        let confirmed = transition_tour(&backend, tour.id, TourStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, TourStatus::Confirmed);

        let completed = transition_tour(&backend, tour.id, TourStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, TourStatus::Completed);

        // Completed is terminal.
        let err = cancel_tour(&backend, tour.id).await.unwrap_err();
        assert!(matches!(err, KeyatError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn unknown_tour_is_not_found() {
        let backend = MemoryBackend::new();
        let err = cancel_tour(&backend, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, KeyatError::NotFound));
    }
}
