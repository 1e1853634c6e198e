use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::clinic::AvailabilityWindow;

use crate::models::{AppointmentError, TimeSlot};
use crate::services::slots::divide_window;

pub struct SlotAvailabilityService {
    store: Arc<dyn ClinicStore>,
    interval: Duration,
}

impl SlotAvailabilityService {
    /// An interval chrono cannot represent offers no slots.
    pub fn new(store: Arc<dyn ClinicStore>, interval_minutes: i64) -> Self {
        let interval = Duration::try_minutes(interval_minutes).unwrap_or_else(|| {
            warn!("Slot interval of {} minutes is out of range", interval_minutes);
            Duration::zero()
        });
        Self { store, interval }
    }

    /// Loads the doctor's window for `date`.
    pub async fn find_window(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<AvailabilityWindow, AppointmentError> {
        self.store
            .find_availability(doctor_id, date)
            .await
            .map_err(|e| {
                error!("Failed to load availability for doctor {} on {}: {}", doctor_id, date, e);
                AppointmentError::from(e)
            })?
            .ok_or(AppointmentError::AvailabilityNotFound)
    }

    /// Every slot the window offers, booked or not, in generation order.
    pub fn candidate_slots(&self, window: &AvailabilityWindow) -> Vec<TimeSlot> {
        divide_window(&window.available_time, self.interval)
    }

    /// Candidate slots minus those held by an existing appointment.
    pub async fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, AppointmentError> {
        debug!("Resolving available slots for doctor {} on {}", doctor_id, date);

        let window = self.find_window(doctor_id, date).await?;
        let candidates = self.candidate_slots(&window);

        let bookings = self.store.find_appointments(doctor_id, date).await.map_err(|e| {
            error!("Failed to retrieve bookings for doctor {} on {}: {}", doctor_id, date, e);
            AppointmentError::from(e)
        })?;

        let booked: HashSet<TimeSlot> = bookings
            .iter()
            .filter(|appointment| appointment.occupies_slot())
            .filter_map(|appointment| match appointment.appointment_time_slot.parse::<TimeSlot>() {
                Ok(slot) => Some(slot),
                Err(e) => {
                    warn!(
                        "Appointment {} has an unreadable slot {:?}: {}",
                        appointment.appointment_id, appointment.appointment_time_slot, e
                    );
                    None
                }
            })
            .collect();

        let free: Vec<TimeSlot> = candidates
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .collect();

        debug!(
            "Doctor {} has {} free slots on {} ({} booked)",
            doctor_id,
            free.len(),
            date,
            booked.len()
        );

        Ok(free)
    }
}
