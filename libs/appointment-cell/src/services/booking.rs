// libs/appointment-cell/src/services/booking.rs
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_database::{AppState, ClinicStore};
use shared_models::clinic::{Appointment, BookingStatus, Doctor, PaymentStatus};

use crate::models::{
    AppointmentError, BookAppointmentRequest, BookingConfirmation, BookingPolicy, TimeSlot,
};
use crate::services::pricing::PricingService;
use crate::services::validation::BookingValidator;

pub struct AppointmentBookingService {
    store: Arc<dyn ClinicStore>,
    validator: BookingValidator,
    pricing: PricingService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self::with_policy(Arc::clone(&state.store), BookingPolicy::from(state.config.as_ref()))
    }

    pub fn with_policy(store: Arc<dyn ClinicStore>, policy: BookingPolicy) -> Self {
        Self {
            validator: BookingValidator::new(Arc::clone(&store), policy.slot_interval_minutes),
            pricing: PricingService::new(&policy),
            store,
        }
    }

    /// Validates, reserves the slot, and writes the appointment and its
    /// invoice. Either both records are persisted or neither is.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookingConfirmation, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} on {} at {}",
            request.patient_id, request.doctor_id, request.appointment_date, request.appointment_time_slot
        );

        // **Step 1: Validation gate**
        let validated = self.validator.validate(&request).await?;

        // **Step 2: Load the doctor before any write so a missing doctor
        // leaves nothing behind**
        let doctor = self.load_doctor(request.doctor_id).await?;

        // **Step 3: Reserve the slot**
        let now = Utc::now();
        let appointment = self
            .reserve(Appointment {
                appointment_id: Uuid::new_v4(),
                doctor_id: request.doctor_id,
                patient_id: validated.patient.patient_id,
                appointment_date: request.appointment_date,
                appointment_time_slot: validated.slot.to_string(),
                booking_status: BookingStatus::Pending,
                payment_status: PaymentStatus::Pending,
                created_at: now,
            }, &validated.slot)
            .await?;

        // **Step 4: Invoice, undoing the reservation if it fails**
        let invoice = self.pricing.build_invoice(&appointment, &doctor, now);
        let invoice = match self.store.create_invoice(invoice).await {
            Ok(invoice) => invoice,
            Err(e) => {
                error!("Failed to create invoice for appointment {}: {}", appointment.appointment_id, e);
                self.release(&appointment).await;
                return Err(AppointmentError::PersistenceError(e.to_string()));
            }
        };

        info!(
            "Appointment {} booked with invoice {} for {:.2}",
            appointment.appointment_id, invoice.invoice_id, invoice.total_amount
        );

        Ok(BookingConfirmation { appointment, invoice })
    }

    async fn load_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppointmentError> {
        self.store
            .find_doctor(doctor_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch doctor {}: {}", doctor_id, e);
                AppointmentError::from(e)
            })?
            .ok_or(AppointmentError::DoctorNotFound)
    }

    async fn reserve(
        &self,
        appointment: Appointment,
        slot: &TimeSlot,
    ) -> Result<Appointment, AppointmentError> {
        let doctor_id = appointment.doctor_id;
        let date = appointment.appointment_date;

        self.store.create_appointment(appointment).await.map_err(|e| {
            let err = AppointmentError::from(e);
            match &err {
                AppointmentError::SlotConflict => warn!(
                    "Slot {} on {} with doctor {} was reserved concurrently",
                    slot, date, doctor_id
                ),
                _ => error!("Failed to book appointment: {}", err),
            }
            err
        })
    }

    async fn release(&self, appointment: &Appointment) {
        debug!("Rolling back appointment {}", appointment.appointment_id);
        if let Err(e) = self.store.delete_appointment(appointment.appointment_id).await {
            error!(
                "Rollback of appointment {} failed, record is orphaned: {}",
                appointment.appointment_id, e
            );
        }
    }
}
