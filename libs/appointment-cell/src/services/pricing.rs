use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::clinic::{Appointment, Doctor, Invoice, InvoiceStatus, PaymentMethod};

use crate::models::BookingPolicy;

pub struct PricingService {
    surcharge: f64,
    payment_due_days: i64,
}

impl PricingService {
    pub fn new(policy: &BookingPolicy) -> Self {
        Self {
            surcharge: policy.invoice_surcharge,
            payment_due_days: policy.payment_due_days,
        }
    }

    /// Consultancy charge plus the fixed booking surcharge.
    pub fn total_amount(&self, doctor: &Doctor) -> f64 {
        doctor.consultancy_charge + self.surcharge
    }

    /// `now` plus the due period. A negative or unrepresentable period falls
    /// back to the default policy.
    fn due_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(self.payment_due_days)
            .filter(|period| *period >= Duration::zero())
            .and_then(|period| now.checked_add_signed(period))
            .unwrap_or_else(|| {
                warn!("Payment due period of {} days is out of range", self.payment_due_days);
                now + Duration::days(BookingPolicy::default().payment_due_days)
            })
    }

    /// Builds the pending invoice for a freshly booked appointment.
    pub fn build_invoice(&self, appointment: &Appointment, doctor: &Doctor, now: DateTime<Utc>) -> Invoice {
        let total_amount = self.total_amount(doctor);
        debug!(
            "Invoicing appointment {}: {:.2} consultancy + {:.2} surcharge",
            appointment.appointment_id, doctor.consultancy_charge, self.surcharge
        );

        Invoice {
            invoice_id: Uuid::new_v4(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            appointment_id: appointment.appointment_id,
            total_amount,
            payment_method: PaymentMethod::Pending,
            payment_status: InvoiceStatus::Pending,
            payment_due_date: self.due_date(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_models::clinic::{BookingStatus, PaymentStatus};

    fn doctor(charge: f64) -> Doctor {
        Doctor {
            doctor_id: Uuid::new_v4(),
            name: "Dr. Rao".to_string(),
            age: 50,
            gender: "male".to_string(),
            specialization: "dermatology".to_string(),
            experience: 20,
            consultancy_charge: charge,
            hospital_id: Uuid::new_v4(),
            approved: true,
        }
    }

    fn appointment(doctor: &Doctor) -> Appointment {
        Appointment {
            appointment_id: Uuid::new_v4(),
            doctor_id: doctor.doctor_id,
            patient_id: Uuid::new_v4(),
            appointment_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            appointment_time_slot: "09:00-09:30".to_string(),
            booking_status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn invoice_adds_surcharge_and_one_day_due_date() {
        let pricing = PricingService::new(&BookingPolicy::default());
        let doctor = doctor(300.0);
        let appointment = appointment(&doctor);
        let now = Utc::now();

        let invoice = pricing.build_invoice(&appointment, &doctor, now);

        assert_eq!(invoice.total_amount, 350.0);
        assert_eq!(invoice.payment_due_date, now + Duration::days(1));
        assert_eq!(invoice.appointment_id, appointment.appointment_id);
        assert_eq!(invoice.payment_method, PaymentMethod::Pending);
        assert_eq!(invoice.payment_status, InvoiceStatus::Pending);
    }

    #[test]
    fn out_of_range_due_days_fall_back_to_one_day() {
        let doctor = doctor(100.0);
        let appointment = appointment(&doctor);
        let now = Utc::now();

        for days in [-2, i64::MAX / 10, i64::MAX] {
            let policy = BookingPolicy { payment_due_days: days, ..BookingPolicy::default() };
            let invoice = PricingService::new(&policy).build_invoice(&appointment, &doctor, now);
            assert_eq!(invoice.payment_due_date, now + Duration::days(1), "days {}", days);
        }
    }

    #[test]
    fn policy_overrides_surcharge() {
        let policy = BookingPolicy { invoice_surcharge: 0.0, ..BookingPolicy::default() };
        let pricing = PricingService::new(&policy);
        assert_eq!(pricing.total_amount(&doctor(120.0)), 120.0);
    }
}
