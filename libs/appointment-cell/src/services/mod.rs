pub mod availability;
pub mod booking;
pub mod pricing;
pub mod slots;
pub mod time_window;
pub mod validation;

pub use availability::SlotAvailabilityService;
pub use booking::AppointmentBookingService;
pub use pricing::PricingService;
pub use validation::{BookingValidator, ValidatedBooking};
