use chrono::{Duration, NaiveTime};

use crate::models::TimeSlot;

/// Iterator over the fixed-length slots of a window.
///
/// Slots are contiguous and start at `start`. A trailing remainder shorter
/// than `interval` is dropped, and no slot may wrap past midnight, so every
/// slot lies inside `[start, end)`.
#[derive(Debug, Clone)]
pub struct SlotDivider {
    next: NaiveTime,
    end: NaiveTime,
    interval: Duration,
    exhausted: bool,
}

impl SlotDivider {
    pub fn new(start: NaiveTime, end: NaiveTime, interval: Duration) -> Self {
        Self {
            next: start,
            end,
            interval,
            exhausted: interval <= Duration::zero(),
        }
    }
}

impl Iterator for SlotDivider {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<TimeSlot> {
        if self.exhausted || self.next >= self.end {
            return None;
        }

        let (slot_end, wrapped) = self.next.overflowing_add_signed(self.interval);
        if wrapped != 0 || slot_end > self.end {
            self.exhausted = true;
            return None;
        }

        let slot = TimeSlot::new(self.next, slot_end);
        self.next = slot_end;
        Some(slot)
    }
}

pub fn divide_slots(start: NaiveTime, end: NaiveTime, interval: Duration) -> Vec<TimeSlot> {
    SlotDivider::new(start, end, interval).collect()
}

/// Divides a raw availability string; unparseable input yields no slots.
pub fn divide_window(available_time: &str, interval: Duration) -> Vec<TimeSlot> {
    match super::time_window::parse_time_range(available_time) {
        Ok(window) => divide_slots(window.start, window.end, interval),
        Err(e) => {
            tracing::warn!("Ignoring malformed availability {:?}: {}", available_time, e);
            Vec::new()
        }
    }
}
