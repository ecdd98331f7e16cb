use crate::constants::N_SENSORS;

/// Simulated clock of the mock phone: the current capture time and the time of the last
/// sample produced by each sensor, in seconds since the recording started.
pub(super) struct Timestamp {
    current_timestamp: f64,
    readings_timestamp: [f64; N_SENSORS],
}

impl Timestamp {
    pub(super) fn new() -> Self {
        Self {
            current_timestamp: 0f64,
            readings_timestamp: [0f64; N_SENSORS],
        }
    }

    pub(super) fn get_current_timestamp(&self) -> f64 {
        self.current_timestamp
    }

    pub(super) fn incr_current_timestamp(&mut self, delta: f64) {
        self.current_timestamp += delta;
    }

    pub(super) fn get_reading_timestamp(&self, idx: usize) -> f64 {
        self.readings_timestamp[idx]
    }

    pub(super) fn set_reading_timestamp(&mut self, idx: usize, new_timestamp: f64) {
        self.readings_timestamp[idx] = new_timestamp;
    }
}
