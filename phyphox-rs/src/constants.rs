/// Number of sensors the phone exposes: accelerometer and gyroscope
pub(crate) const N_SENSORS: usize = 2;
pub(crate) const ACCELEROMETER_IDX: usize = 0;
pub(crate) const GYROSCOPE_IDX: usize = 1;
