use uuid::Uuid;

pub const SENSOR_BINSIZE: usize = 1000;
pub const ACCELEROMETER_OFFSET: usize = 0;
pub const GYROSCOPE_OFFSET: usize = SENSOR_BINSIZE;
pub const OTHER_OFFSET: usize = SENSOR_BINSIZE * 2;
pub const MAX_OFFSET: usize = SENSOR_BINSIZE * 3;

const ACCELEROMETER_KEY: &str = "acc";
const GYROSCOPE_KEY: &str = "gyr";

/// Sensor of a cluster, identified by its kind and an id.
///
/// Every sensor maps to a `usize` inside the range of its kind (`ACCELEROMETER_OFFSET..`,
/// `GYROSCOPE_OFFSET..`, `OTHER_OFFSET..`), so sources can tell kinds apart without matching.
///
/// ```
/// use common::types::sensors::sensor_type::{SensorType, GYROSCOPE_OFFSET, OTHER_OFFSET};
/// use uuid::Uuid;
///
/// let gyroscope = SensorType::Gyroscope(Uuid::new_v4());
/// assert!((GYROSCOPE_OFFSET..OTHER_OFFSET).contains(&usize::from(&gyroscope)));
/// assert!(gyroscope.matches_kind("Gyroscope"));
/// ```
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash, Eq)]
pub enum SensorType {
    Accelerometer(Uuid),
    Gyroscope(Uuid),
    /// Any other sensor, with the name its source gives it
    Other(Uuid, String),
}

impl SensorType {
    /// Returns true if `name` (as reported by a sensor source, e.g. `"Accelerometer"` or
    /// `"gyr"`) designates the same kind of sensor, regardless of its id.
    pub fn matches_kind(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self {
            SensorType::Accelerometer(_) => name.contains(ACCELEROMETER_KEY),
            SensorType::Gyroscope(_) => name.contains(GYROSCOPE_KEY),
            SensorType::Other(_, other) => name == other.to_lowercase(),
        }
    }
}

impl From<&SensorType> for usize {
    fn from(value: &SensorType) -> Self {
        let bin = |uuid: &Uuid| {
            uuid.as_bytes().iter().map(|&b| b as usize).sum::<usize>() % SENSOR_BINSIZE
        };
        match value {
            SensorType::Accelerometer(uuid) => ACCELEROMETER_OFFSET + bin(uuid),
            SensorType::Gyroscope(uuid) => GYROSCOPE_OFFSET + bin(uuid),
            SensorType::Other(uuid, _) => OTHER_OFFSET + bin(uuid),
        }
    }
}

impl From<SensorType> for usize {
    fn from(value: SensorType) -> Self {
        usize::from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_ranges() {
        for _ in 0..20 {
            let acc = usize::from(SensorType::Accelerometer(Uuid::new_v4()));
            let gyro = usize::from(SensorType::Gyroscope(Uuid::new_v4()));
            let other = usize::from(SensorType::Other(Uuid::new_v4(), "Light".to_string()));
            assert!((ACCELEROMETER_OFFSET..GYROSCOPE_OFFSET).contains(&acc));
            assert!((GYROSCOPE_OFFSET..OTHER_OFFSET).contains(&gyro));
            assert!((OTHER_OFFSET..MAX_OFFSET).contains(&other));
        }
    }

    #[test]
    fn test_index_is_stable() {
        let sensor = SensorType::Gyroscope(Uuid::new_v4());
        assert_eq!(usize::from(&sensor), usize::from(sensor.clone()));
    }

    #[test]
    fn test_matches_kind() {
        let acc = SensorType::Accelerometer(Uuid::new_v4());
        let gyro = SensorType::Gyroscope(Uuid::new_v4());
        let light = SensorType::Other(Uuid::new_v4(), "Light".to_string());
        assert!(acc.matches_kind("Accelerometer"));
        assert!(acc.matches_kind("acc"));
        assert!(!acc.matches_kind("Gyroscope"));
        assert!(gyro.matches_kind("gyroscope"));
        assert!(!gyro.matches_kind("Magnetometer"));
        assert!(light.matches_kind("light"));
        assert!(!light.matches_kind("Lightness"));
    }
}
