use common::types::{SensorType, XYZ};

pub const CSV_HEADER: &str = "Timestamp,Accelerometer X,Accelerometer Y,Accelerometer Z,Gyroscope X,Gyroscope Y,Gyroscope Z,Cadence";
pub const N_CSV_FIELDS: usize = 8;

/// One sensor reading tagged with the cadence entered when it arrived.
///
/// A record carries the values of a single sensor. The columns of the other sensor are left
/// empty when serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    timestamp_millis: u64,
    accelerometer: Option<XYZ>,
    gyroscope: Option<XYZ>,
    cadence: String,
}

impl SampleRecord {
    /// Builds the record of a reading of `sensor`. Returns None for sensors that are neither an
    /// accelerometer nor a gyroscope.
    pub fn from_reading(
        timestamp_millis: u64,
        sensor: &SensorType,
        measurement: &XYZ,
        cadence: &str,
    ) -> Option<Self> {
        let (accelerometer, gyroscope) = match sensor {
            SensorType::Accelerometer(_) => (Some(measurement.clone()), None),
            SensorType::Gyroscope(_) => (None, Some(measurement.clone())),
            SensorType::Other(..) => return None,
        };
        Some(Self {
            timestamp_millis,
            accelerometer,
            gyroscope,
            cadence: cadence.to_string(),
        })
    }

    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp_millis
    }

    pub fn accelerometer(&self) -> Option<&XYZ> {
        self.accelerometer.as_ref()
    }

    pub fn gyroscope(&self) -> Option<&XYZ> {
        self.gyroscope.as_ref()
    }

    pub fn cadence(&self) -> &str {
        &self.cadence
    }

    /// Column values in `CSV_HEADER` order
    pub fn fields(&self) -> [String; N_CSV_FIELDS] {
        let [ax, ay, az] = axis_fields(self.accelerometer.as_ref());
        let [gx, gy, gz] = axis_fields(self.gyroscope.as_ref());
        [
            self.timestamp_millis.to_string(),
            ax,
            ay,
            az,
            gx,
            gy,
            gz,
            self.cadence.clone(),
        ]
    }

    /// `{ts},{ax},{ay},{az},{gx},{gy},{gz},{cadence}`
    pub fn to_csv_line(&self) -> String {
        self.fields().join(",")
    }
}

fn axis_fields(measurement: Option<&XYZ>) -> [String; 3] {
    match measurement {
        Some(xyz) => xyz.inner().map(|v| v.to_string()),
        None => Default::default(),
    }
}
