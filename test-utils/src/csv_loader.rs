use std::error::Error;

use csv::Reader;
use num_enum::TryFromPrimitive;

/// Bundled accelerometer and gyroscope recording replayed by the mock sensor source.
pub const SENSOR_READINGS_CSV: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/sensor_readings.csv");

/// Column layout of the bundled recording
#[repr(usize)]
#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
pub enum RecordingColumn {
    Timestamp,
    XAccel,
    YAccel,
    ZAccel,
    XGyro,
    YGyro,
    ZGyro,
}

impl From<RecordingColumn> for usize {
    fn from(value: RecordingColumn) -> Self {
        value as usize
    }
}

/// Selects the columns to extract from a recording, in order
#[derive(Clone, Debug, Default)]
pub struct CsvColumnMapper {
    columns: Vec<usize>,
}

impl CsvColumnMapper {
    pub fn new() -> Self {
        Self { columns: vec![] }
    }

    pub fn columns(&self) -> Vec<usize> {
        self.columns.clone()
    }

    /// Adds a column by index. Fails if the recording has no such column.
    pub fn add_column(&mut self, index: usize) -> Result<&mut Self, String> {
        let column = RecordingColumn::try_from(index)
            .map_err(|_| format!("Column index {} out of bounds", index))?;
        self.columns.push(column.into());
        Ok(self)
    }

    pub fn add_timestamp(&mut self) -> &mut Self {
        self.columns.push(RecordingColumn::Timestamp.into());
        self
    }

    pub fn add_accel(&mut self) -> &mut Self {
        self.columns.push(RecordingColumn::XAccel.into());
        self.columns.push(RecordingColumn::YAccel.into());
        self.columns.push(RecordingColumn::ZAccel.into());
        self
    }

    pub fn add_gyro(&mut self) -> &mut Self {
        self.columns.push(RecordingColumn::XGyro.into());
        self.columns.push(RecordingColumn::YGyro.into());
        self.columns.push(RecordingColumn::ZGyro.into());
        self
    }
}

/// Reads every row of a headed CSV file as floats. Non numeric cells are skipped.
pub fn load_csv(file_path: &str) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut rdr = Reader::from_path(file_path)?;
    let mut data = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let row: Vec<f64> = record
            .iter()
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .collect();
        data.push(row);
    }

    Ok(data)
}

/// Reads the selected `columns` of every row and converts each row into `T`
pub fn load_csv_columns<T: TryFrom<Vec<f64>>>(
    file_path: &str,
    columns: &[usize],
) -> Result<Vec<T>, Box<dyn Error>> {
    if columns.is_empty() {
        return Err("No columns provided".into());
    }

    let data = load_csv(file_path)?;

    let result = data
        .into_iter()
        .map(|rows| {
            columns
                .iter()
                .map(|&i| {
                    rows.get(i)
                        .ok_or_else(|| format!("Column index {} out of bounds", i).into())
                        .copied()
                })
                .collect::<Result<Vec<f64>, Box<dyn Error>>>()
        })
        .collect::<Result<Vec<Vec<f64>>, Box<dyn Error>>>()?
        .into_iter()
        .map(|f64_values| {
            T::try_from(f64_values).map_err(|_| "Failed to convert to T".to_string().into())
        })
        .collect::<Result<Vec<T>, Box<dyn Error>>>()?;

    Ok(result)
}
