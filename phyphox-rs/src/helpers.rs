use serde_json::Value;

use common::types::untimed::xyz::N_XYZ_COORDINATES;
use common::types::{SensorType, XYZ};

use crate::models::errors::PhyphoxError;

const ACC_VARIABLES: [&str; N_XYZ_COORDINATES] = ["accX", "accY", "accZ"];
const ACC_TIME: &str = "acc_time";
const GYRO_VARIABLES: [&str; N_XYZ_COORDINATES] = ["gyroX", "gyroY", "gyroZ"];
const GYRO_TIME: &str = "gyro_time";

const STATUS: &str = "status";
const MEASURING: &str = "measuring";
const BUFFER: &str = "buffer";

const EPS_MEASUREMENT_TIME: f64 = 10e-5;

/// Returns the names of the time buffer and the x/y/z buffers of `sensor` in the Phyphox experiment
pub(crate) fn control_str(
    sensor: &SensorType,
) -> Result<(&'static str, [&'static str; N_XYZ_COORDINATES]), PhyphoxError> {
    match sensor {
        SensorType::Accelerometer(_) => Ok((ACC_TIME, ACC_VARIABLES)),
        SensorType::Gyroscope(_) => Ok((GYRO_TIME, GYRO_VARIABLES)),
        SensorType::Other(_, name) => Err(PhyphoxError::Other(format!(
            "Sensor {} doesnt exist",
            name
        ))),
    }
}

/// Moves `timestamp` just past the last received sample, so the next query only returns new data
pub(crate) fn update_measurement_time(data: &[f64], timestamp: &mut f64) {
    if let Some(last_row) = data.last() {
        *timestamp = last_row + EPS_MEASUREMENT_TIME;
    }
}

pub(crate) fn get_status_from_json(data: &Value) -> Result<bool, PhyphoxError> {
    let status = data[STATUS][MEASURING]
        .as_bool()
        .ok_or(PhyphoxError::IncorrectDataFormat(
            "Missing status.measuring".to_string(),
        ))?;
    Ok(status)
}

pub(crate) fn parse_results(
    data: &Value,
    variables: &[&str],
    time_var: &str,
) -> Result<Vec<Vec<f64>>, PhyphoxError> {
    let buffers = data.get(BUFFER).ok_or(PhyphoxError::IncorrectDataFormat(
        "Missing buffer".to_string(),
    ))?;
    let mut results: Vec<Vec<f64>> = Vec::with_capacity(variables.len() + 1);
    for var in std::iter::once(time_var).chain(variables.iter().copied()) {
        let buffer = buffers.get(var).and_then(|v| v.get(BUFFER)).ok_or(
            PhyphoxError::IncorrectDataFormat(format!("Missing buffer for {}", var)),
        )?;
        let values: Vec<f64> = buffer
            .as_array()
            .ok_or(PhyphoxError::IncorrectDataFormat(format!(
                "Invalid buffer format for {}",
                var
            )))?
            .iter()
            .filter_map(|v| v.as_f64())
            .collect();
        results.push(values);
    }
    Ok(results)
}

/// Function basically transposes incoming data. Input data is structured as
/// result[0] : time
/// result[1] : x component
/// result[2] : y component
/// result[3] : z component
///
/// and the output is
/// timestamps : [time[0], time[1]....]
/// samples    : [XYZ(x[0], y[0], z[0]), XYZ(x[1], y[1], z[1]), ...]
///
/// Rows missing any of the components are dropped.
pub(crate) fn combine_results(results: Vec<Vec<f64>>) -> (Vec<f64>, Vec<XYZ>) {
    let n_samples = results.iter().map(|col| col.len()).min().unwrap_or(0);
    let mut untimed_data = Vec::with_capacity(n_samples);
    let mut timestamp = Vec::with_capacity(n_samples);

    for row in 0..n_samples {
        // skip time column
        let values: Vec<f64> = results.iter().skip(1).map(|col| col[row]).collect();

        if let Ok(xyz) = XYZ::try_from(values) {
            untimed_data.push(xyz);
            timestamp.push(results[0][row]);
        }
    }
    (timestamp, untimed_data)
}

pub(crate) fn build_query(variables: &[&str], time_var: &str, since: Option<f64>) -> String {
    let mut query = time_var.to_string();
    if let Some(since_val) = since {
        query = format!("{}={:.4}", time_var, since_val);
    }

    let variable_query: String = variables
        .iter()
        .map(|&var| match since {
            Some(since_val) => format!("&{}={:.4}|{}", var, since_val, time_var),
            None => format!("&{}", var),
        })
        .collect::<Vec<_>>()
        .join("");
    query.push_str(&variable_query);
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use uuid::Uuid;

    static GET_RESPONSE: Lazy<Value> = Lazy::new(|| {
        serde_json::json!({
            "buffer": {
                "gyroX": { "buffer": [0.1, 0.2], "size": 0, "updateMode": "partial" },
                "gyroY": { "buffer": [0.3, 0.4], "size": 0, "updateMode": "partial" },
                "gyroZ": { "buffer": [0.5, 0.6], "size": 0, "updateMode": "partial" },
                "gyro_time": { "buffer": [1.0, 1.5], "size": 0, "updateMode": "partial" }
            },
            "status": {
                "measuring": false
            }
        })
    });

    #[test]
    fn test_control_str() {
        let (time, vars) = control_str(&SensorType::Gyroscope(Uuid::new_v4())).unwrap();
        assert_eq!(time, GYRO_TIME);
        assert_eq!(vars, GYRO_VARIABLES);
        assert!(control_str(&SensorType::Other(Uuid::new_v4(), "light".to_string())).is_err());
    }

    #[test]
    fn test_build_query_without_since() {
        let query = build_query(&ACC_VARIABLES, ACC_TIME, None);
        assert_eq!(query, "acc_time&accX&accY&accZ");
    }

    #[test]
    fn test_build_query_with_since() {
        let query = build_query(&ACC_VARIABLES, ACC_TIME, Some(2.0412));
        assert_eq!(
            query,
            "acc_time=2.0412&accX=2.0412|acc_time&accY=2.0412|acc_time&accZ=2.0412|acc_time"
        );
    }

    #[test]
    fn test_update_measurement_time() {
        let mut since = 0.0;
        update_measurement_time(&[], &mut since);
        assert_eq!(since, 0.0);
        update_measurement_time(&[1.0, 2.0], &mut since);
        assert!(since > 2.0 && since < 2.001);
    }

    #[test]
    fn test_parse_and_combine() {
        let status = get_status_from_json(&GET_RESPONSE).unwrap();
        assert!(!status);

        let results = parse_results(&GET_RESPONSE, &GYRO_VARIABLES, GYRO_TIME).unwrap();
        let (timestamps, samples) = combine_results(results);
        assert_eq!(timestamps, vec![1.0, 1.5]);
        assert_eq!(
            samples,
            vec![XYZ::new([0.1, 0.3, 0.5]), XYZ::new([0.2, 0.4, 0.6])]
        );
    }

    #[test]
    fn test_parse_missing_buffer() {
        let result = parse_results(&GET_RESPONSE, &ACC_VARIABLES, ACC_TIME);
        assert!(matches!(result, Err(PhyphoxError::IncorrectDataFormat(_))));
    }

    #[test]
    fn test_missing_status() {
        let data = serde_json::json!({ "buffer": {} });
        assert!(get_status_from_json(&data).is_err());
    }

    #[test]
    fn test_combine_more_than_four_rows() {
        let results = vec![
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![1.0; 6],
            vec![2.0; 6],
            vec![3.0; 6],
        ];
        let (timestamps, samples) = combine_results(results);
        assert_eq!(timestamps.len(), 6);
        assert_eq!(samples.len(), 6);
    }
}
