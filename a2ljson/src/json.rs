use tracing::debug;

use crate::A2lError;
use crate::model::A2lFile;

/// Serialize the file as pretty printed JSON.
///
/// Absent optional keywords and empty lists are left out of the output.
pub fn to_json(a2l_file: &A2lFile) -> Result<String, A2lError> {
    let json = serde_json::to_string_pretty(a2l_file)
        .map_err(|serde_error| A2lError::SerializationError { serde_error })?;
    debug!(bytes = json.len(), "serialized file to json");
    Ok(json)
}

/// Create an `A2lFile` from its JSON representation.
///
/// The JSON must contain all positional parameters of every object, as well as the
/// `project` with its list of modules.
pub fn from_json(json: &str) -> Result<A2lFile, A2lError> {
    let a2l_file: A2lFile = serde_json::from_str(json)
        .map_err(|serde_error| A2lError::SerializationError { serde_error })?;
    debug!(
        modules = a2l_file.project.module.len(),
        "deserialized file from json"
    );
    Ok(a2l_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataType, Measurement, RawBlock, RawValue};

    #[test]
    fn field_names_and_tags() {
        let mut a2l_file = crate::new();
        let mut measurement = Measurement::new("meas", DataType::Float32Ieee, "NO_COMPU_METHOD");
        measurement.upper_limit = 1.5;
        a2l_file.project.module[0].measurement.push(measurement);

        let json = to_json(&a2l_file).unwrap();
        assert!(json.contains(r#""asap2_version": {"#));
        assert!(json.contains(r#""datatype": "FLOAT32_IEEE""#));
        assert!(json.contains(r#""upper_limit": 1.5"#));
        // absent keywords are omitted
        assert!(!json.contains("matrix_dim"));
        assert!(!json.contains("unknown"));
    }

    #[test]
    fn roundtrip() {
        let mut a2l_file = crate::new();
        let mut measurement = Measurement::new("m1", DataType::Sword, "cm");
        measurement.lower_limit = -0.1;
        measurement.upper_limit = 1e300;
        measurement.format = Some("%6.\"2\"".to_string());
        let mut raw = RawBlock::new("VENDOR", true);
        let mut inner = RawBlock::new("INNER", true);
        inner.content.push(RawValue::Identifier("x".to_string()).into());
        raw.content.push(inner.into());
        raw.content.push(RawValue::Number("0x10".to_string()).into());
        measurement.unknown.push(raw);
        a2l_file.project.module[0].measurement.push(measurement);

        let json = to_json(&a2l_file).unwrap();
        let restored = from_json(&json).unwrap();
        assert_eq!(restored, a2l_file);
        assert_eq!(
            restored.project.module[0].measurement.get("m1").unwrap().upper_limit,
            1e300
        );
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            from_json("{ not json"),
            Err(A2lError::SerializationError { .. })
        ));
        // project is mandatory
        assert!(matches!(
            from_json("{}"),
            Err(A2lError::SerializationError { .. })
        ));
        // wrong type for a field
        let json = r#"{"project": {"name": 5, "long_identifier": "", "module": []}}"#;
        assert!(from_json(json).is_err());
        // unknown enumeration tag
        let json = r#"{"project": {"name": "p", "long_identifier": "", "module": [
            {"name": "m", "long_identifier": "", "measurement": [
                {"name": "x", "long_identifier": "", "datatype": "BAD", "conversion": "c",
                 "resolution": 0, "accuracy": 0, "lower_limit": 0, "upper_limit": 0}
            ]}
        ]}}"#;
        assert!(from_json(json).is_err());
    }
}
