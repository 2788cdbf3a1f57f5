use crate::fleet::{Access, Readings, TelemetryRecord, VehicleId};

use super::error::IngestError;

pub const FIELD_COUNT: usize = 4;

/// A validated input line, ready to be wrapped and added to a fleet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRecord {
    /// 1-based source line.
    pub line: usize,
    pub id: VehicleId,
    pub readings: Readings,
}

impl ParsedRecord {
    pub fn into_record<A: Access>(self) -> TelemetryRecord<A> {
        TelemetryRecord::new(self.id, self.readings)
    }
}

/// Parses `id,speed,temperature,fuel`.
///
/// Rejects a wrong field count or an unparsable number as `Malformed`, and a
/// negative speed or fuel (or any non-finite value) as `InvalidField`.
/// Temperature may be negative.
pub fn parse_line(line: &str, line_no: usize) -> Result<ParsedRecord, IngestError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(IngestError::Malformed {
            line: line_no,
            reason: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    }

    let id = fields[0].parse::<VehicleId>().map_err(|_| IngestError::Malformed {
        line: line_no,
        reason: format!("invalid id '{}'", fields[0]),
    })?;
    let speed = parse_number(fields[1], "speed", line_no)?;
    let temperature = parse_number(fields[2], "temperature", line_no)?;
    let fuel = parse_number(fields[3], "fuel", line_no)?;

    if speed < 0.0 {
        return Err(IngestError::InvalidField {
            line: line_no,
            reason: format!("negative speed {}", speed),
        });
    }
    if fuel < 0.0 {
        return Err(IngestError::InvalidField {
            line: line_no,
            reason: format!("negative fuel {}", fuel),
        });
    }

    Ok(ParsedRecord {
        line: line_no,
        id,
        readings: Readings::new(speed, temperature, fuel),
    })
}

fn parse_number(field: &str, name: &str, line_no: usize) -> Result<f64, IngestError> {
    let value = field.parse::<f64>().map_err(|_| IngestError::Malformed {
        line: line_no,
        reason: format!("invalid {} '{}'", name, field),
    })?;
    if !value.is_finite() {
        return Err(IngestError::InvalidField {
            line: line_no,
            reason: format!("non-finite {}", name),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_around_fields_is_accepted() {
        let rec = parse_line(" 7 , 80.5,\t-4, 12 \r", 1).expect("padded line should parse");
        assert_eq!(rec.id, 7);
        assert_eq!(rec.line, 1);
        assert_eq!(rec.readings, Readings::new(80.5, -4.0, 12.0));
    }

    #[test]
    fn test_trailing_comma_is_an_extra_field() {
        let err = parse_line("1,80,100,50,", 3).unwrap_err();
        assert!(matches!(err, IngestError::Malformed { line: 3, .. }));
    }

    #[test]
    fn test_nan_is_invalid_not_malformed() {
        let err = parse_line("1,NaN,100,50", 2).unwrap_err();
        assert!(matches!(err, IngestError::InvalidField { line: 2, .. }));
    }
}
