use crate::prelude::{RadarError, RadarResult};
use crate::wire::record::{Distance, TelemetryRecord, MAX_ANGLE_DEGREES};

/// Distance written on the wire when the sensor saw no echo.
pub const NO_ECHO_WIRE_VALUE: f64 = -1.0;

/// Encodes a record as `<angle>,<distance>\n`.
///
/// The angle uses the shortest decimal that reads back to the same value
/// (`0`, `86`, `2.5`), the distance always carries two decimals.
pub fn encode(record: &TelemetryRecord) -> String {
    let distance = match record.distance {
        Distance::Echo(cm) => cm,
        Distance::NoEcho => NO_ECHO_WIRE_VALUE,
    };
    format!("{},{:.2}\n", record.angle_degrees, distance)
}

/// Decodes one line produced by [`encode`].
///
/// Surrounding whitespace and `\r\n` endings are ignored. A negative
/// distance is read back as [`Distance::NoEcho`].
pub fn decode(line: &str) -> RadarResult<TelemetryRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(RadarError::malformed(line, "empty line"));
    }

    let (angle_field, distance_field) = trimmed
        .split_once(',')
        .ok_or_else(|| RadarError::malformed(line, "expected <angle>,<distance>"))?;

    let angle = parse_field(line, "angle", angle_field)?;
    if !(0.0..=MAX_ANGLE_DEGREES).contains(&angle) {
        return Err(RadarError::malformed(
            line,
            format!("angle {} outside 0..={}", angle, MAX_ANGLE_DEGREES),
        ));
    }

    let distance = parse_field(line, "distance", distance_field)?;
    let distance = if distance < 0.0 {
        Distance::NoEcho
    } else {
        Distance::Echo(distance)
    };

    Ok(TelemetryRecord::new(angle, distance))
}

fn parse_field(line: &str, name: &str, field: &str) -> RadarResult<f64> {
    let value: f64 = field
        .trim()
        .parse()
        .map_err(|err| RadarError::malformed(line, format!("{}: {}", name, err)))?;
    if !value.is_finite() {
        return Err(RadarError::malformed(line, format!("{} is not finite", name)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_wire_examples() {
        assert_eq!(encode(&TelemetryRecord::echo(0.0, 13.47)), "0,13.47\n");
        assert_eq!(encode(&TelemetryRecord::echo(180.0, 5.0)), "180,5.00\n");
        assert_eq!(encode(&TelemetryRecord::echo(86.0, 7.126)), "86,7.13\n");
        assert_eq!(encode(&TelemetryRecord::echo(2.5, 0.0)), "2.5,0.00\n");
        assert_eq!(encode(&TelemetryRecord::no_echo(90.0)), "90,-1.00\n");
    }

    #[test]
    fn round_trip_keeps_angle_and_two_decimals() {
        let records = [
            TelemetryRecord::echo(0.0, 0.0),
            TelemetryRecord::echo(2.5, 13.4749),
            TelemetryRecord::echo(86.0, 19.999),
            TelemetryRecord::echo(179.125, 312.5),
            TelemetryRecord::echo(180.0, 4.005),
        ];
        for record in records {
            let decoded = decode(&encode(&record)).unwrap();
            assert_eq!(decoded.angle_degrees, record.angle_degrees);
            let original = record.distance.centimetres().unwrap();
            let restored = decoded.distance.centimetres().unwrap();
            assert!((original - restored).abs() <= 0.005 + 1e-9, "{original} vs {restored}");
        }

        let decoded = decode(&encode(&TelemetryRecord::no_echo(44.0))).unwrap();
        assert_eq!(decoded, TelemetryRecord::no_echo(44.0));
    }

    #[test]
    fn decode_tolerates_line_ending_variance() {
        let expected = TelemetryRecord::echo(10.0, 5.0);
        assert_eq!(decode("10,5.00").unwrap(), expected);
        assert_eq!(decode("10,5.00\r\n").unwrap(), expected);
        assert_eq!(decode("  10 , 5.00 \t\n").unwrap(), expected);
    }

    #[test]
    fn decode_rejects_malformed_lines() {
        for line in ["", "12", "a,b", "12,", ",5.00", "1,2,3", "\n", "10,NaN", "200,5.00", "-3,5.00"] {
            assert!(
                matches!(decode(line), Err(RadarError::MalformedRecord { .. })),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_error_keeps_offending_line() {
        match decode("30,abc") {
            Err(RadarError::MalformedRecord { line, reason }) => {
                assert_eq!(line, "30,abc");
                assert!(reason.starts_with("distance"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
