//! Leading-timestamp recognition.
//!
//! Accepted shapes (optionally wrapped in `[...]`):
//! - `2024-06-03 14:30:25`
//! - `2024-06-03 14:30:25.123` / `2024-06-03 14:30:25,123`
//! - `2024-06-03T14:30:25Z`, `2024-06-03T14:30:25.123456+02:00`, `...-0500`
//!
//! Timestamps without an offset are read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

// "YYYY-MM-DD HH:MM:SS"
const BASE_LEN: usize = 19;

/// Read a timestamp at the very start of `line`.
///
/// Returns the instant and the remainder of the line with leading
/// whitespace removed. The timestamp must be followed by whitespace or the
/// end of the line.
pub fn read_leading_timestamp(line: &str) -> Option<(DateTime<Utc>, &str)> {
    let bytes = line.as_bytes();
    let bracketed = bytes.first() == Some(&b'[');
    let start = usize::from(bracketed);
    let b = &bytes[start..];

    if b.len() < BASE_LEN {
        return None;
    }
    if b[4] != b'-' || b[7] != b'-' || b[13] != b':' || b[16] != b':' {
        return None;
    }
    if b[10] != b' ' && b[10] != b'T' && b[10] != b't' {
        return None;
    }

    let year = digits(&b[0..4])? as i32;
    let month = digits(&b[5..7])?;
    let day = digits(&b[8..10])?;
    let hour = digits(&b[11..13])?;
    let minute = digits(&b[14..16])?;
    let second = digits(&b[17..19])?;

    let mut pos = BASE_LEN;

    let mut nanos = 0u32;
    if pos + 1 < b.len() && (b[pos] == b'.' || b[pos] == b',') && b[pos + 1].is_ascii_digit() {
        pos += 1;
        let frac_start = pos;
        while pos < b.len() && b[pos].is_ascii_digit() {
            pos += 1;
        }
        nanos = fraction_to_nanos(&b[frac_start..pos]);
    }

    let mut offset_secs: Option<i32> = None;
    if pos < b.len() {
        match b[pos] {
            b'Z' | b'z' => {
                offset_secs = Some(0);
                pos += 1;
            }
            b'+' | b'-' => {
                if let Some((secs, used)) = read_offset(&b[pos..]) {
                    offset_secs = Some(secs);
                    pos += used;
                }
            }
            _ => {}
        }
    }

    if bracketed {
        if b.get(pos) != Some(&b']') {
            return None;
        }
        pos += 1;
    }

    // Word boundary: "2024-06-03 14:30:25abc" is not a timestamp.
    if pos < b.len() && !b[pos].is_ascii_whitespace() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
    let naive = NaiveDateTime::new(date, time);

    let instant = match offset_secs {
        None | Some(0) => Utc.from_utc_datetime(&naive),
        Some(secs) => {
            let offset = FixedOffset::east_opt(secs)?;
            offset
                .from_local_datetime(&naive)
                .single()?
                .with_timezone(&Utc)
        }
    };

    let rest = &line[start + pos..];
    Some((instant, rest.trim_start()))
}

fn digits(b: &[u8]) -> Option<u32> {
    let mut value = 0u32;
    for &c in b {
        if !c.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(c - b'0');
    }
    Some(value)
}

/// Scale a fractional-second digit run to nanoseconds (extra precision is dropped).
fn fraction_to_nanos(frac: &[u8]) -> u32 {
    let used = &frac[..frac.len().min(9)];
    let mut value = digits(used).unwrap_or(0);
    for _ in used.len()..9 {
        value *= 10;
    }
    value
}

/// Parse `+HH:MM`, `+HHMM` or `+HH`. Returns (offset seconds, bytes consumed).
fn read_offset(b: &[u8]) -> Option<(i32, usize)> {
    let sign = match b.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours = digits(b.get(1..3)?)? as i32;

    let (minutes, used) = if b.get(3) == Some(&b':') {
        (digits(b.get(4..6)?)? as i32, 6)
    } else if b.len() >= 5 && b[3].is_ascii_digit() && b[4].is_ascii_digit() {
        (digits(&b[3..5])? as i32, 5)
    } else {
        (0, 3)
    };

    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((sign * (hours * 3600 + minutes * 60), used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    // ─── Accepted shapes ────────────────────────────────────────

    #[test]
    fn test_space_separated() {
        let (ts, rest) = read_leading_timestamp("2024-06-03 14:30:25 ERROR boom").unwrap();
        assert_eq!(ts, utc("2024-06-03T14:30:25Z"));
        assert_eq!(rest, "ERROR boom");
    }

    #[test]
    fn test_fractional_seconds_dot_and_comma() {
        let (ts, _) = read_leading_timestamp("2024-06-03 14:30:25.123 INFO x").unwrap();
        assert_eq!(ts.nanosecond(), 123_000_000);

        let (ts, _) = read_leading_timestamp("2024-06-03 14:30:25,5 INFO x").unwrap();
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_iso_with_zulu() {
        let (ts, rest) = read_leading_timestamp("2026-02-05T10:00:00.000Z ERROR boom").unwrap();
        assert_eq!(ts, utc("2026-02-05T10:00:00Z"));
        assert_eq!(rest, "ERROR boom");
    }

    #[test]
    fn test_iso_with_offsets() {
        let (ts, _) = read_leading_timestamp("2024-06-03T16:30:25+02:00 INFO x").unwrap();
        assert_eq!(ts, utc("2024-06-03T14:30:25Z"));

        let (ts, _) = read_leading_timestamp("2024-06-03T09:30:25-0500 INFO x").unwrap();
        assert_eq!(ts, utc("2024-06-03T14:30:25Z"));
    }

    #[test]
    fn test_nanosecond_precision_truncated() {
        let (ts, _) = read_leading_timestamp("2026-01-30T03:29:06.691716216123Z x").unwrap();
        assert_eq!(ts.nanosecond(), 691_716_216);
    }

    #[test]
    fn test_bracketed() {
        let (ts, rest) = read_leading_timestamp("[2024-06-03 14:30:25] [WARN] disk").unwrap();
        assert_eq!(ts, utc("2024-06-03T14:30:25Z"));
        assert_eq!(rest, "[WARN] disk");
    }

    #[test]
    fn test_timestamp_only_line() {
        let (_, rest) = read_leading_timestamp("2024-06-03 14:30:25").unwrap();
        assert_eq!(rest, "");
    }

    // ─── Rejections ─────────────────────────────────────────────

    #[test]
    fn test_rejects_non_timestamps() {
        assert!(read_leading_timestamp("").is_none());
        assert!(read_leading_timestamp("ERROR boom").is_none());
        assert!(read_leading_timestamp("    at com.example.Main(Main.java:1)").is_none());
        assert!(read_leading_timestamp("2024-06-03 boom").is_none());
    }

    #[test]
    fn test_rejects_invalid_calendar_values() {
        assert!(read_leading_timestamp("2024-13-03 14:30:25 INFO x").is_none());
        assert!(read_leading_timestamp("2024-06-03 25:30:25 INFO x").is_none());
    }

    #[test]
    fn test_rejects_missing_word_boundary() {
        assert!(read_leading_timestamp("2024-06-03 14:30:25abc").is_none());
    }

    #[test]
    fn test_rejects_unclosed_bracket() {
        assert!(read_leading_timestamp("[2024-06-03 14:30:25 INFO x").is_none());
    }
}
