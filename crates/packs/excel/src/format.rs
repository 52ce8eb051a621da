//! Number and date conversions between cell values and their text forms.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial 60 is the phantom 1900-02-29 of the 1900 date system.
const LEAP_BUG_SERIAL: f64 = 61.0;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Parse a number the way spreadsheet text inputs are interpreted.
///
/// Leading and trailing whitespace is ignored and a trailing `d`/`f` type
/// suffix is accepted. Textual specials such as `inf` and `nan` are text.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_suffix(['d', 'D', 'f', 'F'])
        .unwrap_or(trimmed);
    if body.is_empty()
        || body
            .chars()
            .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    body.parse::<f64>().ok()
}

/// Render a float the way a JVM `double` prints.
///
/// Integral values keep a `.0` suffix and magnitudes outside
/// `[1e-3, 1e7)` use `E` notation.
pub fn java_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }
    let magnitude = value.abs();
    if (1e-3..1e7).contains(&magnitude) {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        let text = format!("{value:e}");
        let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
        if mantissa.contains('.') {
            format!("{mantissa}E{exponent}")
        } else {
            format!("{mantissa}.0E{exponent}")
        }
    }
}

/// Round half-up to two decimals and drop trailing zeros.
///
/// The result is always plain notation: `100.0` renders as `100`, `2.345`
/// as `2.35` and `-0.001` as `0`.
pub fn round_two_decimals(value: f64) -> String {
    if !value.is_finite() {
        return java_double(value);
    }
    let text = value.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(2))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(2).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - 2;
    let int_str: String = digits[..split]
        .iter()
        .map(|d| char::from(b'0' + d))
        .collect::<String>();
    let int_str = match int_str.trim_start_matches('0') {
        "" => "0",
        s => s,
    };
    let frac_str: String = digits[split..].iter().map(|d| char::from(b'0' + d)).collect();
    let frac_str = frac_str.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_str != "0" || !frac_str.is_empty()) {
        out.push('-');
    }
    out.push_str(int_str);
    if !frac_str.is_empty() {
        out.push('.');
        out.push_str(frac_str);
    }
    out
}

/// Spreadsheet serial number of a timestamp, 1900 date system.
#[allow(clippy::cast_precision_loss)]
pub fn to_serial(value: NaiveDateTime) -> f64 {
    let elapsed = value - epoch();
    let serial = elapsed.num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0);
    if serial < LEAP_BUG_SERIAL {
        serial - 1.0
    } else {
        serial
    }
}

/// Timestamp of a spreadsheet serial number, 1900 date system.
#[allow(clippy::cast_possible_truncation)]
pub fn from_serial(serial: f64) -> NaiveDateTime {
    let adjusted = if serial < LEAP_BUG_SERIAL {
        serial + 1.0
    } else {
        serial
    };
    let millis = (adjusted * SECONDS_PER_DAY * 1000.0).round() as i64;
    epoch() + Duration::milliseconds(millis)
}

/// Render a serial as `dd-MMM-yyyy`, e.g. `05-Mar-2021`.
pub fn serial_to_day_text(serial: f64) -> String {
    from_serial(serial).format("%d-%b-%Y").to_string()
}

/// Parse free-form date text into a timestamp.
///
/// Accepts US style `MM/DD/YYYY`, ISO-like `YYYY/MM/DD` and `YYYY-MM-DD`,
/// each optionally followed by a time, plus RFC 2822.
pub fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    const DATE_TIME_FORMATS: &[&str] = &[
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y/%m/%d", "%Y-%m-%d"];

    let trimmed = text.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(trimmed, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(trimmed, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .or_else(|| DateTime::parse_from_rfc2822(trimmed).ok().map(|d| d.naive_local()))
}

/// Parse a strict `YYYY/MM/DD` date into its serial.
pub fn parse_ymd_serial(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'/' || bytes[7] != b'/' {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y/%m/%d")
        .ok()
        .map(|d| to_serial(d.and_time(NaiveTime::MIN)))
}

/// Parse `HH:MM` or `HH:MM:SS` into a fraction of a day.
pub fn parse_time_fraction(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let time = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()?;
    Some(f64::from(time.num_seconds_from_midnight()) / SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("1.5e3"), Some(1500.0));
        assert_eq!(parse_number("-0.25"), Some(-0.25));
        assert_eq!(parse_number("7d"), Some(7.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("1,5"), None);
    }

    #[test]
    fn java_double_rendering() {
        assert_eq!(java_double(3.0), "3.0");
        assert_eq!(java_double(2.5), "2.5");
        assert_eq!(java_double(-12.0), "-12.0");
        assert_eq!(java_double(0.0), "0.0");
        assert_eq!(java_double(1.0e7), "1.0E7");
        assert_eq!(java_double(1.25e-4), "1.25E-4");
        assert_eq!(java_double(123_456.789), "123456.789");
    }

    #[test]
    fn rounding_half_up() {
        assert_eq!(round_two_decimals(2.345), "2.35");
        assert_eq!(round_two_decimals(2.344), "2.34");
        assert_eq!(round_two_decimals(100.0), "100");
        assert_eq!(round_two_decimals(1.5), "1.5");
        assert_eq!(round_two_decimals(9.999), "10");
        assert_eq!(round_two_decimals(99.995), "100");
        assert_eq!(round_two_decimals(-1.005), "-1.01");
        assert_eq!(round_two_decimals(-0.001), "0");
        assert_eq!(round_two_decimals(0.0), "0");
    }

    #[test]
    fn serial_round_trip() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let serial = to_serial(date);
        assert!((serial - 44_260.5).abs() < 1e-9);
        assert_eq!(from_serial(serial), date);
        assert_eq!(serial_to_day_text(serial), "05-Mar-2021");
    }

    #[test]
    fn early_serials_account_for_phantom_leap_day() {
        let date = NaiveDate::from_ymd_opt(1900, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert!((to_serial(date) - 1.0).abs() < 1e-9);
        let march = NaiveDate::from_ymd_opt(1900, 3, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert!((to_serial(march) - 61.0).abs() < 1e-9);
    }

    #[test]
    fn date_text_formats() {
        assert!(parse_date_text("03/05/2021").is_some());
        assert!(parse_date_text("2021/03/05 10:30:00").is_some());
        assert!(parse_date_text("Fri, 05 Mar 2021 10:30:00 +0000").is_some());
        assert!(parse_date_text("hello").is_none());
    }

    #[test]
    fn strict_ymd_and_time() {
        assert!(parse_ymd_serial("2021/03/05").is_some());
        assert!(parse_ymd_serial("2021-03-05").is_none());
        assert!(parse_ymd_serial("2021/3/5").is_none());
        assert_eq!(parse_time_fraction("12:00"), Some(0.5));
        assert_eq!(parse_time_fraction("06:00:00"), Some(0.25));
        assert!(parse_time_fraction("25:00").is_none());
    }
}
