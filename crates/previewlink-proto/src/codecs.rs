//! Encoding of non-string values carried as command arguments.
//!
//! The command channel is text-only, so anything that isn't naturally a
//! string travels in one of two shapes: decimal ASCII integers, or (for
//! the scale factor) the decimal rendering of the float's raw bit
//! pattern, which round-trips bit-exactly where a formatted decimal
//! would not.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::{ProtoError, Result};

/// Encode a scale factor as the decimal form of its IEEE-754 bit pattern.
///
/// The bits are rendered as a signed 64-bit integer, so negative doubles
/// (sign bit set) produce a negative decimal string.
pub fn encode_scale(scale: f64) -> String {
    (scale.to_bits() as i64).to_string()
}

/// Recover a scale factor from its bit-pattern argument.
///
/// Returns `None` for a non-numeric argument; callers decide whether
/// that drops the enclosing request or fails the exchange.
pub fn decode_scale(arg: &str) -> Option<f64> {
    arg.parse::<i64>().ok().map(|bits| f64::from_bits(bits as u64))
}

/// Percent-encode an executable path so it is safe as a single command
/// argument.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, NON_ALPHANUMERIC).to_string()
}

/// Reverse [`encode_path`].
pub fn decode_path(arg: &str) -> Result<String> {
    percent_decode_str(arg)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(ProtoError::PercentDecode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_known_bit_pattern() {
        assert_eq!(encode_scale(1.5), "4609434218613702656");
        assert_eq!(decode_scale("4609434218613702656"), Some(1.5));
    }

    #[test]
    fn scale_roundtrip_is_bit_exact() {
        let values = [
            0.0,
            -0.0,
            1.0,
            1.5,
            -2.75,
            0.1,
            f64::MIN_POSITIVE,
            f64::MIN_POSITIVE / 2.0, // subnormal
            f64::MAX,
            f64::MIN,
            std::f64::consts::PI,
        ];
        for value in values {
            let decoded = decode_scale(&encode_scale(value)).unwrap();
            assert_eq!(
                decoded.to_bits(),
                value.to_bits(),
                "scale {value} did not round-trip bit-exactly"
            );
        }
    }

    #[test]
    fn negative_scale_encodes_as_negative_decimal() {
        // Sign bit set, so the signed rendering is negative.
        assert!(encode_scale(-1.0).starts_with('-'));
        assert_eq!(decode_scale(&encode_scale(-1.0)), Some(-1.0));
    }

    #[test]
    fn non_numeric_scale_is_none() {
        assert_eq!(decode_scale("not-a-number"), None);
        assert_eq!(decode_scale(""), None);
        assert_eq!(decode_scale("1.5"), None);
    }

    #[test]
    fn path_with_spaces_roundtrips() {
        let path = "/opt my jdk/bin/java";
        let encoded = encode_path(path);
        assert!(!encoded.contains(' '));
        assert_eq!(decode_path(&encoded).unwrap(), path);
    }

    #[test]
    fn plain_path_roundtrips() {
        let path = "/opt/jdk/bin/java";
        assert_eq!(decode_path(&encode_path(path)).unwrap(), path);
    }

    #[test]
    fn unicode_path_roundtrips() {
        let path = "C:\\Program Files\\Ünicode JDK\\bin\\java.exe";
        assert_eq!(decode_path(&encode_path(path)).unwrap(), path);
    }

    #[test]
    fn invalid_percent_utf8_rejected() {
        let err = decode_path("%FF%FE").unwrap_err();
        assert!(matches!(err, ProtoError::PercentDecode(_)));
    }
}
