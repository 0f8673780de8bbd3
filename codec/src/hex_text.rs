use num_bigint::BigInt;

/// Renders a hex value returned by the chain for display.
///
/// Numeric types (anything but `"String"`) are parsed as an arbitrary
/// precision integer (`0x`/`0o`/`0b` prefixed or decimal) and printed in
/// decimal. Strings have their first two characters (the `0x` prefix) removed,
/// are hex-decoded and then lose their first character, which is the one-byte
/// length prefix of the encoded string.
///
/// Numbers which cannot be parsed are returned unchanged.
pub fn hex_to_string(hex: &str, type_name: &str) -> String {
    if hex.is_empty() {
        return String::new();
    }

    if type_name != "String" {
        return match parse_big_int(hex) {
            Some(value) => value.to_string(),
            None => {
                tracing::error!(hex, "error converting hex to string: invalid integer");
                hex.to_owned()
            }
        };
    }

    let clean_hex = hex.chars().skip(2).collect::<String>();
    let bytes = decode_hex_prefix(&clean_hex);
    String::from_utf8_lossy(&bytes).chars().skip(1).collect()
}

/// Lowercase hex of the UTF-8 bytes, without a prefix.
pub fn string_to_hex(text: &str) -> String {
    hex::encode(text.as_bytes())
}

fn parse_big_int(s: &str) -> Option<BigInt> {
    let s = s.trim();
    if s.is_empty() {
        return Some(BigInt::default());
    }

    let (digits, radix) = match s.get(..2) {
        Some("0x" | "0X") => (&s[2..], 16),
        Some("0o" | "0O") => (&s[2..], 8),
        Some("0b" | "0B") => (&s[2..], 2),
        _ => (s, 10),
    };

    // Only decimal literals may carry a sign, digit separators are not allowed
    if digits.is_empty()
        || digits.contains('_')
        || (radix != 10 && digits.starts_with(['+', '-']))
    {
        return None;
    }
    BigInt::parse_bytes(digits.as_bytes(), radix)
}

/// Decodes hex pairs up to the first invalid one.
fn decode_hex_prefix(s: &str) -> Vec<u8> {
    s.as_bytes()
        .chunks_exact(2)
        .map_while(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}
