/// Parse the leading integer of `raw`, falling back to 0.
///
/// Accepts optional surrounding whitespace, an optional sign and then digits;
/// anything after the digits is ignored (`"12abc"` is 12). Input without
/// leading digits, or a value outside the `i32` range, yields 0.
pub fn parse_points(raw: &str) -> i32 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return 0;
    }

    let mut value: i64 = 0;
    for b in digits[..len].bytes() {
        value = match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(b - b'0')))
        {
            Some(v) => v,
            None => return 0,
        };
    }
    if negative {
        value = -value;
    }

    i32::try_from(value).unwrap_or(0)
}
