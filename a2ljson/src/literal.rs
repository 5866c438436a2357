use num_traits::PrimInt;

use crate::specification::IntType;

// decode_string()
// Resolve the escape sequences in the text between the quotes of a string token.
// Besides the backslash escapes a doubled quote is accepted, because legacy files use it.
// An unknown escape loses its backslash; a lone backslash at the very end is kept.
pub(crate) fn decode_string(text: &str) -> String {
    // most strings contain no escapes at all
    if !text.contains(['\\', '"']) {
        return text.to_owned();
    }

    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => output.push('\n'),
                Some('r') => output.push('\r'),
                Some('t') => output.push('\t'),
                Some(other) => output.push(other),
                None => output.push('\\'),
            },
            '"' => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                }
                output.push('"');
            }
            _ => output.push(c),
        }
    }
    output
}

// encode_string()
// The exact inverse of decode_string(): six characters are escaped, everything else
// (including non-ASCII text) is copied unchanged. The surrounding quotes are not added.
pub(crate) fn encode_string(value: &str) -> String {
    if !value.contains(['\'', '"', '\\', '\r', '\n', '\t']) {
        return value.to_owned();
    }

    let mut output = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' => {
                output.push('\\');
                output.push(c);
            }
            '\r' => output.push_str("\\r"),
            '\n' => output.push_str("\\n"),
            '\t' => output.push_str("\\t"),
            _ => output.push(c),
        }
    }
    output
}

fn hex_digits(text: &str) -> Option<&str> {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .filter(|digits| !digits.is_empty())
}

// parse_integer()
// Hex literals are read as raw bit patterns of the target width: for signed types a
// value with the high bit set is sign-extended, e.g. 0xFFFF is -1 as an i16.
pub(crate) fn parse_integer<T>(text: &str) -> Option<T>
where
    T: PrimInt,
{
    if let Some(digits) = hex_digits(text) {
        let raw = u64::from_str_radix(digits, 16).ok()?;
        if let Some(value) = <T as num_traits::NumCast>::from(raw) {
            return Some(value);
        }
        let is_signed = T::min_value() < T::zero();
        let bits = T::zero().count_zeros();
        if is_signed && bits < 64 && raw < (1u64 << bits) {
            let extended = <i128 as From<u64>>::from(raw) - (1i128 << bits);
            return <T as num_traits::NumCast>::from(extended);
        }
        if is_signed && bits == 64 {
            // i64: reinterpret all 64 bits
            return <T as num_traits::NumCast>::from(raw as i64);
        }
        None
    } else {
        T::from_str_radix(text, 10).ok()
    }
}

// parse_int_type()
// Decode an integer with the range of the given schema integer type.
pub(crate) fn parse_int_type(text: &str, int_type: IntType) -> Option<i128> {
    match int_type {
        IntType::Uint => parse_integer::<u16>(text).map(Into::<i128>::into),
        IntType::Int => parse_integer::<i16>(text).map(Into::<i128>::into),
        IntType::Ulong => parse_integer::<u32>(text).map(Into::<i128>::into),
        IntType::Long => parse_integer::<i32>(text).map(Into::<i128>::into),
        IntType::Uint64 => parse_integer::<u64>(text).map(Into::<i128>::into),
        IntType::Int64 => parse_integer::<i64>(text).map(Into::<i128>::into),
    }
}

// parse_float()
// Some vendor tools write float limits of integer quantities in hex notation,
// so hex is accepted here as well.
pub(crate) fn parse_float(text: &str) -> Option<f64> {
    if let Some(digits) = hex_digits(text) {
        u64::from_str_radix(digits, 16).ok().map(|num| num as f64)
    } else {
        text.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}
