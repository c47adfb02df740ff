//! Classification and parsing of JSON number literals.
//!
//! JSON has a single number grammar while MessagePack distinguishes unsigned
//! integers, signed integers and floats. The mapping is purely lexical:
//!
//! - a literal containing `.` is a float (`f64`);
//! - otherwise a literal starting with `-` is a signed integer (`i64`);
//! - otherwise it is an unsigned integer (`u64`).
//!
//! The value never influences the class, so `-0` is a signed integer and
//! `0.0` a float. An exponent without a decimal point (`1e5`) falls in an
//! integer class and is rejected as malformed.

use core::fmt;
use core::num::IntErrorKind;

use thiserror::Error;

/// The wire class a number literal is packed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberClass {
    Unsigned,
    Signed,
    Float,
}

impl fmt::Display for NumberClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumberClass::Unsigned => "unsigned 64-bit integer",
            NumberClass::Signed => "signed 64-bit integer",
            NumberClass::Float => "64-bit float",
        })
    }
}

/// A parsed number literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// A number token that has no MessagePack encoding in its class.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumericConversionError {
    #[error("number `{token}` is out of range for a {class}")]
    OutOfRange { token: String, class: NumberClass },
    #[error("number `{token}` underflows a 64-bit float")]
    Underflow { token: String },
    #[error("`{token}` is not a valid {class} literal")]
    Malformed { token: String, class: NumberClass },
}

/// Picks the wire class for `token` without parsing it.
#[must_use]
pub fn classify(token: &str) -> NumberClass {
    if token.contains('.') {
        NumberClass::Float
    } else if token.starts_with('-') {
        NumberClass::Signed
    } else {
        NumberClass::Unsigned
    }
}

/// Parses `token` with the full width of its class.
///
/// # Errors
///
/// Returns [`NumericConversionError`] when the text overflows or underflows
/// its class, or is not a decimal literal of that class.
pub fn parse_number(token: &str) -> Result<Number, NumericConversionError> {
    let class = classify(token);
    match class {
        NumberClass::Unsigned => token
            .parse::<u64>()
            .map(Number::Unsigned)
            .map_err(|err| int_error(token, class, err.kind())),
        NumberClass::Signed => token
            .parse::<i64>()
            .map(Number::Signed)
            .map_err(|err| int_error(token, class, err.kind())),
        NumberClass::Float => parse_float(token).map(Number::Float),
    }
}

fn int_error(token: &str, class: NumberClass, kind: &IntErrorKind) -> NumericConversionError {
    match kind {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            NumericConversionError::OutOfRange {
                token: token.to_string(),
                class,
            }
        }
        _ => NumericConversionError::Malformed {
            token: token.to_string(),
            class,
        },
    }
}

fn parse_float(token: &str) -> Result<f64, NumericConversionError> {
    let malformed = || NumericConversionError::Malformed {
        token: token.to_string(),
        class: NumberClass::Float,
    };

    // `f64::from_str` also accepts `inf` and `NaN`; only decimal text is a
    // JSON number.
    let is_decimal = token
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
    if !is_decimal {
        return Err(malformed());
    }

    let value = token.parse::<f64>().map_err(|_| malformed())?;
    if value.is_infinite() {
        return Err(NumericConversionError::OutOfRange {
            token: token.to_string(),
            class: NumberClass::Float,
        });
    }
    if value == 0.0 && mantissa_is_nonzero(token) {
        return Err(NumericConversionError::Underflow {
            token: token.to_string(),
        });
    }
    Ok(value)
}

fn mantissa_is_nonzero(token: &str) -> bool {
    token
        .bytes()
        .take_while(|b| !matches!(b, b'e' | b'E'))
        .any(|b| matches!(b, b'1'..=b'9'))
}
