//! PostgreSQL parameter encoding for [`Scalar`].
//!
//! tokio-postgres checks parameter types strictly, so a scalar converts itself
//! to whatever type the server inferred for its placeholder: integers narrow
//! with a range check, text parses into numeric columns, and any scalar can
//! be sent as `NUMERIC` or text.

use crate::value::Scalar;
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;

impl Scalar {
    fn to_i64(&self) -> Result<i64, BoxError> {
        match self {
            Scalar::Int(n) => Ok(*n),
            Scalar::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Ok(*f as i64)
            }
            Scalar::Float(f) => Err(format!("cannot bind {} as an integer", f).into()),
            Scalar::Text(s) => Ok(s.trim().parse::<i64>()?),
        }
    }

    fn to_f64(&self) -> Result<f64, BoxError> {
        match self {
            Scalar::Int(n) => Ok(*n as f64),
            Scalar::Float(f) => Ok(*f),
            Scalar::Text(s) => Ok(s.trim().parse::<f64>()?),
        }
    }
}

impl ToSql for Scalar {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match *ty {
            Type::INT2 => ToSql::to_sql(&i16::try_from(self.to_i64()?)?, ty, out),
            Type::INT4 => ToSql::to_sql(&i32::try_from(self.to_i64()?)?, ty, out),
            Type::INT8 => ToSql::to_sql(&self.to_i64()?, ty, out),
            Type::FLOAT4 => ToSql::to_sql(&(self.to_f64()? as f32), ty, out),
            Type::FLOAT8 => ToSql::to_sql(&self.to_f64()?, ty, out),
            Type::NUMERIC => {
                encode_numeric(self.to_string().trim(), out)?;
                Ok(IsNull::No)
            }
            _ => ToSql::to_sql(&self.to_string(), ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::NUMERIC
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
        )
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Write a plain decimal (`-12.50`, `7`, `.5`, `NaN`) in the binary NUMERIC
/// format: digit count, weight, sign, display scale, then base-10000 digits.
fn encode_numeric(text: &str, out: &mut BytesMut) -> Result<(), BoxError> {
    if text.eq_ignore_ascii_case("nan") {
        for field in [0u16, 0, NUMERIC_NAN, 0] {
            out.extend_from_slice(&field.to_be_bytes());
        }
        return Ok(());
    }

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (NUMERIC_NEG, rest),
        None => (NUMERIC_POS, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.len() + frac_part.len() == 0 || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(format!("cannot bind '{}' as numeric", text).into());
    }

    let int_part = int_part.trim_start_matches('0');
    let dscale = u16::try_from(frac_part.len())?;

    // Left-pad the integer part and right-pad the fraction to whole 4-digit groups.
    let int_pad = (4 - int_part.len() % 4) % 4;
    let frac_pad = (4 - frac_part.len() % 4) % 4;
    let padded: Vec<u8> = std::iter::repeat_n(b'0', int_pad)
        .chain(int_part.bytes())
        .chain(frac_part.bytes())
        .chain(std::iter::repeat_n(b'0', frac_pad))
        .collect();

    let mut groups: Vec<i16> = padded
        .chunks(4)
        .map(|chunk| chunk.iter().fold(0i16, |acc, b| acc * 10 + i16::from(b - b'0')))
        .collect();
    let mut weight = ((int_part.len() + int_pad) / 4) as i32 - 1;

    let leading = groups.iter().take_while(|g| **g == 0).count();
    groups.drain(..leading);
    weight -= leading as i32;
    while groups.last() == Some(&0) {
        groups.pop();
    }

    let (weight, sign) = if groups.is_empty() {
        (0, NUMERIC_POS)
    } else {
        (i16::try_from(weight)?, sign)
    };

    out.extend_from_slice(&i16::try_from(groups.len())?.to_be_bytes());
    out.extend_from_slice(&weight.to_be_bytes());
    out.extend_from_slice(&sign.to_be_bytes());
    out.extend_from_slice(&dscale.to_be_bytes());
    for group in groups {
        out.extend_from_slice(&group.to_be_bytes());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Scalar, ty: &Type) -> Result<Vec<u8>, BoxError> {
        let mut buf = BytesMut::new();
        value.to_sql_checked(ty, &mut buf)?;
        Ok(buf.to_vec())
    }

    fn numeric(ndigits: i16, weight: i16, sign: u16, dscale: u16, digits: &[i16]) -> Vec<u8> {
        let mut expected = Vec::new();
        expected.extend_from_slice(&ndigits.to_be_bytes());
        expected.extend_from_slice(&weight.to_be_bytes());
        expected.extend_from_slice(&sign.to_be_bytes());
        expected.extend_from_slice(&dscale.to_be_bytes());
        for d in digits {
            expected.extend_from_slice(&d.to_be_bytes());
        }
        expected
    }

    #[test]
    fn test_int_binds_to_int4() {
        assert_eq!(encode(&Scalar::Int(5), &Type::INT4).unwrap(), vec![0, 0, 0, 5]);
        assert_eq!(encode(&Scalar::Int(-2), &Type::INT2).unwrap(), vec![0xFF, 0xFE]);
        assert_eq!(encode(&Scalar::Int(7), &Type::INT8).unwrap(), 7i64.to_be_bytes().to_vec());
    }

    #[test]
    fn test_int_narrowing_is_range_checked() {
        assert!(encode(&Scalar::Int(i64::from(i32::MAX) + 1), &Type::INT4).is_err());
        assert!(encode(&Scalar::Int(40_000), &Type::INT2).is_err());
    }

    #[test]
    fn test_text_parses_into_integer_columns() {
        assert_eq!(encode(&Scalar::from("42"), &Type::INT4).unwrap(), vec![0, 0, 0, 42]);
        assert!(encode(&Scalar::from("forty-two"), &Type::INT4).is_err());
        assert!(encode(&Scalar::Float(1.5), &Type::INT4).is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            encode(&Scalar::Float(2.5), &Type::FLOAT8).unwrap(),
            2.5f64.to_be_bytes().to_vec()
        );
        assert_eq!(
            encode(&Scalar::Int(3), &Type::FLOAT4).unwrap(),
            3f32.to_be_bytes().to_vec()
        );
    }

    #[test]
    fn test_numeric_encoding() {
        assert_eq!(
            encode(&Scalar::Float(2.5), &Type::NUMERIC).unwrap(),
            numeric(2, 0, NUMERIC_POS, 1, &[2, 5000])
        );
        assert_eq!(
            encode(&Scalar::Int(12345), &Type::NUMERIC).unwrap(),
            numeric(2, 1, NUMERIC_POS, 0, &[1, 2345])
        );
        assert_eq!(
            encode(&Scalar::from("-0.00010"), &Type::NUMERIC).unwrap(),
            numeric(1, -1, NUMERIC_NEG, 5, &[1])
        );
        assert_eq!(
            encode(&Scalar::Int(0), &Type::NUMERIC).unwrap(),
            numeric(0, 0, NUMERIC_POS, 0, &[])
        );
        assert_eq!(
            encode(&Scalar::Float(f64::NAN), &Type::NUMERIC).unwrap(),
            numeric(0, 0, NUMERIC_NAN, 0, &[])
        );
        assert!(encode(&Scalar::from("1e5"), &Type::NUMERIC).is_err());
    }

    #[test]
    fn test_text_columns() {
        assert_eq!(encode(&Scalar::from("bob"), &Type::VARCHAR).unwrap(), b"bob".to_vec());
        assert_eq!(encode(&Scalar::Int(9), &Type::TEXT).unwrap(), b"9".to_vec());
    }

    #[test]
    fn test_unsupported_type_rejected() {
        assert!(encode(&Scalar::from("2024-01-01"), &Type::DATE).is_err());
    }
}
