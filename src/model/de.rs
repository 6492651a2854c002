//! Lenient field decoders: the API sends some numbers as JSON strings.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Num(f64),
    Text(String),
}

impl Scalar {
    fn into_number<E: Error>(self) -> Result<Option<f64>, E> {
        match self {
            Scalar::Num(n) => Ok(Some(n)),
            Scalar::Text(s) if s.trim().is_empty() => Ok(None),
            Scalar::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
        }
    }
}

/// A number, or a string holding one. Blank or null reads as `0`.
pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(opt_number(d)?.unwrap_or_default())
}

/// Like [`number`], but blank or null reads as `None`.
pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<Scalar>::deserialize(d)? {
        Some(scalar) => scalar.into_number(),
        None => Ok(None),
    }
}

/// A string, or a number rendered as one.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Text(s)) => Some(s),
        Some(Scalar::Num(n)) if n.fract() == 0.0 => Some(format!("{}", n as i64)),
        Some(Scalar::Num(n)) => Some(n.to_string()),
        None => None,
    })
}
