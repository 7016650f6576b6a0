use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, StampcalError};

/// Width of one header card.
pub const CARD_WIDTH: usize = 80;

/// A typed header value.
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// Keyword/value map parsed from FITS-style header cards.
///
/// Cards have the form `KEYWORD = value / comment`. Cards are either one per
/// line or packed back to back in 80-column blocks. Parsing stops at `END`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderMap {
    values: BTreeMap<String, HeaderValue>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self> {
        if !text.is_ascii() {
            return Err(StampcalError::malformed("header", "non-ASCII header text"));
        }

        let mut map = Self::new();
        for line in text.lines() {
            for chunk in line.as_bytes().chunks(CARD_WIDTH) {
                // ASCII checked above, so every chunk boundary is a char boundary.
                let card = std::str::from_utf8(chunk)
                    .map_err(|e| StampcalError::malformed("header", e.to_string()))?;
                let keyword = card.split('=').next().unwrap_or("").trim();
                if keyword == "END" && !card.contains('=') {
                    return Ok(map);
                }
                if let Some((key, value)) = parse_card(card)? {
                    map.values.insert(key, value);
                }
            }
        }
        Ok(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: HeaderValue) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HeaderValue)> {
        self.values.iter()
    }

    /// Numeric value of `key`; integers are widened, anything else is malformed.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = match self.values.get(key) {
            Some(HeaderValue::Float(x)) => *x,
            Some(HeaderValue::Int(i)) => *i as f64,
            Some(other) => {
                return Err(StampcalError::malformed(
                    key,
                    format!("expected a number, got {other}"),
                ))
            }
            None => return Err(StampcalError::MissingField(key.to_string())),
        };
        if !value.is_finite() {
            return Err(StampcalError::malformed(key, format!("non-finite value {value}")));
        }
        Ok(value)
    }

    /// Numeric value of `key` rounded to the nearest integer.
    pub fn get_rounded(&self, key: &str) -> Result<i64> {
        Ok(self.get_f64(key)?.round() as i64)
    }

    /// Non-negative integer value of `key`, e.g. an axis length.
    pub fn get_usize(&self, key: &str) -> Result<usize> {
        let value = self.get_rounded(key)?;
        usize::try_from(value)
            .map_err(|_| StampcalError::malformed(key, format!("negative value {value}")))
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.values.get(key) {
            Some(HeaderValue::Str(s)) => Ok(s),
            Some(other) => Err(StampcalError::malformed(
                key,
                format!("expected a string, got {other}"),
            )),
            None => Err(StampcalError::MissingField(key.to_string())),
        }
    }

    /// Render as newline-separated 80-column cards ending with `END`.
    ///
    /// Cards that would not fit in one line, or that are not ASCII, are
    /// rejected since [`HeaderMap::parse`] could not read them back.
    pub fn to_card_text(&self) -> Result<String> {
        let mut out = String::new();
        for (key, value) in &self.values {
            let card = format!("{key:<8}= {:>20}", value.to_string());
            if card.len() > CARD_WIDTH || !card.is_ascii() {
                return Err(StampcalError::malformed(
                    key.as_str(),
                    format!("card does not fit in {CARD_WIDTH} ASCII columns"),
                ));
            }
            out.push_str(&format!("{card:<width$}\n", width = CARD_WIDTH));
        }
        out.push_str(&format!("{:<width$}\n", "END", width = CARD_WIDTH));
        Ok(out)
    }
}

fn parse_card(card: &str) -> Result<Option<(String, HeaderValue)>> {
    let Some((key, rest)) = card.split_once('=') else {
        // COMMENT, HISTORY and blank cards carry no value.
        return Ok(None);
    };
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Ok(None);
    }

    let rest = rest.trim_start();
    let value = if let Some(quoted) = rest.strip_prefix('\'') {
        HeaderValue::Str(parse_quoted(key, quoted)?)
    } else {
        let raw = rest.split('/').next().unwrap_or("").trim();
        parse_scalar(key, raw)?
    };
    Ok(Some((key.to_string(), value)))
}

/// Quoted string body after the opening quote; `''` is an escaped quote.
fn parse_quoted(key: &str, body: &str) -> Result<String> {
    let mut out = String::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
            } else {
                return Ok(out.trim_end().to_string());
            }
        } else {
            out.push(c);
        }
    }
    Err(StampcalError::malformed(key, "unterminated string"))
}

fn parse_scalar(key: &str, raw: &str) -> Result<HeaderValue> {
    match raw {
        "" => return Err(StampcalError::malformed(key, "empty value")),
        "T" => return Ok(HeaderValue::Bool(true)),
        "F" => return Ok(HeaderValue::Bool(false)),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(HeaderValue::Int(i));
    }
    if let Ok(x) = raw.replace(['D', 'd'], "E").parse::<f64>() {
        return Ok(HeaderValue::Float(x));
    }
    Ok(HeaderValue::Str(raw.to_string()))
}
