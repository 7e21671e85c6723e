//! FITS primary-header reader.
//!
//! A FITS file starts with a header made of 2880-byte blocks, each holding 36 ASCII
//! *cards* of 80 bytes:
//!
//! ```text
//! KEYWORD = value                 / comment
//! ```
//!
//! * Columns `0..8` hold the keyword (blank padded).
//! * Columns `8..10` hold the value indicator `"= "`; cards without it (`COMMENT`,
//!   `HISTORY`, blank cards) carry no value and are skipped.
//! * The value is a quoted string (`''` escapes a quote, trailing blanks are not
//!   significant), a logical `T`/`F`, an integer, or a real (`E` or `D` exponent).
//! * The header ends at the `END` card. The first card must be `SIMPLE`.
//!
//! Only the header is read; the data unit that follows is never touched.
//!
//! # See also
//! ------------
//! * [`FitsHeader::read`] – Read and decode the header of a file on disk.
//! * [`FitsHeader::parse`] – Decode an in-memory header.
use std::{fmt, fs::File, io::Read};

use camino::Utf8Path;
use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while, take_while1},
    character::complete::{char, one_of, space0},
    combinator::{eof, map, opt, peek},
    error::ErrorKind,
    sequence::terminated,
    IResult,
};

use crate::{
    autolog_errors::ParseMetaError,
    constants::{FITS_BLOCK_LEN, FITS_CARD_LEN, FITS_MAX_HEADER_BLOCKS},
};

/// Decoded value of a header card.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Text(String),
    Logical(bool),
    Integer(i64),
    Real(f64),
}

impl fmt::Display for HeaderValue {
    /// Field form used in exposure records: text as-is, logicals as `T`/`F`, integers
    /// as-is and reals always with a fractional part (`60.0` prints as `60.0`, `-9.8`
    /// as `-9.8`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Text(s) => write!(f, "{s}"),
            HeaderValue::Logical(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            HeaderValue::Integer(i) => write!(f, "{i}"),
            HeaderValue::Real(r) => write!(f, "{r:?}"),
        }
    }
}

/// Keyword/value cards of a FITS primary header, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitsHeader {
    cards: Vec<(String, HeaderValue)>,
}

/// Quoted string value. `''` inside the quotes is an escaped quote.
fn quoted_string(input: &str) -> IResult<&str, String> {
    let (mut input, _) = char('\'')(input)?;
    let mut out = String::new();
    loop {
        let (rest, chunk) = take_while(|c: char| c != '\'')(input)?;
        out.push_str(chunk);
        let (rest, _) = char('\'')(rest)?;
        match char::<&str, nom::error::Error<&str>>('\'')(rest) {
            Ok((rest, _)) => {
                out.push('\'');
                input = rest;
            }
            Err(_) => return Ok((rest, out.trim_end().to_string())),
        }
    }
}

fn logical(input: &str) -> IResult<&str, bool> {
    map(
        terminated(one_of("TF"), peek(alt((eof, tag(" "), tag("/"))))),
        |c| c == 'T',
    )(input)
}

fn number(input: &str) -> IResult<&str, HeaderValue> {
    let (rest, raw) = take_while1(|c: char| {
        c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'E' | 'e' | 'D' | 'd')
    })(input)?;

    let value = if raw.contains(&['.', 'E', 'e', 'D', 'd'][..]) {
        raw.replace(&['D', 'd'][..], "E")
            .parse::<f64>()
            .ok()
            .map(HeaderValue::Real)
    } else {
        raw.parse::<i64>().ok().map(HeaderValue::Integer)
    };

    value
        .map(|v| (rest, v))
        .ok_or_else(|| nom::Err::Error(nom::error::Error::new(input, ErrorKind::Float)))
}

/// Value field of a card (columns `10..80`). An all-blank field is an undefined value.
fn value_field(input: &str) -> IResult<&str, Option<HeaderValue>> {
    let (input, _) = space0(input)?;
    opt(alt((
        map(quoted_string, HeaderValue::Text),
        map(logical, HeaderValue::Logical),
        number,
    )))(input)
}

/// Split one raw card into its keyword and optional value.
fn decode_card(raw: &[u8]) -> Result<(String, Option<HeaderValue>), ParseMetaError> {
    let text = std::str::from_utf8(raw)
        .ok()
        .filter(|t| t.is_ascii())
        .ok_or_else(|| ParseMetaError::UnreadableHeader("non-ASCII header card".into()))?;

    let keyword = text[..8].trim_end().to_string();
    if &text[8..10] != "= " {
        return Ok((keyword, None));
    }

    let (_, value) = value_field(&text[10..]).map_err(|_| {
        ParseMetaError::UnreadableHeader(format!("invalid value for keyword {keyword}"))
    })?;
    Ok((keyword, value))
}

fn is_end_card(raw: &[u8]) -> bool {
    raw.starts_with(b"END") && raw[3..].iter().all(|&b| b == b' ')
}

impl FitsHeader {
    /// Decode an in-memory header, starting at the first byte of the file.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: The header bytes, at least up to and including the `END` card.
    ///
    /// Return
    /// ----------
    /// * The keyword/value cards, or [`ParseMetaError::UnreadableHeader`] if the input is
    ///   not a FITS header (no leading `SIMPLE`, no `END`, malformed value).
    pub fn parse(input: &[u8]) -> Result<Self, ParseMetaError> {
        let mut input = input;
        let mut cards = Vec::new();
        let mut first = true;

        loop {
            let (rest, raw) = take::<_, _, nom::error::Error<&[u8]>>(FITS_CARD_LEN)(input)
                .map_err(|_| {
                    ParseMetaError::UnreadableHeader("header ended before the END card".into())
                })?;
            input = rest;

            let (keyword, value) = decode_card(raw)?;
            if first && keyword != "SIMPLE" {
                return Err(ParseMetaError::UnreadableHeader(
                    "missing SIMPLE card".into(),
                ));
            }
            first = false;

            if keyword == "END" {
                break;
            }
            if let Some(value) = value {
                cards.push((keyword, value));
            }
        }

        Ok(FitsHeader { cards })
    }

    /// Read the primary header of a FITS file.
    ///
    /// Blocks are read one at a time until the block holding the `END` card; I/O errors
    /// (missing file, truncated header) are reported as
    /// [`ParseMetaError::UnreadableHeader`].
    pub fn read(path: &Utf8Path) -> Result<Self, ParseMetaError> {
        let unreadable = |e: std::io::Error| ParseMetaError::UnreadableHeader(e.to_string());

        let mut file = File::open(path).map_err(unreadable)?;
        let mut bytes = Vec::with_capacity(FITS_BLOCK_LEN);
        let mut block = [0u8; FITS_BLOCK_LEN];

        for _ in 0..FITS_MAX_HEADER_BLOCKS {
            file.read_exact(&mut block).map_err(unreadable)?;
            bytes.extend_from_slice(&block);
            if block.chunks(FITS_CARD_LEN).any(is_end_card) {
                return Self::parse(&bytes);
            }
        }

        Err(ParseMetaError::UnreadableHeader(format!(
            "no END card in the first {FITS_MAX_HEADER_BLOCKS} header blocks"
        )))
    }

    /// First value recorded for `keyword`, if any.
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v)
    }

    /// Value of `keyword` in field form (see [`HeaderValue`]'s `Display`).
    pub fn field(&self, keyword: &str) -> Option<String> {
        self.get(keyword).map(ToString::to_string)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
