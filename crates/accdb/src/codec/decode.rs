//! Value decoding rules.
//!
//! Raw values read from a key/value line pass through [`VALUE_DECODERS`]; the
//! first rule whose predicate accepts the `(field, raw)` pair decides the
//! stored text. Values no rule accepts are stored verbatim.

use chrono::Local;
use data_encoding::BASE64;

/// Prefix of a transport-encoded (base64) value.
pub const TRANSPORT_MARKER: &str = "<base64> ";

const PRIVATE_OPEN: &str = "<private[";
const PRIVATE_CLOSE: &str = "]>";

/// Keywords accepted by `date.*` fields in place of a literal date.
const RELATIVE_DATES: &[&str] = &["now", "today"];

/// Outcome of decoding one raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Store this text.
    Text(String),
    /// The raw value was a redaction placeholder; the secret is gone.
    Lost,
    /// The value claimed an encoding it does not satisfy; stored verbatim.
    Undecodable(String),
}

pub struct ValueDecoder {
    pub name: &'static str,
    applies: fn(field: &str, raw: &str) -> bool,
    decode: fn(raw: &str) -> Decoded,
}

/// Decoding rules in priority order.
pub const VALUE_DECODERS: &[ValueDecoder] = &[
    ValueDecoder {
        name: "lost-private",
        applies: |_, raw| is_redacted(raw),
        decode: |_| Decoded::Lost,
    },
    ValueDecoder {
        name: "transport-base64",
        applies: |_, raw| raw.starts_with(TRANSPORT_MARKER),
        decode: decode_transport,
    },
    ValueDecoder {
        name: "relative-date",
        applies: |field, raw| field.starts_with("date.") && RELATIVE_DATES.contains(&raw),
        decode: |_| Decoded::Text(today()),
    },
];

/// Runs `raw` through the decoder table for a canonical `field`.
pub fn decode_value(field: &str, raw: &str) -> Decoded {
    VALUE_DECODERS
        .iter()
        .find(|decoder| (decoder.applies)(field, raw))
        .map(|decoder| (decoder.decode)(raw))
        .unwrap_or_else(|| Decoded::Text(raw.to_string()))
}

/// Wraps text in the transport encoding.
pub fn encode_transport(text: &str) -> String {
    format!("{}{}", TRANSPORT_MARKER, BASE64.encode(text.as_bytes()))
}

fn decode_transport(raw: &str) -> Decoded {
    let encoded = &raw[TRANSPORT_MARKER.len()..];
    BASE64
        .decode(encoded.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .map(Decoded::Text)
        .unwrap_or_else(|| Decoded::Undecodable(raw.to_string()))
}

fn is_redacted(raw: &str) -> bool {
    raw.starts_with(PRIVATE_OPEN) && raw.ends_with(PRIVATE_CLOSE)
}

/// Today's local date in ISO form.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
