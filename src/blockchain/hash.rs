//! Canonical block serialization and the SHA-256 digest built on it.
//!
//! The canonical form is what both the verifier and an external miner hash:
//! keys sorted at every depth, `", "` / `": "` separators, ASCII-only output.
//! Two blocks with equal field values always produce the same bytes,
//! whatever order their transaction maps were populated in. Numbers follow
//! the dump as well: integers keep every digit, floats use the shortest
//! round-trip digits with a signed, two-digit exponent outside `1e-4..1e16`.

use std::io::{self, Write};

use serde::ser::{Error as _, SerializeMap, Serializer};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::Block;
use super::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// Field view of a block with members declared in lexicographic order.
#[derive(Serialize)]
struct CanonicalBlock<'a> {
    index: u64,
    previous_hash: &'a str,
    proof: u128,
    timestamp: f64,
    transactions: Vec<SortedKeys<'a>>,
}

/// Serializes a JSON value with object keys sorted by code point, recursively.
struct SortedKeys<'a>(&'a Value);

impl Serialize for SortedKeys<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    out.serialize_entry(key, &SortedKeys(value))?;
                }
                out.end()
            }
            Value::Array(items) => serializer.collect_seq(items.iter().map(SortedKeys)),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    serializer.serialize_u64(u)
                } else if let Some(i) = n.as_i64() {
                    serializer.serialize_i64(i)
                } else if is_integer_literal(&n.to_string()) {
                    // Beyond 64 bits: the raw digits are written as received.
                    n.serialize(serializer)
                } else {
                    match n.as_f64() {
                        Some(f) => serializer.serialize_f64(f),
                        None => Err(S::Error::custom(format!("number {n} is not finite"))),
                    }
                }
            }
            other => other.serialize(serializer),
        }
    }
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Shortest round-trip float text in the dump's layout: positional between
/// 1e-4 and 1e16 (always with a fractional part), scientific otherwise.
fn float_repr(value: f64) -> String {
    let sci = format!("{value:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    // Position of the decimal point relative to the first digit.
    let point = exp + 1;
    if point <= -4 || point > 16 {
        let (head, tail) = digits.split_at(1);
        let frac = if tail.is_empty() { String::new() } else { format!(".{tail}") };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{sign}{head}{frac}e{exp_sign}{:02}", exp.unsigned_abs())
    } else if point <= 0 {
        format!("{sign}0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else {
        let point = point as usize;
        if digits.len() <= point {
            format!("{sign}{digits}{}.0", "0".repeat(point - digits.len()))
        } else {
            format!("{sign}{}.{}", &digits[..point], &digits[point..])
        }
    }
}

/// JSON formatter matching a sort-keys dump with default separators and
/// ASCII-escaped strings.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        // Quotes, backslashes and C0 controls never reach this point.
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Canonical string form of a block.
pub fn canonical_string(block: &Block) -> Result<String> {
    if !block.timestamp.is_finite() {
        return Err(LedgerError::MalformedBlock(format!(
            "timestamp {} is not a finite number",
            block.timestamp
        )));
    }

    let view = CanonicalBlock {
        index: block.index,
        previous_hash: &block.previous_hash,
        proof: block.proof,
        timestamp: block.timestamp,
        transactions: block
            .transactions
            .iter()
            .map(Transaction::payload)
            .map(SortedKeys)
            .collect(),
    };

    to_canonical(&view, LedgerError::MalformedBlock)
}

/// Canonical string form of a single transaction payload.
///
/// Used to refuse payloads that could never be hashed before they reach the
/// pending buffer.
pub fn canonical_payload(tx: &Transaction) -> Result<String> {
    to_canonical(&SortedKeys(tx.payload()), LedgerError::MalformedTransaction)
}

fn to_canonical<T: Serialize>(value: &T, malformed: fn(String) -> LedgerError) -> Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter);
    value.serialize(&mut ser).map_err(|e| malformed(e.to_string()))?;

    // The formatter only ever emits ASCII.
    String::from_utf8(buf).map_err(|e| malformed(e.to_string()))
}

/// Lowercase hex SHA-256 of arbitrary bytes (64 characters).
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Digest of a block's canonical form; the linkage value stored in the next block.
pub fn hash_block(block: &Block) -> Result<String> {
    let canonical = canonical_string(block)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::{canonical_payload, canonical_string, float_repr, hash_block, sha256_hex};
    use crate::blockchain::Block;
    use crate::blockchain::error::LedgerError;
    use crate::transaction::Transaction;
    use serde_json::{Map, Value, json};

    fn block_with(transactions: Vec<Transaction>) -> Block {
        Block::new_with_timestamp(3, transactions, 42, "prev".into(), 1_700_000_000.5)
    }

    #[test]
    fn canonical_form_sorts_fields_and_spaces_separators() {
        let b = Block::new_with_timestamp(1, vec![], 100, "1".into(), 1.5);
        assert_eq!(
            canonical_string(&b).unwrap(),
            r#"{"index": 1, "previous_hash": "1", "proof": 100, "timestamp": 1.5, "transactions": []}"#
        );
    }

    #[test]
    fn nested_payload_keys_are_sorted() {
        let b = block_with(vec![Transaction::new(json!({
            "sender": "a",
            "amount": 5,
            "meta": {"z": [1, 2], "b": null}
        }))]);
        assert_eq!(
            canonical_string(&b).unwrap(),
            r#"{"index": 3, "previous_hash": "prev", "proof": 42, "timestamp": 1700000000.5, "transactions": [{"amount": 5, "meta": {"b": null, "z": [1, 2]}, "sender": "a"}]}"#
        );
    }

    #[test]
    fn payload_numbers_match_sort_keys_dump() {
        let payload: Value = serde_json::from_str(
            r#"{"amt":1e20,"small":1e-7,"big":123456789012345678901234567890}"#,
        )
        .unwrap();
        let b = block_with(vec![Transaction::new(payload)]);
        assert_eq!(
            canonical_string(&b).unwrap(),
            r#"{"index": 3, "previous_hash": "prev", "proof": 42, "timestamp": 1700000000.5, "transactions": [{"amt": 1e+20, "big": 123456789012345678901234567890, "small": 1e-07}]}"#
        );
    }

    #[test]
    fn number_spellings_are_normalized() {
        let payload: Value =
            serde_json::from_str(r#"[1.0E2, -0, 0.5e1, -98765432109876543210, 7]"#).unwrap();
        assert_eq!(
            canonical_payload(&Transaction::new(payload)).unwrap(),
            "[100.0, 0, 5.0, -98765432109876543210, 7]"
        );
    }

    #[test]
    fn float_repr_layout() {
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(-0.0), "-0.0");
        assert_eq!(float_repr(1.5), "1.5");
        assert_eq!(float_repr(100.0), "100.0");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.00001), "1e-05");
        assert_eq!(float_repr(1e15), "1000000000000000.0");
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(-2.5e-300), "-2.5e-300");
        assert_eq!(float_repr(1_700_000_000.123456), "1700000000.123456");
        assert_eq!(float_repr(1.2345678901234568e29), "1.2345678901234568e+29");
    }

    #[test]
    fn overflowing_float_cannot_be_canonicalized() {
        let payload: Value = serde_json::from_str(r#"{"x": 1e400}"#).unwrap();
        assert!(matches!(
            canonical_payload(&Transaction::new(payload)),
            Err(LedgerError::MalformedTransaction(_))
        ));
    }

    #[test]
    fn insertion_order_does_not_change_digest() {
        let mut forward = Map::new();
        forward.insert("alpha".into(), json!(1));
        forward.insert("beta".into(), json!("two"));
        let mut backward = Map::new();
        backward.insert("beta".into(), json!("two"));
        backward.insert("alpha".into(), json!(1));

        let a = block_with(vec![Transaction::new(Value::Object(forward))]);
        let b = block_with(vec![Transaction::new(Value::Object(backward))]);
        assert_eq!(hash_block(&a).unwrap(), hash_block(&b).unwrap());
    }

    #[test]
    fn non_ascii_is_escaped() {
        let b = block_with(vec![Transaction::new(json!("caf\u{e9} \u{1F600}\u{7f}"))]);
        let canonical = canonical_string(&b).unwrap();
        assert!(canonical.is_ascii());
        assert!(canonical.contains(r#""caf\u00e9 \ud83d\ude00\u007f""#));
    }

    #[test]
    fn hash_is_deterministic_and_hex() {
        let b = block_with(vec![Transaction::new(json!({"k": "v"}))]);
        let h1 = hash_block(&b).unwrap();
        let h2 = hash_block(&b.clone()).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn any_field_change_changes_digest() {
        let base = block_with(vec![]);
        let mut other = base.clone();
        other.proof += 1;
        assert_ne!(hash_block(&base).unwrap(), hash_block(&other).unwrap());

        let mut other = base.clone();
        other.transactions.push(Transaction::new(json!(1)));
        assert_ne!(hash_block(&base).unwrap(), hash_block(&other).unwrap());
    }

    #[test]
    fn overflowing_float_in_block_is_malformed() {
        let payload: Value = serde_json::from_str("[1e999]").unwrap();
        let b = block_with(vec![Transaction::new(payload)]);
        assert!(matches!(
            canonical_string(&b),
            Err(LedgerError::MalformedBlock(_))
        ));
    }

    #[test]
    fn non_finite_timestamp_is_malformed() {
        let b = Block::new_with_timestamp(2, vec![], 1, "x".into(), f64::NAN);
        assert!(matches!(
            hash_block(&b),
            Err(LedgerError::MalformedBlock(_))
        ));
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
