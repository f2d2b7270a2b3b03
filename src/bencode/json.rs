use serde_json::{Value, json};
use super::BValue;

const HEX_KEY_PREFIX: &str = "_bytes_hex:";

/// Render a `BValue` as JSON (using Serde JSON `Value`).
///
/// - `Integer(i)` => JSON number
/// - `ByteString(bytes)` => Attempt UTF-8; if invalid, store hex in `\"_bytes_hex\"`.
/// - `List(...)` => JSON array
/// - `Dict(...)` => JSON object; a non UTF-8 key becomes `"_bytes_hex:<hex>"`
pub fn bvalue_to_json(bv: &BValue) -> Value {
	match bv {
		BValue::Integer(i) => json!(i),

		BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
			Ok(utf8_str) => Value::String(utf8_str.to_string()),
			Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
		},

		BValue::List(list_items) => {
			Value::Array(list_items.iter().map(bvalue_to_json).collect())
		}

		BValue::Dict(map) => {
			let mut json_map = serde_json::Map::new();
			for (k, v) in map {
				let key = match std::str::from_utf8(k) {
					Ok(s) => s.to_string(),
					Err(_) => format!("{}{}", HEX_KEY_PREFIX, hex::encode(k)),
				};
				json_map.insert(key, bvalue_to_json(v));
			}
			Value::Object(json_map)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bencode::decode_bytes;

	#[test]
	fn test_json_rendering() {
		let value = decode_bytes(b"d3:bar4:spam3:fooli42ei-1ee4:hash2:\xff\xfee").unwrap();
		assert_eq!(
			bvalue_to_json(&value),
			json!({
				"bar": "spam",
				"foo": [42, -1],
				"hash": { "_bytes_hex": "fffe" }
			})
		);
	}

	#[test]
	fn test_json_binary_key() {
		let value = decode_bytes(b"d2:\xff\x00i1ee").unwrap();
		assert_eq!(bvalue_to_json(&value), json!({ "_bytes_hex:ff00": 1 }));
	}

	#[test]
	fn test_json_binary_key_keeps_text_key_with_same_hex() {
		let value = decode_bytes(b"d4:ff00i2e2:\xff\x00i1ee").unwrap();
		assert_eq!(bvalue_to_json(&value), json!({ "ff00": 2, "_bytes_hex:ff00": 1 }));
	}
}
