use std::collections::BTreeMap;

/// A decoded bencode value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes for any string, keys included
	Integer(i64),
	List(Vec<BValue>),
	Dict(BTreeMap<Vec<u8>, BValue>) // byte-lexicographic, as canonical bencode orders keys
}

impl BValue {
	pub fn as_int(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Byte string as UTF-8 text, if it is both.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BTreeMap<Vec<u8>, BValue>> {
		match self {
			BValue::Dict(map) => Some(map),
			_ => None,
		}
	}

	/// Look up `key` when this value is a dictionary.
	pub fn get(&self, key: &[u8]) -> Option<&BValue> {
		self.as_dict().and_then(|map| map.get(key))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_accessors() {
		let mut map = BTreeMap::new();
		map.insert(b"name".to_vec(), BValue::ByteString(b"ubuntu".to_vec()));
		map.insert(b"length".to_vec(), BValue::Integer(1024));
		map.insert(b"raw".to_vec(), BValue::ByteString(vec![0xff, 0xfe]));
		let dict = BValue::Dict(map);

		assert_eq!(dict.get(b"length").and_then(BValue::as_int), Some(1024));
		assert_eq!(dict.get(b"name").and_then(BValue::as_str), Some("ubuntu"));
		assert_eq!(dict.get(b"raw").and_then(BValue::as_str), None);
		assert_eq!(dict.get(b"raw").and_then(BValue::as_bytes), Some(&[0xff, 0xfe][..]));
		assert!(dict.get(b"missing").is_none());
		assert!(dict.as_list().is_none());
		assert!(BValue::Integer(1).get(b"name").is_none());
	}
}
