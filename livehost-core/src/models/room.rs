use serde::{Deserialize, Deserializer, Serialize};

/// A provider room as returned by the room listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub sid: String,
    pub name: String,
    pub num_participants: u32,
    /// Unix seconds. Protobuf JSON encodes int64 as a string.
    #[serde(deserialize_with = "int64_from_json")]
    pub creation_time: i64,
}

fn int64_from_json<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(value) => Ok(value),
        Int64::Text(text) if text.is_empty() => Ok(0),
        Int64::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creation_time_accepts_string_and_number() {
        let room: Room =
            serde_json::from_value(json!({ "name": "u1", "creation_time": "1700000000" })).unwrap();
        assert_eq!(room.creation_time, 1_700_000_000);

        let room: Room =
            serde_json::from_value(json!({ "name": "u1", "creation_time": 1_700_000_000 })).unwrap();
        assert_eq!(room.creation_time, 1_700_000_000);

        let room: Room = serde_json::from_value(json!({ "name": "u1" })).unwrap();
        assert_eq!(room.creation_time, 0);
    }

    #[test]
    fn test_creation_time_rejects_non_numeric_string() {
        let result: Result<Room, _> =
            serde_json::from_value(json!({ "name": "u1", "creation_time": "yesterday" }));
        assert!(result.is_err());
    }
}
