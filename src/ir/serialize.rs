/// Run-level timestamps: a missing time is written as an empty string, the
/// way converters without run timing report it.
pub mod timestamp {
    use chrono::{DateTime, Local};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<DateTime<Local>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_str(time.to_rfc3339().as_str()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if value.trim().is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(value.trim())
            .map(|time| Some(time.with_timezone(&Local)))
            .map_err(|err| D::Error::custom(format!("invalid timestamp '{}': {}", value, err)))
    }
}
