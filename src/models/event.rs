use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The five fields pulled out of a free-form event description.
///
/// Every field is optional. Missing keys, JSON `null` and blank strings all
/// end up as `None`, so the rest of the crate only has one notion of "absent".
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

impl EventRecord {
    /// Builds a record from plain strings, applying the same blank handling
    /// as deserialization.
    pub fn from_parts(
        title: Option<&str>,
        start_date: Option<&str>,
        start_time: Option<&str>,
        location: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self {
            title: normalize(title),
            start_date: normalize(start_date),
            start_time: normalize(start_time),
            location: normalize(location),
            description: normalize(description),
        }
    }
}

pub fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => normalize(Some(&s)),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_null_fields_are_absent() {
        let record: EventRecord = serde_json::from_str(
            r#"{"title":"  ","startDate":null,"location":"","description":" notes "}"#,
        )
        .unwrap();
        assert_eq!(record.title, None);
        assert_eq!(record.start_date, None);
        assert_eq!(record.start_time, None);
        assert_eq!(record.location, None);
        assert_eq!(record.description.as_deref(), Some("notes"));
    }

    #[test]
    fn serializes_absent_fields_as_null() {
        let record = EventRecord::from_parts(Some("Lab"), Some("2025-03-22"), None, None, None);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Lab");
        assert_eq!(json["startDate"], "2025-03-22");
        assert!(json["startTime"].is_null());
    }
}
