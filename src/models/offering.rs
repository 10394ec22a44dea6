//! Class offering model.
//!
//! A class offering is one subject taught to one student block in a term.
//! Its lecture/lab hour load and preferences drive task decomposition.
//!
//! # Day-List Decoding
//!
//! `lecture_days` as stored by the surrounding application may arrive as a
//! proper JSON array, as a string containing an encoded array, or (from
//! older form handlers) as a twice-encoded string. [`DayList`] decodes all
//! three defensively; anything unparseable becomes the empty list, which
//! means "no explicit preference".

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::time::Weekday;

/// A class offering to be timetabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassOffering {
    /// Unique offering identifier.
    pub id: u32,
    /// Subject code (e.g. "CS101").
    pub subject_code: String,
    /// Weekly lecture hours (0 = no lecture session).
    pub lecture_hours: f64,
    /// Weekly lab hours (0 = no lab session).
    pub lab_hours: f64,
    /// Assigned instructor, if any.
    pub instructor_id: Option<u32>,
    /// Student block attending this offering.
    pub block_id: u32,
    /// Expected enrolment, used for capacity filtering.
    pub estimated_students: u32,
    /// Whether the lecture is split across two days.
    pub split_lecture: bool,
    /// Explicit lecture days. Empty = all teaching days minus exclusions.
    #[serde(default)]
    pub lecture_days: DayList,
    /// Room preference, if any.
    #[serde(default)]
    pub room_preference: Option<RoomPreference>,
}

/// Room preference attached to an offering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPreference {
    /// The single most-preferred room.
    pub priority: Option<u32>,
    /// Further acceptable rooms, in preference order.
    #[serde(default)]
    pub options: Vec<u32>,
}

impl ClassOffering {
    /// Creates an offering with no sessions and no preferences.
    pub fn new(id: u32, subject_code: impl Into<String>) -> Self {
        Self {
            id,
            subject_code: subject_code.into(),
            lecture_hours: 0.0,
            lab_hours: 0.0,
            instructor_id: None,
            block_id: 0,
            estimated_students: 0,
            split_lecture: false,
            lecture_days: DayList::default(),
            room_preference: None,
        }
    }

    /// Sets the weekly lecture hours.
    pub fn with_lecture_hours(mut self, hours: f64) -> Self {
        self.lecture_hours = hours;
        self
    }

    /// Sets the weekly lab hours.
    pub fn with_lab_hours(mut self, hours: f64) -> Self {
        self.lab_hours = hours;
        self
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor_id: u32) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }

    /// Sets the student block.
    pub fn with_block(mut self, block_id: u32) -> Self {
        self.block_id = block_id;
        self
    }

    /// Sets the expected enrolment.
    pub fn with_students(mut self, estimated_students: u32) -> Self {
        self.estimated_students = estimated_students;
        self
    }

    /// Splits the lecture across two days.
    pub fn with_split_lecture(mut self) -> Self {
        self.split_lecture = true;
        self
    }

    /// Sets explicit lecture days.
    pub fn with_lecture_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.lecture_days = DayList::new(days.into_iter().collect());
        self
    }

    /// Sets the room preference.
    pub fn with_room_preference(mut self, preference: RoomPreference) -> Self {
        self.room_preference = Some(preference);
        self
    }

    /// The priority room from the preference, if any.
    pub fn preferred_room(&self) -> Option<u32> {
        self.room_preference.as_ref().and_then(|p| p.priority)
    }
}

impl RoomPreference {
    /// Creates a preference with a priority room.
    pub fn priority(room_id: u32) -> Self {
        Self {
            priority: Some(room_id),
            options: Vec::new(),
        }
    }

    /// Adds ordered fallback options.
    pub fn with_options(mut self, options: Vec<u32>) -> Self {
        self.options = options;
        self
    }
}

/// An explicit list of lecture days with defensive deserialization.
///
/// Empty means "no explicit preference"; the decomposer then falls back to
/// the teaching week minus excluded days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayList(Vec<Weekday>);

impl DayList {
    /// Creates a day list.
    pub fn new(days: Vec<Weekday>) -> Self {
        Self(days)
    }

    /// The days, in the order given.
    #[inline]
    pub fn days(&self) -> &[Weekday] {
        &self.0
    }

    /// Whether no explicit days were given.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for DayList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(DayList(decode_day_value(&value)))
    }
}

/// Decodes a raw `lecture_days` value: a JSON array of day names, a string
/// holding an encoded array, or a twice-encoded string. Anything else
/// decodes to the empty list.
fn decode_day_value(value: &Value) -> Vec<Weekday> {
    match value {
        Value::Array(items) => day_names(items),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => day_names(&items),
            // A string inside the string: the payload was encoded twice.
            Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
                Ok(Value::Array(items)) => day_names(&items),
                _ => {
                    log::warn!("unparseable lecture_days payload: {raw:?}");
                    Vec::new()
                }
            },
            _ => {
                log::warn!("unparseable lecture_days payload: {raw:?}");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn day_names(items: &[Value]) -> Vec<Weekday> {
    items
        .iter()
        .filter_map(|item| item.as_str().and_then(|s| s.parse().ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_builder() {
        let cls = ClassOffering::new(41, "CS101")
            .with_lecture_hours(3.0)
            .with_lab_hours(2.0)
            .with_instructor(9)
            .with_block(4)
            .with_students(35)
            .with_split_lecture()
            .with_lecture_days([Weekday::Monday, Weekday::Wednesday])
            .with_room_preference(RoomPreference::priority(7).with_options(vec![8, 9]));

        assert_eq!(cls.id, 41);
        assert_eq!(cls.subject_code, "CS101");
        assert_eq!(cls.lecture_hours, 3.0);
        assert_eq!(cls.lab_hours, 2.0);
        assert_eq!(cls.instructor_id, Some(9));
        assert!(cls.split_lecture);
        assert_eq!(
            cls.lecture_days.days(),
            &[Weekday::Monday, Weekday::Wednesday]
        );
        assert_eq!(cls.preferred_room(), Some(7));
    }

    #[test]
    fn test_day_list_from_array() {
        let cls: ClassOffering = serde_json::from_str(
            r#"{
                "id": 1, "subject_code": "CS101",
                "lecture_hours": 3.0, "lab_hours": 0.0,
                "instructor_id": null, "block_id": 2,
                "estimated_students": 30, "split_lecture": false,
                "lecture_days": ["Monday", "Wednesday"]
            }"#,
        )
        .unwrap();
        assert_eq!(
            cls.lecture_days.days(),
            &[Weekday::Monday, Weekday::Wednesday]
        );
    }

    #[test]
    fn test_day_list_from_encoded_string() {
        let v: DayList = serde_json::from_value(Value::String(
            r#"["Tuesday","Thursday"]"#.to_string(),
        ))
        .unwrap();
        assert_eq!(v.days(), &[Weekday::Tuesday, Weekday::Thursday]);
    }

    #[test]
    fn test_day_list_from_double_encoded_string() {
        // The array was JSON-encoded, then that string was encoded again:
        // the payload contains a quoted string containing the array.
        let twice = serde_json::to_string(r#"["Friday"]"#).unwrap();
        assert!(twice.starts_with("\"["));
        let v: DayList = serde_json::from_value(Value::String(twice)).unwrap();
        assert_eq!(v.days(), &[Weekday::Friday]);
    }

    #[test]
    fn test_day_list_garbage_decodes_empty() {
        for raw in [
            Value::String("not json".into()),
            Value::String("42".into()),
            Value::Null,
            Value::Bool(true),
            serde_json::json!({"day": "Monday"}),
        ] {
            let v: DayList = serde_json::from_value(raw).unwrap();
            assert!(v.is_empty());
        }
    }

    #[test]
    fn test_day_list_skips_unknown_names() {
        let v: DayList =
            serde_json::from_value(serde_json::json!(["Monday", "Funday", "Friday"])).unwrap();
        assert_eq!(v.days(), &[Weekday::Monday, Weekday::Friday]);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let cls: ClassOffering = serde_json::from_str(
            r#"{
                "id": 1, "subject_code": "CS101",
                "lecture_hours": 3.0, "lab_hours": 0.0,
                "instructor_id": null, "block_id": 2,
                "estimated_students": 30, "split_lecture": false
            }"#,
        )
        .unwrap();
        assert!(cls.lecture_days.is_empty());
        assert!(cls.room_preference.is_none());
    }
}
