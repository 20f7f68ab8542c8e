use timetable_core::{ClockTime, Entry, EntryColor, EntryDraft, EntryValidationError};

fn at(hour: u8, minute: u8) -> ClockTime {
    ClockTime::new(hour, minute).unwrap()
}

#[test]
fn new_entry_gets_fresh_id_and_derived_color() {
    let first = Entry::new(EntryDraft::new("Mathematics", at(9, 0), at(10, 0))).unwrap();
    let second = Entry::new(EntryDraft::new("Mathematics", at(9, 0), at(10, 0))).unwrap();

    assert!(!first.id().is_empty());
    assert_ne!(first.id(), second.id());
    assert_eq!(first.color(), EntryColor::Math);
    assert_eq!(first.hour(), 9);
}

#[test]
fn subject_and_homework_are_trimmed() {
    let draft = EntryDraft::new("  Physics  ", at(8, 15), at(9, 0)).with_homework("  lab report ");
    let entry = Entry::new(draft).unwrap();

    assert_eq!(entry.subject(), "Physics");
    assert_eq!(entry.homework(), Some("lab report"));
}

#[test]
fn whitespace_homework_is_unset() {
    let draft = EntryDraft::new("Art", at(8, 0), at(9, 0)).with_homework(" \t ");
    let entry = Entry::new(draft).unwrap();
    assert_eq!(entry.homework(), None);
}

#[test]
fn empty_subject_is_rejected() {
    let err = Entry::new(EntryDraft::new("   ", at(8, 0), at(9, 0))).unwrap_err();
    assert_eq!(err, EntryValidationError::EmptySubject);
}

#[test]
fn empty_id_is_rejected() {
    let err = Entry::with_id(" ", EntryDraft::new("Art", at(8, 0), at(9, 0))).unwrap_err();
    assert_eq!(err, EntryValidationError::EmptyId);
}

#[test]
fn end_before_start_is_allowed() {
    let entry = Entry::new(EntryDraft::new("Night shift", at(22, 0), at(6, 30))).unwrap();
    assert_eq!(entry.time_range_label(), "10:00 PM - 6:30 AM");
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let draft = EntryDraft::new("World History", at(13, 5), at(14, 0)).with_homework("ch. 4");
    let entry = Entry::with_id("11111111-2222-4333-8444-555555555555", draft).unwrap();

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["subject"], "World History");
    assert_eq!(json["hour"], 13);
    assert_eq!(json["minute"], 5);
    assert_eq!(json["endHour"], 14);
    assert_eq!(json["endMinute"], 0);
    assert_eq!(json["homework"], "ch. 4");
    assert_eq!(json["color"], "history");

    let decoded: Entry = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, entry);
}

#[test]
fn unset_homework_is_omitted_from_json() {
    let entry = Entry::with_id("a", EntryDraft::new("Lunch", at(12, 0), at(12, 30))).unwrap();
    let json = serde_json::to_string(&entry).unwrap();
    assert_eq!(
        json,
        r#"{"id":"a","subject":"Lunch","hour":12,"minute":0,"endHour":12,"endMinute":30,"color":"default"}"#
    );
}

#[test]
fn deserialize_ignores_stored_color() {
    let value = serde_json::json!({
        "id": "a",
        "subject": "Chemistry",
        "hour": 10,
        "minute": 0,
        "endHour": 11,
        "endMinute": 0,
        "color": "english"
    });

    let entry: Entry = serde_json::from_value(value).unwrap();
    assert_eq!(entry.color(), EntryColor::Science);
}

#[test]
fn deserialize_rejects_out_of_range_minute() {
    let value = serde_json::json!({
        "id": "a",
        "subject": "Chemistry",
        "hour": 10,
        "minute": 75,
        "endHour": 11,
        "endMinute": 0
    });

    let err = serde_json::from_value::<Entry>(value).unwrap_err();
    assert!(
        err.to_string().contains("minute (75) must be within 0..=59"),
        "unexpected error: {err}"
    );
}

#[test]
fn to_draft_roundtrips_editable_fields() {
    let draft = EntryDraft::new("English", at(9, 30), at(10, 15)).with_homework("essay");
    let entry = Entry::new(draft.clone()).unwrap();
    assert_eq!(entry.to_draft(), draft);
}
