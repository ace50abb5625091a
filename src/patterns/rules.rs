//! Expected typed references and display fields

use manifest_parser::MappingValue;

/// Keys that mark the inner object of a typed reference
const IDENTITY_FIELDS: [&str; 5] = ["id", "name", "phone", "email", "username"];

/// A relationship an entity's mapping is expected to declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedReference {
    /// Conventional field name for the reference
    pub field: &'static str,

    /// Entity the reference must point at
    pub target: &'static str,

    pub reason: &'static str,

    /// Missing optional references are warnings rather than errors
    pub optional: bool,
}

const fn required(field: &'static str, target: &'static str, reason: &'static str) -> ExpectedReference {
    ExpectedReference {
        field,
        target,
        reason,
        optional: false,
    }
}

const fn optional(field: &'static str, target: &'static str, reason: &'static str) -> ExpectedReference {
    ExpectedReference {
        field,
        target,
        reason,
        optional: true,
    }
}

/// Typed references expected in mappings of `entity`
pub fn expected_references(entity: &str) -> &'static [ExpectedReference] {
    const POST: [ExpectedReference; 1] = [required("posted_by", "person", "Posts have authors")];
    const MESSAGE: [ExpectedReference; 1] = [required("from", "person", "Messages have senders")];
    const CONVERSATION: [ExpectedReference; 1] =
        [required("participant", "person", "Conversations have participants")];
    const COMMENT: [ExpectedReference; 1] = [required("posted_by", "person", "Comments have authors")];
    const VIDEO: [ExpectedReference; 1] = [required("creator", "person", "Videos have creators")];
    const TASK: [ExpectedReference; 1] = [optional("assignee", "person", "Tasks can have assignees")];
    const EVENT: [ExpectedReference; 1] = [optional("attendee", "person", "Events have attendees")];

    match entity {
        "post" => &POST,
        "message" => &MESSAGE,
        "conversation" => &CONVERSATION,
        "comment" => &COMMENT,
        "video" => &VIDEO,
        "task" => &TASK,
        "event" => &EVENT,
        _ => &[],
    }
}

/// Flat display keys that should accompany a typed reference stored
/// under `field`
pub fn expected_display_fields(field: &str) -> &'static [&'static str] {
    match field {
        "posted_by" => &["author.name", "author.url"],
        "created_by" | "creator" => &["creator.name", "creator.url"],
        "assignee" => &["assignee.name"],
        _ => &[],
    }
}

/// Target entity of a typed reference: an object with exactly one key
/// whose value is an object holding at least one identity field
pub fn typed_reference_target(value: &MappingValue) -> Option<&str> {
    let MappingValue::Reference(outer) = value else {
        return None;
    };
    if outer.len() != 1 {
        return None;
    }

    let (target, inner) = outer.iter().next()?;
    match inner {
        MappingValue::Reference(fields)
            if fields.keys().any(|k| IDENTITY_FIELDS.contains(&k.as_str())) =>
        {
            Some(target.as_str())
        }
        _ => None,
    }
}
