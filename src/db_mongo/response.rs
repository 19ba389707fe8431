use mongodb::bson::{Bson, Document};

/// Pull `cursor.firstBatch` out of a command response.
///
/// Each level is checked in turn and the first one that is missing or has
/// the wrong type yields `None`.
pub fn extract_first_batch(response: &Document) -> Option<Vec<Document>> {
    let cursor = match response.get("cursor") {
        Some(Bson::Document(cursor)) => cursor,
        _ => return None,
    };

    let batch = match cursor.get("firstBatch") {
        Some(Bson::Array(batch)) => batch,
        _ => return None,
    };

    batch
        .iter()
        .map(|entry| match entry {
            Bson::Document(doc) => Some(doc.clone()),
            _ => None,
        })
        .collect()
}

/// The command name is the first key of a command document.
pub fn command_name(command: &Document) -> &str {
    command.keys().next().map(String::as_str).unwrap_or("<empty>")
}
