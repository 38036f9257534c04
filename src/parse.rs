use std::collections::HashMap;

use log::{debug, trace};

use crate::models::{ParsedSection, SessionFields};

/// Decode the agent's session records (one JSON object per record)
///
/// Never fails: records that can't be decoded, or lack `neighbouras`/`neighbourid`,
/// end up as messages in [`ParsedSection::errors`] and parsing moves on to the next record.
pub fn parse<I, S>(records: I) -> ParsedSection
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut inventory = Vec::new();
    let mut result = HashMap::new();
    let mut errors = Vec::new();

    for record in records {
        let record = record.as_ref();
        match decode_record(record) {
            Ok(fields) => {
                let id = fields.session_id();
                trace!("Parsed session {}: {:?}", id, fields);
                inventory.push(id.clone());
                result.insert(id, fields);
            }
            Err(reason) => {
                let message = format!("Failed to parse BGP session data: {}", reason);
                debug!("{}", message);
                trace!("Record data: {:?}", record);
                errors.push(message);
            }
        }
    }

    ParsedSection::new(inventory, result, errors)
}

fn decode_record(record: &str) -> Result<SessionFields, String> {
    if record.trim().is_empty() {
        return Err("record has no fields".to_string());
    }
    serde_json::from_str(record).map_err(|err| err.to_string())
}
