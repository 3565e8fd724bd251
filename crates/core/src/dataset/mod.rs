pub mod record;

use eraline_protocol::Entity;
use serde_json::Value;
use thiserror::Error;

use record::{IdAllocator, RawRecord};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of records or an object with a \"people\" array")]
    UnexpectedShape,
}

/// Parse a dataset export into entities.
///
/// Accepted shapes:
/// 1. A top-level JSON array of records.
/// 2. An object with a `people` (or `entities`) array.
///
/// Records that are not objects or lack a numeric birth year are skipped
/// with a warning rather than failing the whole file.
pub fn parse_entities(data: &[u8]) -> Result<Vec<Entity>, DatasetError> {
    let value: Value = serde_json::from_slice(data)?;
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut obj) => match obj.remove("people").or_else(|| obj.remove("entities")) {
            Some(Value::Array(records)) => records,
            _ => return Err(DatasetError::UnexpectedShape),
        },
        _ => return Err(DatasetError::UnexpectedShape),
    };

    let mut ids = IdAllocator::default();
    let mut entities = Vec::with_capacity(records.len());

    for (index, value) in records.into_iter().enumerate() {
        let record: RawRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("record {index}: {err}; skipped");
                continue;
            }
        };
        let id = ids.allocate(&record, index);
        match record.into_entity(id) {
            Some(entity) => entities.push(entity),
            None => log::warn!("record {index}: missing or invalid birth year; skipped"),
        }
    }

    log::info!("loaded {} entities", entities.len());
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eraline_protocol::Lifespan;

    #[test]
    fn parses_top_level_array() {
        let data = br#"[
            {"id": "newton", "name": "Isaac Newton", "category": "science", "birthYear": 1643, "deathYear": 1727},
            {"name": "Living Person", "birth_year": "1961", "is_living": true}
        ]"#;
        let Ok(entities) = parse_entities(data) else {
            panic!("dataset should parse");
        };
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].id, "newton");
        assert_eq!(entities[0].lifespan, Lifespan::Fixed(1727));
        assert_eq!(entities[1].id, "living-person");
        assert_eq!(entities[1].lifespan, Lifespan::Ongoing);
    }

    #[test]
    fn parses_people_wrapper_and_skips_bad_records() {
        let data = br#"{"people": [
            {"name": "No Birth"},
            "not a record",
            {"name": 7, "birth_year": 1},
            {"name": "Ok", "birth_year": -50, "death_year": 10}
        ]}"#;
        let Ok(entities) = parse_entities(data) else {
            panic!("dataset should parse");
        };
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].birth_year, -50);
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(matches!(
            parse_entities(br#"{"rows": []}"#),
            Err(DatasetError::UnexpectedShape)
        ));
        assert!(matches!(parse_entities(b"42"), Err(DatasetError::UnexpectedShape)));
        assert!(matches!(parse_entities(b"{oops"), Err(DatasetError::Json(_))));
    }
}
