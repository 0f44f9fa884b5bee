//! Dataset loading from a file path or an HTTP(S) URL

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::LoadError;
use crate::record::{Ability, Move};

/// Where a dataset comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Read and parse the JSON document behind `source`.
pub async fn fetch_document(source: &DataSource) -> Result<Value, LoadError> {
    match source {
        DataSource::File(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })?;
            Ok(serde_json::from_str(&text)?)
        }
        DataSource::Url(url) => {
            let response = reqwest::get(url).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let text = response.text().await?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// The record array inside a document: a bare array, or the first non-empty of
/// `own_key` and `data` on an object. `false`, `0`, `""` and `null` count as empty.
pub fn record_array<'a>(document: &'a Value, own_key: &str) -> Result<&'a [Value], LoadError> {
    match document {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(object) => {
            let Some((key, value)) = [own_key, "data"]
                .into_iter()
                .find_map(|key| {
                    object
                        .get(key)
                        .filter(|value| is_present(value))
                        .map(|value| (key, value))
                })
            else {
                return Ok(&[]);
            };
            value
                .as_array()
                .map(Vec::as_slice)
                .ok_or_else(|| LoadError::Shape(format!("`{key}`")))
        }
        Value::Null => Err(LoadError::Shape("a null document".to_string())),
        _ => Ok(&[]),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub fn abilities_from_document(document: &Value) -> Result<Vec<Ability>, LoadError> {
    Ok(record_array(document, "abilities")?
        .iter()
        .enumerate()
        .map(|(idx, raw)| Ability::from_raw(raw, idx))
        .collect())
}

pub fn moves_from_document(document: &Value) -> Result<Vec<Move>, LoadError> {
    Ok(record_array(document, "moves")?
        .iter()
        .enumerate()
        .map(|(idx, raw)| Move::from_raw(raw, idx))
        .collect())
}

pub async fn load_abilities(source: &DataSource) -> Result<Vec<Ability>, LoadError> {
    let document = fetch_document(source).await?;
    abilities_from_document(&document)
}

pub async fn load_moves(source: &DataSource) -> Result<Vec<Move>, LoadError> {
    let document = fetch_document(source).await?;
    moves_from_document(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/moves.json"),
            DataSource::Url("https://example.com/moves.json".into())
        );
        assert_eq!(
            DataSource::parse("resources/data/data-moves.json"),
            DataSource::File(PathBuf::from("resources/data/data-moves.json"))
        );
    }

    fn count(document: Value) -> usize {
        record_array(&document, "moves").unwrap().len()
    }

    #[test]
    fn test_record_array_shapes() {
        assert_eq!(count(json!([{ "name": "a" }])), 1);
        assert_eq!(count(json!({ "moves": [{}, {}], "data": [{}] })), 2);
        assert_eq!(count(json!({ "data": [{}, {}, {}] })), 3);
        assert_eq!(count(json!({ "moves": [], "data": [{}] })), 0);
        assert_eq!(count(json!({ "other": [] })), 0);
        assert_eq!(count(json!("text")), 0);
    }

    #[test]
    fn test_empty_own_key_falls_through_to_data() {
        for own in [json!(null), json!(false), json!(0), json!("")] {
            assert_eq!(count(json!({ "moves": own, "data": [{}, {}] })), 2);
        }
    }

    #[test]
    fn test_non_array_records_are_errors() {
        let err = record_array(&json!({ "moves": "nope", "data": [{}] }), "moves").unwrap_err();
        assert!(matches!(err, LoadError::Shape(ref key) if key == "`moves`"));
        assert!(record_array(&json!({ "moves": false, "data": { "x": 1 } }), "moves").is_err());
        assert!(matches!(
            record_array(&Value::Null, "moves"),
            Err(LoadError::Shape(_))
        ));
    }

    #[test]
    fn test_moves_from_document_normalizes() {
        let doc = json!({
            "moves": [
                { "Move Name": "Tackle", "Requirement": "Level 1", "Move Type": "Normal" },
                { "name": "Fireball", "requirement": "3rd Level Spell" }
            ]
        });
        let moves = moves_from_document(&doc).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].id, "tackle-0");
        assert_eq!(moves[0].move_type, "Normal");
        assert_eq!(moves[1].id, "fireball-1");
        assert_eq!(moves[1].requirement, "3rd Level Spell");
    }

    #[tokio::test]
    async fn test_load_abilities_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abilities.json");
        std::fs::write(
            &path,
            r#"{ "abilities": [ { "Ability": "Blaze", "Effect": "Fire boost." } ] }"#,
        )
        .unwrap();
        let abilities = load_abilities(&DataSource::File(path)).await.unwrap();
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].name, "Blaze");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let source = DataSource::File(PathBuf::from("/definitely/not/here.json"));
        let err = load_moves(&source).await.unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[tokio::test]
    async fn test_bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.json");
        std::fs::write(&path, "[{ broken").unwrap();
        let err = load_moves(&DataSource::File(path)).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }
}
