//! Canonical ability and move records built from loosely-shaped JSON

use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ABILITY_NAME_KEYS: &[&str] = &["Ability", "ability", "name"];
pub const ABILITY_EFFECT_KEYS: &[&str] = &["Effect", "effect", "description"];

pub const MOVE_NAME_KEYS: &[&str] = &["Move Name", "moveName", "name", "Move"];
pub const MOVE_TYPE_KEYS: &[&str] = &["Move Type", "type", "Type"];
pub const MOVE_DESIGNATION_KEYS: &[&str] = &["Designation", "designation"];
pub const MOVE_REQUIREMENT_KEYS: &[&str] = &["Requirement", "requirement"];
pub const MOVE_ACTION_TYPE_KEYS: &[&str] = &["Action Type", "actionType"];
pub const MOVE_RANGE_KEYS: &[&str] = &["Range", "range"];
pub const MOVE_DURATION_KEYS: &[&str] = &["Duration", "duration"];
pub const MOVE_PROPERTIES_KEYS: &[&str] = &["Properties", "properties"];
pub const MOVE_SUMMARY_KEYS: &[&str] = &["Summary", "summary"];
pub const MOVE_MECHANICS_KEYS: &[&str] = &["Mechanics", "mechanics"];
pub const MOVE_DICE_KEYS: &[&str] = &["Dice Damage", "diceDamage"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub effect: String,
}

impl Ability {
    pub fn from_raw(raw: &Value, index: usize) -> Self {
        let name = field(raw, ABILITY_NAME_KEYS, "");
        let effect = field(raw, ABILITY_EFFECT_KEYS, "");
        Self {
            id: make_id(&name, index, "ability"),
            name,
            effect,
        }
    }

    /// Text the search box is matched against.
    pub fn haystack(&self) -> String {
        format!("{} {}", self.name, self.effect).to_lowercase()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Move {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    pub designation: String,
    pub requirement: String,
    pub action_type: String,
    pub range: String,
    pub duration: String,
    pub properties: String,
    pub summary: String,
    pub mechanics: String,
    pub dice_damage: String,
    pub move_type_word: String,
}

impl Move {
    pub fn from_raw(raw: &Value, index: usize) -> Self {
        let name = field(raw, MOVE_NAME_KEYS, "");
        Self {
            id: make_id(&name, index, "move"),
            move_type: field(raw, MOVE_TYPE_KEYS, ""),
            designation: field(raw, MOVE_DESIGNATION_KEYS, ""),
            requirement: field(raw, MOVE_REQUIREMENT_KEYS, ""),
            action_type: field(raw, MOVE_ACTION_TYPE_KEYS, ""),
            range: field(raw, MOVE_RANGE_KEYS, ""),
            duration: field(raw, MOVE_DURATION_KEYS, ""),
            properties: field(raw, MOVE_PROPERTIES_KEYS, ""),
            summary: field(raw, MOVE_SUMMARY_KEYS, ""),
            mechanics: field(raw, MOVE_MECHANICS_KEYS, ""),
            dice_damage: field(raw, MOVE_DICE_KEYS, ""),
            move_type_word: field(raw, MOVE_TYPE_KEYS, ""),
            name,
        }
    }
}

/// First present, non-null, non-blank value among `keys`, else `fallback`.
///
/// The returned text is the value's display form, untrimmed.
pub fn field(raw: &Value, keys: &[&str], fallback: &str) -> String {
    let Some(object) = raw.as_object() else {
        return fallback.to_string();
    };
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter(|value| !value.is_null())
        .map(display_value)
        .find(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn whitespace_run() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

fn non_slug_char() -> &'static Regex {
    static NON_SLUG: OnceLock<Regex> = OnceLock::new();
    NON_SLUG.get_or_init(|| Regex::new(r"[^a-z0-9\-]").expect("static pattern"))
}

/// Lowercase, whitespace runs become `-`, anything outside `[a-z0-9-]` is dropped.
pub fn slug(name: &str) -> String {
    let lower = name.to_lowercase();
    let dashed = whitespace_run().replace_all(&lower, "-");
    non_slug_char().replace_all(&dashed, "").into_owned()
}

/// Session id for the record at `index`; the index keeps duplicates apart.
pub fn make_id(name: &str, index: usize, prefix: &str) -> String {
    let slug = slug(name);
    if slug.is_empty() {
        format!("{prefix}-{index}")
    } else {
        format!("{slug}-{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_field_picks_first_non_blank_alias() {
        let raw = json!({ "Move Name": "   ", "moveName": null, "name": "Tackle" });
        assert_eq!(field(&raw, MOVE_NAME_KEYS, ""), "Tackle");
    }

    #[test]
    fn test_field_falls_back() {
        assert_eq!(field(&json!({ "other": 1 }), MOVE_NAME_KEYS, "?"), "?");
        assert_eq!(field(&json!("not an object"), MOVE_NAME_KEYS, "?"), "?");
        assert_eq!(field(&json!(null), MOVE_NAME_KEYS, ""), "");
    }

    #[test]
    fn test_field_keeps_value_untrimmed_and_stringifies() {
        let raw = json!({ "name": " Ember ", "Range": 30, "Properties": ["Finesse", "Light"] });
        assert_eq!(field(&raw, MOVE_NAME_KEYS, ""), " Ember ");
        assert_eq!(field(&raw, MOVE_RANGE_KEYS, ""), "30");
        assert_eq!(field(&raw, MOVE_PROPERTIES_KEYS, ""), "Finesse,Light");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Thunder  Punch"), "thunder-punch");
        assert_eq!(slug("King's Shield!"), "kings-shield");
        assert_eq!(slug("???"), "");
    }

    #[test]
    fn test_ids_unique_for_duplicate_and_blank_names() {
        let raws = [
            json!({ "name": "Tackle" }),
            json!({ "name": "Tackle" }),
            json!({}),
            json!({ "name": "!!" }),
        ];
        let ids: Vec<String> = raws
            .iter()
            .enumerate()
            .map(|(idx, raw)| Move::from_raw(raw, idx).id)
            .collect();
        assert_eq!(ids, vec!["tackle-0", "tackle-1", "move-2", "move-3"]);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_move_type_word_shares_type_aliases() {
        let raw = json!({ "Move Type": "Fire", "Dice Damage": "2d6" });
        let mv = Move::from_raw(&raw, 0);
        assert_eq!(mv.move_type, "Fire");
        assert_eq!(mv.move_type_word, "Fire");
        assert_eq!(mv.dice_damage, "2d6");
    }

    #[test]
    fn test_ability_from_raw() {
        let raw = json!({ "Ability": "Blaze", "description": "Powers up Fire moves." });
        let ability = Ability::from_raw(&raw, 4);
        assert_eq!(ability.id, "blaze-4");
        assert_eq!(ability.effect, "Powers up Fire moves.");
        assert!(ability.haystack().contains("fire moves"));
    }
}
