//! Detail view model: what the docked panel or the modal shows for a record

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::is_spell;
use crate::record::{Ability, Move};

/// Terminal columns at or below which details open in a modal.
pub const DEFAULT_BREAKPOINT: u16 = 100;

pub const PLACEHOLDER: &str = "—";

/// Where the detail of the selected record is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PresentationMode {
    /// Side panel next to the list.
    Docked,
    /// Overlay on top of a full-width list.
    Modal,
}

impl PresentationMode {
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width <= breakpoint {
            PresentationMode::Modal
        } else {
            PresentationMode::Docked
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetailView {
    Empty {
        title: &'static str,
        hint: &'static str,
    },
    Record {
        title: String,
        badge: Option<String>,
        fields: Vec<DetailField>,
        description: Vec<String>,
    },
}

impl DetailView {
    pub fn empty_move() -> Self {
        DetailView::Empty {
            title: "Select a move",
            hint: "Choose a move from the list to view its details here.",
        }
    }

    pub fn empty_ability() -> Self {
        DetailView::Empty {
            title: "Select an ability",
            hint: "Choose an ability from the list to view its details here.",
        }
    }

    pub fn for_move(mv: &Move) -> Self {
        let level_label = if is_spell(mv) {
            "Spell Level"
        } else {
            "Player Level"
        };
        let badge = Some(mv.move_type.trim())
            .filter(|ty| !ty.is_empty())
            .map(sanitize);
        DetailView::Record {
            title: or_placeholder(&mv.name).to_uppercase(),
            badge,
            fields: vec![
                field(level_label, &mv.requirement),
                field("Action Type", &mv.action_type),
                field("Designation", &mv.designation),
                field("Range", &mv.range),
                field("Duration", &mv.duration),
                field("Properties", &mv.properties),
            ],
            description: paragraph(&build_description(mv)),
        }
    }

    pub fn for_ability(ability: &Ability) -> Self {
        DetailView::Record {
            title: or_placeholder(&ability.name),
            badge: None,
            fields: Vec::new(),
            description: paragraph(&ability.effect),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DetailView::Empty { .. })
    }
}

fn field(label: &'static str, value: &str) -> DetailField {
    DetailField {
        label,
        value: or_placeholder(value),
    }
}

fn or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        sanitize(value)
    }
}

fn paragraph(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![PLACEHOLDER.to_string()];
    }
    text.lines().map(sanitize).collect()
}

/// Drop control characters so dataset text cannot drive the terminal.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\t' => Some(' '),
            ch if ch.is_control() => None,
            ch => Some(ch),
        })
        .collect()
}

/// Summary followed by the mechanics template with dice and type substituted.
pub fn build_description(mv: &Move) -> String {
    let dice = mv.dice_damage.trim();
    let type_word = mv.move_type_word.trim();
    let mechanics = mv
        .mechanics
        .replace("DICE_DAMAGE", if dice.is_empty() { PLACEHOLDER } else { dice })
        .replace(
            "MOVE_TYPE",
            if type_word.is_empty() {
                PLACEHOLDER
            } else {
                type_word
            },
        );
    [mv.summary.trim(), mechanics.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Designation as shown in a list row: "Melee Weapon Attack" -> "Melee".
pub fn short_designation(designation: &str) -> String {
    let short = designation
        .replacen("Weapon Attack", "", 1)
        .replacen("Spell Attack", "Spell", 1);
    let short = short.trim();
    if short.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        sanitize(short)
    }
}
