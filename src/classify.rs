//! Move classification: weapon vs. spell, level extraction and list filtering

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::{Ability, Move};

pub const MAX_PLAYER_LEVEL: u8 = 12;
pub const MAX_SPELL_LEVEL: u8 = 9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MoveTab {
    #[default]
    Weapon,
    Spell,
}

impl MoveTab {
    pub fn toggle(&self) -> Self {
        match self {
            MoveTab::Weapon => MoveTab::Spell,
            MoveTab::Spell => MoveTab::Weapon,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoveTab::Weapon => "Weapon",
            MoveTab::Spell => "Spell",
        }
    }

    pub fn of(mv: &Move) -> Self {
        if is_spell(mv) {
            MoveTab::Spell
        } else {
            MoveTab::Weapon
        }
    }
}

/// Active filter pill. Tokens: `all`, `fav`, `L1`..`L12`, `cantrip`, `1`..`9`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MoveFilter {
    #[default]
    All,
    Favorites,
    PlayerLevel(u8),
    Cantrip,
    SpellLevel(u8),
}

impl MoveFilter {
    pub fn token(&self) -> String {
        match self {
            MoveFilter::All => "all".to_string(),
            MoveFilter::Favorites => "fav".to_string(),
            MoveFilter::PlayerLevel(level) => format!("L{level}"),
            MoveFilter::Cantrip => "cantrip".to_string(),
            MoveFilter::SpellLevel(level) => level.to_string(),
        }
    }

    /// Short text shown on the pill.
    pub fn label(&self) -> String {
        match self {
            MoveFilter::All => "All".to_string(),
            MoveFilter::Favorites => "★Fav".to_string(),
            MoveFilter::PlayerLevel(level) | MoveFilter::SpellLevel(level) => level.to_string(),
            MoveFilter::Cantrip => "C".to_string(),
        }
    }

    /// Pills offered for a tab, in display order.
    pub fn pills(tab: MoveTab) -> Vec<MoveFilter> {
        let mut pills = vec![MoveFilter::Favorites, MoveFilter::All];
        match tab {
            MoveTab::Weapon => {
                pills.extend((1..=MAX_PLAYER_LEVEL).map(MoveFilter::PlayerLevel));
            }
            MoveTab::Spell => {
                pills.push(MoveFilter::Cantrip);
                pills.extend((1..=MAX_SPELL_LEVEL).map(MoveFilter::SpellLevel));
            }
        }
        pills
    }

    /// Neighbouring pill for the tab, wrapping at both ends.
    pub fn cycle(&self, tab: MoveTab, step: i32) -> MoveFilter {
        let pills = Self::pills(tab);
        let len = pills.len() as i32;
        let current = pills.iter().position(|pill| pill == self).unwrap_or(1) as i32;
        let next = (current + step).rem_euclid(len);
        pills[next as usize]
    }
}

fn first_number() -> &'static Regex {
    static FIRST_NUMBER: OnceLock<Regex> = OnceLock::new();
    FIRST_NUMBER.get_or_init(|| Regex::new(r"(\d+)").expect("static pattern"))
}

/// Player level gate: the first integer in the requirement text.
pub fn player_level(requirement: &str) -> Option<u32> {
    first_number()
        .captures(requirement)
        .and_then(|caps| caps[1].parse().ok())
}

/// Spell tier: 0 for cantrips, otherwise the first integer.
pub fn spell_level(requirement: &str) -> Option<u32> {
    let lower = requirement.to_lowercase();
    if lower.contains("cantrip") {
        return Some(0);
    }
    first_number()
        .captures(&lower)
        .and_then(|caps| caps[1].parse().ok())
}

pub fn is_spell(mv: &Move) -> bool {
    let requirement = mv.requirement.to_lowercase();
    let designation = mv.designation.to_lowercase();
    requirement.contains("cantrip") || requirement.contains("spell") || designation.contains("spell")
}

/// Everything that decides which moves are listed.
#[derive(Clone, Copy, Debug)]
pub struct MoveQuery<'a> {
    pub tab: MoveTab,
    pub filter: MoveFilter,
    /// Already trimmed and lowercased.
    pub search: &'a str,
    pub favorites: &'a BTreeSet<String>,
}

impl MoveQuery<'_> {
    pub fn matches(&self, mv: &Move) -> bool {
        if MoveTab::of(mv) != self.tab {
            return false;
        }
        if !self.search.is_empty() && !mv.name.to_lowercase().contains(self.search) {
            return false;
        }
        match self.filter {
            MoveFilter::All => true,
            MoveFilter::Favorites => self.favorites.contains(&mv.name),
            MoveFilter::PlayerLevel(level) => player_level(&mv.requirement) == Some(level.into()),
            MoveFilter::Cantrip => spell_level(&mv.requirement) == Some(0),
            MoveFilter::SpellLevel(level) => spell_level(&mv.requirement) == Some(level.into()),
        }
    }
}

/// Visible moves in load order.
pub fn visible_moves<'m>(moves: &'m [Move], query: &MoveQuery<'_>) -> Vec<&'m Move> {
    moves.iter().filter(|mv| query.matches(mv)).collect()
}

/// Visible abilities in load order; `search` is already trimmed and lowercased.
pub fn visible_abilities<'a>(abilities: &'a [Ability], search: &str) -> Vec<&'a Ability> {
    abilities
        .iter()
        .filter(|ability| search.is_empty() || ability.haystack().contains(search))
        .collect()
}

/// Normalize raw search box text the way the list filter expects it.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}
