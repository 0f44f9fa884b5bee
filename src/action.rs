//! Actions for the two reference controllers

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classify::{MoveFilter, MoveTab};
use crate::record::{Ability, Move};
use crate::state::Panel;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Intent: load both datasets
    Init,

    // ===== Data =====
    AbilitiesDidLoad(Vec<Ability>),
    AbilitiesDidError(String),
    MovesDidLoad(Vec<Move>),
    MovesDidError(String),

    // ===== Panel =====
    PanelNext,
    PanelSet(Panel),

    // ===== List (active panel) =====
    /// Move the highlighted row to a visible index
    ListCursor(usize),
    /// Select the highlighted row and show its detail
    ListConfirm,

    // ===== Search (active panel) =====
    SearchStart,
    SearchInput(char),
    SearchBackspace,
    /// Stop editing, keep the query
    SearchSubmit,
    /// Drop the query and the selection
    SearchClear,

    // ===== Moves =====
    MoveTabSet(MoveTab),
    MoveTabToggle,
    MoveFilterSet(MoveFilter),
    MoveFilterNext,
    MoveFilterPrev,

    // ===== Favorites =====
    /// Star or unstar the highlighted move
    FavoriteToggle,
    FavoritesDidSave,
    FavoritesDidError(String),

    // ===== UI =====
    ModalClose,
    UiTerminalResize(u16, u16),
    Render,

    Quit,
}
