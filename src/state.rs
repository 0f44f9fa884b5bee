//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::classify::{
    normalize_query, visible_abilities, visible_moves, MoveFilter, MoveQuery, MoveTab,
};
use crate::detail::{DetailView, PresentationMode, DEFAULT_BREAKPOINT};
use crate::favorites::Favorites;
use crate::record::{Ability, Move};

/// Which controller has the screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Panel {
    #[default]
    Moves,
    Abilities,
}

impl Panel {
    pub fn next(&self) -> Self {
        match self {
            Panel::Moves => Panel::Abilities,
            Panel::Abilities => Panel::Moves,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Moves => "Moves",
            Panel::Abilities => "Abilities",
        }
    }
}

/// Search, cursor and selection for one list
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrowseState {
    /// Raw search box text
    pub query: String,
    /// Whether keystrokes go to the search box
    pub search_active: bool,
    /// Highlighted row, an index into the visible rows
    pub cursor: usize,
    /// Record whose detail is shown
    pub selected_id: Option<String>,
    /// Detail overlay is up (narrow terminals only)
    pub modal_open: bool,
}

impl BrowseState {
    pub fn search(&self) -> String {
        normalize_query(&self.query)
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
        self.modal_open = false;
    }

    /// Keep cursor and selection consistent with the visible ids.
    pub fn reconcile<'a>(
        &mut self,
        mut visible_ids: impl Iterator<Item = &'a str> + Clone,
    ) -> bool {
        let before = (self.cursor, self.selected_id.clone(), self.modal_open);
        let count = visible_ids.clone().count();
        if let Some(selected) = self.selected_id.as_deref() {
            if !visible_ids.any(|id| id == selected) {
                self.clear_selection();
            }
        }
        self.cursor = self.cursor.min(count.saturating_sub(1));
        before != (self.cursor, self.selected_id.clone(), self.modal_open)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AbilitiesState {
    pub records: DataResource<Vec<Ability>>,
    pub browse: BrowseState,
}

impl Default for AbilitiesState {
    fn default() -> Self {
        Self {
            records: DataResource::Empty,
            browse: BrowseState::default(),
        }
    }
}

impl AbilitiesState {
    pub fn all(&self) -> &[Ability] {
        self.records.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible(&self) -> Vec<&Ability> {
        visible_abilities(self.all(), &self.browse.search())
    }

    pub fn selected(&self) -> Option<&Ability> {
        let id = self.browse.selected_id.as_deref()?;
        self.all().iter().find(|ability| ability.id == id)
    }

    pub fn at_cursor(&self) -> Option<&Ability> {
        self.visible().get(self.browse.cursor).copied()
    }

    pub fn detail(&self) -> DetailView {
        self.selected()
            .map(DetailView::for_ability)
            .unwrap_or_else(DetailView::empty_ability)
    }

    pub fn reconcile(&mut self) -> bool {
        let ids: Vec<String> = self.visible().iter().map(|a| a.id.clone()).collect();
        self.browse.reconcile(ids.iter().map(String::as_str))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MovesState {
    pub records: DataResource<Vec<Move>>,
    pub browse: BrowseState,
    pub tab: MoveTab,
    pub filter: MoveFilter,
    pub favorites: Favorites,
}

impl Default for MovesState {
    fn default() -> Self {
        Self {
            records: DataResource::Empty,
            browse: BrowseState::default(),
            tab: MoveTab::default(),
            filter: MoveFilter::default(),
            favorites: Favorites::default(),
        }
    }
}

impl MovesState {
    pub fn all(&self) -> &[Move] {
        self.records.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible(&self) -> Vec<&Move> {
        let search = self.browse.search();
        let query = MoveQuery {
            tab: self.tab,
            filter: self.filter,
            search: &search,
            favorites: self.favorites.as_set(),
        };
        visible_moves(self.all(), &query)
    }

    pub fn selected(&self) -> Option<&Move> {
        let id = self.browse.selected_id.as_deref()?;
        self.all().iter().find(|mv| mv.id == id)
    }

    pub fn at_cursor(&self) -> Option<&Move> {
        self.visible().get(self.browse.cursor).copied()
    }

    pub fn detail(&self) -> DetailView {
        self.selected()
            .map(DetailView::for_move)
            .unwrap_or_else(DetailView::empty_move)
    }

    pub fn reconcile(&mut self) -> bool {
        let ids: Vec<String> = self.visible().iter().map(|mv| mv.id.clone()).collect();
        self.browse.reconcile(ids.iter().map(String::as_str))
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub panel: Panel,
    pub terminal_size: (u16, u16),
    /// Widest terminal (in columns) that still uses the modal detail
    pub breakpoint: u16,
    pub abilities: AbilitiesState,
    pub moves: MovesState,
    /// Status line text
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            panel: Panel::default(),
            terminal_size: (120, 32),
            breakpoint: DEFAULT_BREAKPOINT,
            abilities: AbilitiesState::default(),
            moves: MovesState::default(),
            message: None,
        }
    }
}

impl AppState {
    pub fn new(favorites: Favorites, breakpoint: u16) -> Self {
        Self {
            breakpoint,
            moves: MovesState {
                favorites,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Recomputed on every call; never cached.
    pub fn presentation(&self) -> PresentationMode {
        PresentationMode::for_width(self.terminal_size.0, self.breakpoint)
    }

    pub fn browse(&self) -> &BrowseState {
        match self.panel {
            Panel::Moves => &self.moves.browse,
            Panel::Abilities => &self.abilities.browse,
        }
    }

    pub fn browse_mut(&mut self) -> &mut BrowseState {
        match self.panel {
            Panel::Moves => &mut self.moves.browse,
            Panel::Abilities => &mut self.abilities.browse,
        }
    }

    pub fn visible_count(&self) -> usize {
        match self.panel {
            Panel::Moves => self.moves.visible().len(),
            Panel::Abilities => self.abilities.visible().len(),
        }
    }

    pub fn cursor_id(&self) -> Option<String> {
        match self.panel {
            Panel::Moves => self.moves.at_cursor().map(|mv| mv.id.clone()),
            Panel::Abilities => self.abilities.at_cursor().map(|a| a.id.clone()),
        }
    }

    pub fn detail(&self) -> DetailView {
        match self.panel {
            Panel::Moves => self.moves.detail(),
            Panel::Abilities => self.abilities.detail(),
        }
    }

    pub fn reconcile_active(&mut self) -> bool {
        match self.panel {
            Panel::Moves => self.moves.reconcile(),
            Panel::Abilities => self.abilities.reconcile(),
        }
    }

    pub fn modal_open(&self) -> bool {
        self.browse().modal_open
    }

    pub fn search_active(&self) -> bool {
        self.browse().search_active
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("View")
                .entry("panel", ron_string(&self.panel))
                .entry("terminal", ron_string(&self.terminal_size))
                .entry("presentation", ron_string(&self.presentation()))
                .entry("message", ron_string(&self.message)),
            DebugSection::new("Moves")
                .entry("total", ron_string(&self.moves.all().len()))
                .entry("visible", ron_string(&self.moves.visible().len()))
                .entry("tab", ron_string(&self.moves.tab))
                .entry("filter", ron_string(&self.moves.filter.token()))
                .entry("query", ron_string(&self.moves.browse.query))
                .entry("cursor", ron_string(&self.moves.browse.cursor))
                .entry("selected", ron_string(&self.moves.browse.selected_id))
                .entry("modal", ron_string(&self.moves.browse.modal_open))
                .entry("favorites", ron_string(&self.moves.favorites.len())),
            DebugSection::new("Abilities")
                .entry("total", ron_string(&self.abilities.all().len()))
                .entry("visible", ron_string(&self.abilities.visible().len()))
                .entry("query", ron_string(&self.abilities.browse.query))
                .entry("cursor", ron_string(&self.abilities.browse.cursor))
                .entry("selected", ron_string(&self.abilities.browse.selected_id))
                .entry("modal", ron_string(&self.abilities.browse.modal_open)),
        ]
    }
}
