//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::classify::{MoveFilter, MoveTab};
use crate::detail::PresentationMode;
use crate::effect::Effect;
use crate::state::{AppState, BrowseState, MovesState, Panel};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.abilities.records = DataResource::Loading;
            state.moves.records = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with_many(vec![Effect::LoadAbilities, Effect::LoadMoves])
        }

        // ===== Data actions =====
        Action::AbilitiesDidLoad(records) => {
            state.abilities.records = DataResource::Loaded(records);
            state.abilities.browse = BrowseState::default();
            DispatchResult::changed()
        }

        Action::AbilitiesDidError(msg) => {
            state.abilities.records = DataResource::Failed(msg);
            state.abilities.browse.clear_selection();
            state.abilities.reconcile();
            DispatchResult::changed()
        }

        Action::MovesDidLoad(records) => {
            state.moves.records = DataResource::Loaded(records);
            set_tab(&mut state.moves, MoveTab::Weapon);
            DispatchResult::changed()
        }

        Action::MovesDidError(msg) => {
            state.moves.records = DataResource::Failed(msg);
            state.moves.browse.clear_selection();
            state.moves.reconcile();
            DispatchResult::changed()
        }

        // ===== Panel actions =====
        Action::PanelNext => {
            state.panel = state.panel.next();
            DispatchResult::changed()
        }

        Action::PanelSet(panel) => set_panel(state, panel),

        // ===== List actions =====
        Action::ListCursor(index) => {
            let count = state.visible_count();
            if count == 0 {
                return DispatchResult::unchanged();
            }
            let index = index.min(count - 1);
            let browse = state.browse_mut();
            if browse.cursor == index {
                DispatchResult::unchanged()
            } else {
                browse.cursor = index;
                DispatchResult::changed()
            }
        }

        Action::ListConfirm => {
            let Some(id) = state.cursor_id() else {
                return DispatchResult::unchanged();
            };
            let modal = state.presentation() == PresentationMode::Modal;
            let browse = state.browse_mut();
            browse.selected_id = Some(id);
            browse.modal_open = modal;
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchStart => {
            let browse = state.browse_mut();
            if browse.search_active {
                return DispatchResult::unchanged();
            }
            browse.search_active = true;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if ch.is_control() {
                return DispatchResult::unchanged();
            }
            state.browse_mut().query.push(ch);
            query_changed(state);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.browse_mut().query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            query_changed(state);
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            let browse = state.browse_mut();
            if !browse.search_active {
                return DispatchResult::unchanged();
            }
            browse.search_active = false;
            DispatchResult::changed()
        }

        Action::SearchClear => {
            let browse = state.browse_mut();
            if browse.query.is_empty() && !browse.search_active {
                return DispatchResult::unchanged();
            }
            browse.query.clear();
            browse.search_active = false;
            query_changed(state);
            DispatchResult::changed()
        }

        // ===== Move actions =====
        Action::MoveTabSet(tab) => {
            set_tab(&mut state.moves, tab);
            DispatchResult::changed()
        }

        Action::MoveTabToggle => {
            let tab = state.moves.tab.toggle();
            set_tab(&mut state.moves, tab);
            DispatchResult::changed()
        }

        Action::MoveFilterSet(filter) => set_filter(&mut state.moves, filter),

        Action::MoveFilterNext => {
            let filter = state.moves.filter.cycle(state.moves.tab, 1);
            set_filter(&mut state.moves, filter)
        }

        Action::MoveFilterPrev => {
            let filter = state.moves.filter.cycle(state.moves.tab, -1);
            set_filter(&mut state.moves, filter)
        }

        // ===== Favorites actions =====
        Action::FavoriteToggle => {
            if state.panel != Panel::Moves {
                return DispatchResult::unchanged();
            }
            let Some(name) = state.moves.at_cursor().map(|mv| mv.name.clone()) else {
                return DispatchResult::unchanged();
            };
            state.moves.favorites.toggle(&name);
            state.moves.reconcile();
            DispatchResult::changed_with(Effect::SaveFavorites {
                favorites: state.moves.favorites.clone(),
            })
        }

        Action::FavoritesDidSave => DispatchResult::unchanged(),

        Action::FavoritesDidError(msg) => {
            state.message = Some(format!("Favorites not saved: {msg}"));
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::ModalClose => {
            let browse = state.browse_mut();
            if !browse.modal_open {
                return DispatchResult::unchanged();
            }
            browse.modal_open = false;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            let before = state.presentation();
            state.terminal_size = (width, height);
            if state.presentation() != before {
                state.moves.browse.modal_open = false;
                state.abilities.browse.modal_open = false;
            }
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn set_panel(state: &mut AppState, panel: Panel) -> DispatchResult<Effect> {
    if state.panel == panel {
        DispatchResult::unchanged()
    } else {
        state.panel = panel;
        DispatchResult::changed()
    }
}

/// New tab always starts at "All" with nothing selected.
fn set_tab(moves: &mut MovesState, tab: MoveTab) {
    moves.tab = tab;
    moves.filter = MoveFilter::All;
    moves.browse.clear_selection();
    moves.browse.cursor = 0;
    moves.reconcile();
}

fn set_filter(moves: &mut MovesState, filter: MoveFilter) -> DispatchResult<Effect> {
    if !MoveFilter::pills(moves.tab).contains(&filter) {
        return DispatchResult::unchanged();
    }
    moves.filter = filter;
    moves.browse.clear_selection();
    moves.browse.cursor = 0;
    moves.reconcile();
    DispatchResult::changed()
}

fn query_changed(state: &mut AppState) {
    let browse = state.browse_mut();
    browse.clear_selection();
    browse.cursor = 0;
    state.reconcile_active();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::Favorites;
    use crate::record::{Ability, Move};
    use pretty_assertions::assert_eq;

    fn mv(name: &str, requirement: &str, idx: usize) -> Move {
        Move {
            id: format!("{}-{idx}", name.to_lowercase()),
            name: name.to_string(),
            requirement: requirement.to_string(),
            ..Default::default()
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        reducer(
            &mut state,
            Action::MovesDidLoad(vec![
                mv("Tackle", "Level 1", 0),
                mv("Slash", "Level 3", 1),
                mv("Fire Bolt", "Cantrip", 2),
                mv("Fireball", "3rd Level Spell", 3),
            ]),
        );
        state
    }

    fn visible_names(state: &AppState) -> Vec<String> {
        state
            .moves
            .visible()
            .iter()
            .map(|mv| mv.name.clone())
            .collect()
    }

    #[test]
    fn test_init_loads_both_datasets() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.abilities.records.is_loading());
        assert!(state.moves.records.is_loading());
        assert_eq!(result.effects, vec![Effect::LoadAbilities, Effect::LoadMoves]);
    }

    #[test]
    fn test_moves_load_starts_on_weapon_tab() {
        let state = loaded_state();
        assert_eq!(state.moves.tab, MoveTab::Weapon);
        assert_eq!(state.moves.filter, MoveFilter::All);
        assert_eq!(visible_names(&state), vec!["Tackle", "Slash"]);
    }

    #[test]
    fn test_moves_load_keeps_typed_query() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::SearchStart);
        for ch in "sla".chars() {
            reducer(&mut state, Action::SearchInput(ch));
        }
        reducer(
            &mut state,
            Action::MovesDidLoad(vec![mv("Tackle", "Level 1", 0), mv("Slash", "Level 3", 1)]),
        );

        assert_eq!(state.moves.browse.query, "sla");
        assert!(state.moves.browse.search_active);
        assert_eq!(visible_names(&state), vec!["Slash"]);
    }

    #[test]
    fn test_load_error_marks_failed() {
        let mut state = AppState::default();
        reducer(&mut state, Action::AbilitiesDidError("missing".into()));
        assert!(matches!(&state.abilities.records, DataResource::Failed(msg) if msg == "missing"));
        assert!(state.abilities.visible().is_empty());
    }

    #[test]
    fn test_tab_switch_resets_filter_and_selection() {
        let mut state = loaded_state();
        reducer(&mut state, Action::MoveFilterSet(MoveFilter::PlayerLevel(3)));
        reducer(&mut state, Action::ListConfirm);
        assert_eq!(state.moves.browse.selected_id.as_deref(), Some("slash-1"));

        reducer(&mut state, Action::MoveTabToggle);
        assert_eq!(state.moves.tab, MoveTab::Spell);
        assert_eq!(state.moves.filter, MoveFilter::All);
        assert_eq!(state.moves.browse.selected_id, None);
        assert_eq!(visible_names(&state), vec!["Fire Bolt", "Fireball"]);
    }

    #[test]
    fn test_filter_not_offered_on_tab_is_ignored() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::MoveFilterSet(MoveFilter::Cantrip));
        assert!(!result.changed);
        assert_eq!(state.moves.filter, MoveFilter::All);
    }

    #[test]
    fn test_filter_cycle_wraps() {
        let mut state = loaded_state();
        reducer(&mut state, Action::MoveFilterPrev);
        assert_eq!(state.moves.filter, MoveFilter::Favorites);
        reducer(&mut state, Action::MoveFilterPrev);
        assert_eq!(state.moves.filter, MoveFilter::PlayerLevel(12));
        reducer(&mut state, Action::MoveFilterNext);
        assert_eq!(state.moves.filter, MoveFilter::Favorites);
    }

    #[test]
    fn test_search_clears_selection_and_filters() {
        let mut state = loaded_state();
        reducer(&mut state, Action::ListCursor(1));
        reducer(&mut state, Action::ListConfirm);
        assert!(state.moves.browse.selected_id.is_some());

        reducer(&mut state, Action::SearchStart);
        for ch in "TAC".chars() {
            reducer(&mut state, Action::SearchInput(ch));
        }
        assert_eq!(state.moves.browse.selected_id, None);
        assert_eq!(state.moves.browse.cursor, 0);
        assert_eq!(visible_names(&state), vec!["Tackle"]);

        reducer(&mut state, Action::SearchSubmit);
        assert!(!state.moves.browse.search_active);
        assert_eq!(state.moves.browse.query, "TAC");

        reducer(&mut state, Action::SearchClear);
        assert_eq!(state.moves.browse.query, "");
        assert_eq!(visible_names(&state), vec!["Tackle", "Slash"]);
    }

    #[test]
    fn test_backspace_on_empty_query_is_noop() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::SearchBackspace);
        assert!(!result.changed);
    }

    #[test]
    fn test_confirm_opens_modal_only_when_narrow() {
        let mut state = loaded_state();
        state.terminal_size = (160, 40);
        reducer(&mut state, Action::ListConfirm);
        assert_eq!(state.moves.browse.selected_id.as_deref(), Some("tackle-0"));
        assert!(!state.moves.browse.modal_open);

        state.terminal_size = (80, 24);
        reducer(&mut state, Action::ListConfirm);
        assert!(state.moves.browse.modal_open);

        reducer(&mut state, Action::ModalClose);
        assert!(!state.moves.browse.modal_open);
        assert_eq!(state.moves.browse.selected_id.as_deref(), Some("tackle-0"));
    }

    #[test]
    fn test_resize_across_breakpoint_closes_modal() {
        let mut state = loaded_state();
        state.terminal_size = (80, 24);
        reducer(&mut state, Action::ListConfirm);
        assert!(state.moves.browse.modal_open);

        reducer(&mut state, Action::UiTerminalResize(90, 30));
        assert!(state.moves.browse.modal_open);

        reducer(&mut state, Action::UiTerminalResize(140, 30));
        assert!(!state.moves.browse.modal_open);
        assert!(state.moves.browse.selected_id.is_some());
    }

    #[test]
    fn test_favorite_toggle_saves_and_refilters() {
        let mut state = loaded_state();
        reducer(&mut state, Action::MoveFilterSet(MoveFilter::Favorites));
        assert!(visible_names(&state).is_empty());

        reducer(&mut state, Action::MoveFilterSet(MoveFilter::All));
        reducer(&mut state, Action::ListCursor(1));
        let result = reducer(&mut state, Action::FavoriteToggle);
        assert_eq!(
            result.effects,
            vec![Effect::SaveFavorites {
                favorites: vec!["Slash".to_string()].into_iter().collect()
            }]
        );

        reducer(&mut state, Action::MoveFilterSet(MoveFilter::Favorites));
        assert_eq!(visible_names(&state), vec!["Slash"]);

        // Unstarring under the favorites filter hides the row and drops the selection
        reducer(&mut state, Action::ListConfirm);
        let result = reducer(&mut state, Action::FavoriteToggle);
        assert_eq!(
            result.effects,
            vec![Effect::SaveFavorites {
                favorites: Favorites::default()
            }]
        );
        assert!(visible_names(&state).is_empty());
        assert_eq!(state.moves.browse.selected_id, None);
    }

    #[test]
    fn test_favorites_from_startup_are_applied() {
        let favorites: Favorites = vec!["Fireball".to_string()].into_iter().collect();
        let mut state = AppState::new(favorites, 100);
        reducer(
            &mut state,
            Action::MovesDidLoad(vec![mv("Fireball", "3rd Level Spell", 0)]),
        );
        reducer(&mut state, Action::MoveTabSet(MoveTab::Spell));
        reducer(&mut state, Action::MoveFilterSet(MoveFilter::Favorites));
        assert_eq!(visible_names(&state), vec!["Fireball"]);
    }

    #[test]
    fn test_favorite_toggle_ignored_on_abilities_panel() {
        let mut state = loaded_state();
        reducer(&mut state, Action::PanelSet(Panel::Abilities));
        let result = reducer(&mut state, Action::FavoriteToggle);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_panels_keep_independent_search() {
        let mut state = loaded_state();
        reducer(
            &mut state,
            Action::AbilitiesDidLoad(vec![Ability {
                id: "blaze-0".into(),
                name: "Blaze".into(),
                effect: "Powers up fire moves.".into(),
            }]),
        );
        reducer(&mut state, Action::SearchInput('x'));
        reducer(&mut state, Action::PanelNext);
        assert_eq!(state.panel, Panel::Abilities);
        assert_eq!(state.abilities.browse.query, "");

        reducer(&mut state, Action::SearchInput('f'));
        reducer(&mut state, Action::SearchInput('i'));
        assert_eq!(state.abilities.visible().len(), 1);
        assert_eq!(state.moves.browse.query, "x");
    }

    #[test]
    fn test_cursor_clamped_to_visible() {
        let mut state = loaded_state();
        reducer(&mut state, Action::ListCursor(99));
        assert_eq!(state.moves.browse.cursor, 1);
        let result = reducer(&mut state, Action::ListCursor(1));
        assert!(!result.changed);
    }
}
