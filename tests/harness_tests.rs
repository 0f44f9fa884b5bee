//! End-to-end flows with EffectStoreTestHarness: effects out, async results in

use std::path::PathBuf;

use dexbook::{
    action::Action,
    effect::Effect,
    favorites::{self, Favorites},
    loader::{self, DataSource},
    reducer::reducer,
    state::AppState,
    ui::DexUi,
};
use tui_dispatch::testing::*;

fn resource(name: &str) -> DataSource {
    DataSource::File(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("resources/data")
            .join(name),
    )
}

#[tokio::test]
async fn test_startup_flow_with_bundled_data() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadAbilities));

    let abilities = loader::load_abilities(&resource("data-abilities.json"))
        .await
        .unwrap();
    let moves = loader::load_moves(&resource("data-moves.json")).await.unwrap();
    harness.complete_action(Action::AbilitiesDidLoad(abilities));
    harness.complete_action(Action::MovesDidLoad(moves));
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (2, 2));

    harness.assert_state(|s| s.abilities.all().len() == 8);
    harness.assert_state(|s| s.moves.all().len() == 10);
    harness.assert_state(|s| s.moves.visible().iter().all(|mv| mv.requirement.starts_with("Level")));
}

#[test]
fn test_load_error_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::MovesDidError("failed to read data-moves.json".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.moves.records.is_failed());
    let output = harness.render_plain(120, 20, |frame, area, state| {
        DexUi::new().render(frame, area, state);
    });
    assert!(
        output.contains("Could not load moves data. Check file path/name."),
        "load diagnostic should be visible:\n{output}"
    );
}

#[tokio::test]
async fn test_favorite_toggle_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(favorites::FAVORITES_FILE);
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    let moves = loader::load_moves(&resource("data-moves.json")).await.unwrap();
    harness.dispatch_collect(Action::MovesDidLoad(moves));
    harness.dispatch_collect(Action::ListCursor(1));
    harness.dispatch_collect(Action::FavoriteToggle);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    let saved: Favorites = vec!["Quick Attack".to_string()].into_iter().collect();
    effects.effects_first_matches(|e| {
        matches!(e, Effect::SaveFavorites { favorites } if favorites == &saved)
    });

    favorites::save(&path, &saved).await.unwrap();
    let reloaded = favorites::load(&path).await.unwrap();
    assert_eq!(reloaded, saved);
    assert!(reloaded.contains("Quick Attack"));
}

#[test]
fn test_favorite_save_failure_shows_message() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.complete_action(Action::FavoritesDidError("permission denied".into()));
    harness.process_emitted();

    harness.assert_state(|s| {
        s.message.as_deref() == Some("Favorites not saved: permission denied")
    });
}
