//! dexbook - browse abilities and moves in the terminal

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use dexbook::action::Action;
use dexbook::detail::DEFAULT_BREAKPOINT;
use dexbook::effect::Effect;
use dexbook::favorites::{self, Favorites};
use dexbook::loader::{self, DataSource};
use dexbook::logging;
use dexbook::reducer::reducer;
use dexbook::state::AppState;
use dexbook::ui::DexUi;

#[derive(Parser, Debug)]
#[command(name = "dexbook")]
#[command(about = "Browse game abilities and moves with search, filters and favorites")]
struct Args {
    /// Abilities dataset: a file path or an http(s) URL
    #[arg(long, default_value = "resources/data/data-abilities.json")]
    abilities: String,

    /// Moves dataset: a file path or an http(s) URL
    #[arg(long, default_value = "resources/data/data-moves.json")]
    moves: String,

    /// Favorites file (defaults to the user data directory)
    #[arg(long = "favorites")]
    favorites_file: Option<PathBuf>,

    /// Widest terminal, in columns, that shows details in a modal
    #[arg(long, default_value_t = DEFAULT_BREAKPOINT, value_parser = clap::value_parser!(u16).range(20..))]
    breakpoint: u16,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(Clone, Debug)]
struct RuntimeConfig {
    abilities: DataSource,
    moves: DataSource,
    favorites_path: PathBuf,
    breakpoint: u16,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    List,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    List,
    Search,
    Detail,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.modal_open() {
            Some(DexComponentId::Detail)
        } else if self.search_active() {
            Some(DexComponentId::Search)
        } else {
            Some(DexComponentId::List)
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.modal_open() {
            Some(DexComponentId::Detail)
        } else if self.search_active() {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::List => DexContext::List,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Detail => DexContext::Detail,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::List
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        abilities,
        moves,
        favorites_file,
        breakpoint,
        log_dir,
        debug: debug_args,
    } = Args::parse();

    let log_dir = log_dir.unwrap_or_else(logging::default_log_dir);
    let _log_guard = logging::init(&log_dir);

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let config = RuntimeConfig {
        abilities: DataSource::parse(&abilities),
        moves: DataSource::parse(&moves),
        favorites_path: favorites_file.unwrap_or_else(|| favorites::default_path(None)),
        breakpoint,
    };
    tracing::info!(
        abilities = %config.abilities,
        moves = %config.moves,
        favorites = %config.favorites_path.display(),
        breakpoint = config.breakpoint,
        "starting dexbook"
    );

    let mut state = debug
        .load_state_or_else_async(|| {
            let config = config.clone();
            async move {
                let favorites = load_favorites(&config.favorites_path).await;
                Ok::<AppState, io::Error>(AppState::new(favorites, config.breakpoint))
            }
        })
        .await
        .map_err(debug_error)?;
    state.breakpoint = config.breakpoint;
    if let Ok(size) = crossterm::terminal::size() {
        state.terminal_size = size;
    }

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, config).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

/// A corrupt or unreadable favorites file starts the session with no favorites.
async fn load_favorites(path: &Path) -> Favorites {
    match favorites::load(path).await {
        Ok(favorites) => {
            tracing::info!(count = favorites.len(), "favorites loaded");
            favorites
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring favorites file");
            Favorites::default()
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    config: RuntimeConfig,
) -> io::Result<DebugRunOutput<AppState>> {
    let config = Arc::new(config);
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(DexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, _render_ctx, event_ctx| {
                event_ctx.set_component_area(DexComponentId::List, area);
                event_ctx.set_component_area(DexComponentId::Search, area);
                event_ctx.set_component_area(DexComponentId::Detail, area);
                ui.borrow_mut().render(frame, area, state);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, config.clone()),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, config: Arc<RuntimeConfig>) {
    match effect {
        Effect::LoadAbilities => {
            let source = config.abilities.clone();
            ctx.tasks().spawn(TaskKey::new("abilities"), async move {
                match loader::load_abilities(&source).await {
                    Ok(records) => {
                        tracing::info!(%source, count = records.len(), "abilities loaded");
                        Action::AbilitiesDidLoad(records)
                    }
                    Err(err) => {
                        tracing::error!(%source, error = %err, "failed to load abilities");
                        Action::AbilitiesDidError(err.to_string())
                    }
                }
            });
        }
        Effect::LoadMoves => {
            let source = config.moves.clone();
            ctx.tasks().spawn(TaskKey::new("moves"), async move {
                match loader::load_moves(&source).await {
                    Ok(records) => {
                        tracing::info!(%source, count = records.len(), "moves loaded");
                        Action::MovesDidLoad(records)
                    }
                    Err(err) => {
                        tracing::error!(%source, error = %err, "failed to load moves");
                        Action::MovesDidError(err.to_string())
                    }
                }
            });
        }
        Effect::SaveFavorites { favorites } => {
            let path = config.favorites_path.clone();
            ctx.tasks().spawn(TaskKey::new("favorites"), async move {
                match favorites::save(&path, &favorites).await {
                    Ok(()) => {
                        tracing::debug!(count = favorites.len(), "favorites saved");
                        Action::FavoritesDidSave
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to save favorites");
                        Action::FavoritesDidError(err.to_string())
                    }
                }
            });
        }
    }
}
