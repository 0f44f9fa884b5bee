use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, DataResource, EventKind, HandlerResponse};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle, StatusBar,
    StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::classify::{MoveFilter, MoveTab};
use crate::detail::{sanitize, short_designation, DetailView, PresentationMode, PLACEHOLDER};
use crate::state::{AppState, Panel};

const BG_BASE: Color = Color::Rgb(16, 14, 22);
const BG_PANEL: Color = Color::Rgb(28, 24, 38);
const BG_MODAL: Color = Color::Rgb(38, 32, 52);
const BG_HIGHLIGHT: Color = Color::Rgb(92, 58, 110);
const TEXT_MAIN: Color = Color::Rgb(238, 232, 244);
const TEXT_DIM: Color = Color::Rgb(168, 160, 184);
const ACCENT_ROSE: Color = Color::Rgb(232, 112, 142);
const ACCENT_GOLD: Color = Color::Rgb(236, 190, 96);

pub struct DexUi {
    list: SelectList,
    modal: Modal,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
            modal: Modal::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state);
        self.render_body(frame, layout[1], state);
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let mode = state.presentation();
        match mode {
            PresentationMode::Docked => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(area);
                render_list(frame, columns[0], state, &mut self.list);
                render_detail(frame, columns[1], &state.detail(), mode, &mut self.modal);
            }
            PresentationMode::Modal => {
                render_list(frame, area, state, &mut self.list);
                if state.modal_open() {
                    render_detail(frame, area, &state.detail(), mode, &mut self.modal);
                }
            }
        }
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let EventKind::Key(key) = event else {
            return HandlerResponse::ignored();
        };
        let actions = match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Tab => vec![Action::PanelNext],
            KeyCode::Char('/') => vec![Action::SearchStart],
            KeyCode::Esc => vec![Action::SearchClear],
            KeyCode::Enter => vec![Action::ListConfirm],
            code if state.panel == Panel::Moves => match code {
                KeyCode::Char('w') => vec![Action::MoveTabSet(MoveTab::Weapon)],
                KeyCode::Char('s') => vec![Action::MoveTabSet(MoveTab::Spell)],
                KeyCode::Left | KeyCode::Right => vec![Action::MoveTabToggle],
                KeyCode::Char('[') => vec![Action::MoveFilterPrev],
                KeyCode::Char(']') => vec![Action::MoveFilterNext],
                KeyCode::Char('a') => vec![Action::MoveFilterSet(MoveFilter::All)],
                KeyCode::Char('*') => vec![Action::MoveFilterSet(MoveFilter::Favorites)],
                KeyCode::Char('f') => vec![Action::FavoriteToggle],
                _ => return self.navigate(event, state),
            },
            _ => return self.navigate(event, state),
        };
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let EventKind::Key(key) = event else {
            return HandlerResponse::ignored();
        };
        let actions = match key.code {
            KeyCode::Esc => vec![Action::SearchClear],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Tab => vec![Action::PanelNext],
            KeyCode::Up | KeyCode::Down => return self.navigate(event, state),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                vec![Action::SearchInput(ch)]
            }
            _ => vec![],
        };
        handler_response(actions)
    }

    /// The open modal swallows every key; only Esc and q act.
    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let EventKind::Key(key) = event else {
            return HandlerResponse::ignored();
        };
        let actions = match key.code {
            KeyCode::Esc => vec![Action::ModalClose],
            KeyCode::Char('q') => vec![Action::Quit],
            _ => vec![],
        };
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn navigate(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let items = list_items(state);
        if items.is_empty() {
            return HandlerResponse::ignored();
        }
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.browse().cursor.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::ListCursor,
            render_item: &|item| item.clone(),
        };
        let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let active = Style::default()
        .fg(ACCENT_ROSE)
        .add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(TEXT_DIM);

    let mut top = Vec::new();
    for panel in [Panel::Moves, Panel::Abilities] {
        let style = if panel == state.panel { active } else { idle };
        top.push(Span::styled(panel.label().to_uppercase(), style));
        top.push(Span::raw("  "));
    }
    let mut second = Vec::new();
    if state.panel == Panel::Moves {
        top.push(Span::styled("|  ", idle));
        for tab in [MoveTab::Weapon, MoveTab::Spell] {
            let style = if tab == state.moves.tab { active } else { idle };
            top.push(Span::styled(tab.label(), style));
            top.push(Span::raw(" "));
        }
        for pill in MoveFilter::pills(state.moves.tab) {
            let label = format!(" {} ", pill.label());
            let span = if pill == state.moves.filter {
                Span::styled(
                    label,
                    Style::default()
                        .bg(BG_HIGHLIGHT)
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(label, idle)
            };
            second.push(span);
        }
        second.push(Span::raw("  "));
    }
    second.extend(search_spans(state));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEXBOOK")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let paragraph = Paragraph::new(Text::from(vec![Line::from(top), Line::from(second)]))
        .block(block)
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(paragraph, area);
}

fn search_spans(state: &AppState) -> Vec<Span<'static>> {
    let browse = state.browse();
    let query = sanitize(&browse.query);
    let text = if browse.search_active {
        format!("/{query}_")
    } else if query.is_empty() {
        "/ search".to_string()
    } else {
        format!("/{query}")
    };
    let style = if browse.search_active {
        Style::default().fg(ACCENT_ROSE)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    vec![Span::styled(text, style)]
}

fn render_list(frame: &mut Frame, area: Rect, state: &AppState, list: &mut SelectList) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(list_title(state))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(
            Style::default()
                .fg(ACCENT_ROSE)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(placeholder) = list_placeholder(state) {
        let paragraph = Paragraph::new(placeholder)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, inner);
        return;
    }

    let items = list_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.browse().cursor.min(items.len().saturating_sub(1)),
        is_focused: !state.modal_open(),
        style: list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::ListCursor,
        render_item: &|item| item.clone(),
    };
    list.render(frame, inner, props);
}

fn list_title(state: &AppState) -> String {
    match state.panel {
        Panel::Moves => format!(
            "MOVES · {} ({})",
            state.moves.tab.label().to_uppercase(),
            state.moves.visible().len()
        ),
        Panel::Abilities => format!("ABILITIES ({})", state.abilities.visible().len()),
    }
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

/// Text shown instead of rows, if any.
pub fn list_placeholder(state: &AppState) -> Option<Text<'static>> {
    match state.panel {
        Panel::Moves => placeholder_for(
            &state.moves.records,
            "moves",
            state.moves.visible().is_empty(),
            "No moves found.",
            "No moves match this filter yet.",
        ),
        Panel::Abilities => placeholder_for(
            &state.abilities.records,
            "abilities",
            state.abilities.visible().is_empty(),
            "No abilities found.",
            "No results.",
        ),
    }
}

fn placeholder_for<T>(
    records: &DataResource<Vec<T>>,
    kind: &str,
    none_visible: bool,
    no_data: &'static str,
    no_results: &'static str,
) -> Option<Text<'static>> {
    match records {
        DataResource::Empty | DataResource::Loading => Some(Text::from("Loading …")),
        DataResource::Failed(msg) => Some(Text::from(vec![
            Line::styled(
                format!("Could not load {kind} data. Check file path/name."),
                Style::default().fg(ACCENT_ROSE),
            ),
            Line::from(sanitize(msg)),
        ])),
        DataResource::Loaded(items) if items.is_empty() => Some(Text::from(no_data)),
        DataResource::Loaded(_) if none_visible => Some(Text::from(no_results)),
        DataResource::Loaded(_) => None,
    }
}

/// One line per visible record, in load order.
pub fn list_items(state: &AppState) -> Vec<Line<'static>> {
    let selected = state.browse().selected_id.as_deref();
    let name_style = |id: &str| {
        if Some(id) == selected {
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MAIN)
        }
    };
    match state.panel {
        Panel::Moves => state
            .moves
            .visible()
            .into_iter()
            .map(|mv| {
                let star = if state.moves.favorites.contains(&mv.name) {
                    Span::styled("★ ", Style::default().fg(ACCENT_GOLD))
                } else {
                    Span::styled("☆ ", Style::default().fg(TEXT_DIM))
                };
                let meta = [
                    or_dash(&mv.move_type),
                    or_dash(&mv.action_type),
                    short_designation(&mv.designation),
                    or_dash(&mv.requirement),
                ]
                .join(" · ");
                Line::from(vec![
                    star,
                    Span::styled(sanitize(&mv.name), name_style(&mv.id)),
                    Span::raw("  "),
                    Span::styled(meta, Style::default().fg(TEXT_DIM)),
                ])
            })
            .collect(),
        Panel::Abilities => state
            .abilities
            .visible()
            .into_iter()
            .map(|ability| {
                Line::from(Span::styled(
                    sanitize(&ability.name),
                    name_style(&ability.id),
                ))
            })
            .collect(),
    }
}

fn or_dash(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        sanitize(value)
    }
}

/// Draw a detail view as the docked side panel or as a centered overlay.
pub fn render_detail(
    frame: &mut Frame,
    area: Rect,
    view: &DetailView,
    mode: PresentationMode,
    modal: &mut Modal,
) {
    let text = detail_text(view);
    match mode {
        PresentationMode::Docked => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title("DETAIL")
                .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
                .border_style(Style::default().fg(TEXT_DIM));
            let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
        PresentationMode::Modal => {
            let mut render_content = |frame: &mut Frame, content_area: Rect| {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title("DETAIL")
                    .title(
                        Line::styled(" Esc close ", Style::default().fg(ACCENT_ROSE))
                            .right_aligned(),
                    )
                    .border_style(Style::default().fg(ACCENT_ROSE));
                let paragraph = Paragraph::new(text.clone())
                    .block(block)
                    .style(Style::default().fg(TEXT_MAIN))
                    .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, content_area);
            };
            modal.render(
                frame,
                area,
                ModalProps {
                    is_open: true,
                    is_focused: true,
                    area: overlay_rect(area),
                    style: ModalStyle {
                        base: BaseStyle {
                            bg: Some(BG_MODAL),
                            padding: Padding::default(),
                            border: None,
                            fg: Some(TEXT_MAIN),
                        },
                        ..Default::default()
                    },
                    behavior: ModalBehavior::default(),
                    on_close: || Action::ModalClose,
                    render_content: &mut render_content,
                },
            );
        }
    }
}

/// Centered box leaving a small margin around the list.
fn overlay_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(6).max(area.width.min(20));
    let height = area.height.saturating_sub(2).max(area.height.min(6));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn detail_text(view: &DetailView) -> Text<'static> {
    match view {
        DetailView::Empty { title, hint } => Text::from(vec![
            Line::styled(
                *title,
                Style::default()
                    .fg(ACCENT_ROSE)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::styled(*hint, Style::default().fg(TEXT_DIM)),
        ]),
        DetailView::Record {
            title,
            badge,
            fields,
            description,
        } => {
            let mut heading = vec![Span::styled(
                title.clone(),
                Style::default()
                    .fg(ACCENT_ROSE)
                    .add_modifier(Modifier::BOLD),
            )];
            if let Some(badge) = badge {
                heading.push(Span::raw("  "));
                heading.push(Span::styled(
                    format!("[{badge}]"),
                    Style::default().fg(ACCENT_GOLD),
                ));
            }
            let mut lines = vec![Line::from(heading)];
            if !fields.is_empty() {
                lines.push(Line::from(""));
            }
            lines.extend(fields.iter().map(|field| {
                Line::from(vec![
                    Span::styled(format!("{}: ", field.label), Style::default().fg(TEXT_DIM)),
                    Span::raw(field.value.clone()),
                ])
            }));
            lines.push(Line::from(""));
            lines.extend(description.iter().cloned().map(Line::from));
            Text::from(lines)
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| status_summary(state));
    let hints = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: None,
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_ROSE)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_summary(state: &AppState) -> String {
    match state.panel {
        Panel::Moves => format!(
            "{}/{} moves  ★{}",
            state.moves.visible().len(),
            state.moves.all().len(),
            state.moves.favorites.len()
        ),
        Panel::Abilities => format!(
            "{}/{} abilities",
            state.abilities.visible().len(),
            state.abilities.all().len()
        ),
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.modal_open() {
        return vec![
            StatusBarHint::new("Esc", "Close"),
            StatusBarHint::new("q", "Quit"),
        ];
    }
    if state.search_active() {
        return vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Esc", "Clear"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    let mut hints = vec![
        StatusBarHint::new("Tab", "Panel"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("Enter", "Open"),
    ];
    if state.panel == Panel::Moves {
        hints.extend([
            StatusBarHint::new("w/s", "Tab"),
            StatusBarHint::new("[ ]", "Filter"),
            StatusBarHint::new("f", "Star"),
        ]);
    }
    hints.push(StatusBarHint::new("q", "Quit"));
    hints
}
