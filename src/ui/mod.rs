//! The module that handles the user interface of the console.

use bevy::prelude::*;
use bevy_egui::egui::text::LayoutJob;
use bevy_egui::*;

use crate::config::ConsoleConfig;
use crate::core::{CommandRegistry, ConsoleInput, ConsoleInputEvent, ConsoleToggleEvent, ConsoleView, LogLine};

mod completions;

/// Characters typed by the toggle keys, swallowed before they reach the input.
const TOGGLE_CHARS: [&str; 3] = ["`", "~", "§"];

#[derive(Default, Resource)]
pub struct ConsoleUiState {
    /// Whether the console is open or not.
    pub(crate) open: bool,
    /// Whether we have set focus this open or not.
    pub(crate) text_focus: bool,
    /// The text bar contents, mirrored into [`ConsoleInput`] on every edit.
    pub(crate) text: String,
    /// View generation last drawn, to scroll to new rows.
    pub(crate) seen_generation: u64,
}

impl ConsoleUiState {
    /// Whether the console is currently open or not
    pub fn open(&self) -> bool {
        self.open
    }
}

pub(crate) fn open_close_ui(
    mut state: ResMut<ConsoleUiState>,
    mut input: ResMut<ConsoleInput>,
    key: Res<ButtonInput<KeyCode>>,
    config: Res<ConsoleConfig>,
    mut toggles: MessageWriter<ConsoleToggleEvent>,
) {
    if key.get_just_pressed().any(|k| config.is_toggle_key(*k)) {
        state.open = !state.open;
        state.text_focus = false;
        state.text.clear();
        input.reset();

        toggles.write(if state.open {
            ConsoleToggleEvent::opened()
        } else {
            ConsoleToggleEvent::closed()
        });
    }
}

pub(crate) fn render_ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<ConsoleUiState>,
    mut input: ResMut<ConsoleInput>,
    registry: Res<CommandRegistry>,
    view: Res<ConsoleView>,
    key: Res<ButtonInput<KeyCode>>,
    config: Res<ConsoleConfig>,
    mut input_events: MessageWriter<ConsoleInputEvent>,
) -> Result<(), BevyError> {
    egui::Window::new(config.title.as_str())
        .collapsible(false)
        .default_width(900.)
        .show(contexts.ctx_mut()?, |ui| {
            render_ui(
                ui,
                &mut state,
                &mut input,
                &registry,
                &view,
                &key,
                &config,
                &mut input_events,
            )
        });
    Ok(())
}

/// The function that renders the UI of the developer console.
#[allow(clippy::too_many_arguments)]
pub fn render_ui(
    ui: &mut egui::Ui,
    state: &mut ConsoleUiState,
    input: &mut ConsoleInput,
    registry: &CommandRegistry,
    view: &ConsoleView,
    key: &ButtonInput<KeyCode>,
    config: &ConsoleConfig,
    input_events: &mut MessageWriter<ConsoleInputEvent>,
) {
    fn submit_command(
        state: &mut ConsoleUiState,
        input: &mut ConsoleInput,
        input_events: &mut MessageWriter<ConsoleInputEvent>,
    ) {
        if let Some(line) = input.submit() {
            input_events.write(ConsoleInputEvent::new(line));
        }
        state.text.clear();
    }

    ui.input_mut(|i| {
        i.events
            .retain(|e| !matches!(e, egui::Event::Text(t) if TOGGLE_CHARS.contains(&t.as_str())))
    });

    if key.just_pressed(config.submit_key) {
        submit_command(state, input, input_events);
    }

    // Tab, Up and Down drive the input editor, not egui
    if completions::handle_navigation_keys(ui, input, registry) {
        state.text = input.text().to_string();
    }

    egui::TopBottomPanel::bottom("bottom panel")
        .frame(egui::Frame::NONE.outer_margin(egui::Margin {
            left: 5,
            right: 5,
            top: 11,
            bottom: 5,
        }))
        .show_inside(ui, |ui| {
            let text_edit_id = egui::Id::new("text_edit");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Submit").clicked() {
                    submit_command(state, input, input_events);
                    ui.ctx().memory_mut(|mem| mem.request_focus(text_edit_id));
                }

                let text_edit = egui::TextEdit::singleline(&mut state.text)
                    .id(text_edit_id)
                    .desired_width(ui.available_width())
                    .margin(egui::Vec2::splat(4.0))
                    .font(config.theme.font.clone())
                    .lock_focus(true)
                    .show(ui);

                if text_edit.response.changed() {
                    input.set_text(state.text.clone(), registry);
                }

                if let Some(cursor) = input.take_cursor_jump() {
                    let mut text_edit_state = text_edit.state.clone();
                    let ccursor = egui::text::CCursor::new(cursor);
                    text_edit_state
                        .cursor
                        .set_char_range(Some(egui::text::CCursorRange::one(ccursor)));
                    egui::TextEdit::store_state(ui.ctx(), text_edit_id, text_edit_state);
                }

                completions::completions(&text_edit.response, input, ui, config);

                if !state.text_focus {
                    state.text_focus = true;
                    ui.ctx().memory_mut(|mem| mem.request_focus(text_edit_id));
                }
            });
        });

    let scroll_to_new = state.seen_generation != view.generation;
    state.seen_generation = view.generation;

    egui::ScrollArea::new([false, true])
        .auto_shrink([false, true])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Oldest at the top, newest right above the input line
                let count = view.rows.len();
                for (id, row) in view.rows.iter().rev().enumerate() {
                    let is_newest = id + 1 == count;
                    add_log(ui, id, row, view.collapsing, scroll_to_new && is_newest, config);
                }
            });
        });
}

fn add_log(ui: &mut egui::Ui, id: usize, row: &LogLine, collapsing: bool, scroll: bool, config: &ConsoleConfig) {
    ui.push_id(id, |ui| {
        let label = ui.label(format_line(row, collapsing, config));

        if scroll {
            label.scroll_to_me(Some(egui::Align::Max));
        }

        // Copy line to clipboard on click
        if label.clicked() {
            ui.ctx().copy_text(row.render(collapsing));
        }

        label.on_hover_text("Click to copy line");
    });
}

fn format_line(row: &LogLine, collapsing: bool, config: &ConsoleConfig) -> LayoutJob {
    let theme = &config.theme;
    let mut text = LayoutJob::default();

    text.append(&format!("[{}]", row.severity), 0.0, theme.format_severity(row.severity));
    text.append(&format!("[{}]: ", row.time_of_day()), 0.0, theme.format_dark());
    text.append(&row.header, 0.0, theme.format_severity(row.severity));

    if collapsing && row.count > 0 {
        text.append(&format!(" [x{}]", row.count), 0.0, theme.format_bold());
    }
    if !row.body.is_empty() {
        text.append(&format!("\n{}", row.body), 0.0, theme.format_dark());
    }

    text
}
