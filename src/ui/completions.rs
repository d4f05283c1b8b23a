//! Autocomplete UI widget.

use bevy_egui::egui;

use crate::config::ConsoleConfig;
use crate::core::{CommandRegistry, InputLine};

/// Consumes Tab, Up and Down and applies them to the input editor.
///
/// Up/Down move through the candidates, or through history when there are
/// none. Returns `true` when the text changed.
pub fn handle_navigation_keys(ui: &mut egui::Ui, input: &mut InputLine, registry: &CommandRegistry) -> bool {
    let mut consume = |key: egui::Key| ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, key));
    let tab = consume(egui::Key::Tab);
    let up = consume(egui::Key::ArrowUp);
    let down = consume(egui::Key::ArrowDown);

    let mut changed = false;
    if up {
        if input.candidates().is_empty() {
            changed |= input.history_previous(registry);
        } else {
            input.cycle_selection(-1);
        }
    }
    if down {
        if input.candidates().is_empty() {
            changed |= input.history_next(registry);
        } else {
            input.cycle_selection(1);
        }
    }
    if tab {
        changed |= input.complete(registry);
    }
    changed
}

/// First candidate shown so that `selected` stays inside a window of `shown`.
fn first_visible(selected: usize, shown: usize) -> usize {
    (selected + 1).saturating_sub(shown.max(1))
}

/// Shows the candidate popup under the text bar.
pub fn completions(response: &egui::Response, input: &InputLine, ui: &mut egui::Ui, config: &ConsoleConfig) {
    let popup_id = ui.make_persistent_id("text_edit_complete");

    if !input.text().is_empty() && !input.candidates().is_empty() {
        egui::Popup::open_id(ui.ctx(), popup_id);
    } else if egui::Popup::is_id_open(ui.ctx(), popup_id) {
        egui::Popup::close_id(ui.ctx(), popup_id);
    }

    // Typed prefix is highlighted while completing names
    let typed = if input.is_completing_argument() {
        0
    } else {
        input.text().chars().count()
    };

    let first = first_visible(input.selected(), config.max_completions);

    egui::Popup::from_response(response)
        .id(popup_id)
        .close_behavior(egui::PopupCloseBehavior::CloseOnClickOutside)
        .align(egui::RectAlign::TOP_START)
        .show(|ui| {
            ui.vertical(|ui| {
                for (i, candidate) in input
                    .candidates()
                    .iter()
                    .enumerate()
                    .skip(first)
                    .take(config.max_completions)
                {
                    let mut layout = egui::text::LayoutJob::default();
                    let split = candidate
                        .char_indices()
                        .nth(typed)
                        .map_or(candidate.len(), |(index, _)| index);
                    layout.append(&candidate[..split], 0.0, config.theme.format_bold());
                    layout.append(&candidate[split..], 0.0, config.theme.format_text());

                    let res = ui.label(layout);
                    if i == input.selected() {
                        res.highlight();
                    }
                }
            })
        });
}
