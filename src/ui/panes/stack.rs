//! Stack pane rendering: call frames and their arenas
//!
//! Every arena the stack has ever used is listed, including ones left behind
//! by returned calls. Slots past a frame's live region (or in a returned
//! frame's arena) are drawn as expired with their stale contents.

use super::utils::slot_line;
use crate::memory::alias::{RawAlias, Region};
use crate::memory::Memory;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    memory: &Memory,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Call Stack ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let stack = memory.stack();
    let mut all_items = Vec::new();

    if stack.arenas().is_empty() {
        all_items.push(ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }

    for (depth, arena) in stack.arenas().iter().enumerate() {
        let header = match stack.frames().get(depth) {
            Some(stack_frame) => Line::from(vec![
                Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("Frame {} ", depth),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    format!("{}()", stack_frame.function_name),
                    Style::default()
                        .fg(DEFAULT_THEME.function)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            None => Line::from(vec![
                Span::styled("▹ ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    format!("Frame {} │ returned", depth),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ]),
        };
        all_items.push(ListItem::new(header));

        if arena.is_empty() {
            all_items.push(ListItem::new(Line::from(Span::styled(
                "  (no locals)",
                Style::default().fg(DEFAULT_THEME.comment),
            ))));
        }
        for (index, slot) in arena.slots().iter().enumerate() {
            let raw = RawAlias::new(Region::Frame(depth), index, slot.generation);
            all_items.push(ListItem::new(slot_line(slot, raw, memory)));
        }
    }

    // Calculate visible range for scrolling
    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let max_scroll = total_items.saturating_sub(visible_height);
    *scroll_offset = (*scroll_offset).min(max_scroll);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
