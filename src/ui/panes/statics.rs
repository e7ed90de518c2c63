//! Static pane: the process-lifetime context

use super::utils::slot_line;
use crate::memory::alias::{RawAlias, Region};
use crate::memory::Memory;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the static storage pane
pub fn render_statics_pane(frame: &mut Frame, area: Rect, memory: &Memory, is_focused: bool) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Static (process lifetime) ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let arena = memory.statics().arena();
    let items: Vec<ListItem> = if arena.is_empty() {
        vec![ListItem::new("(no globals)").style(Style::default().fg(DEFAULT_THEME.comment))]
    } else {
        arena
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let raw = RawAlias::new(Region::Static, index, slot.generation);
                ListItem::new(slot_line(slot, raw, memory))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}
