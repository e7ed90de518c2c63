//! Shared value formatting for the memory panes

use crate::memory::alias::RawAlias;
use crate::memory::arena::Slot;
use crate::memory::value::Value;
use crate::memory::Memory;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Format a value with styled spans. Pointers are checked against `memory`
/// so a dangling one is flagged instead of looking like any other address.
pub(crate) fn format_value_styled(value: &Value, memory: &Memory) -> Vec<Span<'static>> {
    match value {
        Value::Int(n) => vec![Span::styled(
            n.to_string(),
            Style::default().fg(DEFAULT_THEME.number),
        )],
        Value::Double(d) => vec![Span::styled(
            format!("{}", d),
            Style::default().fg(DEFAULT_THEME.number),
        )],
        Value::Struct(fields) => {
            let mut names: Vec<&String> = fields.keys().collect();
            names.sort();

            let mut spans = vec![Span::styled("{ ", Style::default().fg(DEFAULT_THEME.comment))];
            for (i, name) in names.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(", ", Style::default().fg(DEFAULT_THEME.comment)));
                }
                spans.push(Span::styled(
                    format!("{}: ", name),
                    Style::default().fg(DEFAULT_THEME.fg),
                ));
                spans.extend(format_value_styled(&fields[name], memory));
            }
            spans.push(Span::styled(" }", Style::default().fg(DEFAULT_THEME.comment)));
            spans
        }
        Value::Pointer(target) => format_pointer(*target, memory),
        Value::Null => vec![Span::styled(
            "NULL",
            Style::default().fg(DEFAULT_THEME.number),
        )],
        Value::Uninitialized => vec![Span::styled(
            "?",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        )],
    }
}

fn format_pointer(target: RawAlias, memory: &Memory) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        format!("→ {}", target),
        Style::default().fg(DEFAULT_THEME.secondary),
    )];
    match memory.slot(target) {
        Ok(slot) => {
            let name = match target.field {
                Some(field) => format!("{}.{}", slot.name, field),
                None => slot.name.clone(),
            };
            spans.push(Span::styled(
                format!(" ({})", name),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
        }
        Err(_) => spans.push(Span::styled(
            " DANGLING",
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        )),
    }
    spans
}

/// One slot as a pane row: `0x...  int a = 10   g0`
pub(crate) fn slot_line(slot: &Slot, raw: RawAlias, memory: &Memory) -> Line<'static> {
    let live = slot.is_live();
    let dim = Style::default().fg(DEFAULT_THEME.comment);

    let mut spans = vec![
        Span::styled(format!("  0x{:08x} ", raw.address()), dim),
        Span::styled(
            format!("{} ", slot.c_type),
            if live {
                Style::default().fg(DEFAULT_THEME.type_name)
            } else {
                dim
            },
        ),
        Span::styled(
            slot.name.clone(),
            if live {
                Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD)
            } else {
                dim.add_modifier(Modifier::CROSSED_OUT)
            },
        ),
        Span::styled(" = ", dim),
    ];

    if live {
        spans.extend(format_value_styled(&slot.value, memory));
    } else {
        // Stale contents: what a dangling pointer would find by luck
        let stale: String = format_value_styled(&slot.value, memory)
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        spans.push(Span::styled(stale, dim.add_modifier(Modifier::ITALIC)));
    }

    spans.push(Span::styled(format!("  g{}", slot.generation), dim));
    if !live {
        spans.push(Span::styled(
            " expired",
            Style::default().fg(DEFAULT_THEME.error),
        ));
    }
    Line::from(spans)
}
