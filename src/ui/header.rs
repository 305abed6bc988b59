// chat-widget - A floating chat widget for the terminal
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::app::App;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(format!("{} ", theme::ICON_CHAT), Style::default().fg(theme::ACCENT)),
        Span::styled(
            app.config.title.clone(),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let user = &app.config.embed.user;
    if let Some(who) = user.name.as_deref().or(user.email.as_deref()) {
        frame.render_widget(
            Paragraph::new(Span::styled(who.to_owned(), Style::default().fg(theme::DIM)))
                .alignment(Alignment::Right),
            area,
        );
    }
}

/// Key hints under the composer.
pub fn render_hints(frame: &mut Frame, area: Rect, app: &App) {
    let hint = if app.is_generating() {
        "Esc stop · Enter send · Shift+Enter newline"
    } else if app.composer.options().allow_attachments {
        "Enter send · Ctrl+A attach · Ctrl+Y copy · F2 close"
    } else {
        "Enter send · Shift+Enter newline · Ctrl+Y copy · F2 close"
    };
    frame.render_widget(Paragraph::new(Span::styled(hint, Style::default().fg(theme::DIM))), area);
}
