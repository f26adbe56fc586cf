use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::games::Game;

/// Finished games keep a badge in the tab bar until they are restarted.
fn badge(app: &App, tab: Tab) -> Option<&'static str> {
    let over = match tab {
        Tab::Home => false,
        Tab::Memory => app.memory.is_game_over(),
        Tab::BossQuiz => app.boss_quiz.is_game_over(),
        Tab::SkyDefense => app.sky_defense.is_game_over(),
    };
    over.then_some("✔ ")
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(Color::Rgb(255, 220, 80))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(120, 120, 140))
            };
            let mut spans = vec![Span::styled(t.title(), style)];
            if let Some(mark) = badge(app, *t) {
                spans.push(Span::styled(mark, Style::default().fg(Color::Rgb(80, 220, 120))));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
                .border_type(BorderType::Rounded)
                .title(" 🕹 Minicade ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(200, 120, 255))
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(app.current_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
