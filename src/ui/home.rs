use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::intro::Intro;

const BANNER: &str = r#"
 ███╗   ███╗██╗███╗   ██╗██╗ ██████╗ █████╗ ██████╗ ███████╗
 ████╗ ████║██║████╗  ██║██║██╔════╝██╔══██╗██╔══██╗██╔════╝
 ██╔████╔██║██║██╔██╗ ██║██║██║     ███████║██║  ██║█████╗
 ██║╚██╔╝██║██║██║╚██╗██║██║██║     ██╔══██║██║  ██║██╔══╝
 ██║ ╚═╝ ██║██║██║ ╚████║██║╚██████╗██║  ██║██████╔╝███████╗
 ╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝"#;

const BANNER_HEIGHT: u16 = 8;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 3] = [
    GameTile { key: "1", icon: "🪐", name: "Planet Memory", desc: "Flip cards and\nmatch the planets!", color: Color::Rgb(120, 200, 255), border_color: Color::Rgb(50, 100, 140) },
    GameTile { key: "2", icon: "👾", name: "Boss Quiz", desc: "Answer right to\nblast six bosses!", color: Color::Rgb(255, 160, 60), border_color: Color::Rgb(140, 80, 30) },
    GameTile { key: "3", icon: "✈", name: "Sky Defense", desc: "Type the words to\nsave the castle!", color: Color::Rgb(140, 170, 255), border_color: Color::Rgb(60, 80, 150) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    lines.extend(tile.desc.split('\n').map(|l| Line::from(Span::styled(l, Style::default().fg(desc_color)))));

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn control(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<17}", keys), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn game_controls(game_idx: usize) -> Vec<Line<'static>> {
    let tile = &GAME_TILES[game_idx.min(GAME_TILES.len() - 1)];
    let (tagline, keys): (&str, &[(&'static str, &'static str)]) = match game_idx {
        0 => (
            "Find all eight pairs in as few moves as you can.",
            &[("↑ ↓ ← →", "Move cursor"), ("Space / Enter", "Flip card"), ("R", "Restart"), ("P", "Pause")],
        ),
        1 => (
            "Three lives. A wrong answer costs one.",
            &[("1 - 4", "Answer"), ("← / →", "Select answer"), ("Enter / Space", "Fire selected"), ("R", "Restart"), ("P", "Pause")],
        ),
        _ => (
            "Planes hit the castle for 10 HP. Survive three waves.",
            &[("a - z", "Type the word"), ("Backspace", "Erase a letter"), ("Enter", "Restart when over")],
        ),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", tile.icon, tile.name),
            Style::default().fg(tile.color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("  {}", tagline), Style::default().fg(Color::Rgb(100, 100, 120)))),
        Line::from(""),
    ];
    lines.extend(keys.iter().map(|&(k, a)| control(k, a)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, intro: &Intro, selected_game: usize) {
    if !intro.title_docked() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(BANNER_HEIGHT),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);
        let banner = Paragraph::new(BANNER)
            .style(Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(banner, rows[1]);
        let hint = Paragraph::new(Line::from(Span::styled(
            "press any key",
            Style::default().fg(Color::Rgb(80, 80, 100)).add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(hint, rows[2]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BANNER_HEIGHT), // Logo
            Constraint::Length(2),             // Subtitle
            Constraint::Length(8),             // Game tiles
            Constraint::Min(10),               // Controls area
            Constraint::Length(2),             // Footer
        ])
        .split(area);

    // Docked logo
    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Left);
    frame.render_widget(banner, chunks[0]);

    if !intro.gallery_visible() {
        return;
    }

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Three quick games for your terminal ⚡  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games: ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(games_inner);
    for (i, tile) in GAME_TILES.iter().enumerate() {
        render_game_tile(frame, cols[i], tile, selected_game == i);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let navigation = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("  🔧 Navigation", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))),
        control("Tab / Shift+Tab", "Switch tabs"),
        control("1-3", "Launch game"),
        control("← →", "Select game"),
        control("Enter", "Play selected"),
        control("Esc", "Return to Home"),
        control("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(navigation, ctrl_cols[0]);

    let selected = &GAME_TILES[selected_game.min(GAME_TILES.len() - 1)];
    let game_ctrl = Paragraph::new(game_controls(selected_game)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(selected.border_color))
            .title(format!(" 🎮 {} Control ", selected.name))
            .title_style(Style::default().fg(selected.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}
