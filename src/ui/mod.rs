use crate::app_state::{App, BannerKind, ClassField, FocusField};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 顶部标题栏
            Constraint::Length(3), // UDISE 输入
            Constraint::Length(3), // 提示条
            Constraint::Min(0),    // 学校信息 + 年级表格
            Constraint::Min(8),    // 底部日志
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);
    render_search(f, chunks[1], app);
    render_banner(f, chunks[2], app);

    let middle = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(0)])
        .split(chunks[3]);
    render_school(f, middle[0], app);
    render_class_grid(f, middle[1], app);

    render_bottom_bar(f, chunks[4], app);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " 学校数据录入 ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - "),
        Span::styled(&app.config.endpoint_url, Style::default().fg(Color::Gray)),
    ];
    if app.loading {
        spans.push(Span::styled(
            "  ⏳ 请求中...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let active = app.focus == FocusField::Udise;
    let mut spans = vec![
        Span::styled(
            "UDISE: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(&app.udise_input),
    ];
    if active {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("查询学校 (Enter 查询)")
            .style(border_style(active)),
    );
    f.render_widget(paragraph, area);
}

fn render_banner(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.banner {
        Some(banner) => {
            let (symbol, color) = match banner.kind {
                BannerKind::Error => ("✗", Color::Red),
                BannerKind::Success => ("✓", Color::Green),
            };
            Line::from(Span::styled(
                format!("{} {}", symbol, banner.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(""),
    };
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_school(f: &mut Frame, area: Rect, app: &App) {
    let content = match &app.school {
        Some(school) => {
            let category = school.category();
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("名称: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(&school.name, Style::default().fg(Color::Cyan)),
                ]),
                Line::from(vec![
                    Span::styled("UDISE: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(&school.udise),
                ]),
                Line::from(vec![
                    Span::styled("Panchayat: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(&school.panchayat),
                ]),
                Line::from(vec![
                    Span::styled("类型: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        category.label().to_string(),
                        if category.is_known() {
                            Style::default().fg(Color::White)
                        } else {
                            Style::default().fg(Color::Red)
                        },
                    ),
                ]),
                Line::from(""),
            ];
            if app.is_update_mode() {
                lines.push(Line::from(Span::styled(
                    "● UPDATE MODE",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "○ NEW ENTRY",
                    Style::default().fg(Color::Green),
                )));
            }
            lines
        }
        None => vec![Line::from("输入 UDISE 后按 Enter 查询")],
    };

    let paragraph =
        Paragraph::new(content).block(Block::default().borders(Borders::ALL).title("学校信息"));
    f.render_widget(paragraph, area);
}

fn render_class_grid(f: &mut Frame, area: Rect, app: &App) {
    let in_grid = matches!(app.focus, FocusField::Class(..));
    let classes = app.relevant_classes();

    let mut lines = vec![
        Line::from(vec![Span::styled(
            format!("{:<10}{:>12}{:>12}", "Class", "Enrolled", "Appeared"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];

    for cls in classes {
        let invalid = app.class_is_invalid(*cls);
        let row_style = if invalid {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        let cell = |field: ClassField| {
            let value = app.class_value(*cls, field);
            let focused = app.focus == FocusField::Class(*cls, field);
            let text = if focused {
                format!("{:>11}_", value)
            } else {
                format!("{:>12}", value)
            };
            if focused {
                Span::styled(
                    text,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(text, row_style)
            }
        };

        let mut spans = vec![
            Span::styled(format!("{:<10}", format!("Class {}", cls)), row_style),
            cell(ClassField::Enrolled),
            cell(ClassField::Appeared),
        ];
        if invalid {
            spans.push(Span::styled("  ✗ Appeared > Enrolled", row_style));
        }
        lines.push(Line::from(spans));
    }

    if app.school.is_some() && classes.is_empty() {
        lines.push(Line::from(Span::styled(
            "该学校类型无可录入的年级",
            Style::default().fg(Color::Gray),
        )));
    }

    let title = if in_grid {
        "年级数据 (Tab/↑↓ 切换, F2 提交)"
    } else {
        "年级数据"
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(border_style(in_grid)),
    );
    f.render_widget(paragraph, area);
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let help = Paragraph::new(Line::from(
        "Enter查询 Tab/↑↓切换输入框 F2提交 Backspace删除 Esc退出",
    ))
    .block(Block::default().borders(Borders::ALL).title("快捷键"));
    f.render_widget(help, bottom_chunks[0]);

    // 最新的在顶部，最多 20 条
    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("日志 (共 {} 条)", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}
