use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::{App, StatusKind, UiFocus};
use crate::core::byte_size::format_file_size;
use crate::core::result::{HistoryLine, ResultViewer};
use crate::core::upload::UploadState;

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;

pub fn ui(f: &mut Frame, app: &App) {
    let uploader_height = if matches!(app.uploader.state(), UploadState::Empty) {
        4
    } else {
        5
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(uploader_height),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_title(f, app, chunks[0]);
    render_uploader(f, app, chunks[1]);
    render_prompt(f, app, chunks[2]);
    match &app.result {
        Some(viewer) => render_result(f, app, viewer, chunks[3]),
        None => render_hints(f, chunks[3]),
    }
    render_status(f, app, chunks[4]);

    if app.ui.is_file_picker_open() {
        render_file_picker(f, app);
    }
}

fn panel<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    let border_style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let mode = if app.is_editing() { "edit" } else { "generate" };
    let title = Line::from(vec![
        Span::styled(
            format!("ImageWand v{}", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" • {mode}"), Style::default().fg(MUTED)),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn render_uploader(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.ui.focus == UiFocus::Uploader && !app.ui.is_file_picker_open();
    let block = panel(" 圖片 ", focused);
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines = match app.uploader.state() {
        UploadState::Empty => vec![
            Line::from("將圖片拖曳到此處或點擊瀏覽"),
            Line::from(Span::styled("最大檔案大小：10MB", Style::default().fg(MUTED))),
        ],
        UploadState::Loading { file, .. } => vec![
            Line::from(truncate_to_width(&file.name, inner_width)),
            Line::from(Span::styled(
                format!("{} • 讀取中...", file.display_size()),
                Style::default().fg(MUTED),
            )),
        ],
        UploadState::Ready(upload) => {
            let (name, size) = match &upload.file {
                Some(file) => (file.name.as_str(), Some(file.display_size())),
                None => ("當前圖片", None),
            };
            let mut lines = vec![Line::from(Span::styled(
                truncate_to_width(name, inner_width),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if let Some(size) = size {
                lines.push(Line::from(Span::styled(size, Style::default().fg(MUTED))));
            }
            lines.push(Line::from(Span::styled(
                format!("{} • Del 移除圖片", data_url_summary(&upload.image)),
                Style::default().fg(MUTED),
            )));
            lines
        }
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_prompt(f: &mut Frame, app: &App, area: Rect) {
    let labels = app.prompt_labels();
    let focused = app.ui.focus == UiFocus::Prompt && !app.ui.is_file_picker_open();

    let button_style = if app.can_submit() {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    };
    let button = if app.is_generating() {
        Span::styled(" 生成中... ", Style::default().fg(MUTED))
    } else {
        Span::styled(format!(" Enter {} ", labels.button), button_style)
    };

    let block = panel(format!(" {} ", labels.heading), focused).title_bottom(Line::from(button));

    let mut textarea = app.prompt.textarea().clone();
    textarea.set_placeholder_text(labels.placeholder);
    textarea.set_cursor_line_style(Style::default());
    if !focused {
        textarea.set_cursor_style(Style::default());
    }
    textarea.set_block(block);
    f.render_widget(&textarea, area);
}

fn render_hints(f: &mut Frame, area: Rect) {
    let hints = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Tab 切換 • Ctrl+O 開啟檔案 • Ctrl+C 離開",
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(Paragraph::new(hints), area);
}

fn render_result(f: &mut Frame, app: &App, viewer: &ResultViewer, area: Rect) {
    let focused = app.ui.focus == UiFocus::Result && !app.ui.is_file_picker_open();

    let mut actions = vec![Span::raw(" d 下載 ")];
    if viewer.can_toggle_history() {
        actions.push(Span::raw(format!("• h {} ", viewer.history_toggle_label())));
    }
    actions.push(Span::raw("• r 重新產生圖片 "));

    let block = panel(" 生成圖片 ", focused).title_bottom(Line::from(actions));

    let mut lines = vec![Line::from(Span::styled(
        data_url_summary(viewer.image_url()),
        Style::default().fg(ACCENT),
    ))];

    if let Some(description) = viewer.description() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "描述",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(description.lines().map(|line| Line::from(line.to_string())));
    }

    if viewer.is_history_visible() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "對話紀錄",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(history_to_lines(viewer));
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn history_to_lines(viewer: &ResultViewer) -> Vec<Line<'static>> {
    viewer
        .history_lines()
        .into_iter()
        .map(|line| match line {
            HistoryLine::Speaker(name) => Line::from(Span::styled(
                name,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            HistoryLine::Text(text) => Line::from(format!("  {text}")),
            HistoryLine::Image { item, part } => {
                let summary = viewer.history()[item].parts[part]
                    .image
                    .as_deref()
                    .map(data_url_summary)
                    .unwrap_or_default();
                Line::from(Span::styled(
                    format!("  [{summary}]"),
                    Style::default().fg(MUTED),
                ))
            }
            HistoryLine::Separator => Line::from(""),
        })
        .collect()
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let Some(status) = &app.ui.status else {
        return;
    };
    let style = match status.kind {
        StatusKind::Info => Style::default().fg(MUTED),
        StatusKind::Error => Style::default().fg(Color::Red),
    };
    let text = truncate_to_width(&status.text, area.width as usize);
    f.render_widget(Paragraph::new(Span::styled(text, style)), area);
}

fn render_file_picker(f: &mut Frame, app: &App) {
    let Some(textarea) = picker_textarea(app) else {
        return;
    };
    let area = centered_rect(f.area(), 70, 3);
    f.render_widget(Clear, area);

    let mut textarea = textarea.clone();
    textarea.set_cursor_line_style(Style::default());
    textarea.set_placeholder_text("/path/to/image.png");
    textarea.set_block(
        panel(" 開啟圖片 ", true).title_bottom(Line::from(" Enter 確認 • Esc 取消 ")),
    );
    f.render_widget(&textarea, area);
}

fn picker_textarea(app: &App) -> Option<&tui_textarea::TextArea<'static>> {
    match &app.ui.mode {
        crate::core::app::UiMode::FilePicker(textarea) => Some(textarea),
        crate::core::app::UiMode::Normal => None,
    }
}

fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// One-line description of an image reference, e.g. `image/png • 1.5 KB`.
fn data_url_summary(url: &str) -> String {
    let Some(rest) = url.strip_prefix("data:") else {
        return url.to_string();
    };
    let (mime, payload) = rest.split_once(',').unwrap_or((rest, ""));
    let mime = mime.trim_end_matches(";base64");
    let padding = payload.bytes().rev().take_while(|&b| b == b'=').count() as u64;
    let decoded_len = (payload.len() as u64 * 3 / 4).saturating_sub(padding);
    format!("{} • {}", mime, format_file_size(decoded_len))
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("cat.png", 10), "cat.png");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each.
        assert_eq!(truncate_to_width("當前圖片", 5), "當前…");
    }

    #[test]
    fn summarizes_data_urls() {
        assert_eq!(
            data_url_summary("data:image/png;base64,AAAAAAAA"),
            "image/png • 6 Bytes"
        );
        // "c3R1Yg==" decodes to the four bytes "stub".
        assert_eq!(
            data_url_summary("data:image/png;base64,c3R1Yg=="),
            "image/png • 4 Bytes"
        );
        assert_eq!(data_url_summary("https://x/y.png"), "https://x/y.png");
    }

    #[test]
    fn empty_uploader_shows_drop_zone() {
        let app = create_test_app();
        let screen = render_to_string(&app, 80, 20);
        assert!(screen.contains("ImageWand"));
        assert!(screen.contains("generate"));
    }

    #[test]
    fn result_actions_render_without_panicking() {
        let mut app = create_test_app();
        app.uploader.set_external_image("data:image/png;base64,AAAA");
        app.result = Some(ResultViewer::new(
            "data:image/png;base64,AAAA",
            Some("a pig".into()),
            vec![crate::core::history::HistoryItem::user_turn("pig", None)],
        ));
        app.ui.open_file_picker();
        let screen = render_to_string(&app, 60, 24);
        assert!(screen.contains("edit"));
    }
}
