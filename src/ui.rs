use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::catalog::{star_counts, Product};
use crate::chat::Who;
use crate::format::{format_price, truncate_ellipsis};
use crate::products::{ProductWidget, COMPARE_LIMIT};

/// Card footprint in terminal cells, borders included.
const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 11;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let tray_height = if app.grid.compare.is_empty() { 0 } else { 6 };
    let [grid_area, tray_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(tray_height)]).areas(body_area);
    render_grid(app, frame, grid_area);
    if tray_height > 0 {
        render_compare_tray(app, frame, tray_area);
    }

    render_footer(app, frame, footer_area);

    // Chat layer paints last so no other panel clips it
    if app.chat.open {
        render_chat_panel(app, frame, area);
    } else {
        render_chat_launcher(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let theme = app.grid.theme;

    let liked_indicator = if app.grid.liked.is_empty() {
        String::new()
    } else {
        format!(" [♥ {}]", app.grid.liked.len())
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", app.grid.title),
            Style::default().fg(theme.brand).bold(),
        ),
        Span::styled(liked_indicator, Style::default().fg(theme.danger)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.muted),
        ),
    ])];
    if !app.grid.subtitle.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}", app.grid.subtitle),
            Style::default().fg(theme.muted),
        )));
    }

    let header = Paragraph::new(lines).style(Style::default().bg(theme.card_bg));
    frame.render_widget(header, area);
}

fn render_grid(app: &mut App, frame: &mut Frame, area: Rect) {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    app.grid.columns = columns;
    app.grid.visible_rows = visible_rows;
    app.grid.ensure_cursor_visible();

    let first = app.grid.row_offset * columns;
    for (index, product) in app
        .grid
        .products
        .iter()
        .enumerate()
        .skip(first)
        .take(columns * visible_rows)
    {
        let slot = index - first;
        let col = (slot % columns) as u16;
        let row = (slot / columns) as u16;
        let card_area = Rect::new(
            area.x + col * CARD_WIDTH,
            area.y + row * CARD_HEIGHT,
            CARD_WIDTH.min(area.width),
            CARD_HEIGHT.min(area.height),
        );
        render_card(
            &app.grid,
            product,
            index == app.grid.cursor,
            frame,
            card_area,
        );
    }
}

fn render_card(
    grid: &ProductWidget,
    product: &Product,
    selected: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let theme = grid.theme;
    let inner_width = area.width.saturating_sub(2) as usize;
    let liked = grid.is_liked(&product.id);
    let compared = grid.is_compared(&product.id);

    let mut lines: Vec<Line> = Vec::new();

    // Badge row: installment left, discount and like marker right
    let discount = product.discount_percent();
    let discount_label = if discount > 0 {
        format!("-{discount}%")
    } else {
        String::new()
    };
    let heart = "♥";
    let right_width = discount_label.chars().count() + 1 + heart.chars().count();
    let installment = truncate_ellipsis(
        &product.installment,
        inner_width.saturating_sub(right_width + 1),
    );
    let pad = inner_width
        .saturating_sub(installment.chars().count())
        .saturating_sub(right_width);
    lines.push(Line::from(vec![
        Span::styled(installment, Style::default().fg(theme.brand)),
        Span::raw(" ".repeat(pad)),
        Span::styled(discount_label, Style::default().fg(theme.danger).bold()),
        Span::raw(" "),
        Span::styled(
            heart,
            Style::default().fg(if liked { theme.danger } else { theme.line }),
        ),
    ]));

    // Thumbnail placeholder: centered image slug
    let slug = format!("[{}]", image_slug(&product.image));
    let left_pad = inner_width.saturating_sub(slug.chars().count()) / 2;
    lines.push(Line::from(Span::styled(
        format!("{}{}", " ".repeat(left_pad), slug),
        Style::default().fg(theme.muted),
    )));

    // Name on up to two lines
    let name_chars: Vec<char> = product.name.chars().collect();
    let first_line: String = name_chars.iter().take(inner_width).collect();
    let rest: String = name_chars.iter().skip(inner_width).collect();
    lines.push(Line::from(Span::styled(
        first_line,
        Style::default().fg(theme.text),
    )));
    lines.push(Line::from(Span::styled(
        truncate_ellipsis(&rest, inner_width),
        Style::default().fg(theme.text),
    )));

    // Rating row
    let (full, half, empty) = star_counts(product.rating);
    let mut stars = "★".repeat(full);
    if half {
        stars.push('⯨');
    }
    stars.push_str(&"☆".repeat(empty));
    lines.push(Line::from(vec![
        Span::styled(stars, Style::default().fg(theme.gold)),
        Span::styled(
            format!(" ({})", product.review_count),
            Style::default().fg(theme.muted),
        ),
    ]));

    // Price row: current price, then the old one struck through
    let mut price_spans = vec![Span::styled(
        format_price(product.price, &grid.currency),
        Style::default().fg(theme.brand).bold(),
    )];
    if let Some(old) = product.old_price {
        price_spans.push(Span::styled(
            format!("  {}", format_price(old, &grid.currency)),
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::CROSSED_OUT),
        ));
    }
    lines.push(Line::from(price_spans));

    // Up to two promo lines
    for promo in product.promos.iter().take(2) {
        lines.push(Line::from(Span::styled(
            truncate_ellipsis(&format!("🎁 {promo}"), inner_width),
            Style::default().fg(theme.muted),
        )));
    }
    while lines.len() < 8 {
        lines.push(Line::default());
    }

    // Action row: compare checkbox left, buy button right
    let checkbox = if compared {
        "[x] So sánh"
    } else {
        "[ ] So sánh"
    };
    let buy = " Mua ngay ";
    let pad = inner_width
        .saturating_sub(checkbox.chars().count())
        .saturating_sub(buy.chars().count());
    lines.push(Line::from(vec![
        Span::styled(
            checkbox,
            Style::default().fg(if compared { theme.brand } else { theme.muted }),
        ),
        Span::raw(" ".repeat(pad)),
        Span::styled(
            buy,
            Style::default().fg(theme.card_bg).bg(theme.brand).bold(),
        ),
    ]));

    let border_style = if selected {
        Style::default().fg(theme.brand)
    } else {
        Style::default().fg(theme.line)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(theme.card_bg));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_compare_tray(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = app.grid.theme;
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for product in app.grid.resolved_compare() {
        let price = format_price(product.price, &app.grid.currency);
        let name_width = inner_width.saturating_sub(price.chars().count() + 3);
        let name = truncate_ellipsis(&product.name, name_width);
        let pad = inner_width
            .saturating_sub(name.chars().count())
            .saturating_sub(price.chars().count() + 1);
        lines.push(Line::from(vec![
            Span::styled(format!("• {name}"), Style::default().fg(theme.text)),
            Span::raw(" ".repeat(pad.saturating_sub(1))),
            Span::styled(price, Style::default().fg(theme.brand).bold()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.brand))
        .title(format!(
            " So sánh ({}/{}) ",
            app.grid.compare.len(),
            COMPARE_LIMIT
        ))
        .style(Style::default().bg(theme.card_bg));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let theme = app.grid.theme;

    // Key style: dark background with bright text, readable on any terminal
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mode_style) = if app.chat.open {
        (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        (" CỬA HÀNG ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    let mut spans = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
    ];

    if !app.status.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", app.status),
            Style::default().fg(theme.brand).bold(),
        ));
    } else {
        let hints: Vec<(&str, &str)> = if app.chat.open {
            vec![
                ("Enter", "gửi"),
                ("Esc", "đóng"),
                ("↑/↓", "cuộn"),
                ("Ctrl+C", "thoát"),
            ]
        } else {
            let mut hints = vec![
                ("←↑↓→", "chọn"),
                ("Space", "so sánh"),
                ("f", "thích"),
                ("Enter", "mua"),
            ];
            if !app.grid.compare.is_empty() {
                hints.push(("x", "xoá"));
                hints.push(("s", "so sánh"));
            }
            hints.push(("a", "chat"));
            hints.push(("q", "thoát"));
            hints
        };
        for (key, label) in hints {
            spans.push(Span::styled(format!(" {key} "), key_style));
            spans.push(Span::styled(format!(" {label} "), label_style));
        }
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Launcher bubble pinned above the footer in the bottom-right corner.
fn render_chat_launcher(app: &App, frame: &mut Frame, area: Rect) {
    if area.width < 8 || area.height < 6 {
        return;
    }
    let theme = app.grid.theme;
    let bubble = Rect::new(area.right().saturating_sub(7), area.bottom().saturating_sub(5), 6, 3);

    frame.render_widget(Clear, bubble);
    let label = Paragraph::new("💬")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.brand)),
        )
        .style(Style::default().bg(theme.card_bg));
    frame.render_widget(label, bubble);
}

/// The open chat panel, anchored bottom-right above the footer.
fn render_chat_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(4).min(44);
    let height = area.height.saturating_sub(4).min(18);
    if width < 10 || height < 6 {
        return;
    }
    let theme = app.grid.theme;
    let panel = Rect::new(
        area.right().saturating_sub(width + 1),
        area.bottom().saturating_sub(height + 2),
        width,
        height,
    );

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.brand))
        .title(" Chat trợ lý ")
        .style(Style::default().bg(theme.card_bg));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let [list_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(inner);
    render_chat_list(app, frame, list_area);
    render_chat_input(app, frame, input_area);
}

fn render_chat_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = app.grid.theme;
    app.chat.list_width = area.width;
    app.chat.list_height = area.height;

    let mut lines: Vec<Line> = Vec::new();
    for msg in &app.chat.messages {
        match msg.who {
            Who::User => {
                lines.push(Line::from(Span::styled(
                    "Bạn:",
                    Style::default().fg(theme.brand).bold(),
                )));
            }
            Who::Bot => {
                lines.push(Line::from(Span::styled(
                    "Trợ lý:",
                    Style::default().fg(theme.gold).bold(),
                )));
            }
        }
        for line in msg.text.lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(theme.text),
            )));
        }
        lines.push(Line::default());
    }

    if app.chat.reply_pending() {
        lines.push(Line::from(Span::styled(
            "Trợ lý:",
            Style::default().fg(theme.gold).bold(),
        )));
        // Animated ellipsis cycling ".", "..", "..."
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("Đang trả lời{dots}"),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )));
    }

    let list = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .scroll((app.chat.scroll, 0));
    frame.render_widget(list, area);
}

fn render_chat_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = app.grid.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.line));

    // Horizontal scrolling keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat.cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let (content, content_style) = if app.chat.draft.is_empty() {
        (
            "Nhập tin nhắn…".to_string(),
            Style::default().fg(theme.muted),
        )
    } else {
        (
            app.chat
                .draft
                .chars()
                .skip(scroll_offset)
                .take(inner_width)
                .collect(),
            Style::default().fg(theme.text),
        )
    };

    let input = Paragraph::new(content).style(content_style).block(block);
    frame.render_widget(input, area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

/// Short label standing in for the product image: the seed segment of the
/// demo picsum URLs, or the last non-numeric path segment otherwise.
fn image_slug(url: &str) -> &str {
    let mut slug = "…";
    for segment in url.trim_end_matches('/').split('/') {
        if segment.is_empty() || segment.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        slug = segment;
    }
    slug
}
