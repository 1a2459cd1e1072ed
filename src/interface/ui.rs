use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::interface::app::{App, Mode, StatusKind};
use crate::interface::ui_traits::{booking_item, selected_item, ticket_type_item};
use crate::inventory::occupancy_color;

const BROWSE_HELP: &str = "↑/↓ move  Enter book  x cancel booking  s statistics  q quit";

/// Renders the user interface widgets.
pub fn render<B: Backend>(app: &mut App, frame: &mut Frame<'_, B>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(frame.size());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(outer[0]);

    render_movies(app, frame, chunks[0]);
    render_details(app, frame, chunks[1]);
    render_status(app, frame, outer[1]);

    match app.mode {
        Mode::Browse => {}
        Mode::Booking => render_booking(app, frame),
        Mode::Cancel => render_cancel(app, frame),
        Mode::Statistics => render_statistics(app, frame),
    }
}

fn render_movies<B: Backend>(app: &mut App, frame: &mut Frame<'_, B>, area: Rect) {
    let rows = app.movies.iter().map(Row::from);

    frame.render_stateful_widget(
        Table::new(rows)
            .header(
                Row::new(vec!["title", "free/total"]).style(Style::default().fg(Color::Yellow)),
            )
            .block(Block::default().title("Movies").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ")
            .widths(&[Constraint::Min(20), Constraint::Length(12)])
            .style(Style::default().fg(Color::Cyan).bg(Color::Black)),
        area,
        &mut app.table_state,
    );
}

fn render_details<B: Backend>(app: &App, frame: &mut Frame<'_, B>, area: Rect) {
    let block = Block::default().title("Details").borders(Borders::ALL);
    let Some(movie) = app.selected_movie() else {
        frame.render_widget(Paragraph::new("No movies in the catalog.").block(block), area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Percentage(40),
            ]
            .as_ref(),
        )
        .split(inner);

    frame.render_widget(
        Paragraph::new(Text::from(movie)).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let percent = movie.occupancy_percent().min(100);
    let tier = occupancy_color(movie.booked_seats, movie.total_seats);
    frame.render_widget(
        Gauge::default()
            .block(Block::default().title("Occupancy").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::from(tier)).bg(Color::Black))
            .percent(percent)
            .label(format!("{}% ({})", percent, tier)),
        chunks[1],
    );

    let items: Vec<ListItem> = app
        .bookings
        .iter()
        .map(|(booking, ticket_type)| booking_item(booking, ticket_type))
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().title("Bookings").borders(Borders::ALL)),
        chunks[2],
    );
}

fn render_status<B: Backend>(app: &App, frame: &mut Frame<'_, B>, area: Rect) {
    let line = match (&app.status, app.mode) {
        (Some(status), _) => {
            let color = match status.kind {
                StatusKind::Info => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Line::from(Span::styled(
                status.text.clone(),
                Style::default().fg(color),
            ))
        }
        (None, Mode::Browse) => Line::from(BROWSE_HELP),
        (None, _) => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_booking<B: Backend>(app: &mut App, frame: &mut Frame<'_, B>) {
    let Some(form) = app.booking_form.as_mut() else {
        return;
    };

    let area = centered_rect(60, 80, frame.size());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!("Book tickets - {}", form.movie.title))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(form.ticket_types.len() as u16 + 2),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let selected = form.selection.total_quantity();
    frame.render_widget(
        Paragraph::new(format!(
            "Available seats: {}   Selected: {}",
            form.movie.available_seats(),
            selected
        )),
        chunks[0],
    );

    let types: Vec<ListItem> = form.ticket_types.iter().map(ticket_type_item).collect();
    frame.render_stateful_widget(
        List::new(types)
            .block(Block::default().title("Ticket type").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> "),
        chunks[1],
        &mut form.type_state,
    );

    {
        let width = chunks[2].width.max(3) - 3;
        let scroll = form.quantity.visual_scroll(width as usize);
        let input = Paragraph::new(form.quantity.value())
            .style(Style::default().fg(Color::Yellow))
            .scroll((0, scroll as u16))
            .block(Block::default().title("Quantity").borders(Borders::ALL));
        frame.render_widget(input, chunks[2]);
        frame.set_cursor(
            chunks[2].x + ((form.quantity.visual_cursor()).max(scroll) - scroll) as u16 + 1,
            chunks[2].y + 1,
        );
    }

    let picked: Vec<ListItem> = form.selection.items().iter().map(selected_item).collect();
    frame.render_widget(
        List::new(picked).block(Block::default().title("Added tickets").borders(Borders::ALL)),
        chunks[3],
    );

    frame.render_widget(
        Paragraph::new("Tab type  Enter add  Ctrl-s confirm  Esc close"),
        chunks[4],
    );
}

fn render_cancel<B: Backend>(app: &App, frame: &mut Frame<'_, B>) {
    let area = centered_rect(40, 30, frame.size());
    frame.render_widget(Clear, area);
    let block = Block::default().title("Cancel booking").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(inner);

    let width = chunks[0].width.max(3) - 3;
    let scroll = app.cancel_input.visual_scroll(width as usize);
    frame.render_widget(
        Paragraph::new(app.cancel_input.value())
            .style(Style::default().fg(Color::Yellow))
            .scroll((0, scroll as u16))
            .block(Block::default().title("Booking number").borders(Borders::ALL)),
        chunks[0],
    );
    frame.set_cursor(
        chunks[0].x + ((app.cancel_input.visual_cursor()).max(scroll) - scroll) as u16 + 1,
        chunks[0].y + 1,
    );

    frame.render_widget(
        Paragraph::new("Enter cancel  Esc close").wrap(Wrap { trim: true }),
        chunks[1],
    );
}

fn render_statistics<B: Backend>(app: &App, frame: &mut Frame<'_, B>) {
    let area = centered_rect(70, 60, frame.size());
    frame.render_widget(Clear, area);

    let data: Vec<(&str, u64)> = app
        .statistics
        .iter()
        .map(|(title, percent)| (title.as_str(), u64::from(*percent)))
        .collect();

    frame.render_widget(
        BarChart::default()
            .block(
                Block::default()
                    .title("Occupancy per movie (%)")
                    .borders(Borders::ALL),
            )
            .data(data.as_slice())
            .bar_width(10)
            .bar_gap(2)
            .max(100)
            .bar_style(Style::default().fg(Color::LightBlue))
            .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue)),
        area,
    );
}

/// Rectangle of the given percentage size in the middle of `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::app::tests::{test_app, type_quantity};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 36)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn browse_screen_lists_movies() {
        let (mut app, _dir) = test_app();
        let text = screen(&mut app);

        assert!(text.contains("Film 1"));
        assert!(text.contains("Film 3"));
        assert!(text.contains("100/100"));
        assert!(text.contains("Available seats: 100"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn booking_popup_shows_pending_tickets() {
        let (mut app, _dir) = test_app();
        app.open_booking();
        type_quantity(&mut app, "2");
        app.add_ticket();

        let text = screen(&mut app);

        assert!(text.contains("Book tickets - Film 1"));
        assert!(text.contains("Adult: 2 pcs"));
        assert!(text.contains("Selected: 2"));
    }

    #[test]
    fn statistics_popup_renders() {
        let (mut app, _dir) = test_app();
        app.open_statistics();
        let text = screen(&mut app);
        assert!(text.contains("Occupancy per movie"));
    }
}
