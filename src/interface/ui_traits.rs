use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Cell, ListItem, Row},
};

use crate::inventory::{occupancy_color, SelectedTicket};
use crate::models::{Booking, Movie, OccupancyTier, TicketType};

// gauge color for each occupancy tier
impl From<OccupancyTier> for Color {
    fn from(tier: OccupancyTier) -> Self {
        match tier {
            OccupancyTier::Low => Color::Green,
            OccupancyTier::Medium => Color::Yellow,
            OccupancyTier::High => Color::Red,
        }
    }
}

// implementation of From trait for Movie to a ratatui table Row
impl From<&Movie> for Row<'_> {
    fn from(movie: &Movie) -> Self {
        let seats = Cell::from(format!("{}/{}", movie.available_seats(), movie.total_seats));
        Row::new(vec![
            Cell::from(movie.title.clone()),
            seats.style(Style::default().fg(Color::from(occupancy_color(
                movie.booked_seats,
                movie.total_seats,
            )))),
        ])
    }
}

// implementation of From trait for Movie to ratatui Text (detail pane)
impl From<&Movie> for Text<'_> {
    fn from(movie: &Movie) -> Self {
        Text::from(vec![
            Line::from(Span::styled(
                movie.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(movie.description.clone().unwrap_or_default()),
            Line::default(),
            Line::from(Span::styled(
                format!("Available seats: {}", movie.available_seats()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
    }
}

/// One line of the booking list; the number is what the cancel popup asks for.
pub fn booking_item<'a>(booking: &Booking, ticket_type: &TicketType) -> ListItem<'a> {
    ListItem::new(format!(
        "#{:<5} {} x {}",
        booking.id, ticket_type.name, booking.quantity
    ))
}

pub fn ticket_type_item<'a>(ticket_type: &TicketType) -> ListItem<'a> {
    match ticket_type.price {
        Some(price) => ListItem::new(format!("{} ({:.0})", ticket_type.name, price)),
        None => ListItem::new(ticket_type.name.clone()),
    }
}

pub fn selected_item<'a>(item: &SelectedTicket) -> ListItem<'a> {
    ListItem::new(format!("{}: {} pcs", item.ticket_type.name, item.quantity))
}
