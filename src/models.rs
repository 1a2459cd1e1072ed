use super::schema::{bookings, movies, ticket_types};

use diesel::prelude::*;

#[derive(Clone, Debug, Queryable, Selectable, PartialEq)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub total_seats: i32,
    pub booked_seats: i32,
}

impl Movie {
    /// Seats still open for booking. Always derived from the stored pair.
    pub fn available_seats(&self) -> i32 {
        self.total_seats - self.booked_seats
    }

    pub fn occupancy_percent(&self) -> u16 {
        occupancy_percent(self.booked_seats, self.total_seats)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = movies)]
pub struct NewMovie<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub total_seats: i32,
    pub booked_seats: i32,
}

#[derive(Clone, Debug, Queryable, Selectable, PartialEq)]
#[diesel(table_name = ticket_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TicketType {
    pub id: i32,
    pub name: String,
    pub price: Option<f64>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = ticket_types)]
pub struct NewTicketType<'a> {
    pub name: &'a str,
    pub price: Option<f64>,
}

#[derive(Clone, Debug, Queryable, Selectable, PartialEq)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Booking {
    pub id: i32,
    pub movie_id: i32,
    pub ticket_type_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub movie_id: i32,
    pub ticket_type_id: i32,
    pub quantity: i32,
}

/// Visual classification of how full a screening is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OccupancyTier {
    Low,
    Medium,
    High,
}

impl OccupancyTier {
    pub fn from_percent(percent: u16) -> Self {
        match percent {
            0..=39 => OccupancyTier::Low,
            40..=89 => OccupancyTier::Medium,
            _ => OccupancyTier::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OccupancyTier::Low => "low",
            OccupancyTier::Medium => "medium",
            OccupancyTier::High => "high",
        }
    }
}

impl std::fmt::Display for OccupancyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booked share of the room, rounded half-up to a whole percent.
/// A room without seats counts as empty.
pub fn occupancy_percent(booked_seats: i32, total_seats: i32) -> u16 {
    if total_seats <= 0 {
        return 0;
    }
    let booked = i64::from(booked_seats.max(0));
    let total = i64::from(total_seats);
    let percent = (booked * 200 + total) / (total * 2);
    percent.min(i64::from(u16::MAX)) as u16
}
