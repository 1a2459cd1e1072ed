use crate::error::InventoryError;
use crate::models::{occupancy_percent, Booking, Movie, NewMovie, NewTicketType, TicketType};
use crate::schema::{bookings, movies, ticket_types};

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::ConnectionResult;
use log::*;

/// Table layout. Column names match the files the desktop version wrote, so an
/// existing `mozijegy.db` opens unchanged.
const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS Movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    total_seats INTEGER NOT NULL,
    booked_seats INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS TicketTypes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL UNIQUE,
    price REAL
);

CREATE TABLE IF NOT EXISTS Bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    ticket_type_id INTEGER NOT NULL,
    quantity INTEGER NOT NULL,
    FOREIGN KEY(movie_id) REFERENCES Movies(id),
    FOREIGN KEY(ticket_type_id) REFERENCES TicketTypes(id)
);
"#;

const SAMPLE_MOVIES: [(&str, &str, i32); 3] = [
    ("Film 1", "Description of the first film.", 100),
    ("Film 2", "Description of the second film.", 80),
    ("Film 3", "Description of the third film.", 120),
];

const SAMPLE_TICKET_TYPES: [(&str, f64); 3] =
    [("Adult", 3000.0), ("Child", 2000.0), ("Student", 2500.0)];

pub fn establish_ctx(database_url: &str) -> ConnectionResult<SqliteConnection> {
    SqliteConnection::establish(database_url).map_err(|err| {
        error!("could not open {}: {}", database_url, err);
        err
    })
}

pub fn create_tables(ctx: &mut SqliteConnection) -> QueryResult<()> {
    ctx.batch_execute(CREATE_TABLES)
}

/// Fills empty tables with sample data. Tables that already hold rows are left alone.
pub fn seed(ctx: &mut SqliteConnection) -> QueryResult<()> {
    ctx.transaction(|ctx| {
        let movie_count: i64 = movies::table.count().get_result(ctx)?;
        if movie_count == 0 {
            for (title, description, seats) in SAMPLE_MOVIES {
                diesel::insert_into(movies::table)
                    .values(&NewMovie {
                        title,
                        description: Some(description),
                        total_seats: seats,
                        booked_seats: 0,
                    })
                    .execute(ctx)?;
            }
            info!("Seeded {} movies.", SAMPLE_MOVIES.len());
        }

        let type_count: i64 = ticket_types::table.count().get_result(ctx)?;
        if type_count == 0 {
            for (name, price) in SAMPLE_TICKET_TYPES {
                diesel::insert_into(ticket_types::table)
                    .values(&NewTicketType {
                        name,
                        price: Some(price),
                    })
                    .execute(ctx)?;
            }
            info!("Seeded {} ticket types.", SAMPLE_TICKET_TYPES.len());
        }

        Ok(())
    })
}

pub fn list_movies(ctx: &mut SqliteConnection) -> QueryResult<Vec<Movie>> {
    movies::table
        .order_by(movies::id)
        .select(Movie::as_select())
        .load(ctx)
}

pub fn get_movie(ctx: &mut SqliteConnection, movie_id: i32) -> Result<Movie, InventoryError> {
    movies::table
        .find(movie_id)
        .select(Movie::as_select())
        .first(ctx)
        .optional()?
        .ok_or_else(|| InventoryError::not_found("movie", movie_id))
}

pub fn ticket_types(ctx: &mut SqliteConnection) -> QueryResult<Vec<TicketType>> {
    ticket_types::table
        .order_by(ticket_types::id)
        .select(TicketType::as_select())
        .load(ctx)
}

/// Bookings of one movie with their ticket type, oldest first.
pub fn bookings_for_movie(
    ctx: &mut SqliteConnection,
    movie_id: i32,
) -> QueryResult<Vec<(Booking, TicketType)>> {
    bookings::table
        .inner_join(ticket_types::table)
        .filter(bookings::movie_id.eq(movie_id))
        .order_by(bookings::id)
        .select((Booking::as_select(), TicketType::as_select()))
        .load(ctx)
}

/// Title and occupancy percent of every movie, taken from a single read.
pub fn occupancy_report(ctx: &mut SqliteConnection) -> QueryResult<Vec<(String, u16)>> {
    Ok(list_movies(ctx)?
        .into_iter()
        .map(|movie| {
            let percent = occupancy_percent(movie.booked_seats, movie.total_seats);
            (movie.title, percent)
        })
        .collect())
}

#[cfg(test)]
pub(crate) fn test_ctx() -> SqliteConnection {
    let mut ctx = establish_ctx(":memory:").unwrap();
    create_tables(&mut ctx).unwrap();
    seed(&mut ctx).unwrap();
    ctx
}
