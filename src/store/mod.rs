/// Catalog store: movies, ticket types and bookings in a local sqlite file.
/// - db mod holds the queries and schema setup
/// - `Database` owns the single connection and is handed to whoever needs it
pub mod db;

use diesel::SqliteConnection;
use log::*;

use crate::error::InventoryError;
use crate::inventory::{self, LineItem};
use crate::models::{Booking, Movie, TicketType};

pub struct Database {
    ctx: SqliteConnection,
}

impl Database {
    /// Opens (or creates) the store, making sure tables and sample data exist.
    pub fn open(database_url: &str) -> eyre::Result<Database> {
        let mut ctx = db::establish_ctx(database_url)?;
        db::create_tables(&mut ctx)?;
        db::seed(&mut ctx)?;
        info!("Catalog ready at {}", database_url);

        Ok(Database { ctx })
    }

    pub fn list_movies(&mut self) -> Result<Vec<Movie>, InventoryError> {
        Ok(db::list_movies(&mut self.ctx)?)
    }

    pub fn get_movie(&mut self, movie_id: i32) -> Result<Movie, InventoryError> {
        db::get_movie(&mut self.ctx, movie_id)
    }

    pub fn ticket_types(&mut self) -> Result<Vec<TicketType>, InventoryError> {
        Ok(db::ticket_types(&mut self.ctx)?)
    }

    pub fn bookings_for_movie(
        &mut self,
        movie_id: i32,
    ) -> Result<Vec<(Booking, TicketType)>, InventoryError> {
        Ok(db::bookings_for_movie(&mut self.ctx, movie_id)?)
    }

    pub fn occupancy_report(&mut self) -> Result<Vec<(String, u16)>, InventoryError> {
        Ok(db::occupancy_report(&mut self.ctx)?)
    }

    pub fn confirm_booking(
        &mut self,
        movie_id: i32,
        line_items: &[LineItem],
    ) -> Result<Vec<i32>, InventoryError> {
        inventory::confirm_booking(&mut self.ctx, movie_id, line_items)
    }

    pub fn cancel_booking(&mut self, booking_id: i32) -> Result<Booking, InventoryError> {
        inventory::cancel_booking(&mut self.ctx, booking_id)
    }
}
