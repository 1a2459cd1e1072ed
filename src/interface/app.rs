use std::path::PathBuf;

use log::*;
use ratatui::widgets::{ListState, TableState};
use tui_input::Input;

use crate::error::InventoryError;
use crate::inventory::Selection;
use crate::models::{Booking, Movie, TicketType};
use crate::receipt::Receipt;
use crate::store::Database;

/// Which view has the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browse,
    Booking,
    Cancel,
    Statistics,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Last outcome shown at the bottom of the screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// The open booking popup for one movie.
#[derive(Debug)]
pub struct BookingForm {
    pub movie: Movie,
    pub ticket_types: Vec<TicketType>,
    pub type_state: ListState,
    pub quantity: Input,
    pub selection: Selection,
}

impl BookingForm {
    pub fn selected_type(&self) -> Option<&TicketType> {
        self.type_state
            .selected()
            .and_then(|i| self.ticket_types.get(i))
    }
}

/// Application.
pub struct App {
    /// Is the application running?
    pub running: bool,
    pub mode: Mode,

    db: Database,
    tickets_dir: PathBuf,

    pub table_state: TableState,
    pub movies: Vec<Movie>,
    /// bookings of the highlighted movie
    pub bookings: Vec<(Booking, TicketType)>,

    pub booking_form: Option<BookingForm>,
    pub cancel_input: Input,
    pub statistics: Vec<(String, u16)>,
    pub status: Option<Status>,
}

impl App {
    /// Constructs a new instance of [`App`].
    pub fn new(db: Database, tickets_dir: PathBuf) -> eyre::Result<Self> {
        let mut app = App {
            running: true,
            mode: Mode::Browse,
            db,
            tickets_dir,
            table_state: TableState::default(),
            movies: Vec::new(),
            bookings: Vec::new(),
            booking_form: None,
            cancel_input: Input::default(),
            statistics: Vec::new(),
            status: None,
        };
        app.refresh()?;
        if !app.movies.is_empty() {
            app.table_state.select(Some(0));
            app.load_bookings();
        }
        Ok(app)
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Reloads movies from the store so every screen shows committed seat counts.
    pub fn refresh(&mut self) -> Result<(), InventoryError> {
        self.movies = self.db.list_movies()?;
        match self.table_state.selected() {
            Some(i) if i >= self.movies.len() => {
                self.table_state
                    .select(self.movies.len().checked_sub(1));
            }
            _ => {}
        }
        Ok(())
    }

    fn load_bookings(&mut self) {
        let Some(movie_id) = self.selected_movie().map(|m| m.id) else {
            self.bookings.clear();
            return;
        };
        match self.db.bookings_for_movie(movie_id) {
            Ok(bookings) => self.bookings = bookings,
            Err(err) => self.report(err),
        }
    }

    fn reload(&mut self) {
        if let Err(err) = self.refresh() {
            self.report(err);
        }
        self.load_bookings();
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.table_state.selected().and_then(|i| self.movies.get(i))
    }

    pub fn next(&mut self, step: usize) {
        if self.movies.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => std::cmp::min(i + step, self.movies.len() - 1),
            None => 0,
        };
        self.table_state.select(Some(i));
        self.load_bookings();
    }

    pub fn prev(&mut self, step: usize) {
        if self.movies.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => i.saturating_sub(step),
            None => self.movies.len() - 1,
        };
        self.table_state.select(Some(i));
        self.load_bookings();
    }

    pub fn first(&mut self) {
        if !self.movies.is_empty() {
            self.table_state.select(Some(0));
            self.load_bookings();
        }
    }

    pub fn last(&mut self) {
        if !self.movies.is_empty() {
            self.table_state.select(Some(self.movies.len() - 1));
            self.load_bookings();
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    pub fn alert(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    pub fn report(&mut self, err: InventoryError) {
        error!("{}", err);
        self.status = Some(Status {
            kind: StatusKind::Error,
            text: err.to_string(),
        });
    }

    pub fn close_popup(&mut self) {
        self.mode = Mode::Browse;
        self.booking_form = None;
        self.cancel_input.reset();
    }

    /// Opens the booking popup for the highlighted movie, reading it fresh from the store.
    pub fn open_booking(&mut self) {
        let Some(movie_id) = self.selected_movie().map(|m| m.id) else {
            return;
        };
        let loaded = self
            .db
            .get_movie(movie_id)
            .and_then(|movie| Ok((movie, self.db.ticket_types()?)));

        match loaded {
            Ok((movie, ticket_types)) => {
                let mut type_state = ListState::default();
                if !ticket_types.is_empty() {
                    type_state.select(Some(0));
                }
                self.booking_form = Some(BookingForm {
                    movie,
                    ticket_types,
                    type_state,
                    quantity: Input::default(),
                    selection: Selection::new(),
                });
                self.mode = Mode::Booking;
            }
            Err(err) => self.report(err),
        }
    }

    pub fn cycle_ticket_type(&mut self, forward: bool) {
        let Some(form) = self.booking_form.as_mut() else {
            return;
        };
        let len = form.ticket_types.len();
        if len == 0 {
            return;
        }
        let i = match (form.type_state.selected(), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        form.type_state.select(Some(i));
    }

    /// Moves the typed quantity of the chosen ticket type into the selection.
    pub fn add_ticket(&mut self) {
        let Some(form) = self.booking_form.as_mut() else {
            return;
        };
        let Some(ticket_type) = form.selected_type().cloned() else {
            self.alert("no ticket type selected");
            return;
        };

        match form.selection.add(&ticket_type, form.quantity.value()) {
            Ok(quantity) => {
                form.quantity.reset();
                self.info(format!("Added {} x {}", quantity, ticket_type.name));
            }
            Err(err) => self.report(err),
        }
    }

    /// Books the pending selection, writes the receipt and reloads seat counts.
    pub fn confirm_booking(&mut self) {
        let Some(form) = self.booking_form.as_ref() else {
            return;
        };
        let movie_id = form.movie.id;
        let line_items = form.selection.line_items();

        match self.db.confirm_booking(movie_id, &line_items) {
            Ok(ids) => {
                let receipt = ids
                    .last()
                    .map(|&id| Receipt::new(id, &form.movie.title, &form.selection));
                let written = receipt.map(|receipt| {
                    let outcome = receipt.write_to(&self.tickets_dir);
                    (receipt, outcome)
                });
                self.close_popup();
                self.reload();
                match written {
                    Some((receipt, Ok(path))) => self.info(format!(
                        "Booking #{} confirmed, receipt saved to {}",
                        receipt.booking_id,
                        path.display()
                    )),
                    // the booking is committed either way
                    Some((receipt, Err(err))) => {
                        warn!("Could not write receipt {}: {}", receipt.file_name(), err);
                        self.alert(format!(
                            "Booking #{} confirmed, but the receipt could not be written: {}",
                            receipt.booking_id, err
                        ));
                    }
                    None => self.info("Booking confirmed"),
                }
            }
            Err(err) => {
                self.report(err);
                self.reload();
                if let Some(form) = self.booking_form.as_mut() {
                    if let Ok(movie) = self.db.get_movie(movie_id) {
                        form.movie = movie;
                    }
                }
            }
        }
    }

    pub fn open_cancel(&mut self) {
        self.cancel_input.reset();
        self.mode = Mode::Cancel;
    }

    pub fn cancel_booking(&mut self) {
        let raw = self.cancel_input.value().trim().to_string();
        let booking_id = match raw.parse::<i32>() {
            Ok(id) if id > 0 => id,
            _ => {
                self.alert(format!("{:?} is not a booking number", raw));
                return;
            }
        };

        match self.db.cancel_booking(booking_id) {
            Ok(booking) => {
                self.close_popup();
                self.reload();
                self.info(format!(
                    "Booking #{} cancelled, {} seats released",
                    booking.id, booking.quantity
                ));
            }
            Err(err) => self.report(err),
        }
    }

    pub fn open_statistics(&mut self) {
        match self.db.occupancy_report() {
            Ok(report) => {
                self.statistics = report;
                self.mode = Mode::Statistics;
            }
            Err(err) => self.report(err),
        }
    }
}
