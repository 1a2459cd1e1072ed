//! Seat inventory: the pending ticket selection and the transactions that turn
//! it into bookings or take bookings back.
//!
//! Every mutation runs inside one immediate transaction, so the availability
//! check and the write it guards see the same seat counts.

use crate::error::InventoryError;
use crate::models::{occupancy_percent, Booking, NewBooking, OccupancyTier, TicketType};
use crate::schema::{bookings, movies, ticket_types};
use crate::store::db::get_movie;

use diesel::prelude::*;
use log::*;

/// One (ticket type, quantity) pair submitted for confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineItem {
    pub ticket_type_id: i32,
    pub quantity: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectedTicket {
    pub ticket_type: TicketType,
    pub quantity: i32,
}

/// Tickets picked for a movie but not booked yet.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<SelectedTicket>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` tickets of `ticket_type`. Picking a type twice adds to
    /// the existing line instead of creating a second one.
    pub fn add(&mut self, ticket_type: &TicketType, quantity: &str) -> Result<i32, InventoryError> {
        let quantity = parse_quantity(quantity)?;

        match self
            .items
            .iter_mut()
            .find(|item| item.ticket_type.id == ticket_type.id)
        {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| InventoryError::InvalidQuantity(quantity.to_string()))?;
            }
            None => self.items.push(SelectedTicket {
                ticket_type: ticket_type.clone(),
                quantity,
            }),
        }

        Ok(quantity)
    }

    pub fn items(&self) -> &[SelectedTicket] {
        &self.items
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem {
                ticket_type_id: item.ticket_type.id,
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Reads a ticket count typed by the user.
pub fn parse_quantity(raw: &str) -> Result<i32, InventoryError> {
    match raw.trim().parse::<i32>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(InventoryError::InvalidQuantity(raw.trim().to_string())),
    }
}

fn requested_seats(line_items: &[LineItem]) -> Result<i64, InventoryError> {
    let total: i64 = line_items.iter().map(|item| i64::from(item.quantity)).sum();
    if line_items.is_empty() || total == 0 {
        return Err(InventoryError::EmptySelection);
    }
    if let Some(bad) = line_items.iter().find(|item| item.quantity <= 0) {
        return Err(InventoryError::InvalidQuantity(bad.quantity.to_string()));
    }
    Ok(total)
}

/// Books every line item for `movie_id` and returns the new booking ids in
/// line-item order. Either all rows and the seat update persist, or nothing does.
pub fn confirm_booking(
    ctx: &mut SqliteConnection,
    movie_id: i32,
    line_items: &[LineItem],
) -> Result<Vec<i32>, InventoryError> {
    let requested = requested_seats(line_items)?;

    let result = ctx.immediate_transaction::<_, InventoryError, _>(|ctx| {
        let movie = get_movie(ctx, movie_id)?;
        let available = movie.available_seats();
        if requested > i64::from(available) {
            return Err(InventoryError::InsufficientSeats {
                requested,
                available,
            });
        }

        let mut ids = Vec::with_capacity(line_items.len());
        for item in line_items {
            let known: i64 = ticket_types::table
                .find(item.ticket_type_id)
                .count()
                .get_result(ctx)?;
            if known == 0 {
                return Err(InventoryError::not_found("ticket type", item.ticket_type_id));
            }

            let id = diesel::insert_into(bookings::table)
                .values(&NewBooking {
                    movie_id,
                    ticket_type_id: item.ticket_type_id,
                    quantity: item.quantity,
                })
                .returning(bookings::id)
                .get_result::<i32>(ctx)?;
            ids.push(id);
        }

        // fits: requested <= available <= total_seats
        let booked_seats = movie.booked_seats + requested as i32;
        diesel::update(movies::table.find(movie_id))
            .set(movies::booked_seats.eq(booked_seats))
            .execute(ctx)?;

        Ok(ids)
    });

    match &result {
        Ok(ids) => info!(
            "Booked {} seats for movie #{} as bookings {:?}",
            requested, movie_id, ids
        ),
        Err(err) => warn!("Booking for movie #{} rejected: {}", movie_id, err),
    }
    result
}

/// Removes a booking and gives its seats back to the movie.
pub fn cancel_booking(ctx: &mut SqliteConnection, booking_id: i32) -> Result<Booking, InventoryError> {
    let result = ctx.immediate_transaction::<_, InventoryError, _>(|ctx| {
        let booking = bookings::table
            .find(booking_id)
            .select(Booking::as_select())
            .first(ctx)
            .optional()?
            .ok_or_else(|| InventoryError::not_found("booking", booking_id))?;

        let movie = get_movie(ctx, booking.movie_id)?;

        diesel::delete(bookings::table.find(booking_id)).execute(ctx)?;

        let booked_seats = (movie.booked_seats - booking.quantity).max(0);
        diesel::update(movies::table.find(movie.id))
            .set(movies::booked_seats.eq(booked_seats))
            .execute(ctx)?;

        Ok(booking)
    });

    match &result {
        Ok(booking) => info!(
            "Cancelled booking #{} ({} seats for movie #{})",
            booking.id, booking.quantity, booking.movie_id
        ),
        Err(err) => warn!("Cancelling booking #{} failed: {}", booking_id, err),
    }
    result
}

/// Gauge tier for a booked/total seat pair.
pub fn occupancy_color(booked_seats: i32, total_seats: i32) -> OccupancyTier {
    OccupancyTier::from_percent(occupancy_percent(booked_seats, total_seats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::db::test_ctx;
    use diesel::connection::SimpleConnection;

    const ADULT: i32 = 1;
    const CHILD: i32 = 2;
    const STUDENT: i32 = 3;

    fn item(ticket_type_id: i32, quantity: i32) -> LineItem {
        LineItem {
            ticket_type_id,
            quantity,
        }
    }

    fn booking_count(ctx: &mut SqliteConnection) -> i64 {
        bookings::table.count().get_result(ctx).unwrap()
    }

    fn set_booked(ctx: &mut SqliteConnection, movie_id: i32, booked: i32) {
        diesel::update(movies::table.find(movie_id))
            .set(movies::booked_seats.eq(booked))
            .execute(ctx)
            .unwrap();
    }

    fn adult() -> TicketType {
        TicketType {
            id: ADULT,
            name: "Adult".to_string(),
            price: Some(3000.0),
        }
    }

    #[test]
    fn confirm_books_seats_and_rows() {
        let mut ctx = test_ctx();

        let ids = confirm_booking(&mut ctx, 1, &[item(ADULT, 30)]).unwrap();

        assert_eq!(ids.len(), 1);
        let movie = get_movie(&mut ctx, 1).unwrap();
        assert_eq!(movie.booked_seats, 30);
        assert_eq!(movie.available_seats(), 70);
        assert_eq!(booking_count(&mut ctx), 1);
    }

    #[test]
    fn confirm_creates_one_row_per_line_item() {
        let mut ctx = test_ctx();

        let ids = confirm_booking(
            &mut ctx,
            2,
            &[item(ADULT, 2), item(CHILD, 3), item(STUDENT, 1)],
        )
        .unwrap();

        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(get_movie(&mut ctx, 2).unwrap().booked_seats, 6);

        let rows: Vec<Booking> = bookings::table
            .order_by(bookings::id)
            .select(Booking::as_select())
            .load(&mut ctx)
            .unwrap();
        let quantities: Vec<i32> = rows.iter().map(|b| b.quantity).collect();
        assert_eq!(quantities, [2, 3, 1]);
        assert!(rows.iter().all(|b| b.movie_id == 2));
    }

    #[test]
    fn confirm_rejects_overbooking_without_changes() {
        let mut ctx = test_ctx();
        set_booked(&mut ctx, 1, 95);

        let err = confirm_booking(&mut ctx, 1, &[item(ADULT, 10)]).unwrap_err();

        assert!(matches!(
            err,
            InventoryError::InsufficientSeats {
                requested: 10,
                available: 5
            }
        ));
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 95);
        assert_eq!(booking_count(&mut ctx), 0);
    }

    #[test]
    fn confirm_can_fill_the_room_exactly() {
        let mut ctx = test_ctx();
        set_booked(&mut ctx, 2, 75);

        confirm_booking(&mut ctx, 2, &[item(ADULT, 3), item(CHILD, 2)]).unwrap();

        let movie = get_movie(&mut ctx, 2).unwrap();
        assert_eq!(movie.booked_seats, movie.total_seats);
        assert!(confirm_booking(&mut ctx, 2, &[item(ADULT, 1)]).is_err());
    }

    #[test]
    fn confirm_rejects_empty_selection() {
        let mut ctx = test_ctx();

        assert!(matches!(
            confirm_booking(&mut ctx, 1, &[]),
            Err(InventoryError::EmptySelection)
        ));
        assert!(matches!(
            confirm_booking(&mut ctx, 1, &[item(ADULT, 0)]),
            Err(InventoryError::EmptySelection)
        ));
        assert_eq!(booking_count(&mut ctx), 0);
    }

    #[test]
    fn confirm_rejects_non_positive_line() {
        let mut ctx = test_ctx();

        let err = confirm_booking(&mut ctx, 1, &[item(ADULT, 4), item(CHILD, -1)]).unwrap_err();

        assert!(matches!(err, InventoryError::InvalidQuantity(_)));
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 0);
    }

    #[test]
    fn confirm_rejects_unknown_references() {
        let mut ctx = test_ctx();

        assert!(matches!(
            confirm_booking(&mut ctx, 99, &[item(ADULT, 1)]),
            Err(InventoryError::NotFound { kind: "movie", id: 99 })
        ));
        assert!(matches!(
            confirm_booking(&mut ctx, 1, &[item(ADULT, 1), item(77, 1)]),
            Err(InventoryError::NotFound {
                kind: "ticket type",
                id: 77
            })
        ));
        assert_eq!(booking_count(&mut ctx), 0);
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 0);
    }

    #[test]
    fn store_failure_rolls_back_every_row() {
        let mut ctx = test_ctx();
        ctx.batch_execute(
            "CREATE TRIGGER reject_thirteen BEFORE INSERT ON Bookings \
             WHEN NEW.quantity = 13 BEGIN SELECT RAISE(ABORT, 'unlucky'); END;",
        )
        .unwrap();

        let err = confirm_booking(&mut ctx, 3, &[item(ADULT, 2), item(CHILD, 13)]).unwrap_err();

        assert!(matches!(err, InventoryError::PersistenceFailure(_)));
        assert_eq!(booking_count(&mut ctx), 0);
        assert_eq!(get_movie(&mut ctx, 3).unwrap().booked_seats, 0);
    }

    #[test]
    fn cancel_returns_seats_once() {
        let mut ctx = test_ctx();
        let ids = confirm_booking(&mut ctx, 1, &[item(ADULT, 4), item(CHILD, 6)]).unwrap();

        let cancelled = cancel_booking(&mut ctx, ids[1]).unwrap();

        assert_eq!(cancelled.quantity, 6);
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 4);
        assert_eq!(booking_count(&mut ctx), 1);

        assert!(matches!(
            cancel_booking(&mut ctx, ids[1]),
            Err(InventoryError::NotFound { kind: "booking", .. })
        ));
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 4);
    }

    #[test]
    fn cancel_never_goes_below_zero() {
        let mut ctx = test_ctx();
        let ids = confirm_booking(&mut ctx, 1, &[item(STUDENT, 5)]).unwrap();
        set_booked(&mut ctx, 1, 2);

        cancel_booking(&mut ctx, ids[0]).unwrap();

        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 0);
        assert_eq!(booking_count(&mut ctx), 0);
    }

    #[test]
    fn cancel_unknown_booking_is_not_found() {
        let mut ctx = test_ctx();
        assert!(matches!(
            cancel_booking(&mut ctx, 1234),
            Err(InventoryError::NotFound { id: 1234, .. })
        ));
    }

    #[test]
    fn seat_counts_stay_in_bounds() {
        let mut ctx = test_ctx();
        let mut booked = Vec::new();
        for quantity in [50, 40, 20, 10, 5] {
            if let Ok(ids) = confirm_booking(&mut ctx, 1, &[item(ADULT, quantity)]) {
                booked.extend(ids);
            }
            let movie = get_movie(&mut ctx, 1).unwrap();
            assert!(0 <= movie.booked_seats && movie.booked_seats <= movie.total_seats);
        }
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 100);

        for id in booked {
            cancel_booking(&mut ctx, id).unwrap();
            let movie = get_movie(&mut ctx, 1).unwrap();
            assert!(0 <= movie.booked_seats && movie.booked_seats <= movie.total_seats);
        }
        assert_eq!(get_movie(&mut ctx, 1).unwrap().booked_seats, 0);
    }

    #[test]
    fn occupancy_tier_boundaries() {
        assert_eq!(occupancy_color(39, 100), OccupancyTier::Low);
        assert_eq!(occupancy_color(40, 100), OccupancyTier::Medium);
        assert_eq!(occupancy_color(89, 100), OccupancyTier::Medium);
        assert_eq!(occupancy_color(90, 100), OccupancyTier::High);
        assert_eq!(occupancy_color(100, 100).as_str(), "high");
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
        for bad in ["", "0", "-2", "1.5", "two"] {
            assert!(
                matches!(parse_quantity(bad), Err(InventoryError::InvalidQuantity(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn selection_merges_repeated_types() {
        let mut selection = Selection::new();
        let child = TicketType {
            id: CHILD,
            name: "Child".to_string(),
            price: Some(2000.0),
        };

        selection.add(&adult(), "2").unwrap();
        selection.add(&child, "1").unwrap();
        selection.add(&adult(), "3").unwrap();

        assert_eq!(selection.total_quantity(), 6);
        assert_eq!(selection.line_items(), vec![item(ADULT, 5), item(CHILD, 1)]);
    }

    #[test]
    fn selection_keeps_state_on_bad_input() {
        let mut selection = Selection::new();
        selection.add(&adult(), "2").unwrap();

        assert!(selection.add(&adult(), "abc").is_err());
        assert!(selection.add(&adult(), &i32::MAX.to_string()).is_err());

        assert_eq!(selection.items().len(), 1);
        assert_eq!(selection.total_quantity(), 2);
    }
}
