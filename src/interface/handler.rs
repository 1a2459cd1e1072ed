use crate::interface::app::{App, Mode};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{MouseEvent, MouseEventKind};
use tui_input::backend::crossterm::EventHandler;

/// Handles the key events and updates the state of [`App`].
pub fn handle_key_events(key_event: KeyEvent, app: &mut App) -> eyre::Result<()> {
    // Exit application on `Ctrl-C`, whatever is open
    if key_event.modifiers == KeyModifiers::CONTROL
        && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        app.quit();
        return Ok(());
    }

    match app.mode {
        Mode::Browse => handle_browse(key_event, app),
        Mode::Booking => handle_booking(key_event, app),
        Mode::Cancel => handle_cancel(key_event, app),
        Mode::Statistics => {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('s')
            ) {
                app.close_popup();
            }
        }
    }
    Ok(())
}

fn handle_browse(key_event: KeyEvent, app: &mut App) {
    match key_event.code {
        // Exit application on `ESC` or `q`
        KeyCode::Esc | KeyCode::Char('q') => {
            app.quit();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.prev(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.next(1);
        }
        KeyCode::Char('u') | KeyCode::Char('U') => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                app.prev(20);
            }
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            if key_event.modifiers == KeyModifiers::CONTROL {
                app.next(20);
            }
        }
        KeyCode::Char('g') => {
            app.first();
        }
        KeyCode::Char('G') => {
            app.last();
        }
        KeyCode::Enter | KeyCode::Char('b') => {
            app.open_booking();
        }
        KeyCode::Char('x') => {
            app.open_cancel();
        }
        KeyCode::Char('s') => {
            app.open_statistics();
        }
        _ => {}
    }
}

fn handle_booking(key_event: KeyEvent, app: &mut App) {
    match key_event.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Tab | KeyCode::Down => app.cycle_ticket_type(true),
        KeyCode::BackTab | KeyCode::Up => app.cycle_ticket_type(false),
        KeyCode::Enter => app.add_ticket(),
        KeyCode::Char('s') if key_event.modifiers == KeyModifiers::CONTROL => {
            app.confirm_booking()
        }
        _ => {
            if let Some(form) = app.booking_form.as_mut() {
                form.quantity.handle_event(&CrosstermEvent::Key(key_event));
            }
        }
    }
}

fn handle_cancel(key_event: KeyEvent, app: &mut App) {
    match key_event.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Enter => app.cancel_booking(),
        _ => {
            app.cancel_input
                .handle_event(&CrosstermEvent::Key(key_event));
        }
    }
}

// handle mouse events as well
pub fn handle_mouse_events(mouse_event: MouseEvent, app: &mut App) -> eyre::Result<()> {
    if app.mode != Mode::Browse {
        return Ok(());
    }
    match mouse_event.kind {
        MouseEventKind::ScrollDown => {
            app.next(1);
        }
        MouseEventKind::ScrollUp => {
            app.prev(1);
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::app::tests::test_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn press(app: &mut App, events: &[KeyEvent]) {
        for event in events {
            handle_key_events(*event, app).unwrap();
        }
    }

    #[test]
    fn q_quits_from_browse() {
        let (mut app, _dir) = test_app();
        press(&mut app, &[key(KeyCode::Char('q'))]);
        assert!(!app.running);
    }

    #[test]
    fn ctrl_c_quits_from_popup() {
        let (mut app, _dir) = test_app();
        press(&mut app, &[key(KeyCode::Enter), ctrl('c')]);
        assert!(!app.running);
    }

    #[test]
    fn typing_in_booking_popup_books_tickets() {
        let (mut app, _dir) = test_app();
        press(
            &mut app,
            &[
                key(KeyCode::Char('j')),
                key(KeyCode::Char('b')),
                key(KeyCode::Char('1')),
                key(KeyCode::Char('2')),
                key(KeyCode::Enter),
                key(KeyCode::Tab),
                key(KeyCode::Char('3')),
                key(KeyCode::Enter),
            ],
        );
        let form = app.booking_form.as_ref().unwrap();
        assert_eq!(form.selection.total_quantity(), 15);
        assert_eq!(form.selection.items()[1].ticket_type.name, "Child");

        press(&mut app, &[ctrl('s')]);

        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.movies[1].booked_seats, 15);
        assert_eq!(app.bookings.len(), 2);
    }

    #[test]
    fn q_is_typed_not_quit_inside_popup() {
        let (mut app, _dir) = test_app();
        press(&mut app, &[key(KeyCode::Char('x')), key(KeyCode::Char('q'))]);
        assert!(app.running);
        assert_eq!(app.cancel_input.value(), "q");

        press(&mut app, &[key(KeyCode::Esc)]);
        assert_eq!(app.mode, Mode::Browse);
        assert_eq!(app.cancel_input.value(), "");
    }

    #[test]
    fn statistics_popup_opens_and_closes() {
        let (mut app, _dir) = test_app();
        press(&mut app, &[key(KeyCode::Char('s'))]);
        assert_eq!(app.mode, Mode::Statistics);
        assert_eq!(app.statistics.len(), 3);

        press(&mut app, &[key(KeyCode::Esc)]);
        assert_eq!(app.mode, Mode::Browse);
        assert!(app.running);
    }

    #[test]
    fn scrolling_moves_selection() {
        let (mut app, _dir) = test_app();
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_events(scroll, &mut app).unwrap();
        assert_eq!(app.table_state.selected(), Some(1));
    }
}
