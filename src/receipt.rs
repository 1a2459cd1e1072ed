use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::*;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::inventory::Selection;

#[derive(Clone, Debug, PartialEq)]
pub struct ReceiptLine {
    pub ticket_type: String,
    pub quantity: i32,
    pub unit_price: Option<f64>,
}

impl ReceiptLine {
    pub fn line_total(&self) -> Option<f64> {
        self.unit_price.map(|price| price * f64::from(self.quantity))
    }
}

/// Printable proof of a confirmed booking.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub booking_id: i32,
    pub movie_title: String,
    pub issued_at: DateTime<Local>,
    pub lines: Vec<ReceiptLine>,
}

impl Receipt {
    pub fn new(booking_id: i32, movie_title: &str, selection: &Selection) -> Self {
        Receipt {
            booking_id,
            movie_title: movie_title.to_string(),
            issued_at: Local::now(),
            lines: selection
                .items()
                .iter()
                .map(|item| ReceiptLine {
                    ticket_type: item.ticket_type.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.ticket_type.price,
                })
                .collect(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("ticket_{}.pdf", self.booking_id)
    }

    /// Sum of all lines, if every ticket type has a price.
    pub fn total(&self) -> Option<f64> {
        self.lines.iter().map(ReceiptLine::line_total).sum()
    }

    /// Lays the receipt text out on a single A4 page.
    pub fn to_pdf(&self) -> Result<Vec<u8>, printpdf::Error> {
        let (doc, page, layer) = PdfDocument::new(
            format!("Ticket #{}", self.booking_id),
            Mm(210.0),
            Mm(297.0),
            "Receipt",
        );
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let canvas = doc.get_page(page).get_layer(layer);

        let mut y = 270.0;
        for line in self.to_string().lines() {
            canvas.use_text(line, 12.0, Mm(20.0), Mm(y), &font);
            y -= 7.0;
        }

        doc.save_to_bytes()
    }

    /// Writes the PDF receipt into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> eyre::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_pdf()?)?;
        info!("Wrote receipt {}", path.display());
        Ok(path)
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cinema Ticket")?;
        writeln!(f, "=============")?;
        writeln!(f)?;
        writeln!(f, "Movie: {}", self.movie_title)?;
        writeln!(f, "Date: {}", self.issued_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(f)?;
        for (idx, line) in self.lines.iter().enumerate() {
            write!(
                f,
                "{}. Ticket type: {} - {} pcs",
                idx + 1,
                line.ticket_type,
                line.quantity
            )?;
            match (line.unit_price, line.line_total()) {
                (Some(price), Some(total)) => writeln!(f, " x {:.0} = {:.0}", price, total)?,
                _ => writeln!(f)?,
            }
        }
        if let Some(total) = self.total() {
            writeln!(f)?;
            writeln!(f, "Total: {:.0}", total)?;
        }
        writeln!(f)?;
        writeln!(f, "Booking number: {}", self.booking_id)
    }
}
