//! Workbook data structures

use calamine::{Data, Range};
use chrono::Timelike;
use std::borrow::Cow;

/// Bounds of the used range of a sheet (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsedBounds {
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u32,
    pub last_col: u32,
}

impl UsedBounds {
    /// Bounds of a sheet that never held content
    pub const fn empty() -> Self {
        Self {
            first_row: 1,
            last_row: 0,
            first_col: 1,
            last_col: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_row < self.first_row || self.last_col < self.first_col
    }
}

/// Read-only view of a sheet as a grid of display texts
pub trait Grid {
    fn bounds(&self) -> UsedBounds;

    /// Display text at a 1-based position, `None` for an absent cell
    fn display_text(&self, row: u32, col: u32) -> Option<Cow<'_, str>>;
}

/// A workbook opened for conversion. Only the first worksheet is loaded.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheet_names: Vec<String>,
    pub first_sheet: Worksheet,
}

impl Workbook {
    /// Get the first worksheet
    pub fn first_sheet(&self) -> &Worksheet {
        &self.first_sheet
    }
}

/// Represents a worksheet backed by the cached values calamine read
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub name: String,
    pub range: Range<Data>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

impl Grid for Worksheet {
    fn bounds(&self) -> UsedBounds {
        match (self.range.start(), self.range.end()) {
            (Some((r0, c0)), Some((r1, c1))) => UsedBounds {
                first_row: r0 + 1,
                last_row: r1 + 1,
                first_col: c0 + 1,
                last_col: c1 + 1,
            },
            _ => UsedBounds::empty(),
        }
    }

    fn display_text(&self, row: u32, col: u32) -> Option<Cow<'_, str>> {
        if row == 0 || col == 0 {
            return None;
        }
        match self.range.get_value((row - 1, col - 1)) {
            None | Some(Data::Empty) => None,
            Some(data) => Some(display_text(data)),
        }
    }
}

/// Render a cell value the way a spreadsheet shows it
pub fn display_text(data: &Data) -> Cow<'_, str> {
    match data {
        Data::Empty => Cow::Borrowed(""),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cow::Borrowed(s),
        Data::Int(i) => Cow::Owned(i.to_string()),
        Data::Float(f) => Cow::Owned(format_general(*f)),
        Data::Bool(true) => Cow::Borrowed("TRUE"),
        Data::Bool(false) => Cow::Borrowed("FALSE"),
        Data::Error(e) => Cow::Owned(e.to_string()),
        Data::DateTime(dt) if dt.is_duration() => Cow::Owned(format_duration(dt.as_f64())),
        Data::DateTime(dt) => match dt.as_datetime() {
            // Serials below one day hold only a time of day
            Some(ndt) if dt.as_f64().trunc() == 0.0 => {
                Cow::Owned(ndt.format("%H:%M:%S").to_string())
            }
            Some(ndt) if ndt.num_seconds_from_midnight() == 0 && ndt.nanosecond() == 0 => {
                Cow::Owned(ndt.format("%Y-%m-%d").to_string())
            }
            Some(ndt) => Cow::Owned(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => {
                log::warn!("Date serial {} is out of range, keeping numeric value", dt.as_f64());
                Cow::Owned(dt.as_f64().to_string())
            }
        },
    }
}

/// Numbers in General format show at most 15 significant digits
fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Round through scientific notation, Display then drops trailing zeros
    let rounded: f64 = format!("{:.14e}", value).parse().unwrap_or(value);
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

// Durations are stored as fractional days
fn format_duration(days: f64) -> String {
    let total = (days * 86_400.0).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
