//! Named styles consulted by widgets when no explicit style is given.

use crate::types::{CellStyle, Rgb};

pub const NORMAL: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220));
pub const YELLOW: CellStyle = CellStyle::fg(Rgb::new(255, 215, 0)).bold();
pub const RED: CellStyle = CellStyle::fg(Rgb::new(230, 60, 60)).bold();
pub const GREEN: CellStyle = CellStyle::fg(Rgb::new(90, 210, 90));
pub const BOLD: CellStyle = NORMAL.bold();
pub const DIM: CellStyle = NORMAL.dim();
pub const TITLE: CellStyle = CellStyle::fg(Rgb::new(255, 255, 255)).bold();
pub const CHARGE: CellStyle = CellStyle::fg(Rgb::new(120, 200, 255)).bold();
pub const SHIP: CellStyle = CellStyle::fg(Rgb::new(180, 180, 255)).bold();

/// Style registered under `name`, if any.
pub fn lookup(name: &str) -> Option<CellStyle> {
    match name {
        "normal" => Some(NORMAL),
        "yellow" => Some(YELLOW),
        "red" => Some(RED),
        "green" => Some(GREEN),
        "bold" => Some(BOLD),
        "dim" => Some(DIM),
        "title" => Some(TITLE),
        "charge" => Some(CHARGE),
        "ship" => Some(SHIP),
        _ => None,
    }
}

/// Style for `name`, falling back to "normal".
pub fn gui(name: &str) -> CellStyle {
    lookup(name).unwrap_or(NORMAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_normal() {
        assert_eq!(lookup("plaid"), None);
        assert_eq!(gui("plaid"), NORMAL);
        assert_eq!(gui("yellow"), YELLOW);

        for name in ["normal", "yellow", "bold", "red", "green", "dim"] {
            assert!(lookup(name).is_some(), "{name} is not mapped");
        }
        assert_eq!(gui("bold"), CellStyle::default().bold());
        assert_eq!(gui("dim"), CellStyle::default().dim());
    }
}
