//! CSV writer for sheet grids
//!
//! Fields are separated by `,`, every row ends with `\n` and fields holding a
//! comma, quote, CR or LF are wrapped in quotes with inner quotes doubled.
//! Output is UTF-8 without a byte-order mark.

use crate::reader::Grid;
use std::borrow::Cow;

const SEPARATOR: char = ',';
const QUOTE: char = '"';
const LINE_TERMINATOR: char = '\n';

/// Characters that force a field to be quoted
const SPECIAL_CHARS: [char; 4] = [SEPARATOR, QUOTE, '\r', '\n'];

/// Escape a single field. Borrows the input when it can be emitted bare.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if !value.contains(SPECIAL_CHARS) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push(QUOTE);
    for ch in value.chars() {
        if ch == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(ch);
    }
    escaped.push(QUOTE);
    Cow::Owned(escaped)
}

/// Encode a grid as CSV bytes, one line per row from row 1 to the last used row
pub fn encode<G: Grid + ?Sized>(grid: &G) -> Vec<u8> {
    let bounds = grid.bounds();
    if bounds.is_empty() {
        return Vec::new();
    }

    let row_count = bounds.last_row;
    let col_count = bounds.last_col;
    let mut out = String::with_capacity(row_count as usize * (col_count as usize * 8 + 1));

    for row in 1..=row_count {
        for col in 1..=col_count {
            if let Some(text) = grid.display_text(row, col) {
                out.push_str(&escape_field(&text));
            }
            if col < col_count {
                out.push(SEPARATOR);
            }
        }
        out.push(LINE_TERMINATOR);
    }

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::UsedBounds;
    use std::collections::HashMap;

    /// Sparse grid keyed by 1-based positions
    struct MapGrid {
        bounds: UsedBounds,
        cells: HashMap<(u32, u32), String>,
    }

    impl MapGrid {
        fn from_rows(rows: &[&[&str]]) -> Self {
            let mut cells = HashMap::new();
            let mut last_col = 0;
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    cells.insert((r as u32 + 1, c as u32 + 1), value.to_string());
                }
                last_col = last_col.max(row.len() as u32);
            }
            Self {
                bounds: UsedBounds {
                    first_row: 1,
                    last_row: rows.len() as u32,
                    first_col: 1,
                    last_col,
                },
                cells,
            }
        }
    }

    impl Grid for MapGrid {
        fn bounds(&self) -> UsedBounds {
            self.bounds
        }

        fn display_text(&self, row: u32, col: u32) -> Option<Cow<'_, str>> {
            self.cells.get(&(row, col)).map(|s| Cow::Borrowed(s.as_str()))
        }
    }

    fn encode_str(grid: &MapGrid) -> String {
        String::from_utf8(encode(grid)).unwrap()
    }

    #[test]
    fn test_escape_bare_field() {
        assert!(matches!(escape_field("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_field(""), "");
        assert_eq!(escape_field("with space"), "with space");
    }

    #[test]
    fn test_escape_quote_doubling() {
        assert_eq!(escape_field(r#"She said "hi""#), r#""She said ""hi""""#);
        assert_eq!(escape_field("\""), "\"\"\"\"");
    }

    #[test]
    fn test_escape_special_chars() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("line1\nline2"), "\"line1\nline2\"");
        assert_eq!(escape_field("cr\r"), "\"cr\r\"");
        assert_eq!(escape_field("crlf\r\nend"), "\"crlf\r\nend\"");
    }

    #[test]
    fn test_encode_header_and_rows() {
        let grid = MapGrid::from_rows(&[
            &["Test1", "Test2", "Test3"],
            &["1", "2", "3"],
            &["4", "5", "6"],
        ]);
        assert_eq!(encode_str(&grid), "Test1,Test2,Test3\n1,2,3\n4,5,6\n");
    }

    #[test]
    fn test_encode_empty_grid() {
        let grid = MapGrid {
            bounds: UsedBounds::empty(),
            cells: HashMap::new(),
        };
        assert!(encode(&grid).is_empty());
    }

    #[test]
    fn test_encode_sparse_grid_is_rectangular() {
        let mut cells = HashMap::new();
        cells.insert((1, 1), "a".to_string());
        cells.insert((3, 4), "z".to_string());
        let grid = MapGrid {
            bounds: UsedBounds {
                first_row: 1,
                last_row: 3,
                first_col: 1,
                last_col: 4,
            },
            cells,
        };

        let csv = encode_str(&grid);
        assert_eq!(csv, "a,,,\n,,,\n,,,z\n");
        for line in csv.lines() {
            assert_eq!(line.split(',').count(), 4);
        }
    }

    #[test]
    fn test_encode_starts_at_first_row_and_column() {
        // Used range B2:C2, leading row and column are still emitted
        let mut cells = HashMap::new();
        cells.insert((2, 2), "x".to_string());
        cells.insert((2, 3), "y".to_string());
        let grid = MapGrid {
            bounds: UsedBounds {
                first_row: 2,
                last_row: 2,
                first_col: 2,
                last_col: 3,
            },
            cells,
        };
        assert_eq!(encode_str(&grid), ",,\n,x,y\n");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let grid = MapGrid::from_rows(&[&["a,b", "\"q\""], &["multi\nline", ""]]);
        assert_eq!(encode(&grid), encode(&grid));
        assert_eq!(
            encode_str(&grid),
            "\"a,b\",\"\"\"q\"\"\"\n\"multi\nline\",\n"
        );
    }

    #[test]
    fn test_encode_utf8_without_bom() {
        let grid = MapGrid::from_rows(&[&["café", "日本"]]);
        let bytes = encode(&grid);
        assert!(!bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        assert_eq!(bytes, "café,日本\n".as_bytes());
    }
}
