//! JSON puzzle input.
//!
//! Accepts the grid as a 2-D integer array, an array of row strings, or a
//! single row-major string, either wrapped in an object (`grid`, `board`,
//! or `puzzle` keys, with optional dimension fields) or as the bare root
//! value. Row strings use `1`-`9` for 1-9, letters for 10-35, and `.`,
//! `0`, ` `, or `_` for empty cells.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sudoku_core::{Board, BoardDimension, Cell};

pub const FORMAT_HELP: &str = r#"
Supported JSON Input Formats
============================

Format 1: 2D Array (recommended)
{
  "grid": [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    ...
  ]
}

Format 2: String Rows (use '.' or '0' for empty cells)
{
  "grid": [
    "530070000",
    "600195000",
    ...
  ]
}

Format 3: Single String
{
  "puzzle": "530070000600195000098000060800060003400803001700020006060000280000419005000080079"
}

Format 4: With Explicit Dimensions (for non-standard sizes)
{
  "size": 16,
  "box_rows": 4,
  "box_cols": 4,
  "grid": [...]
}

Notes:
- Empty cells can be represented as 0, '.', '_', or ' '
- For boards larger than 9x9, use letters (A-Z) for values 10-35
- The grid can also be the root JSON element (without wrapper object)
"#;

pub fn load_from_file(path: &Path) -> Result<Board> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to open file: {}", path.display()))?;
    load_from_str(&text)
}

pub fn load_from_str(text: &str) -> Result<Board> {
    let json: Value = serde_json::from_str(text).context("JSON parse error")?;
    board_from_json(&json)
}

/// Parse a bare puzzle string (the `--puzzle` flag).
pub fn load_from_puzzle_string(puzzle: &str) -> Result<Board> {
    board_from_json(&Value::String(puzzle.to_string()))
}

pub fn board_from_json(json: &Value) -> Result<Board> {
    let grid = if let Some(data) = json.get("grid").or_else(|| json.get("board")) {
        parse_grid_value(data)?
    } else if let Some(puzzle) = json.get("puzzle") {
        let text = puzzle
            .as_str()
            .context("\"puzzle\" must be a string of cell characters")?;
        parse_single_string(text)?
    } else if json.is_array() {
        parse_grid_value(json)?
    } else if let Some(text) = json.as_str() {
        parse_single_string(text)?
    } else {
        bail!("could not parse a grid from the JSON document");
    };

    let dimension = detect_dimension(json, grid.len())?;
    Board::with_dimension(&grid, dimension).context("grid does not form a valid board")
}

fn parse_grid_value(data: &Value) -> Result<Vec<Vec<Cell>>> {
    match data {
        Value::Array(rows) if !rows.is_empty() => {
            if rows[0].is_array() {
                parse_grid_2d(rows)
            } else if rows[0].is_string() {
                parse_grid_strings(rows)
            } else {
                bail!("grid rows must be arrays of numbers or strings");
            }
        }
        Value::String(text) => parse_single_string(text),
        _ => bail!("unsupported grid shape"),
    }
}

fn parse_grid_2d(rows: &[Value]) -> Result<Vec<Vec<Cell>>> {
    rows.iter()
        .map(|row| {
            let cells = row
                .as_array()
                .context("expected every grid row to be an array")?;
            cells
                .iter()
                .map(|cell| {
                    let value = cell.as_u64().context("cell values must be non-negative integers")?;
                    if value > 32 {
                        bail!("cell value {value} out of range");
                    }
                    Ok(value as Cell)
                })
                .collect()
        })
        .collect()
}

fn parse_grid_strings(rows: &[Value]) -> Result<Vec<Vec<Cell>>> {
    rows.iter()
        .map(|row| {
            let text = row.as_str().context("expected every grid row to be a string")?;
            Ok(text.chars().filter_map(char_value).collect())
        })
        .collect()
}

fn parse_single_string(text: &str) -> Result<Vec<Vec<Cell>>> {
    let cells: Vec<Cell> = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter_map(char_value)
        .collect();

    let size = (cells.len() as f64).sqrt() as usize;
    if size == 0 || size * size != cells.len() {
        bail!("invalid puzzle string length: {}", cells.len());
    }

    Ok(cells.chunks(size).map(<[Cell]>::to_vec).collect())
}

/// Map one puzzle character to a cell value; None drops the character
/// (separators and decorations).
fn char_value(c: char) -> Option<Cell> {
    match c {
        '1'..='9' => Some(c as u8 - b'0'),
        'A'..='Z' => Some(10 + (c as u8 - b'A')),
        'a'..='z' => Some(10 + (c as u8 - b'a')),
        '.' | '0' | ' ' | '_' => Some(0),
        _ => None,
    }
}

/// Explicit `size`/`box_rows`/`box_cols` win, then `box_size`, then
/// auto-detection from the grid's side length.
fn detect_dimension(json: &Value, grid_size: usize) -> Result<BoardDimension> {
    let field = |name: &str| json.get(name).and_then(Value::as_u64).map(|v| v as usize);

    if let (Some(size), Some(box_rows), Some(box_cols)) =
        (field("size"), field("box_rows"), field("box_cols"))
    {
        return Ok(BoardDimension::new(size, box_rows, box_cols)?);
    }
    if let Some(box_size) = field("box_size") {
        return Ok(BoardDimension::new(grid_size, box_size, box_size)?);
    }
    Ok(BoardDimension::from_size(grid_size)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_2d() {
        let board = load_from_str(
            r#"{"grid": [[1,2,3,4],[3,4,1,2],[2,1,4,3],[4,3,2,1]]}"#,
        )
        .unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.get(1, 1), 4);
        assert!(board.is_solved());
    }

    #[test]
    fn test_grid_string_rows() {
        let board = load_from_str(
            r#"{"grid": ["530070000","600195000","098000060","800060003",
                         "400803001","700020006","060000280","000419005","000080079"]}"#,
        )
        .unwrap();
        assert_eq!(board.size(), 9);
        assert_eq!(board.get(0, 0), 5);
        assert_eq!(board.get(8, 8), 9);
        assert_eq!(board.count_empty(), 51);
    }

    #[test]
    fn test_single_string_with_dots() {
        let board = load_from_str(r#"{"puzzle": "1.3.341221434.2."}"#).unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.get(0, 0), 1);
        assert_eq!(board.get(0, 1), 0);
    }

    #[test]
    fn test_root_array_and_root_string() {
        let from_array = load_from_str("[[1,0],[0,1]]");
        // 2x2 has no valid box split besides 1x2; from_size still accepts it.
        assert!(from_array.is_ok());

        let from_string = load_from_str(r#""1234341221434321""#).unwrap();
        assert!(from_string.is_solved());
    }

    #[test]
    fn test_letters_above_nine() {
        let text = "G".repeat(256);
        let board = load_from_puzzle_string(&text).unwrap();
        assert_eq!(board.size(), 16);
        assert_eq!(board.get(0, 0), 16);
    }

    #[test]
    fn test_explicit_dimensions() {
        let board = load_from_str(
            r#"{"size": 6, "box_rows": 2, "box_cols": 3,
                "grid": ["123456","456123","231564","564231","312645","645312"]}"#,
        )
        .unwrap();
        assert_eq!(board.dimension(), sudoku_core::BoardDimension::standard_6x6());
        assert!(board.is_solved());
    }

    #[test]
    fn test_box_size_shorthand() {
        let board = load_from_str(r#"{"box_size": 2, "puzzle": "1234341221434321"}"#).unwrap();
        assert_eq!(board.dimension().box_rows, 2);
        assert_eq!(board.dimension().box_cols, 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(load_from_str("{}").is_err());
        assert!(load_from_str(r#"{"puzzle": "12345"}"#).is_err());
        assert!(load_from_str("not json at all").is_err());
        // Dimension fields that contradict the grid shape.
        assert!(load_from_str(
            r#"{"size": 9, "box_rows": 3, "box_cols": 3, "puzzle": "1234341221434321"}"#
        )
        .is_err());
    }
}
