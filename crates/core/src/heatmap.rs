//! Heatmap decoding and NaN restoration.
//!
//! The backend cannot put NaN into JSON, so missing heatmap cells arrive
//! as [`HEATMAP_SENTINEL`] (`-1`). Plotting code expects NaN for "no
//! data", so every sentinel in the grid is turned back into `f64::NAN`.
//! Only the grid field is touched.

use serde_json::Value;

use pollen_common::constants::{HEATMAP_GRID_FIELD, HEATMAP_SENTINEL};
use pollen_common::error::{PollenError, PollenResult};
use pollen_common::types::Heatmap;

/// Whether `cell` is the wire marker for a missing value.
pub fn is_sentinel(cell: f64) -> bool {
    cell == HEATMAP_SENTINEL
}

/// Replace every sentinel cell with NaN, in place.
///
/// Row count and row lengths never change. Running it twice is the same
/// as running it once since NaN never compares equal to the sentinel.
pub fn restore_missing(grid: &mut [Vec<f64>]) {
    for cell in grid.iter_mut().flat_map(|row| row.iter_mut()) {
        if is_sentinel(*cell) {
            *cell = f64::NAN;
        }
    }
}

/// Decode a `/heatmap/{genus}` body.
///
/// `null` cells are read as NaN as well. Every field other than the grid
/// ends up in [`Heatmap::extra`] unchanged.
pub fn heatmap_from_wire(body: Value, endpoint: &str) -> PollenResult<Heatmap> {
    let Value::Object(mut extra) = body else {
        return Err(decode_err(endpoint, "expected a JSON object"));
    };
    let raw = extra
        .remove(HEATMAP_GRID_FIELD)
        .ok_or_else(|| PollenError::MissingField(HEATMAP_GRID_FIELD.to_string()))?;

    let mut z = decode_grid(raw, endpoint)?;
    restore_missing(&mut z);

    Ok(Heatmap { z, extra })
}

fn decode_grid(raw: Value, endpoint: &str) -> PollenResult<Vec<Vec<f64>>> {
    let Value::Array(rows) = raw else {
        return Err(decode_err(endpoint, "'z' is not an array"));
    };

    rows.into_iter()
        .enumerate()
        .map(|(r, row)| {
            let Value::Array(cells) = row else {
                return Err(decode_err(endpoint, &format!("z[{r}] is not an array")));
            };
            cells
                .into_iter()
                .enumerate()
                .map(|(c, cell)| match cell {
                    Value::Null => Ok(f64::NAN),
                    Value::Number(n) => n
                        .as_f64()
                        .ok_or_else(|| decode_err(endpoint, &format!("z[{r}][{c}] out of range"))),
                    other => Err(decode_err(
                        endpoint,
                        &format!("z[{r}][{c}] is not numeric: {other}"),
                    )),
                })
                .collect::<PollenResult<Vec<f64>>>()
        })
        .collect()
}

fn decode_err(endpoint: &str, message: &str) -> PollenError {
    PollenError::Decode {
        endpoint: endpoint.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape(grid: &[Vec<f64>]) -> Vec<usize> {
        grid.iter().map(Vec::len).collect()
    }

    #[test]
    fn test_restore_replaces_only_sentinels() {
        let mut grid = vec![vec![-1.0, 0.0, 3.5], vec![2.0, -1.0], vec![]];
        restore_missing(&mut grid);
        assert!(grid[0][0].is_nan());
        assert_eq!(grid[0][1], 0.0);
        assert_eq!(grid[0][2], 3.5);
        assert_eq!(grid[1][0], 2.0);
        assert!(grid[1][1].is_nan());
        assert_eq!(shape(&grid), vec![3, 2, 0]);
    }

    #[test]
    fn test_restore_leaves_other_negatives() {
        let mut grid = vec![vec![-1.5, -0.999, -2.0, -1.0]];
        restore_missing(&mut grid);
        assert_eq!(&grid[0][..3], &[-1.5, -0.999, -2.0]);
        assert!(grid[0][3].is_nan());
    }

    #[test]
    fn test_restore_is_idempotent() {
        let mut once = vec![vec![-1.0, 4.0], vec![f64::NAN, -1.0]];
        restore_missing(&mut once);
        let mut twice = once.clone();
        restore_missing(&mut twice);
        assert_eq!(shape(&once), shape(&twice));
        for (a, b) in once.iter().flatten().zip(twice.iter().flatten()) {
            assert!((a.is_nan() && b.is_nan()) || a == b);
        }
        assert!(twice.iter().flatten().all(|v| !is_sentinel(*v)));
    }

    #[test]
    fn test_integer_sentinel_matches() {
        // `-1` and `-1.0` are the same number on the wire.
        let heatmap = heatmap_from_wire(json!({ "z": [[-1, -1.0, 1]] }), "/heatmap/x").unwrap();
        assert!(heatmap.z[0][0].is_nan());
        assert!(heatmap.z[0][1].is_nan());
        assert_eq!(heatmap.z[0][2], 1.0);
    }

    #[test]
    fn test_from_wire_keeps_other_fields() {
        let body = json!({
            "x": ["Jan", "Feb"],
            "y": [2019, 2020],
            "z": [[-1, 3], [5, -1]],
            "type": "heatmap",
        });
        let heatmap = heatmap_from_wire(body, "/heatmap/betula").unwrap();
        assert_eq!(heatmap.extra["x"], json!(["Jan", "Feb"]));
        assert_eq!(heatmap.extra["y"], json!([2019, 2020]));
        assert_eq!(heatmap.extra["type"], "heatmap");
        assert!(!heatmap.extra.contains_key("z"));
        assert_eq!(heatmap.dimensions(), (2, 2));
        assert_eq!(heatmap.missing_cells(), 2);
    }

    #[test]
    fn test_from_wire_null_cell_is_nan() {
        let heatmap = heatmap_from_wire(json!({ "z": [[null, 2]] }), "/heatmap/x").unwrap();
        assert!(heatmap.z[0][0].is_nan());
    }

    #[test]
    fn test_from_wire_missing_grid() {
        let err = heatmap_from_wire(json!({ "x": [] }), "/heatmap/x").unwrap_err();
        assert!(matches!(err, PollenError::MissingField(f) if f == "z"));
    }

    #[test]
    fn test_from_wire_rejects_non_numeric_cell() {
        let err = heatmap_from_wire(json!({ "z": [[1, "high"]] }), "/heatmap/x").unwrap_err();
        match err {
            PollenError::Decode { message, .. } => assert!(message.contains("z[0][1]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_wire_rejects_non_object() {
        assert!(heatmap_from_wire(json!([[1, 2]]), "/heatmap/x").is_err());
        assert!(heatmap_from_wire(json!({ "z": 5 }), "/heatmap/x").is_err());
        assert!(heatmap_from_wire(json!({ "z": [1, 2] }), "/heatmap/x").is_err());
    }
}
