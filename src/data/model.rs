// ---------------------------------------------------------------------------
// Record – one row of the loaded table
// ---------------------------------------------------------------------------

/// Name of the label column appended on save.
pub const RESPONSE_COLUMN: &str = "Response";

/// A single reviewable row (one subject).
#[derive(Debug, Clone)]
pub struct Record {
    /// Cells exactly as read, written back verbatim on save.
    pub cells: Vec<String>,
    /// Numeric samples in column order (the `Response` column excluded).
    /// Cells that do not parse as numbers become NaN.
    pub samples: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Ordered rows of samples plus the header they were loaded with.
/// Immutable after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names from the header row.
    pub headers: Vec<String>,
    records: Vec<Record>,
    /// Position of an existing `Response` column, if the input had one.
    response_column: Option<usize>,
}

impl Dataset {
    /// Build a dataset from a header and raw text cells.
    pub fn from_cells(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let response_column = headers.iter().position(|h| h == RESPONSE_COLUMN);
        let records = rows
            .into_iter()
            .map(|cells| {
                let samples = cells
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| Some(*i) != response_column)
                    .map(|(_, cell)| parse_sample(cell))
                    .collect();
                Record { cells, samples }
            })
            .collect();
        Dataset {
            headers,
            records,
            response_column,
        }
    }

    /// Build a dataset from numeric rows, naming columns by sample index.
    #[cfg(test)]
    pub fn from_samples(rows: Vec<Vec<f64>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let headers = (0..width).map(|i| i.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        Self::from_cells(headers, rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Samples of the row at `index`.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.records.get(index).map(|r| r.samples.as_slice())
    }

    /// Number of sample columns (excludes an input `Response` column).
    pub fn sample_columns(&self) -> usize {
        self.headers.len() - usize::from(self.response_column.is_some())
    }

    /// Header written on save: the input header with `Response` appended
    /// unless the input already carried one.
    pub fn output_header(&self) -> Vec<String> {
        let mut header = self.headers.clone();
        if self.response_column.is_none() {
            header.push(RESPONSE_COLUMN.to_string());
        }
        header
    }

    /// Cells written on save for row `index`, carrying `label` in the
    /// `Response` column.
    pub fn output_record(&self, index: usize, label: &str) -> Option<Vec<String>> {
        let mut cells = self.records.get(index)?.cells.clone();
        match self.response_column {
            Some(col) if col < cells.len() => cells[col] = label.to_string(),
            _ => cells.push(label.to_string()),
        }
        Some(cells)
    }
}

fn parse_sample(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn non_numeric_cells_become_nan() {
        let ds = Dataset::from_cells(
            strings(&["a", "b", "c"]),
            vec![strings(&["1.5", "x", ""]), strings(&[" 2 ", "3", "4e1"])],
        );
        let row = ds.row(0).unwrap();
        assert_eq!(row[0], 1.5);
        assert!(row[1].is_nan());
        assert!(row[2].is_nan());
        assert_eq!(ds.row(1).unwrap(), &[2.0, 3.0, 40.0]);
        assert!(ds.row(2).is_none());
    }

    #[test]
    fn response_column_is_appended() {
        let ds = Dataset::from_samples(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(ds.output_header(), strings(&["0", "1", "Response"]));
        assert_eq!(ds.output_record(1, "No").unwrap(), strings(&["3", "4", "No"]));
        assert_eq!(ds.sample_columns(), 2);
    }

    #[test]
    fn existing_response_column_is_replaced_in_place() {
        let ds = Dataset::from_cells(
            strings(&["s0", "Response", "s1"]),
            vec![strings(&["1", "Yes", "2"])],
        );
        assert_eq!(ds.row(0).unwrap(), &[1.0, 2.0]);
        assert_eq!(ds.sample_columns(), 2);
        assert_eq!(ds.output_header(), strings(&["s0", "Response", "s1"]));
        assert_eq!(ds.output_record(0, "").unwrap(), strings(&["1", "", "2"]));
    }
}
