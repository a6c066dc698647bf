use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use super::model::Dataset;
use crate::error::SaveError;
use crate::review::Label;

// ---------------------------------------------------------------------------
// Table writer
// ---------------------------------------------------------------------------

/// How the output file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate, write the header and every row.
    Create,
    /// Append every row without a header.
    Append,
}

/// Write all rows of `dataset` with their labels as CSV.
pub fn write_responses(
    path: &Path,
    dataset: &Dataset,
    responses: &[Label],
    mode: WriteMode,
) -> Result<()> {
    ensure!(
        responses.len() == dataset.len(),
        "{} responses for {} rows",
        responses.len(),
        dataset.len()
    );

    let file = match mode {
        WriteMode::Create => File::create(path).context("creating output file")?,
        WriteMode::Append => OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .context("opening output file for append")?,
    };
    write_table(file, dataset, responses, mode == WriteMode::Create)
}

fn write_table<W: Write>(
    out: W,
    dataset: &Dataset,
    responses: &[Label],
    header: bool,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(out);

    if header {
        writer
            .write_record(dataset.output_header())
            .context("writing header")?;
    }
    for (index, label) in responses.iter().enumerate() {
        let record = dataset
            .output_record(index, label.as_str())
            .with_context(|| format!("row {index} missing"))?;
        writer
            .write_record(&record)
            .with_context(|| format!("writing row {index}"))?;
    }
    writer.flush().context("flushing output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Persistence gateway
// ---------------------------------------------------------------------------

/// Remembers the session's output file. The first successful save creates
/// it; later saves append the full row set again.
#[derive(Debug, Default)]
pub struct PersistenceGateway {
    output_path: Option<PathBuf>,
}

impl PersistenceGateway {
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Save the responses. `choose_destination` is only consulted when no
    /// output file exists yet; returning `None` cancels the save.
    ///
    /// Returns the path written to, or `None` if cancelled.
    pub fn save(
        &mut self,
        dataset: &Dataset,
        responses: &[Label],
        choose_destination: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<Option<PathBuf>, SaveError> {
        let (path, mode) = match &self.output_path {
            Some(path) => (path.clone(), WriteMode::Append),
            None => match choose_destination() {
                Some(path) => (path, WriteMode::Create),
                None => return Ok(None),
            },
        };

        write_responses(&path, dataset, responses, mode)
            .map_err(|cause| SaveError::new(&path, cause))?;

        log::info!(
            "Responses saved to '{}' ({} rows, {:?})",
            path.display(),
            dataset.len(),
            mode
        );
        self.output_path = Some(path.clone());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_dataset() -> Dataset {
        Dataset::from_samples(vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![5.0, 4.0, 3.0, 2.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
        ])
    }

    #[test]
    fn first_save_writes_header_then_appends_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let ds = scenario_dataset();
        let responses = [Label::Yes, Label::No, Label::Yes];
        let mut gateway = PersistenceGateway::default();

        let written = gateway
            .save(&ds, &responses, || Some(target.clone()))
            .unwrap();
        assert_eq!(written.as_deref(), Some(target.as_path()));
        let first = std::fs::read_to_string(&target).unwrap();
        assert_eq!(
            first,
            "0,1,2,3,4,Response\n1,2,3,4,5,Yes\n5,4,3,2,1,No\n0,0,0,0,0,Yes\n"
        );

        // Second save never asks for a destination and appends all rows.
        let again = gateway
            .save(&ds, &responses, || panic!("destination asked twice"))
            .unwrap();
        assert_eq!(again.as_deref(), Some(target.as_path()));
        let second = std::fs::read_to_string(&target).unwrap();
        let lines: Vec<&str> = second.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "0,1,2,3,4,Response");
        assert_eq!(lines[1..4], lines[4..7]);
    }

    #[test]
    fn vanished_output_is_recreated_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let ds = scenario_dataset();
        let responses = [Label::No, Label::Unlabeled, Label::Yes];
        let mut gateway = PersistenceGateway::default();

        gateway.save(&ds, &responses, || Some(target.clone())).unwrap();
        std::fs::remove_file(&target).unwrap();

        gateway
            .save(&ds, &responses, || panic!("destination asked twice"))
            .unwrap();
        let text = std::fs::read_to_string(&target).unwrap();
        assert_eq!(text, "1,2,3,4,5,No\n5,4,3,2,1,\n0,0,0,0,0,Yes\n");
        assert!(!text.contains("Response"));
    }

    #[test]
    fn cancelled_destination_writes_nothing() {
        let ds = scenario_dataset();
        let mut gateway = PersistenceGateway::default();
        let result = gateway.save(&ds, &[Label::Unlabeled; 3], || None).unwrap();
        assert!(result.is_none());
        assert!(gateway.output_path().is_none());
    }

    #[test]
    fn failed_first_save_keeps_path_unset() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("out.csv");
        let ds = scenario_dataset();
        let mut gateway = PersistenceGateway::default();

        let err = gateway
            .save(&ds, &[Label::Unlabeled; 3], || Some(target.clone()))
            .unwrap_err();
        assert_eq!(err.path, target);
        assert!(gateway.output_path().is_none());
    }

    #[test]
    fn unlabeled_rows_write_empty_cells() {
        let mut buf = Vec::new();
        let ds = Dataset::from_samples(vec![vec![1.5]]);
        write_table(&mut buf, &ds, &[Label::Unlabeled], true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0,Response\n1.5,\n");
    }

    #[test]
    fn mismatched_response_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ds = scenario_dataset();
        let err = write_responses(&dir.path().join("x.csv"), &ds, &[Label::Yes], WriteMode::Create)
            .unwrap_err();
        assert!(err.to_string().contains("1 responses for 3 rows"));
    }
}
