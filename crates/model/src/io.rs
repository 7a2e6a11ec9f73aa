use crate::dataset::{Dataset, LabelledDataset};
use crate::error::{DataError, Result};
use crate::labels::Labels;
use crate::types::{Argument, KeyPoint, PairId, Split, Stance};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ArgumentRecord {
    arg_id: String,
    argument: String,
    topic: String,
    stance: Stance,
}

#[derive(Debug, Deserialize)]
struct KeyPointRecord {
    key_point_id: String,
    key_point: String,
    topic: String,
    stance: Stance,
}

#[derive(Debug, Deserialize)]
struct LabelRecord {
    arg_id: String,
    key_point_id: String,
    label: f64,
}

/// Load one split from `dir`.
///
/// Arguments and key points are required. The labels file is optional: the
/// test split is published without annotations, in which case the returned
/// dataset has empty labels.
pub fn load_split(dir: &Path, split: Split) -> Result<LabelledDataset> {
    let arguments = load_arguments(&dir.join(split.arguments_file()))?;
    let key_points = load_key_points(&dir.join(split.key_points_file()))?;
    let dataset = Dataset::new(arguments, key_points);

    let labels_path = dir.join(split.labels_file());
    let labels = if labels_path.exists() {
        load_labels(&labels_path, &dataset)?
    } else {
        log::debug!(
            "No labels for split {split} at {}; treating as unlabelled",
            labels_path.display()
        );
        Labels::new()
    };

    log::info!(
        "Loaded {split} split: {} arguments, {} key points, {} labels",
        dataset.arguments.len(),
        dataset.key_points.len(),
        labels.len()
    );

    Ok(LabelledDataset::new(dataset, labels))
}

/// Whether the arguments and key points of a split exist in `dir`
#[must_use]
pub fn split_exists(dir: &Path, split: Split) -> bool {
    dir.join(split.arguments_file()).exists() && dir.join(split.key_points_file()).exists()
}

pub fn load_arguments(path: &Path) -> Result<Vec<Argument>> {
    let records: Vec<(usize, ArgumentRecord)> = read_records(path)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut arguments = Vec::with_capacity(records.len());
    for (_, record) in records {
        if !seen.insert(record.arg_id.clone()) {
            return Err(DataError::DuplicateId {
                kind: "argument",
                id: record.arg_id,
                path: path.to_path_buf(),
            });
        }
        arguments.push(Argument {
            id: record.arg_id,
            text: record.argument,
            topic: record.topic,
            stance: record.stance,
        });
    }
    Ok(arguments)
}

pub fn load_key_points(path: &Path) -> Result<Vec<KeyPoint>> {
    let records: Vec<(usize, KeyPointRecord)> = read_records(path)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut key_points = Vec::with_capacity(records.len());
    for (_, record) in records {
        if !seen.insert(record.key_point_id.clone()) {
            return Err(DataError::DuplicateId {
                kind: "key point",
                id: record.key_point_id,
                path: path.to_path_buf(),
            });
        }
        key_points.push(KeyPoint {
            id: record.key_point_id,
            text: record.key_point,
            topic: record.topic,
            stance: record.stance,
        });
    }
    Ok(key_points)
}

/// Load labels and check them against the arguments and key points of `dataset`
pub fn load_labels(path: &Path, dataset: &Dataset) -> Result<Labels> {
    let argument_ids: HashSet<&str> = dataset.arguments.iter().map(|a| a.id.as_str()).collect();
    let key_point_ids: HashSet<&str> = dataset.key_points.iter().map(|k| k.id.as_str()).collect();

    let records: Vec<(usize, LabelRecord)> = read_records(path)?;
    let mut labels = Labels::new();
    for (line, record) in records {
        if !argument_ids.contains(record.arg_id.as_str()) {
            return Err(DataError::UnknownReference {
                kind: "argument",
                id: record.arg_id,
                line,
                path: path.to_path_buf(),
            });
        }
        if !key_point_ids.contains(record.key_point_id.as_str()) {
            return Err(DataError::UnknownReference {
                kind: "key point",
                id: record.key_point_id,
                line,
                path: path.to_path_buf(),
            });
        }
        if !(0.0..=1.0).contains(&record.label) {
            return Err(DataError::LabelOutOfRange {
                label: record.label,
                line,
                path: path.to_path_buf(),
            });
        }
        let pair = PairId::new(record.arg_id, record.key_point_id);
        if labels.insert(pair.clone(), record.label).is_some() {
            log::warn!(
                "Duplicate label for {pair} in {}; keeping the last one",
                path.display()
            );
        }
    }
    Ok(labels)
}

/// Read all records of a CSV file, paired with the line each record starts
/// on (the header is line 1).
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>> {
    if !path.exists() {
        return Err(DataError::MissingFile(path.to_path_buf()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|err| DataError::csv(path, err))?;
    let headers = reader
        .headers()
        .map_err(|err| DataError::csv(path, err))?
        .clone();

    let mut records = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|err| DataError::csv(path, err))?
    {
        let line = record
            .position()
            .map_or(0, |position| position.line() as usize);
        let value = record
            .deserialize(Some(&headers))
            .map_err(|err| DataError::csv(path, err))?;
        records.push((line, value));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn read_records_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_arguments(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataError::MissingFile(_)));
    }

    #[test]
    fn invalid_stance_is_a_csv_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arguments_dev.csv");
        fs::write(&path, "arg_id,argument,topic,stance\na1,text,topic,0\n").unwrap();
        let err = load_arguments(&path).unwrap_err();
        assert!(matches!(err, DataError::CsvError { .. }));
    }

    #[test]
    fn duplicate_key_point_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key_points_dev.csv");
        fs::write(
            &path,
            "key_point_id,key_point,topic,stance\nkp_1,a,t,1\nkp_1,b,t,1\n",
        )
        .unwrap();
        let err = load_key_points(&path).unwrap_err();
        assert!(matches!(err, DataError::DuplicateId { kind: "key point", .. }));
    }

    #[test]
    fn errors_name_the_line_after_quoted_newlines() {
        let dir = tempdir().unwrap();
        let arguments = dir.path().join("arguments_dev.csv");
        let key_points = dir.path().join("key_points_dev.csv");
        let labels = dir.path().join("labels_dev.csv");
        fs::write(
            &arguments,
            "arg_id,argument,topic,stance\n\"a\n1\",\"first line\nsecond line\",t,1\n",
        )
        .unwrap();
        fs::write(&key_points, "key_point_id,key_point,topic,stance\nk1,kp,t,1\n").unwrap();
        // the first label spans lines 2 and 3
        fs::write(
            &labels,
            "arg_id,key_point_id,label\n\"a\n1\",k1,1\na9,k1,0\n",
        )
        .unwrap();

        let dataset = Dataset::new(
            load_arguments(&arguments).unwrap(),
            load_key_points(&key_points).unwrap(),
        );
        assert_eq!(dataset.arguments[0].text, "first line\nsecond line");
        let err = load_labels(&labels, &dataset).unwrap_err();
        assert!(
            matches!(err, DataError::UnknownReference { line: 4, .. }),
            "{err:?}"
        );
    }
}
