//! Session Export - prediction history as CSV
//!
//! Columns: `timestamp, risk_score, model, tier, recommendation`, then one
//! column per form field in the order given.

use std::io::Write;
use std::path::Path;

use serde_json::Value;

use super::history::SessionLog;

const FIXED_HEADERS: &[&str] = &["timestamp", "risk_score", "model", "tier", "recommendation"];

/// Write the log to `writer`; returns the number of data rows
pub fn write_csv<W: Write>(log: &SessionLog, fields: &[&str], writer: W) -> csv::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let header: Vec<&str> = FIXED_HEADERS.iter().chain(fields.iter()).copied().collect();
    csv_writer.write_record(&header)?;

    for entry in log.iter() {
        let mut row = vec![
            entry.timestamp.to_rfc3339(),
            format!("{:.4}", entry.risk_score),
            entry.model.clone(),
            entry.tier.as_str().to_string(),
            entry.recommendation.clone(),
        ];
        row.extend(fields.iter().map(|f| cell_text(entry.input.get(*f))));
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(log.len())
}

/// CSV as a string, for HTTP responses
pub fn to_csv_string(log: &SessionLog, fields: &[&str]) -> csv::Result<String> {
    let mut buffer = Vec::new();
    write_csv(log, fields, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// CSV to a file, replacing it if present
pub fn export_file(
    history: &SessionLog,
    fields: &[&str],
    destination: &Path,
) -> csv::Result<usize> {
    let file = std::fs::File::create(destination)?;
    let count = write_csv(history, fields, file)?;
    log::info!("Exported {} predictions to {}", count, destination.display());
    Ok(count)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{PredictionResult, RiskTier};
    use serde_json::json;

    fn log_with_entries() -> SessionLog {
        let mut log = SessionLog::new();
        for (score, state) in [(0.8f32, "Lagos"), (0.2, "Cross River, South")] {
            let tier = RiskTier::from_score(score);
            let result = PredictionResult {
                risk_score: score,
                model: "random_forest".to_string(),
                tier,
                recommendation: tier.recommendation().to_string(),
            };
            let input = json!({"Age": 30, "State": state}).as_object().cloned().unwrap();
            log.append(&result, input);
        }
        log
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv_string(&log_with_entries(), &["Age", "State", "Month"]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // header + 2 entries
        assert_eq!(
            lines[0],
            "timestamp,risk_score,model,tier,recommendation,Age,State,Month"
        );
        assert!(lines[1].contains(",0.8000,random_forest,high,"));
        assert!(lines[1].ends_with(",30,Lagos,"));
        // embedded comma is quoted
        assert!(lines[2].contains("\"Cross River, South\""));
    }

    #[test]
    fn test_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("predictions.csv");

        let count = export_file(&log_with_entries(), &["Age"], &dest).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&dest).unwrap();
        assert!(content.starts_with("timestamp,risk_score"));
    }

    #[test]
    fn test_empty_log_writes_header() {
        let csv = to_csv_string(&SessionLog::new(), &["Age"]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
