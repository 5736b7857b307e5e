//! CSV serialization of proof records.
//!
//! The contract is on the text payload: a header row from the first
//! record's keys in their natural order, then one row per record with
//! every value double-quoted and array values joined with `|`. Zero
//! records is an error, never header-only output.

use serde_json::{json, Value};

use proofdeck_error::{Error, ExportError, ExportResult, Result};

use crate::config::ClientConfig;
use crate::dispatch::RequestDispatcher;

/// A rendered export artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    /// Download file name
    pub filename: String,

    /// UTF-8 CSV payload
    pub content: String,
}

/// Serializes record lists into delimited text
#[derive(Debug, Clone)]
pub struct CsvExporter {
    /// File name for produced artifacts
    filename: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            filename: "Student_Problems.csv".to_string(),
        }
    }
}

impl CsvExporter {
    /// Exporter with the standard artifact name
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter named from the client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            filename: config.csv_filename.clone(),
        }
    }

    /// The artifact file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Render records as CSV text.
    ///
    /// The header comes from the first record; each row serializes its
    /// own record's values in that record's key order.
    pub fn to_csv(&self, records: &[Value]) -> ExportResult<String> {
        let first = records.first().ok_or(ExportError::EmptyDataset)?;

        let header: Vec<&str> = first
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let mut csv = header.join(",");
        csv.push('\n');

        for record in records {
            let cells: Vec<String> = record
                .as_object()
                .map(|o| o.values().map(cell).collect())
                .unwrap_or_default();
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }

        Ok(csv)
    }

    /// Fetch a section's completed proofs and render the export artifact
    pub async fn export_completed_proofs(
        &self,
        dispatcher: &RequestDispatcher,
        section_name: &str,
    ) -> Result<CsvDocument> {
        let value = dispatcher
            .get(
                "completed-proofs-by-section",
                json!({ "sectionName": section_name }),
            )
            .await?;

        let records = value.as_array().cloned().unwrap_or_default();
        let content = self.to_csv(&records).map_err(Error::Export)?;

        Ok(CsvDocument {
            filename: self.filename.clone(),
            content,
        })
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let joined = items.iter().map(scalar).collect::<Vec<_>>().join("|");
            format!("\"{joined}\"")
        }
        other => format!("\"{}\"", scalar(other)),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockIdentityProvider, MockTransport};
    use crate::session::TokenGuard;
    use std::sync::Arc;

    #[test]
    fn header_and_quoting_follow_the_first_record() {
        let exporter = CsvExporter::new();
        let csv = exporter
            .to_csv(&[json!({"a": 1, "b": [2, 3]})])
            .unwrap();
        assert_eq!(csv, "a,b\n\"1\",\"2|3\"\n");
    }

    #[test]
    fn arrays_of_strings_join_without_extra_quotes() {
        let exporter = CsvExporter::new();
        let csv = exporter
            .to_csv(&[json!({
                "ProofName": "MP practice",
                "Premise": ["P -> Q", "P"],
                "ProofCompleted": "true"
            })])
            .unwrap();
        assert_eq!(
            csv,
            "ProofName,Premise,ProofCompleted\n\"MP practice\",\"P -> Q|P\",\"true\"\n"
        );
    }

    #[test]
    fn zero_records_never_produce_header_only_output() {
        let exporter = CsvExporter::new();
        assert!(matches!(
            exporter.to_csv(&[]),
            Err(ExportError::EmptyDataset)
        ));
    }

    #[tokio::test]
    async fn export_round_trips_through_the_dispatcher() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!([
            {"ProofName": "MP practice", "UserSubmitted": "a@x.edu"}
        ]));

        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let dispatcher =
            RequestDispatcher::new(Arc::new(TokenGuard::new(provider)), transport.clone());

        let doc = CsvExporter::new()
            .export_completed_proofs(&dispatcher, "S1")
            .await
            .unwrap();

        assert_eq!(doc.filename, "Student_Problems.csv");
        assert!(doc.content.starts_with("ProofName,UserSubmitted\n"));

        let request = &transport.requests()[0];
        assert_eq!(request.path, "completed-proofs-by-section");
        assert_eq!(request.payload["sectionName"], "S1");
    }

    #[tokio::test]
    async fn empty_feeds_surface_the_export_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(Value::Null);

        let provider = Arc::new(MockIdentityProvider::signed_in(
            "teacher@example.edu",
            "Teacher",
        ));
        let dispatcher =
            RequestDispatcher::new(Arc::new(TokenGuard::new(provider)), transport);

        let result = CsvExporter::new()
            .export_completed_proofs(&dispatcher, "S1")
            .await;
        assert!(matches!(
            result,
            Err(Error::Export(ExportError::EmptyDataset))
        ));
    }
}
