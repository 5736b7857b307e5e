//! Configuration for the proofdeck client

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend, up to and including the `/backend` prefix
    pub base_url: String,

    /// Transport timeout in seconds; the only timeout boundary client-side
    pub timeout_secs: u64,

    /// File name for the CSV export artifact
    pub csv_filename: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/backend".to_string(),
            timeout_secs: 30,
            csv_filename: "Student_Problems.csv".to_string(),
        }
    }
}
