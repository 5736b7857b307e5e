//! The client-side proof and assignment catalog.
//!
//! Three independent proof buckets (user-owned, repository-public,
//! user-completed) plus a section/assignment metadata cache, all
//! populated through the dispatcher. Loads replace a bucket wholesale and
//! return a typed handle naming the bucket they populated; consumers hold
//! the handle instead of tagging UI state with cache keys.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::debug;
use serde_json::json;

use proofdeck_error::{CatalogError, CatalogResult, Result};
use proofdeck_types::{Assignment, Proof, Section, SectionProofs};

use crate::dispatch::{decode_value, RequestDispatcher};

//-----------------------------------------------------------------------------
// Buckets and Handles
//-----------------------------------------------------------------------------

/// The three proof buckets; exactly one is authoritative per consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKey {
    /// The user's incomplete proofs
    User,

    /// Repository-public problems, grouped by section
    Repo,

    /// The user's completed proofs
    Completed,
}

impl BucketKey {
    /// The backend's `selection` discriminator for this bucket
    pub fn selection(&self) -> &'static str {
        match self {
            BucketKey::User => "user",
            BucketKey::Repo => "repo",
            BucketKey::Completed => "completedrepo",
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::User => write!(f, "user"),
            BucketKey::Repo => write!(f, "repo"),
            BucketKey::Completed => write!(f, "completed"),
        }
    }
}

/// Typed handle to a populated bucket, returned by the load calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogHandle {
    key: BucketKey,
}

impl CatalogHandle {
    /// Which bucket this handle reads from
    pub fn key(&self) -> BucketKey {
        self.key
    }
}

/// One display entry of the repository bucket
#[derive(Debug, Clone)]
pub enum RepoEntry {
    /// Synthetic non-selectable header naming a section
    SectionHeader(String),

    /// A selectable repository proof
    Proof(Proof),
}

impl RepoEntry {
    /// The proof behind this entry, if it is one
    pub fn proof(&self) -> Option<&Proof> {
        match self {
            RepoEntry::Proof(proof) => Some(proof),
            RepoEntry::SectionHeader(_) => None,
        }
    }
}

//-----------------------------------------------------------------------------
// Catalog
//-----------------------------------------------------------------------------

/// In-memory cache of the proof collections and directory metadata
pub struct ProofCatalog {
    /// Backend access
    dispatcher: Arc<RequestDispatcher>,

    /// The user's incomplete proofs
    user_proofs: Mutex<Vec<Proof>>,

    /// The user's completed proofs
    completed_proofs: Mutex<Vec<Proof>>,

    /// Repository problems with section headers, in feed order
    repo_entries: Mutex<Vec<RepoEntry>>,

    /// Sections of the signed-in user
    sections: Mutex<Vec<Section>>,

    /// Assignments keyed by section name
    assignments: Mutex<HashMap<String, Vec<Assignment>>>,
}

impl ProofCatalog {
    /// Create an empty catalog over a dispatcher
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self {
            dispatcher,
            user_proofs: Mutex::new(Vec::new()),
            completed_proofs: Mutex::new(Vec::new()),
            repo_entries: Mutex::new(Vec::new()),
            sections: Mutex::new(Vec::new()),
            assignments: Mutex::new(HashMap::new()),
        }
    }

    //-------------------------------------------------------------------------
    // Bucket Loads
    //-------------------------------------------------------------------------

    /// Reload the user's incomplete proofs, replacing the bucket wholesale
    pub async fn load_user_proofs(&self) -> Result<CatalogHandle> {
        let proofs = self.fetch_selection(BucketKey::User).await?;
        debug!("loaded {} user proofs", proofs.len());
        *self.user_proofs.lock().expect("user bucket lock") = proofs;
        Ok(CatalogHandle {
            key: BucketKey::User,
        })
    }

    /// Reload the user's completed proofs, replacing the bucket wholesale
    pub async fn load_completed_proofs(&self) -> Result<CatalogHandle> {
        let proofs = self.fetch_selection(BucketKey::Completed).await?;
        debug!("loaded {} completed proofs", proofs.len());
        *self.completed_proofs.lock().expect("completed bucket lock") = proofs;
        Ok(CatalogHandle {
            key: BucketKey::Completed,
        })
    }

    /// Reload the repository problems, grouped under section headers.
    ///
    /// A header appears once per contiguous run of equal section name in
    /// the feed; a section name recurring later in the feed gets a second
    /// header. Feed order is preserved, nothing is re-sorted.
    pub async fn load_repo_proofs(&self) -> Result<CatalogHandle> {
        let value = self
            .dispatcher
            .post("proofs", json!({ "selection": BucketKey::Repo.selection() }))
            .await?;
        let feed: Vec<SectionProofs> =
            decode_value::<Option<Vec<SectionProofs>>>(value)?.unwrap_or_default();

        let entries = group_repo_feed(&feed);
        debug!("loaded {} repo entries", entries.len());
        *self.repo_entries.lock().expect("repo bucket lock") = entries;
        Ok(CatalogHandle {
            key: BucketKey::Repo,
        })
    }

    async fn fetch_selection(&self, key: BucketKey) -> Result<Vec<Proof>> {
        let value = self
            .dispatcher
            .post("proofs", json!({ "selection": key.selection() }))
            .await?;
        // A backend with nothing to report answers null rather than []
        Ok(decode_value::<Option<Vec<Proof>>>(value)?.unwrap_or_default())
    }

    //-------------------------------------------------------------------------
    // Lookup and Reads
    //-------------------------------------------------------------------------

    /// Find a proof by id within the bucket a handle names.
    ///
    /// Ids compare on their stringified form to tolerate mixed
    /// numeric/string ids from transport.
    pub fn lookup(&self, handle: CatalogHandle, id: &str) -> CatalogResult<Proof> {
        let found = match handle.key {
            BucketKey::User => self
                .user_proofs
                .lock()
                .expect("user bucket lock")
                .iter()
                .find(|p| p.id.matches(id))
                .cloned(),
            BucketKey::Completed => self
                .completed_proofs
                .lock()
                .expect("completed bucket lock")
                .iter()
                .find(|p| p.id.matches(id))
                .cloned(),
            BucketKey::Repo => self
                .repo_entries
                .lock()
                .expect("repo bucket lock")
                .iter()
                .filter_map(RepoEntry::proof)
                .find(|p| p.id.matches(id))
                .cloned(),
        };

        found.ok_or_else(|| CatalogError::not_found(handle.key.to_string(), id))
    }

    /// Snapshot of the user bucket
    pub fn user_proofs(&self) -> Vec<Proof> {
        self.user_proofs.lock().expect("user bucket lock").clone()
    }

    /// Snapshot of the completed bucket
    pub fn completed_proofs(&self) -> Vec<Proof> {
        self.completed_proofs
            .lock()
            .expect("completed bucket lock")
            .clone()
    }

    /// Snapshot of the repository bucket in display order
    pub fn repo_entries(&self) -> Vec<RepoEntry> {
        self.repo_entries.lock().expect("repo bucket lock").clone()
    }

    //-------------------------------------------------------------------------
    // Directory Metadata
    //-------------------------------------------------------------------------

    /// Reload the signed-in user's sections
    pub async fn load_sections(&self, user_email: &str) -> Result<Vec<Section>> {
        let value = self
            .dispatcher
            .get("sections", json!({ "user": user_email }))
            .await?;
        let sections: Vec<Section> =
            decode_value::<Option<Vec<Section>>>(value)?.unwrap_or_default();

        *self.sections.lock().expect("sections lock") = sections.clone();
        Ok(sections)
    }

    /// Reload the assignments of one section
    pub async fn load_assignments(&self, section_name: &str) -> Result<Vec<Assignment>> {
        let value = self
            .dispatcher
            .get("assignments-by-section", json!({ "sectionName": section_name }))
            .await?;
        let mut assignments: Vec<Assignment> =
            decode_value::<Option<Vec<Assignment>>>(value)?.unwrap_or_default();

        // Responses omit the owning section; fill it from context
        for assignment in &mut assignments {
            assignment.section_name = section_name.to_string();
        }

        self.assignments
            .lock()
            .expect("assignments lock")
            .insert(section_name.to_string(), assignments.clone());
        Ok(assignments)
    }

    /// Cached sections snapshot
    pub fn sections(&self) -> Vec<Section> {
        self.sections.lock().expect("sections lock").clone()
    }

    /// Cached assignments of one section, if loaded
    pub fn assignments(&self, section_name: &str) -> Option<Vec<Assignment>> {
        self.assignments
            .lock()
            .expect("assignments lock")
            .get(section_name)
            .cloned()
    }
}

/// Group the repository feed into header/proof display entries
fn group_repo_feed(feed: &[SectionProofs]) -> Vec<RepoEntry> {
    let mut entries = Vec::new();
    let mut current_section: Option<&str> = None;

    for record in feed {
        if current_section != Some(record.section_name.as_str()) {
            current_section = Some(record.section_name.as_str());
            entries.push(RepoEntry::SectionHeader(record.section_name.clone()));
        }
        for proof in &record.proof_list {
            entries.push(RepoEntry::Proof(proof.clone()));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{proof_named, MockIdentityProvider, MockTransport};
    use crate::session::TokenGuard;

    fn catalog_with(transport: Arc<MockTransport>) -> ProofCatalog {
        let provider = Arc::new(MockIdentityProvider::signed_in(
            "student@example.edu",
            "Student",
        ));
        let guard = Arc::new(TokenGuard::new(provider));
        let dispatcher = Arc::new(RequestDispatcher::new(guard, transport));
        ProofCatalog::new(dispatcher)
    }

    fn feed_record(section: &str, ids: &[&str]) -> serde_json::Value {
        json!({
            "SectionName": section,
            "ProofList": ids
                .iter()
                .map(|id| serde_json::to_value(proof_named(id, &format!("proof {id}"))).unwrap())
                .collect::<Vec<_>>(),
        })
    }

    #[tokio::test]
    async fn contiguous_sections_share_one_header() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!([
            feed_record("S1", &["1"]),
            feed_record("S1", &["2"]),
        ]));

        let catalog = catalog_with(transport);
        catalog.load_repo_proofs().await.unwrap();

        let headers: Vec<String> = catalog
            .repo_entries()
            .iter()
            .filter_map(|e| match e {
                RepoEntry::SectionHeader(name) => Some(name.clone()),
                RepoEntry::Proof(_) => None,
            })
            .collect();
        assert_eq!(headers, vec!["S1"]);
    }

    #[tokio::test]
    async fn interrupted_runs_produce_repeated_headers() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!([
            feed_record("S1", &["1"]),
            feed_record("S2", &["2"]),
            feed_record("S1", &["3"]),
        ]));

        let catalog = catalog_with(transport);
        catalog.load_repo_proofs().await.unwrap();

        let headers: Vec<String> = catalog
            .repo_entries()
            .iter()
            .filter_map(|e| match e {
                RepoEntry::SectionHeader(name) => Some(name.clone()),
                RepoEntry::Proof(_) => None,
            })
            .collect();
        assert_eq!(headers, vec!["S1", "S2", "S1"]);
    }

    #[tokio::test]
    async fn lookup_matches_stringified_ids_and_reports_misses() {
        let transport = Arc::new(MockTransport::new());
        // Numeric id on the wire, string lookup from the caller
        transport.push_response(json!([
            {"Id": 3, "ProofName": "conjunction", "Premise": [], "Logic": ["[]"], "Rules": []}
        ]));

        let catalog = catalog_with(transport);
        let handle = catalog.load_user_proofs().await.unwrap();

        let hit = catalog.lookup(handle, "3").unwrap();
        assert_eq!(hit.name, "conjunction");

        let miss = catalog.lookup(handle, "4");
        assert!(matches!(miss, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn loads_replace_buckets_wholesale() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!([
            serde_json::to_value(proof_named("1", "first")).unwrap(),
            serde_json::to_value(proof_named("2", "second")).unwrap(),
        ]));
        transport.push_response(json!([
            serde_json::to_value(proof_named("3", "third")).unwrap(),
        ]));

        let catalog = catalog_with(transport);
        catalog.load_user_proofs().await.unwrap();
        assert_eq!(catalog.user_proofs().len(), 2);

        catalog.load_user_proofs().await.unwrap();
        let remaining = catalog.user_proofs();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "third");
    }

    #[tokio::test]
    async fn null_feeds_leave_buckets_empty() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(serde_json::Value::Null);

        let catalog = catalog_with(transport);
        catalog.load_completed_proofs().await.unwrap();
        assert!(catalog.completed_proofs().is_empty());
    }
}
