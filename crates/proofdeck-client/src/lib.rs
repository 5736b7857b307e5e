//! Proofdeck Client: the authenticated sync and validation pipeline.
//!
//! This crate is the client-side controller for the proof-authoring
//! backend. It owns the token lifecycle, catalog synchronization, and the
//! pre-submission validation gate; UI concerns stay outside.
//!
//! ## Module Organization
//!
//! * **Collaborator Seams**: identity provider and formula parser (`traits`)
//! * **Session**: the token guard over the identity provider (`session`)
//! * **Dispatch**: authenticated request dispatch and the transport seam (`dispatch`)
//! * **Catalog**: cached proof buckets and directory metadata (`catalog`)
//! * **Validation**: the well-formedness gate (`validate`)
//! * **Submission**: record assembly and persistence (`submit`)
//! * **Directory**: roster and assignment administration (`directory`)
//! * **Export**: CSV serialization (`export`)
//! * **Facade**: one object wiring it together (`client`)

//-----------------------------------------------------------------------------
// Configuration and Collaborator Seams
//-----------------------------------------------------------------------------

pub mod config;
pub mod traits;

pub use config::ClientConfig;
pub use traits::{BearerToken, FormulaParser, IdentityProfile, IdentityProvider, ParsedFormula};

//-----------------------------------------------------------------------------
// Session and Dispatch
//-----------------------------------------------------------------------------

pub mod dispatch;
pub mod session;

pub use dispatch::{
    decode_value, BackendRequest, HttpTransport, Method, RequestDispatcher, Transport,
    AUTH_HEADER,
};
pub use session::TokenGuard;

//-----------------------------------------------------------------------------
// Catalog
//-----------------------------------------------------------------------------

pub mod catalog;

pub use catalog::{BucketKey, CatalogHandle, ProofCatalog, RepoEntry};

//-----------------------------------------------------------------------------
// Validation and Submission
//-----------------------------------------------------------------------------

pub mod submit;
pub mod validate;

pub use submit::{
    classify, repository_name, EditorState, SubmissionAssembler, SubmissionContext,
    REPOSITORY_PREFIX,
};
pub use validate::{SeparatorPolicy, ValidatedArgument, ValidationGate};

//-----------------------------------------------------------------------------
// Directory and Export
//-----------------------------------------------------------------------------

pub mod directory;
pub mod export;

pub use directory::SectionDirectory;
pub use export::{CsvDocument, CsvExporter};

//-----------------------------------------------------------------------------
// Facade and Testing Utilities
//-----------------------------------------------------------------------------

pub mod client;
pub mod mock;

pub use client::ProofdeckClient;

// Re-export the error taxonomy and boundary records for convenience
pub use proofdeck_error::{
    AuthError, CatalogError, DeckError, Error, ExportError, Result, TransportError,
    ValidationError,
};
pub use proofdeck_types::{
    Assignment, EntryType, Proof, ProofBody, ProofId, ProofLine, ProofType, Section, Session,
};
