//! Proofdeck Types: boundary data model for the proofdeck client.
//!
//! This crate defines the records exchanged with the proof-authoring
//! backend and the typed forms the client works with internally.
//!
//! ## Module Organization
//!
//! * **Wire Utilities**: stringly-typed encodings the backend speaks (`wire`)
//! * **Proof Records**: proofs, proof lines, and the legacy body blob (`proof`)
//! * **Directory Records**: sections, rosters, and assignments (`section`)
//! * **Session**: the signed-in user's identity snapshot (`session`)

//-----------------------------------------------------------------------------
// Wire Utilities
//-----------------------------------------------------------------------------

pub mod wire;

pub use wire::{ProofId, WireError};

//-----------------------------------------------------------------------------
// Proof Records
//-----------------------------------------------------------------------------

pub mod proof;

pub use proof::{
    EntryType, Proof, ProofBody, ProofLine, ProofType, SectionProofs,
    PREMISE_JUSTIFICATION,
};

//-----------------------------------------------------------------------------
// Directory Records
//-----------------------------------------------------------------------------

pub mod section;

pub use section::{AdminList, Assignment, AssignmentUpdate, Roster, Section};

//-----------------------------------------------------------------------------
// Session
//-----------------------------------------------------------------------------

pub mod session;

pub use session::Session;
