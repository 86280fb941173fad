//! nl_proto — wire types shared between Notelock clients and the server
//!
//! Everything on the wire is JSON. The server is zero-knowledge: it stores
//! and routes the types defined here but can read none of the encrypted
//! content inside them. Byte fields are standard base64, timestamps are
//! RFC3339 UTC.
//!
//! # Modules
//! - `api`  — registration, challenge/login, and user-profile payloads
//! - `note` — note containers: blocks, chains, and title listings

pub mod api;
pub mod note;

pub use api::{ChallengeResponse, UserProfile};
pub use note::{EncryptedTitle, Note, NoteBlock, NoteBlockChain, NoteTitle};
