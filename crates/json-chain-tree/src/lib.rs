//! Generic JSON value trees.
//!
//! [`decode`] turns arbitrary JSON text into an untyped [`JsonNode`] tree for
//! callers that only need ad hoc field lookups. The [`lex`] module holds the
//! token scanners the tree decoder is built on; the typed codec engine reuses
//! them for its scalar tokens.
//!
//! # Example
//!
//! ```
//! use json_chain_tree::{decode, JsonNode};
//!
//! let doc = decode(r#"{"status":0,"result":{"location":{"lng":116.3,"lat":39.9}}}"#).unwrap();
//! assert_eq!(doc["status"].to_int(), Some(0));
//! assert_eq!(doc["result"]["location"]["lng"].as_f64(), Some(116.3));
//! assert!(doc["result"]["precise"].is_missing());
//! assert_eq!(doc["nope"], JsonNode::Missing);
//! ```

mod decoder;
mod envelope;
mod error;
pub mod lex;
mod node;

pub use decoder::{decode, decode_bytes, Decoder, DEFAULT_MAX_DEPTH};
pub use envelope::{Envelope, EnvelopeError};
pub use error::DecodeError;
pub use node::JsonNode;
