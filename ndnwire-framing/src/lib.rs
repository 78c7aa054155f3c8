//! Streaming reassembly of NDN-TLV elements.
//!
//! A stream transport delivers bytes in arbitrary chunks with no respect
//! for element boundaries. This crate turns that stream back into whole
//! top-level TLV elements: [`TlvStructureDecoder`] is the resumable state
//! machine that finds where one element ends, and [`ElementReader`] wraps
//! it with buffering so a connection's read loop can push chunks as they
//! arrive and receive one callback per complete element.
//!
//! Framing is deliberately separate from content decoding. The reader
//! never interprets an element beyond its outer type and length headers,
//! so a packet that fails structural decoding upstream does not poison
//! the connection's framing, and oversize elements are rejected from
//! their length header alone, before any value bytes are buffered.
//!
//! ```
//! use ndnwire_framing::ElementReader;
//!
//! let mut elements = 0usize;
//! let mut reader = ElementReader::new(|_element: &[u8]| elements += 1);
//! // Two elements, split mid-header and mid-value.
//! reader.on_received_data(&[6, 2, 0xaa]).unwrap();
//! reader.on_received_data(&[0xbb, 8, 1, 0xcc]).unwrap();
//! drop(reader);
//! assert_eq!(elements, 2);
//! ```

pub mod element_reader;
pub mod structure_decoder;

pub use element_reader::{ElementListener, ElementReader};
pub use structure_decoder::{FramingError, Progress, TlvStructureDecoder};
