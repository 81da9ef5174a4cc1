//! Contract types shared by every layer
//!
//! - `primitive_kind`: the ten element kinds a list may hold
//! - `timestamp`: absolute timestamps stored in `Date` lists

pub mod primitive_kind;
pub mod timestamp;

pub use primitive_kind::PrimitiveKind;
pub use timestamp::Timestamp;
