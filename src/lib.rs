//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # A BSON encoder and decoder.
//!
//! Translates between an insertion-ordered [`Document`] of [`Value`]s and
//! the BSON wire format, and mints the 12-byte [`ObjectId`] identifiers
//! used by document databases.
//!
//! ```
//! use bson_codec::{deserialize, doc, serialize, DeserializeOptions};
//!
//! let document = doc! { "hello" => "world" };
//! let bytes = serialize(&document, false, false, bson_codec::max_bson_size()).unwrap();
//! let back = deserialize(&bytes, &DeserializeOptions::default()).unwrap();
//! assert_eq!(back, document);
//! ```

mod de;
mod document;
mod error;
mod oid;
mod ser;

pub mod value;
pub use value::{
    Binary,
    BinarySubtype,
    Code,
    DbRef,
    ElementType,
    Regex,
    RegexOptions,
    Timestamp,
    Value,
};

pub use de::{deserialize, DeserializeOptions};
pub use document::Document;
pub use error::{Error, Result};
pub use oid::ObjectId;
pub use ser::serialize;

use std::sync::atomic::{AtomicI32, Ordering};

/// The size cap applied to serialized documents until a collaborator
/// advertises another one: 4 MiB.
pub const DEFAULT_MAX_BSON_SIZE: i32 = 4 * 1024 * 1024;

static MAX_BSON_SIZE: AtomicI32 = AtomicI32::new(DEFAULT_MAX_BSON_SIZE);

/// A collaborator that advertises the largest document it accepts,
/// typically a database connection after its handshake.
pub trait MaxBsonSize {
    fn max_bson_size(&self) -> i32;
}

/// Returns the process-wide cap on serialized document size. Callers
/// pass this, or a cap of their own, to [`serialize`].
pub fn max_bson_size() -> i32 {
    MAX_BSON_SIZE.load(Ordering::Relaxed)
}

/// Stores the collaborator's advertised cap process-wide and returns it.
/// Publication is a single atomic word; readers never observe a torn
/// value.
pub fn update_max_bson_size(connection: &dyn MaxBsonSize) -> i32 {
    let size = connection.max_bson_size();
    MAX_BSON_SIZE.store(size, Ordering::Relaxed);
    size
}
