//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The ObjectId identifier.
//!
//! A 12-byte identifier laid out, in network byte order, as:
//!
//! 1. Bytes 0..3: seconds since the Unix epoch.
//! 2. Bytes 4..6: the first three bytes of the MD5 digest of the
//!    machine hostname, computed once per process.
//! 3. Bytes 7..8: the low 16 bits of the process id.
//! 4. Bytes 9..11: a counter incremented once per id, wrapping at 2^24.

use std::fmt;
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// The machine portion of every id this process generates.
static HOSTNAME_DIGEST: Lazy<[u8; 3]> = Lazy::new(|| {
    let hostname = gethostname::gethostname();
    let digest = Md5::digest(hostname.to_string_lossy().as_bytes());
    [digest[0], digest[1], digest[2]]
});

/// Ids minted since process start. Only the low 24 bits reach the wire;
/// the wrap point is the same on every host word size.
static OBJECT_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A 12-byte document identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectId {
    bytes: [u8; 12],
}

impl ObjectId {

    /// Generates a new id stamped with the current time.
    pub fn new() -> ObjectId {
        ObjectId::generate(None)
    }

    /// Generates a new id. An explicit timestamp, in seconds since the
    /// Unix epoch, overrides the current time.
    pub fn generate(timestamp: Option<u32>) -> ObjectId {
        let seconds = timestamp.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs() as u32)
                .unwrap_or(0)
        });

        let counter = OBJECT_ID_COUNTER
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1)
            & 0x00FF_FFFF;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..7].copy_from_slice(&HOSTNAME_DIGEST[..]);
        bytes[7..9].copy_from_slice(&(process::id() as u16).to_be_bytes());
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..]);
        ObjectId { bytes }
    }

    /// True if the string is a well-formed id: exactly 24 ASCII
    /// hexadecimal digits.
    pub fn is_legal(candidate: &str) -> bool {
        candidate.len() == 24 && candidate.bytes().all(|byte| byte.is_ascii_hexdigit())
    }

    /// Parses the 24-digit hexadecimal form of an id.
    pub fn from_string(candidate: &str) -> Result<ObjectId> {
        if !ObjectId::is_legal(candidate) {
            return Err(Error::InvalidObjectId(format!(
                "illegal ObjectId format: {}",
                candidate
            )));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(candidate, &mut bytes)
            .map_err(|_| Error::InvalidObjectId(format!("illegal ObjectId format: {}", candidate)))?;
        Ok(ObjectId { bytes })
    }

    /// The 24-digit lowercase hexadecimal form of the id.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// The raw bytes of the id.
    pub fn bytes(&self) -> [u8; 12] {
        self.bytes
    }

    /// The seconds-since-epoch stamp embedded in the id.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

}

impl Default for ObjectId {
    fn default() -> ObjectId {
        ObjectId::new()
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> ObjectId {
        ObjectId { bytes }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "ObjectId({})", self.to_hex())
    }
}
