//! Read-only reader for IPIP.net "ipdb" files (PureIPDB `qqwry.ipdb`).
//!
//! File layout:
//!
//! ```text
//! +-------------------+----------------------+---------------------------------+
//! | u32 BE meta_len   | JSON metadata        | data (total_size bytes)         |
//! +-------------------+----------------------+---------------------------------+
//!                                            | node_count * 8 byte trie nodes  |
//!                                            | records: u16 BE len + UTF-8     |
//! ```
//!
//! Each trie node holds two big-endian `u32` children (bit 0, bit 1). A child
//! equal to `node_count` means "no entry"; a child greater than `node_count`
//! points into the record area. IPv4 addresses are looked up below the
//! `::ffff:0:0/96` branch of the trie. A record is a tab-separated row holding
//! one block of `fields.len()` values per language.

#[cfg(test)]
pub(crate) mod test_helpers;

use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

const IPV4_FLAG: u16 = 0x01;
const IPV6_FLAG: u16 = 0x02;

/// Errors raised while opening or querying an ipdb file.
#[derive(Error, Debug)]
pub enum IpdbError {
    /// File could not be read.
    #[error("Failed to read ipdb file: {0}")]
    Io(#[from] std::io::Error),

    /// Header, metadata or trie is malformed.
    #[error("Invalid ipdb file: {0}")]
    InvalidFormat(String),

    /// Metadata JSON did not parse.
    #[error("Invalid ipdb metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// The database does not cover the address family.
    #[error("Database does not support {0}")]
    UnsupportedFamily(&'static str),

    /// Requested language block is not present.
    #[error("Language {0} not present in database")]
    UnknownLanguage(String),

    /// No entry for the address.
    #[error("No entry for address")]
    NotFound,
}

/// JSON metadata block of an ipdb file.
#[derive(Debug, Clone, Deserialize)]
pub struct IpdbMetadata {
    /// Build time, seconds since the Unix epoch
    pub build: i64,
    /// Bitmask: 1 = IPv4, 2 = IPv6
    pub ip_version: u16,
    /// Language name -> offset of its value block within a record
    pub languages: HashMap<String, usize>,
    /// Number of trie nodes
    pub node_count: usize,
    /// Size of the data section (trie + records)
    pub total_size: usize,
    /// Field names of one language block
    pub fields: Vec<String>,
}

/// In-memory ipdb reader.
///
/// The whole file is held in memory; lookups never mutate the reader, so one
/// instance can be shared by reference for any number of queries.
#[derive(Debug)]
pub struct IpdbReader {
    metadata: IpdbMetadata,
    data: Vec<u8>,
    v4_offset: usize,
}

impl IpdbReader {
    /// Reads and parses an ipdb file.
    pub fn open(path: &Path) -> Result<Self, IpdbError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Parses an ipdb file already in memory.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Result<Self, IpdbError> {
        if bytes.len() < 4 {
            return Err(IpdbError::InvalidFormat("file shorter than header".into()));
        }
        let meta_len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let data_start = 4 + meta_len;
        if bytes.len() < data_start {
            return Err(IpdbError::InvalidFormat(format!(
                "metadata length {} exceeds file size {}",
                meta_len,
                bytes.len()
            )));
        }
        let metadata: IpdbMetadata = serde_json::from_slice(&bytes[4..data_start])?;

        if bytes.len() - data_start != metadata.total_size {
            return Err(IpdbError::InvalidFormat(format!(
                "data section is {} bytes, metadata declares {}",
                bytes.len() - data_start,
                metadata.total_size
            )));
        }
        if metadata.node_count.saturating_mul(8) > metadata.total_size {
            return Err(IpdbError::InvalidFormat(format!(
                "{} trie nodes do not fit in {} bytes",
                metadata.node_count, metadata.total_size
            )));
        }
        if metadata.fields.is_empty() {
            return Err(IpdbError::InvalidFormat("no fields declared".into()));
        }

        let data = bytes.split_off(data_start);
        let mut reader = Self {
            metadata,
            data,
            v4_offset: 0,
        };
        reader.v4_offset = reader.ipv4_root()?;
        Ok(reader)
    }

    /// Metadata block.
    pub fn metadata(&self) -> &IpdbMetadata {
        &self.metadata
    }

    /// Build time, seconds since the Unix epoch.
    pub fn build_time(&self) -> i64 {
        self.metadata.build
    }

    /// Language names, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.metadata.languages.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }

    /// Field names of one language block.
    pub fn fields(&self) -> &[String] {
        &self.metadata.fields
    }

    /// Returns true if the database covers IPv4.
    pub fn supports_ipv4(&self) -> bool {
        self.metadata.ip_version & IPV4_FLAG != 0
    }

    /// Returns true if the database covers IPv6.
    pub fn supports_ipv6(&self) -> bool {
        self.metadata.ip_version & IPV6_FLAG != 0
    }

    /// Values of `language`'s block for `ip`, in `fields()` order.
    pub fn find(&self, ip: IpAddr, language: &str) -> Result<Vec<&str>, IpdbError> {
        let offset = *self
            .metadata
            .languages
            .get(language)
            .ok_or_else(|| IpdbError::UnknownLanguage(language.to_string()))?;

        let node = match ip {
            IpAddr::V4(v4) => {
                if !self.supports_ipv4() {
                    return Err(IpdbError::UnsupportedFamily("IPv4"));
                }
                self.search(&v4.octets(), 32)?
            }
            IpAddr::V6(v6) => {
                if !self.supports_ipv6() {
                    return Err(IpdbError::UnsupportedFamily("IPv6"));
                }
                self.search(&v6.octets(), 128)?
            }
        };

        let record = self.resolve(node)?;
        let values: Vec<&str> = record.split('\t').collect();
        let width = self.metadata.fields.len();
        if offset + width > values.len() {
            return Err(IpdbError::InvalidFormat(format!(
                "record has {} values, language block needs {}..{}",
                values.len(),
                offset,
                offset + width
            )));
        }
        Ok(values[offset..offset + width].to_vec())
    }

    /// Field name -> value map of `language`'s block for `ip`.
    pub fn find_map(&self, ip: IpAddr, language: &str) -> Result<BTreeMap<String, String>, IpdbError> {
        let values = self.find(ip, language)?;
        Ok(self
            .metadata
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| (field.clone(), value.to_string()))
            .collect())
    }

    fn ipv4_root(&self) -> Result<usize, IpdbError> {
        let node_count = self.metadata.node_count;
        let mut node = 0;
        for bit in 0..96 {
            if node >= node_count {
                break;
            }
            node = self.read_node(node, if bit >= 80 { 1 } else { 0 })?;
        }
        Ok(node)
    }

    fn search(&self, octets: &[u8], bit_count: usize) -> Result<usize, IpdbError> {
        let node_count = self.metadata.node_count;
        let mut node = if bit_count == 32 { self.v4_offset } else { 0 };
        for i in 0..bit_count {
            if node >= node_count {
                break;
            }
            let bit = (octets[i >> 3] >> (7 - (i % 8))) & 1;
            node = self.read_node(node, bit as usize)?;
        }
        if node > node_count {
            Ok(node)
        } else {
            Err(IpdbError::NotFound)
        }
    }

    fn read_node(&self, node: usize, bit: usize) -> Result<usize, IpdbError> {
        let offset = node * 8 + bit * 4;
        let bytes = self
            .data
            .get(offset..offset + 4)
            .ok_or_else(|| IpdbError::InvalidFormat(format!("node {} out of bounds", node)))?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
    }

    fn resolve(&self, node: usize) -> Result<&str, IpdbError> {
        let node_count = self.metadata.node_count;
        let resolved = node - node_count + node_count * 8;
        let len_bytes = self
            .data
            .get(resolved..resolved + 2)
            .ok_or_else(|| IpdbError::InvalidFormat(format!("record offset {} out of bounds", resolved)))?;
        let size = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let body = self
            .data
            .get(resolved + 2..resolved + 2 + size)
            .ok_or_else(|| IpdbError::InvalidFormat(format!("record at {} truncated", resolved)))?;
        std::str::from_utf8(body)
            .map_err(|e| IpdbError::InvalidFormat(format!("record at {} is not UTF-8: {}", resolved, e)))
    }
}
