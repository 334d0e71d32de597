//! Elastic hashing: an open-addressed map whose capacity is split into
//! geometrically shrinking sub-tables, each probed with a bounded linear scan.
//!
//! Entries are never relocated. There is no growth, rehashing or deletion;
//! a table that runs out of admissible slots reports
//! [`ElasticError::InsertionFailed`] and leaves recovery to the caller.
//!
//! ```
//! use elastic_buckets::ElasticHashMap;
//!
//! let mut map: ElasticHashMap<&str, u32> = ElasticHashMap::new(64);
//! map.upsert("apples", 3).unwrap();
//! *map.get_or_insert_default("pears").unwrap() += 2;
//! assert_eq!(map.find("apples"), Some(&3));
//! assert_eq!(map.find("pears"), Some(&2));
//! ```
//!
//! Slots are only ever filled through the map, never directly:
//!
//! ```compile_fail
//! use elastic_buckets::sub_table::SubTable;
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod partition;
mod sub_table;
pub mod table;

pub use config::Config;
pub use error::ElasticError;
pub use hash::{BuildIdentityHasher, IdentityHasher, Xxh3State};
pub use table::{ElasticHashMap, Placement, SlotLocation};
