//! DNS 记录类型

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use dns_rotation_provider::{RecordSet, RecordType, normalize_domain_name};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// An address record as seen by the core, decoupled from provider shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Fully-qualified name without the trailing dot.
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub ttl: u32,
    pub values: Vec<String>,
}

impl Record {
    pub fn a(name: impl Into<String>, ttl: u32, values: Vec<String>) -> Self {
        Self {
            name: normalize_domain_name(&name.into()),
            record_type: RecordType::A,
            ttl,
            values,
        }
    }

    /// Parse the values into a set of IPv4 addresses.
    ///
    /// Duplicate values collapse. A value that is not exactly an IPv4
    /// literal (surrounding whitespace included) is an error; it is never
    /// skipped.
    pub fn ips(&self) -> CoreResult<BTreeSet<Ipv4Addr>> {
        self.values
            .iter()
            .map(|value| {
                value
                    .parse::<Ipv4Addr>()
                    .map_err(|_| CoreError::InvalidRecordValue {
                        record: self.name.clone(),
                        value: value.clone(),
                    })
            })
            .collect()
    }
}

impl From<RecordSet> for Record {
    fn from(set: RecordSet) -> Self {
        Self {
            name: normalize_domain_name(&set.name),
            record_type: set.record_type,
            ttl: set.ttl,
            values: set.values,
        }
    }
}
