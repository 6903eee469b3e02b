//! Status reporter
//!
//! Read-only reconciliation of the inventory against a records snapshot.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::error::CoreResult;
use crate::types::{Record, Server};
use crate::zone::Zone;

/// One record and the servers whose IP it publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMembers {
    pub name: String,
    pub ips: BTreeSet<Ipv4Addr>,
    /// Server names, in inventory order.
    pub servers: Vec<String>,
    /// Cluster names of those servers, first occurrence order.
    pub clusters: Vec<String>,
}

/// Recompute every server's published name from `records`.
///
/// Each server starts cleared. A server whose IP appears under several
/// records ends with the last of them in `records` order. Records are
/// parsed before any server is touched, so a malformed record leaves
/// `servers` unchanged.
pub fn update_servers(records: &[Record], servers: &mut [Server]) -> CoreResult<()> {
    let parsed = records
        .iter()
        .map(|record| -> CoreResult<_> {
            Ok((record.name.as_str(), Zone::ips_from_record(record)?))
        })
        .collect::<CoreResult<Vec<_>>>()?;

    for server in servers.iter_mut() {
        server.set_dns(None);
    }
    for (name, ips) in &parsed {
        for server in servers.iter_mut().filter(|s| ips.contains(&s.ip())) {
            server.set_dns(Some((*name).to_string()));
        }
    }

    log::debug!(
        "Reconciled {} server(s) against {} record(s)",
        servers.len(),
        records.len()
    );
    Ok(())
}

/// Per record: its IPs plus the inventory servers and clusters behind them.
pub fn record_members(records: &[Record], servers: &[Server]) -> CoreResult<Vec<RecordMembers>> {
    records
        .iter()
        .map(|record| -> CoreResult<RecordMembers> {
            let ips = Zone::ips_from_record(record)?;
            let members: Vec<&Server> = servers
                .iter()
                .filter(|s| ips.contains(&s.ip()))
                .collect();

            let mut clusters: Vec<String> = Vec::new();
            for server in &members {
                if !clusters.iter().any(|c| c == server.cluster_name()) {
                    clusters.push(server.cluster_name().to_string());
                }
            }

            Ok(RecordMembers {
                name: record.name.clone(),
                ips,
                servers: members.iter().map(|s| s.name()).collect(),
                clusters,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::{inventory, ip, server_clone};

    fn record(name: &str, values: &[&str]) -> Record {
        Record::a(name, 30, values.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn server_in_record_gets_its_name() {
        let mut inventory = inventory();
        let records = [record("la.example.com", &["2.4.6.8"])];

        update_servers(&records, inventory.servers_mut()).unwrap();

        let la1 = server_clone(&inventory, "la-1");
        assert_eq!(la1.cluster_name(), "Los Angeles");
        assert_eq!(la1.ordinal(), 1);
        assert_eq!(la1.dns(), Some("la.example.com"));
    }

    #[test]
    fn server_in_no_record_is_cleared() {
        let mut inventory = inventory();
        inventory
            .servers_mut()
            .iter_mut()
            .for_each(|s| s.set_dns(Some("old.example.com".to_string())));

        update_servers(&[record("la.example.com", &["2.4.6.8"])], inventory.servers_mut())
            .unwrap();

        assert_eq!(server_clone(&inventory, "hk-1").dns(), None);
        assert_eq!(server_clone(&inventory, "hk-2").dns(), None);
    }

    #[test]
    fn ip_in_several_records_takes_the_last() {
        let mut inventory = inventory();
        let records = [
            record("hk.example.com", &["4.3.2.1"]),
            record("la.example.com", &["2.4.6.8", "4.3.2.1"]),
        ];

        update_servers(&records, inventory.servers_mut()).unwrap();

        assert_eq!(server_clone(&inventory, "hk-1").dns(), Some("la.example.com"));
    }

    #[test]
    fn malformed_record_leaves_servers_untouched() {
        let mut inventory = inventory();
        inventory
            .servers_mut()
            .iter_mut()
            .for_each(|s| s.set_dns(Some("old.example.com".to_string())));
        let records = [
            record("la.example.com", &["2.4.6.8"]),
            record("hk.example.com", &["4.3.2.1.9"]),
        ];

        let err = update_servers(&records, inventory.servers_mut()).unwrap_err();

        assert!(matches!(err, CoreError::InvalidRecordValue { .. }));
        assert!(inventory
            .servers()
            .iter()
            .all(|s| s.dns() == Some("old.example.com")));
    }

    #[test]
    fn members_list_servers_and_clusters() {
        let inventory = inventory();
        let records = [
            record("hk.example.com", &["1.2.3.4", "4.3.2.1", "7.7.7.7"]),
            record("mixed.example.com", &["2.4.6.8", "1.2.3.4"]),
        ];

        let members = record_members(&records, inventory.servers()).unwrap();

        assert_eq!(members[0].name, "hk.example.com");
        assert_eq!(members[0].ips.len(), 3);
        assert!(members[0].ips.contains(&ip("7.7.7.7")));
        assert_eq!(members[0].servers, ["hk-1", "hk-2"]);
        assert_eq!(members[0].clusters, ["Hong Kong"]);
        assert_eq!(members[1].servers, ["hk-2", "la-1"]);
        assert_eq!(members[1].clusters, ["Hong Kong", "Los Angeles"]);
    }
}
