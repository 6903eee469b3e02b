//! 测试辅助模块
//!
//! 提供基于 `MemoryProvider` 的 zone 与 inventory 工厂方法。

use std::net::Ipv4Addr;
use std::sync::Arc;

use dns_rotation_provider::{MemoryProvider, RecordSet, RecordType};

use crate::inventory::{Inventory, create_infrastructure};
use crate::types::{Server, ServerSeed};
use crate::zone::Zone;

pub const ZONE_ID: &str = "Z1";
pub const ZONE_NAME: &str = "example.com";

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

pub fn a_set(name: &str, values: &[&str]) -> RecordSet {
    RecordSet {
        name: name.to_string(),
        record_type: RecordType::A,
        ttl: 30,
        values: values.iter().map(ToString::to_string).collect(),
    }
}

/// 空的 example.com zone
pub fn memory_provider() -> Arc<MemoryProvider> {
    Arc::new(MemoryProvider::new().with_zone(ZONE_ID, "example.com."))
}

pub fn memory_provider_with(sets: Vec<RecordSet>) -> Arc<MemoryProvider> {
    let provider = sets
        .into_iter()
        .fold(MemoryProvider::new().with_zone(ZONE_ID, "example.com."), |p, set| {
            p.with_record_set(ZONE_ID, set)
        });
    Arc::new(provider)
}

pub async fn connect(provider: &Arc<MemoryProvider>) -> Arc<Zone> {
    Arc::new(Zone::connect(provider.clone(), ZONE_NAME).await.unwrap())
}

/// la-1 = 2.4.6.8, hk-1 = 4.3.2.1, hk-2 = 1.2.3.4
pub fn inventory() -> Inventory {
    create_infrastructure(&[
        ServerSeed::new(1, ip("2.4.6.8")),
        ServerSeed::new(4, ip("4.3.2.1")),
        ServerSeed::new(4, ip("1.2.3.4")),
    ])
    .unwrap()
}

pub fn server_named<'a>(inventory: &'a mut Inventory, name: &str) -> &'a mut Server {
    inventory
        .servers_mut()
        .iter_mut()
        .find(|s| s.name() == name)
        .unwrap()
}

pub fn server_clone(inventory: &Inventory, name: &str) -> Server {
    inventory
        .servers()
        .iter()
        .find(|s| s.name() == name)
        .cloned()
        .unwrap()
}
