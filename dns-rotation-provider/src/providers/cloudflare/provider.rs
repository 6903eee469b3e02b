//! Cloudflare `ZoneProvider` trait 实现

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, same_name, validate_change};
use crate::traits::{ErrorContext, ProviderErrorMapper, ZoneProvider};
use crate::types::{ChangeAction, HostedZone, RecordChange, RecordSet, RecordType};

use super::types::{CreateRecordBody, PatchTtlBody};
use super::{
    CloudflareDnsRecord, CloudflareProvider, CloudflareZone, MAX_PAGE_SIZE_RECORDS,
    MAX_PAGE_SIZE_ZONES,
};

impl CloudflareProvider {
    pub(crate) fn zone_to_hosted_zone(zone: CloudflareZone) -> HostedZone {
        HostedZone {
            id: zone.id,
            name: normalize_domain_name(&zone.name),
        }
    }

    /// 读取某个名称下指定类型的所有记录
    async fn records_named(
        &self,
        zone_id: &str,
        name: &str,
        record_type: &RecordType,
    ) -> Result<Vec<CloudflareDnsRecord>> {
        let path = format!(
            "/zones/{zone_id}/dns_records?type={}&name={}",
            urlencoding::encode(record_type.as_str()),
            urlencoding::encode(&normalize_domain_name(name)),
        );
        let records: Vec<CloudflareDnsRecord> = self
            .get_all_pages(
                &path,
                MAX_PAGE_SIZE_RECORDS,
                ErrorContext::record(zone_id, name),
            )
            .await?;

        Ok(records
            .into_iter()
            .filter(|r| {
                same_name(&r.name, name) && RecordType::from(r.record_type.as_str()) == *record_type
            })
            .collect())
    }

    async fn create_value(&self, zone_id: &str, change: &RecordChange, value: &str) -> Result<()> {
        let name = normalize_domain_name(&change.name);
        let body = CreateRecordBody {
            record_type: change.record_type.as_str(),
            name: &name,
            content: value,
            ttl: change.ttl,
            comment: change.comment.as_deref(),
        };
        let _: CloudflareDnsRecord = self
            .post(
                &format!("/zones/{zone_id}/dns_records"),
                &body,
                ErrorContext::record(zone_id, &change.name),
            )
            .await?;
        Ok(())
    }

    async fn delete_value(&self, zone_id: &str, record: &CloudflareDnsRecord) -> Result<()> {
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{}", record.id),
            ErrorContext::record(zone_id, &record.name),
        )
        .await
    }

    /// UPSERT：补齐缺失值，修正 TTL，最后删除多余值
    async fn upsert(
        &self,
        zone_id: &str,
        change: &RecordChange,
        existing: &[CloudflareDnsRecord],
    ) -> Result<()> {
        for value in &change.values {
            if !existing.iter().any(|r| r.content == *value) {
                self.create_value(zone_id, change, value).await?;
            }
        }

        for record in existing
            .iter()
            .filter(|r| change.values.contains(&r.content) && r.ttl != change.ttl)
        {
            let _: CloudflareDnsRecord = self
                .patch(
                    &format!("/zones/{zone_id}/dns_records/{}", record.id),
                    &PatchTtlBody { ttl: change.ttl },
                    ErrorContext::record(zone_id, &change.name),
                )
                .await?;
        }

        for record in existing
            .iter()
            .filter(|r| !change.values.contains(&r.content))
        {
            self.delete_value(zone_id, record).await?;
        }

        Ok(())
    }

    /// DELETE：所有值都必须存在，校验通过后逐条删除
    async fn delete_values(
        &self,
        zone_id: &str,
        change: &RecordChange,
        existing: &[CloudflareDnsRecord],
    ) -> Result<()> {
        let mut targets = Vec::with_capacity(change.values.len());
        for value in &change.values {
            let Some(record) = existing.iter().find(|r| r.content == *value) else {
                return Err(ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_name: change.name.clone(),
                    raw_message: Some(format!("value '{value}' is not published")),
                });
            };
            targets.push(record);
        }

        for record in targets {
            self.delete_value(zone_id, record).await?;
        }
        Ok(())
    }
}

/// 按 (name, type) 将单条记录合并为 record set，保持首次出现顺序
fn group_record_sets(records: Vec<CloudflareDnsRecord>) -> Vec<RecordSet> {
    let mut sets: Vec<RecordSet> = Vec::new();
    let mut index: HashMap<(String, RecordType), usize> = HashMap::new();

    for record in records {
        let name = normalize_domain_name(&record.name);
        let record_type = RecordType::from(record.record_type);
        match index.get(&(name.clone(), record_type.clone())) {
            Some(&i) => sets[i].values.push(record.content),
            None => {
                index.insert((name.clone(), record_type.clone()), sets.len());
                sets.push(RecordSet {
                    name,
                    record_type,
                    ttl: record.ttl,
                    values: vec![record.content],
                });
            }
        }
    }

    sets
}

#[async_trait]
impl ZoneProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let zones: Vec<CloudflareZone> = self
            .get_all_pages("/zones", MAX_PAGE_SIZE_ZONES, ErrorContext::default())
            .await?;
        Ok(zones.into_iter().map(Self::zone_to_hosted_zone).collect())
    }

    async fn list_resource_record_sets(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        let records: Vec<CloudflareDnsRecord> = self
            .get_all_pages(
                &format!("/zones/{zone_id}/dns_records"),
                MAX_PAGE_SIZE_RECORDS,
                ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(group_record_sets(records))
    }

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        change: &RecordChange,
    ) -> Result<()> {
        validate_change(self.provider_name(), change)?;

        let existing = self
            .records_named(zone_id, &change.name, &change.record_type)
            .await?;
        log::debug!(
            "[cloudflare] {} {} {:?} (currently {} value(s))",
            change.action,
            change.name,
            change.values,
            existing.len()
        );

        match change.action {
            ChangeAction::Upsert => self.upsert(zone_id, change, &existing).await,
            ChangeAction::Delete => self.delete_values(zone_id, change, &existing).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, record_type: &str, content: &str) -> CloudflareDnsRecord {
        CloudflareDnsRecord {
            id: id.to_string(),
            record_type: record_type.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: 300,
        }
    }

    #[test]
    fn groups_values_by_name_and_type() {
        let sets = group_record_sets(vec![
            record("1", "hk.example.com", "A", "4.3.2.1"),
            record("2", "la.example.com", "A", "2.4.6.8"),
            record("3", "hk.example.com", "A", "1.2.3.4"),
            record("4", "hk.example.com", "TXT", "hello"),
        ]);

        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].name, "hk.example.com");
        assert_eq!(sets[0].values, vec!["4.3.2.1", "1.2.3.4"]);
        assert_eq!(sets[1].name, "la.example.com");
        assert_eq!(sets[2].record_type, RecordType::Txt);
    }

    #[test]
    fn zone_name_trailing_dot_is_dropped() {
        let zone = CloudflareProvider::zone_to_hosted_zone(CloudflareZone {
            id: "z1".to_string(),
            name: "example.com.".to_string(),
        });
        assert_eq!(zone.name, "example.com");
    }
}
