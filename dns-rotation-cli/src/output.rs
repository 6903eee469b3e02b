//! Output formatting for the CLI

use dns_rotation_app::ServerView;
use dns_rotation_core::RecordMembers;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Tabled)]
pub struct ServerRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "DNS")]
    dns: String,
}

impl From<&ServerView> for ServerRow {
    fn from(s: &ServerView) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            cluster: s.cluster.clone(),
            ip: s.ip.to_string(),
            dns: s.dns.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct RecordRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "IPs")]
    ips: String,
    #[tabled(rename = "Servers")]
    servers: String,
    #[tabled(rename = "Clusters")]
    clusters: String,
}

impl From<&RecordMembers> for RecordRow {
    fn from(r: &RecordMembers) -> Self {
        Self {
            domain: r.name.clone(),
            ips: r
                .ips
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            servers: r.servers.join(", "),
            clusters: r.clusters.join(", "),
        }
    }
}

/// Render rows as a rounded table, or a note when there are none.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "No results found".to_string();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print `rows` as a table, or `data` as JSON.
pub fn print_output<T, R>(data: &T, rows: &[R], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    R: Tabled,
{
    match format {
        OutputFormat::Table => println!("{}", render_table(rows)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn server_table_has_one_row_per_server() {
        let servers = [
            ServerView {
                id: 1,
                name: "hk-1".to_string(),
                cluster: "Hong Kong".to_string(),
                ip: Ipv4Addr::new(4, 3, 2, 1),
                dns: Some("hk.example.com".to_string()),
            },
            ServerView {
                id: 12,
                name: "la-1".to_string(),
                cluster: "Los Angeles".to_string(),
                ip: Ipv4Addr::new(2, 4, 6, 8),
                dns: None,
            },
        ];
        let rows: Vec<ServerRow> = servers.iter().map(ServerRow::from).collect();

        let rendered = render_table(&rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].starts_with('╭'));
        assert_eq!(lines[1], "│ ID │ Name │ Cluster     │ IP      │ DNS            │");
        assert_eq!(lines[3], "│ 1  │ hk-1 │ Hong Kong   │ 4.3.2.1 │ hk.example.com │");
        assert_eq!(lines[4], "│ 12 │ la-1 │ Los Angeles │ 2.4.6.8 │                │");
        assert!(lines[5].starts_with('╰'));
    }

    #[test]
    fn record_row_joins_lists() {
        let members = RecordMembers {
            name: "hk.example.com".to_string(),
            ips: [Ipv4Addr::new(4, 3, 2, 1), Ipv4Addr::new(1, 2, 3, 4)]
                .into_iter()
                .collect(),
            servers: vec!["hk-1".to_string(), "hk-2".to_string()],
            clusters: vec!["Hong Kong".to_string()],
        };

        let rendered = render_table(&[RecordRow::from(&members)]);

        assert!(rendered.contains("│ Domain"));
        assert!(rendered.contains("1.2.3.4, 4.3.2.1"));
        assert!(rendered.contains("hk-1, hk-2"));
    }

    #[test]
    fn empty_table_prints_a_note() {
        assert_eq!(render_table::<RecordRow>(&[]), "No results found");
    }
}
