use mc_resolver_application::use_cases::ResolutionReport;
use mc_resolver_domain::{ResolutionOutcome, ResolutionSource, ServerStatus};
use serde::Serialize;
use std::net::IpAddr;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportDto {
    Resolved {
        request: String,
        ip: IpAddr,
        port: u16,
        address: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        srv_target: Option<String>,
        elapsed_ms: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        probe_latency_ms: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        online_players: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_players: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        server_version: Option<String>,
    },
    Failed {
        request: String,
        reason: String,
        elapsed_ms: u64,
    },
}

impl ReportDto {
    pub fn from_report(report: &ResolutionReport) -> Self {
        let request = report.request.to_string();
        let elapsed_ms = report.elapsed.as_millis() as u64;

        match &report.outcome {
            ResolutionOutcome::Resolved(server) => ReportDto::Resolved {
                request,
                ip: server.ip,
                port: server.port,
                address: server.socket_addr().to_string(),
                srv_target: match &server.source {
                    ResolutionSource::Srv { target } => Some(target.to_string()),
                    ResolutionSource::Direct => None,
                },
                elapsed_ms,
                probe_latency_ms: report.probe_latency.map(|d| d.as_millis() as u64),
                online_players: report.status.as_ref().map(|s| s.online_players),
                max_players: report.status.as_ref().and_then(|s| s.max_players),
                server_version: report.status.as_ref().and_then(|s| s.version.clone()),
            },
            ResolutionOutcome::Failed { reason } => ReportDto::Failed {
                request,
                reason: reason.clone(),
                elapsed_ms,
            },
        }
    }
}

/// One line for humans: `ip:port (via SRV target)` or `ip:port (direct)`,
/// followed by whatever the post-resolution checks found.
pub fn render_plain(report: &ResolutionReport) -> String {
    match &report.outcome {
        ResolutionOutcome::Resolved(server) => {
            let mut details = vec![match &server.source {
                ResolutionSource::Srv { target } => format!("via SRV {}", target),
                ResolutionSource::Direct => "direct".to_string(),
            }];
            if let Some(latency) = report.probe_latency {
                details.push(format!("reachable in {} ms", latency.as_millis()));
            }
            if let Some(status) = &report.status {
                details.push(players_online(status));
            }
            format!("{} ({})", server.socket_addr(), details.join(", "))
        }
        ResolutionOutcome::Failed { reason } => {
            format!("could not resolve {}: {}", report.request, reason)
        }
    }
}

fn players_online(status: &ServerStatus) -> String {
    match status.max_players {
        Some(max) => format!("{}/{} players online", status.online_players, max),
        None => format!("{} players online", status.online_players),
    }
}

pub fn render_json(report: &ResolutionReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&ReportDto::from_report(report))?)
}
