//! 结果输出（文本 / JSON）

use std::fmt::Write as _;

use serde::Serialize;

use edge_provisioner_core::types::{PaginatedResponse, ProviderZone, ProvisioningResult, Site};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn render_result(result: &ProvisioningResult) -> String {
    let mut out = String::new();
    let status = match (result.succeeded_overall, result.has_warnings) {
        (false, _) => "FAILED",
        (true, true) => "COMPLETED WITH WARNINGS",
        (true, false) => "OK",
    };
    let _ = writeln!(out, "{status}");

    if let Some(site) = &result.site {
        out.push_str(&render_site(site));
    }
    for step in &result.steps {
        let mark = if step.succeeded { "ok" } else { "failed" };
        let _ = writeln!(out, "  [{mark:>6}] {}", step.step);
    }
    for error in &result.errors {
        let _ = writeln!(out, "  ! {error}");
    }
    out
}

pub fn render_site(site: &Site) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", site.name, site.id);
    let _ = writeln!(out, "  status:      {}", site.status.as_str());
    let _ = writeln!(out, "  account:     {}", site.account_id);
    let _ = writeln!(out, "  created:     {}", site.created_at.to_rfc3339());
    if !site.name_servers.is_empty() {
        let _ = writeln!(out, "  nameservers: {}", site.name_servers.join(", "));
    }
    out
}

pub fn render_sites(sites: &[Site]) -> String {
    if sites.is_empty() {
        return "No sites registered\n".to_string();
    }
    let mut out = String::new();
    for site in sites {
        let _ = writeln!(out, "{:<34} {:<28} {}", site.id, site.name, site.status.as_str());
    }
    out
}

pub fn render_zones(page: &PaginatedResponse<ProviderZone>) -> String {
    let mut out = String::new();
    for zone in &page.items {
        let _ = writeln!(out, "{:<34} {:<28} {}", zone.id, zone.name, zone.status.as_str());
    }
    let _ = writeln!(
        out,
        "page {} ({} zones total{})",
        page.page,
        page.total_count,
        if page.has_more { ", more available" } else { "" }
    );
    out
}
