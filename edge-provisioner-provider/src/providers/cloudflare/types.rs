//! Cloudflare API 类型定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
    pub result_info: Option<CloudflareResultInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareResultInfo {
    #[serde(default)]
    pub total_pages: Option<u32>,
    pub total_count: u32,
}

/// Zone 所属账户引用
#[derive(Debug, Serialize, Deserialize)]
pub struct CloudflareAccountRef {
    pub id: String,
}

/// Cloudflare Zone 结构
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub name_servers: Vec<String>,
    pub account: Option<CloudflareAccountRef>,
}

/// Zone 设置（ssl / pseudo_ipv4 / always_use_https）
#[derive(Debug, Deserialize)]
pub struct CloudflareSetting {
    pub id: String,
    pub value: Value,
}

/// Cloudflare DNS Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub proxied: Option<bool>,
}

/// DNS Record 请求体（创建 / 更新）
#[derive(Debug, Serialize)]
pub struct CloudflareDnsRecordBody<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: String,
    pub content: &'a str,
    /// 1 = automatic
    pub ttl: u32,
    pub proxied: bool,
}

/// Page Rule 结构（请求与响应共用）
#[derive(Debug, Serialize, Deserialize)]
pub struct CloudflarePageRule {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub targets: Vec<PageRuleTarget>,
    pub actions: Vec<PageRuleAction>,
    #[serde(default = "default_rule_status")]
    pub status: String,
}

fn default_rule_status() -> String {
    "active".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageRuleTarget {
    pub target: String,
    pub constraint: PageRuleConstraint,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageRuleConstraint {
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageRuleAction {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// `forwarding_url` action 的 value 字段
#[derive(Debug, Serialize, Deserialize)]
pub struct ForwardingUrlValue {
    pub url: String,
    pub status_code: u16,
}
