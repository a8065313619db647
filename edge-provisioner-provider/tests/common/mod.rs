//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use edge_provisioner_provider::{
    DnsRecord, DnsRecordSpec, EdgeProvider, PaginationParams, ProviderCredentials, create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("_test-{nanos:08x}")
}

/// 测试上下文 - 封装 Provider 和测试 zone
pub struct TestContext {
    pub provider: Arc<dyn EdgeProvider>,
    pub zone: String,
    pub zone_id: Option<String>,
}

impl TestContext {
    /// 创建 Cloudflare 测试上下文
    pub fn cloudflare() -> Option<Self> {
        let api_token = env::var("CLOUDFLARE_API_TOKEN").ok()?;
        let zone = env::var("TEST_ZONE").ok()?;

        let provider = create_provider(ProviderCredentials::Cloudflare { api_token }).ok()?;

        Some(Self {
            provider,
            zone,
            zone_id: None,
        })
    }

    /// 查找测试 zone 的 id
    pub async fn find_zone_id(&mut self) -> Option<String> {
        if self.zone_id.is_some() {
            return self.zone_id.clone();
        }

        let params = PaginationParams {
            page: 1,
            page_size: 50,
        };
        let response = self.provider.list_zones(&params).await.ok()?;
        let zone = response.items.into_iter().find(|z| z.name == self.zone)?;
        self.zone_id = Some(zone.id.clone());
        Some(zone.id)
    }

    /// 创建测试记录（不经过 edge 代理）
    pub async fn create_test_record(&self, zone_id: &str, content: &str) -> Option<DnsRecord> {
        let mut spec = DnsRecordSpec::new(zone_id, generate_test_record_name(), content);
        spec.proxied = false;
        self.provider.create_dns_record(&spec).await.ok()
    }

    /// 清理测试记录
    pub async fn cleanup_record(&self, zone_id: &str, record_id: &str) {
        let _ = self.provider.delete_dns_record(zone_id, record_id).await;
    }
}
