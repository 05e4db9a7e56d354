//! 部署相关领域模型

use serde::Serialize;
use std::fmt;

/// 上传表单的原始字段（尚未校验）
///
/// 对应 `POST /deploy` 的 multipart 字段，缺失的字段为 `None`
#[derive(Debug, Clone, Default)]
pub struct DeploymentForm {
    pub location: Option<String>,
    pub environment: Option<String>,
    pub owner: Option<String>,
    pub storage_account_name: Option<String>,
    pub bundle: Option<Bundle>,
}

/// 上传的站点压缩包
#[derive(Clone)]
pub struct Bundle {
    /// 客户端提供的文件名
    pub filename: String,
    /// 文件内容
    pub bytes: Vec<u8>,
}

impl Bundle {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filename.is_empty() || self.bytes.is_empty()
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// 存储账户名
///
/// 只能通过 [`StorageAccountName::parse`] 构造：3-24 位小写字母或数字
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StorageAccountName(String);

impl StorageAccountName {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 24;

    /// 校验并构造存储账户名
    pub fn parse(name: &str) -> Option<Self> {
        let len_ok = (Self::MIN_LEN..=Self::MAX_LEN).contains(&name.len());
        let chars_ok = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

        (len_ok && chars_ok).then(|| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageAccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 通过校验的部署请求
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    /// 云区域代码（如 eastus）
    pub location: String,
    pub environment: String,
    pub owner: String,
    pub storage_account_name: StorageAccountName,
    pub bundle: Bundle,
}

/// Terraform 参数文件内容（terraform.tfvars.json）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProvisioningParameters {
    pub resource_group_name: String,
    pub location: String,
    pub environment: String,
    pub owner: String,
    pub storage_account_name: String,
}

impl ProvisioningParameters {
    pub fn new(resource_group_name: &str, request: &DeploymentRequest) -> Self {
        Self {
            resource_group_name: resource_group_name.to_string(),
            location: request.location.clone(),
            environment: request.environment.clone(),
            owner: request.owner.clone(),
            storage_account_name: request.storage_account_name.to_string(),
        }
    }
}

/// 最终 URL 的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlSourceKind {
    /// 来自 `terraform output` 的 static_site_url
    TerraformOutput,
    /// 根据区域推算
    Fallback,
}

/// 部署结果（POST /deploy 成功响应体）
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    pub success: bool,
    pub url: String,
    pub resource_group_name: String,
    pub storage_account_name: String,
    pub url_source: UrlSourceKind,
}

/// 部署流程阶段
///
/// 严格顺序执行，不回退
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Validating,
    Naming,
    WritingParameters,
    Extracting,
    AuthProbing,
    ProvisioningInit,
    ProvisioningApply,
    FetchingCredential,
    Uploading,
    QueryingOutputs,
    ResolvingUrl,
    Cleanup,
    Done,
}

impl DeployPhase {
    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployPhase::Validating => "validating",
            DeployPhase::Naming => "naming",
            DeployPhase::WritingParameters => "writing_parameters",
            DeployPhase::Extracting => "extracting",
            DeployPhase::AuthProbing => "auth_probing",
            DeployPhase::ProvisioningInit => "provisioning_init",
            DeployPhase::ProvisioningApply => "provisioning_apply",
            DeployPhase::FetchingCredential => "fetching_credential",
            DeployPhase::Uploading => "uploading",
            DeployPhase::QueryingOutputs => "querying_outputs",
            DeployPhase::ResolvingUrl => "resolving_url",
            DeployPhase::Cleanup => "cleanup",
            DeployPhase::Done => "done",
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
