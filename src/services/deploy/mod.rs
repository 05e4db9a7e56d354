//! 部署服务模块
//!
//! 编排一次静态站点部署：
//! 校验 → 命名 → 写参数文件 → 解压 → 登录检查 → terraform init/apply →
//! 获取存储密钥 → 上传 → 读取输出 → 解析 URL → 清理

pub mod archive;
pub mod azure;
pub mod context;
pub mod error;
pub mod terraform;
pub mod url;
pub mod workspace;

use std::path::Path;

use crate::domain::{
    naming, validate, DeployPhase, DeploymentForm, DeploymentRequest, DeploymentResult,
    ProvisioningParameters,
};
use crate::infra::ToolPaths;
use crate::state::AppState;

pub use context::DeployContext;
pub use error::{DeployError, ErrorKind, ProvisionStep};
pub use workspace::Workspace;

use azure::AzureCli;
use terraform::Terraform;
use url::UrlSource;

/// 执行一次部署
///
/// 工作区在所有路径上都会被删除；删除失败只记录日志，不覆盖原始错误
pub async fn execute(state: &AppState, form: DeploymentForm) -> Result<DeploymentResult, DeployError> {
    let mut ctx = DeployContext::new();

    let tools = state.tools.locate()?;
    let request = validate(form)?;

    ctx.enter(DeployPhase::Naming);
    let resource_group = naming::resource_group_name(
        &request.owner,
        &request.environment,
        &request.storage_account_name,
    );
    ctx.set_resource_group(&resource_group);

    // 参数文件与 terraform 状态目录是共享的，同一时刻只允许一个部署
    let _guard = state.deploy_lock.lock().await;

    let workspace = Workspace::create(&state.config.uploads_dir)?;
    tracing::debug!(workspace = %workspace.path().display(), "Workspace created");
    let result = run_pipeline(state, &tools, &request, &resource_group, &workspace, &mut ctx).await;
    let failed_phase = ctx.phase();

    ctx.enter(DeployPhase::Cleanup);
    workspace.close();

    match &result {
        Ok(deployment) => {
            ctx.enter(DeployPhase::Done);
            tracing::info!(
                resource_group = %resource_group,
                url = %deployment.url,
                total_ms = ctx.total_ms(),
                "Deployment successful"
            );
        }
        Err(e) => {
            tracing::error!(
                resource_group = %resource_group,
                phase = %failed_phase,
                kind = e.kind().as_str(),
                error = %e,
                "Deployment failed"
            );
        }
    }

    result
}

async fn run_pipeline(
    state: &AppState,
    tools: &ToolPaths,
    request: &DeploymentRequest,
    resource_group: &str,
    workspace: &Workspace,
    ctx: &mut DeployContext,
) -> Result<DeploymentResult, DeployError> {
    ctx.enter(DeployPhase::WritingParameters);
    let params = ProvisioningParameters::new(resource_group, request);
    write_parameters(&state.config.parameters_path(), &params).await?;

    ctx.enter(DeployPhase::Extracting);
    tokio::fs::write(workspace.archive_path(), &request.bundle.bytes).await?;
    let archive_path = workspace.archive_path();
    let extract_dir = workspace.extract_dir();
    let site_root = tokio::task::spawn_blocking(move || archive::extract_site(&archive_path, &extract_dir))
        .await
        .map_err(|e| DeployError::Unexpected(format!("extraction task failed: {}", e)))??;
    tracing::info!(site_root = %site_root.display(), "Site root located");

    let executor = state.executor.as_ref();
    let az = AzureCli::new(executor, &tools.az);
    let terraform = Terraform::new(executor, &tools.terraform, &state.config.terraform_dir);

    ctx.enter(DeployPhase::AuthProbing);
    az.probe_session().await?;

    ctx.enter(DeployPhase::ProvisioningInit);
    terraform.init().await?;

    ctx.enter(DeployPhase::ProvisioningApply);
    terraform.apply().await?;

    ctx.enter(DeployPhase::FetchingCredential);
    let key = az.storage_key(&request.storage_account_name).await?;

    ctx.enter(DeployPhase::Uploading);
    let upload_output = az
        .upload_batch(&request.storage_account_name, &key, &site_root)
        .await?;
    tracing::debug!(output = %upload_output, "Upload completed");

    ctx.enter(DeployPhase::QueryingOutputs);
    let outputs = terraform.outputs().await;

    ctx.enter(DeployPhase::ResolvingUrl);
    let resolved = url::resolve(
        outputs.as_deref(),
        &request.location,
        &request.storage_account_name,
    );
    if let UrlSource::Fallback(reason) = resolved.source {
        tracing::warn!(
            reason = reason.as_str(),
            url = %resolved.url,
            "static_site_url unavailable, using fallback URL"
        );
    }

    Ok(DeploymentResult {
        success: true,
        url_source: resolved.source_kind(),
        url: resolved.url,
        resource_group_name: resource_group.to_string(),
        storage_account_name: request.storage_account_name.to_string(),
    })
}

/// 写入 terraform.tfvars.json（每次部署覆盖）
async fn write_parameters(path: &Path, params: &ProvisioningParameters) -> Result<(), DeployError> {
    let json = serde_json::to_string_pretty(params)
        .map_err(|e| DeployError::Unexpected(format!("failed to encode parameters: {}", e)))?;
    tokio::fs::write(path, json).await.map_err(|e| {
        DeployError::Unexpected(format!("failed to write {}: {}", path.display(), e))
    })
}
