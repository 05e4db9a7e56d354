//! 部署请求校验
//!
//! 纯函数，无副作用。按顺序检查，第一个失败即返回

use thiserror::Error;

use super::deploy::{DeploymentForm, DeploymentRequest, StorageAccountName};

/// 站点包必须使用的扩展名
pub const BUNDLE_EXTENSION: &str = ".zip";

/// 请求校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing one or more required fields")]
    MissingFields,

    #[error("Invalid storage account name. Must be 3-24 characters, lowercase letters and numbers only.")]
    InvalidStorageName,

    #[error("Please upload a valid ZIP file")]
    InvalidBundleType,
}

/// 校验表单并转换为 [`DeploymentRequest`]
pub fn validate(form: DeploymentForm) -> Result<DeploymentRequest, ValidationError> {
    let DeploymentForm {
        location,
        environment,
        owner,
        storage_account_name,
        bundle,
    } = form;

    let (Some(location), Some(environment), Some(owner), Some(storage_account_name), Some(bundle)) = (
        non_empty(location),
        non_empty(environment),
        non_empty(owner),
        non_empty(storage_account_name),
        bundle.filter(|b| !b.is_empty()),
    ) else {
        return Err(ValidationError::MissingFields);
    };

    let storage_account_name = StorageAccountName::parse(&storage_account_name)
        .ok_or(ValidationError::InvalidStorageName)?;

    if !bundle.filename.ends_with(BUNDLE_EXTENSION) {
        return Err(ValidationError::InvalidBundleType);
    }

    Ok(DeploymentRequest {
        location,
        environment,
        owner,
        storage_account_name,
        bundle,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
