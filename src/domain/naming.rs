//! 资源组命名
//!
//! `rg-{owner}-{environment}-{storage}-{yyyymmdd}-{8 位十六进制}`，全部小写。
//! 唯一性依赖随机后缀，不做冲突检测

use chrono::{Local, NaiveDate};

use super::deploy::StorageAccountName;

/// 随机后缀长度
pub const SUFFIX_LEN: usize = 8;

/// 生成新的资源组名称（当天日期 + 随机后缀）
pub fn resource_group_name(owner: &str, environment: &str, storage: &StorageAccountName) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    compose(owner, environment, storage, Local::now().date_naive(), &token[..SUFFIX_LEN])
}

/// 用给定日期和后缀拼接名称
pub fn compose(
    owner: &str,
    environment: &str,
    storage: &StorageAccountName,
    date: NaiveDate,
    suffix: &str,
) -> String {
    format!(
        "rg-{}-{}-{}-{}-{}",
        owner,
        environment,
        storage,
        date.format("%Y%m%d"),
        suffix
    )
    .to_lowercase()
}
