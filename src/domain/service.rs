// ==========================================
// 医院产能看板 - 单元 / 服务 / 服务分组
// ==========================================
// 生命周期: 只读，单次报表请求内不可变
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Unit - 医院单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
}

// ==========================================
// Service - 服务 (natureza)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub unit_id: i64,
    pub group_id: Option<i64>,
    pub name: String,          // 展示名 (natureza)
    pub static_target: i64,    // 静态 pactuado，NULL 视为 0
}

// ==========================================
// ServiceGroup - 服务分组
// ==========================================
// 仅用于展示分组，无行为
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub id: i64,
    pub name: String,
    pub color: String,
}
