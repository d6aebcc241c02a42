use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Group document exactly as the external store hands it over. Every field
/// is optional and amounts stay untyped; [`crate::normalize`] turns this into
/// a validated [`smartsplit_domain::Group`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    pub id: Option<String>,
    pub name: Option<String>,
    pub members: Option<Vec<RawMember>>,
    pub expenses: Option<Vec<RawExpense>>,
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    pub id: Option<String>,
    pub name: Option<String>,
    pub added_at: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExpense {
    pub id: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub total_amount: Option<Value>,
    pub paid_by: Option<String>,
    pub member_expenses: Option<BTreeMap<String, Value>>,
    pub created_at: Option<String>,
}
