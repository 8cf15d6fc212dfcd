//! Tool implementations, one submodule per tool group
//!
//! Each tool lives in its own directory with a `description.md` that becomes
//! its MCP description.

pub mod git;
pub mod organizations;
pub mod pipelines;

use crate::enums::{resolve, validate_label, DomainEnum};
use crate::error::Result;
use serde_json::{json, Value};

/// Schema fragment for the `organization` argument
pub(crate) fn organization_property() -> Value {
    json!({
        "type": "string",
        "description": "Azure DevOps organization name, as listed by list_organizations"
    })
}

/// Schema fragment for the `project` argument
pub(crate) fn project_property() -> Value {
    json!({
        "type": "string",
        "description": "Project name or ID"
    })
}

/// Check an optional enum label and map it to its variant
pub(crate) fn enum_argument<E: DomainEnum>(field: &str, label: Option<&str>) -> Result<Option<E>> {
    validate_label::<E>(field, label)?;
    resolve::<E>(label).into_field(field)
}
