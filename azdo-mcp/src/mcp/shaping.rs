//! Response shaping
//!
//! List results are cut down to the handful of fields a caller needs. A
//! [`Projection`] is a table of `(output key, source path)` pairs; both sides
//! may be dotted, so `("definition.name", "definition.name")` keeps the nested
//! shape and `("createdBy", "createdBy.displayName")` flattens it.
//!
//! Fields missing from the source record are omitted, not emitted as `null`.

use serde_json::{Map, Value};

/// A record shape
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    fields: &'static [(&'static str, &'static str)],
}

impl Projection {
    /// Build a projection from `(output key, source path)` pairs
    pub const fn new(fields: &'static [(&'static str, &'static str)]) -> Self {
        Self { fields }
    }

    /// Shape one record
    pub fn apply(&self, record: &Value) -> Value {
        let mut shaped = Map::new();
        for (key, path) in self.fields {
            if let Some(value) = lookup(record, path) {
                insert_at(&mut shaped, key, value.clone());
            }
        }
        Value::Object(shaped)
    }

    /// Shape every record into a JSON array
    pub fn apply_all(&self, records: &[Value]) -> Value {
        Value::Array(records.iter().map(|record| self.apply(record)).collect())
    }
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, key| value.get(key))
}

fn insert_at(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(map) = child {
                insert_at(map, rest, value);
            }
        }
    }
}

/// Projects
pub const PROJECT: Projection = Projection::new(&[
    ("id", "id"),
    ("name", "name"),
    ("description", "description"),
    ("state", "state"),
    ("visibility", "visibility"),
    ("lastUpdateTime", "lastUpdateTime"),
]);

/// Git repositories
pub const REPOSITORY: Projection = Projection::new(&[
    ("id", "id"),
    ("name", "name"),
    ("url", "url"),
    ("defaultBranch", "defaultBranch"),
    ("remoteUrl", "remoteUrl"),
]);

/// Pull requests
pub const PULL_REQUEST: Projection = Projection::new(&[
    ("pullRequestId", "pullRequestId"),
    ("title", "title"),
    ("description", "description"),
    ("status", "status"),
    ("creationDate", "creationDate"),
    ("createdBy", "createdBy.displayName"),
    ("sourceRefName", "sourceRefName"),
    ("targetRefName", "targetRefName"),
    ("url", "url"),
]);

/// Build definitions
pub const BUILD_DEFINITION: Projection = Projection::new(&[
    ("id", "id"),
    ("name", "name"),
    ("path", "path"),
    ("revision", "revision"),
    ("queueStatus", "queueStatus"),
    ("createdDate", "createdDate"),
    ("project.id", "project.id"),
    ("project.name", "project.name"),
]);

/// Build definition revisions
pub const DEFINITION_REVISION: Projection = Projection::new(&[
    ("revision", "revision"),
    ("changedDate", "changedDate"),
    ("changeType", "changeType"),
    ("changedBy", "changedBy.displayName"),
    ("comment", "comment"),
]);

/// Builds
pub const BUILD: Projection = Projection::new(&[
    ("id", "id"),
    ("buildNumber", "buildNumber"),
    ("status", "status"),
    ("result", "result"),
    ("queueTime", "queueTime"),
    ("startTime", "startTime"),
    ("finishTime", "finishTime"),
    ("sourceBranch", "sourceBranch"),
    ("sourceVersion", "sourceVersion"),
    ("definition.id", "definition.id"),
    ("definition.name", "definition.name"),
    ("requestedFor", "requestedFor.displayName"),
]);

/// A single build's status
pub const BUILD_STATUS: Projection = Projection::new(&[
    ("id", "id"),
    ("buildNumber", "buildNumber"),
    ("status", "status"),
    ("result", "result"),
    ("queueTime", "queueTime"),
    ("startTime", "startTime"),
    ("finishTime", "finishTime"),
    ("definition.id", "definition.id"),
    ("definition.name", "definition.name"),
]);

/// Build log metadata
pub const BUILD_LOG: Projection = Projection::new(&[
    ("id", "id"),
    ("type", "type"),
    ("lineCount", "lineCount"),
    ("createdOn", "createdOn"),
    ("lastChangedOn", "lastChangedOn"),
    ("url", "url"),
]);

/// Changes associated with a build
pub const BUILD_CHANGE: Projection = Projection::new(&[
    ("id", "id"),
    ("message", "message"),
    ("type", "type"),
    ("author", "author.displayName"),
    ("timestamp", "timestamp"),
    ("location", "location"),
]);

/// Pipeline runs
pub const PIPELINE_RUN: Projection = Projection::new(&[
    ("id", "id"),
    ("name", "name"),
    ("state", "state"),
    ("result", "result"),
    ("createdDate", "createdDate"),
    ("finishedDate", "finishedDate"),
    ("pipeline.id", "pipeline.id"),
    ("pipeline.name", "pipeline.name"),
]);
