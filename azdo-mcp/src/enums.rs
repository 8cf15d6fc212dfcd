//! Bridge between caller-facing enum labels and Azure DevOps enumerations
//!
//! Tool schemas advertise enumerations by label (`"Active"`,
//! `"QueueTimeDescending"`). Each enumeration is a closed Rust enum that
//! implements [`DomainEnum`]; the bridge functions below are total over it.
//!
//! Resolution keeps "no label given" apart from "label given": an omitted
//! label resolves to [`Resolved::Absent`] so the service applies its own
//! default, instead of this layer forcing the first variant onto the request.

use crate::error::{AzdoError, Result};
use std::fmt;

/// Label returned for an enumeration that declares no variants, so a schema
/// `enum` list is never empty
pub const PLACEHOLDER_LABEL: &str = "Values";

/// A named domain enumeration with an ordered label table
pub trait DomainEnum: Copy + PartialEq + fmt::Debug + 'static {
    /// Name of the enumeration, used in diagnostics
    const NAME: &'static str;

    /// Every (label, variant) pair in declaration order
    const VARIANTS: &'static [(&'static str, Self)];

    /// Numeric value the service uses for this variant
    fn value(self) -> i32;

    /// Spelling the REST API accepts in query strings and bodies
    fn query_token(self) -> &'static str;
}

/// Outcome of resolving an optional label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<E> {
    /// No label supplied; leave the field unset
    Absent,
    /// The declared variant for the supplied label
    Mapped(E),
    /// The supplied label is not declared by the enumeration
    Unmapped(String),
}

impl<E: DomainEnum> Resolved<E> {
    /// The mapped variant, if any
    pub fn mapped(self) -> Option<E> {
        match self {
            Resolved::Mapped(value) => Some(value),
            Resolved::Absent | Resolved::Unmapped(_) => None,
        }
    }

    /// Convert into the optional variant a request carries
    ///
    /// `Unmapped` can only come from a label that skipped validation; it is
    /// reported as a validation error for `field` rather than dropped.
    pub fn into_field(self, field: &str) -> Result<Option<E>> {
        match self {
            Resolved::Absent => Ok(None),
            Resolved::Mapped(value) => Ok(Some(value)),
            Resolved::Unmapped(label) => Err(unknown_label_error::<E>(field, &label)),
        }
    }
}

/// Every declared label, in declaration order; never empty
pub fn labels_of<E: DomainEnum>() -> Vec<&'static str> {
    if E::VARIANTS.is_empty() {
        return vec![PLACEHOLDER_LABEL];
    }
    E::VARIANTS.iter().map(|(label, _)| *label).collect()
}

/// Resolve an optional label without re-validating it
pub fn resolve<E: DomainEnum>(label: Option<&str>) -> Resolved<E> {
    match label {
        None => Resolved::Absent,
        Some(label) => E::VARIANTS
            .iter()
            .find(|(declared, _)| *declared == label)
            .map(|(_, value)| Resolved::Mapped(*value))
            .unwrap_or_else(|| Resolved::Unmapped(label.to_string())),
    }
}

/// The fallback variant: the first one declared
pub fn default_of<E: DomainEnum>() -> Option<E> {
    E::VARIANTS.first().map(|(_, value)| *value)
}

/// Label for a variant
pub fn label_of<E: DomainEnum>(value: E) -> &'static str {
    E::VARIANTS
        .iter()
        .find(|(_, declared)| *declared == value)
        .map(|(label, _)| *label)
        .unwrap_or(PLACEHOLDER_LABEL)
}

/// Schema-level membership check for an optional label argument
pub fn validate_label<E: DomainEnum>(field: &str, label: Option<&str>) -> Result<()> {
    match label {
        Some(label) if !E::VARIANTS.iter().any(|(declared, _)| *declared == label) => {
            Err(unknown_label_error::<E>(field, label))
        }
        _ => Ok(()),
    }
}

/// JSON schema fragment for a label argument
pub fn schema_for<E: DomainEnum>(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": labels_of::<E>(),
        "description": description
    })
}

fn unknown_label_error<E: DomainEnum>(field: &str, label: &str) -> AzdoError {
    AzdoError::validation(
        field,
        format!(
            "'{label}' is not a valid {}; expected one of: {}",
            E::NAME,
            labels_of::<E>().join(", ")
        ),
    )
}

/// Declares a closed enumeration with its label, numeric value and REST token
macro_rules! domain_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident = $value:expr, $token:literal; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl DomainEnum for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [(&'static str, Self)] = &[
                $( (stringify!($variant), $name::$variant), )*
            ];

            fn value(self) -> i32 {
                match self {
                    $( $name::$variant => $value, )*
                }
            }

            fn query_token(self) -> &'static str {
                match self {
                    $( $name::$variant => $token, )*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(label_of(*self))
            }
        }
    };
}

domain_enum! {
    /// Pull request status filter
    PullRequestStatus {
        NotSet = 0, "notSet";
        Active = 1, "active";
        Abandoned = 2, "abandoned";
        Completed = 3, "completed";
        All = 4, "all";
    }
}

domain_enum! {
    /// How a Git version string is interpreted
    GitVersionType {
        Branch = 0, "branch";
        Tag = 1, "tag";
        Commit = 2, "commit";
    }
}

domain_enum! {
    /// Recursion depth when fetching repository items
    VersionControlRecursionType {
        None = 0, "none";
        OneLevel = 1, "oneLevel";
        OneLevelPlusNestedEmptyFolders = 4, "oneLevelPlusNestedEmptyFolders";
        Full = 120, "full";
    }
}

domain_enum! {
    /// Sort order for build definition listings
    DefinitionQueryOrder {
        None = 0, "none";
        LastModifiedAscending = 1, "lastModifiedAscending";
        LastModifiedDescending = 2, "lastModifiedDescending";
        DefinitionNameAscending = 3, "definitionNameAscending";
        DefinitionNameDescending = 4, "definitionNameDescending";
    }
}

domain_enum! {
    /// Sort order for build listings
    BuildQueryOrder {
        FinishTimeAscending = 2, "finishTimeAscending";
        FinishTimeDescending = 3, "finishTimeDescending";
        QueueTimeDescending = 4, "queueTimeDescending";
        QueueTimeAscending = 5, "queueTimeAscending";
        StartTimeDescending = 6, "startTimeDescending";
        StartTimeAscending = 7, "startTimeAscending";
    }
}

domain_enum! {
    /// Build status filter
    BuildStatus {
        None = 0, "none";
        InProgress = 1, "inProgress";
        Completed = 2, "completed";
        Cancelling = 4, "cancelling";
        Postponed = 8, "postponed";
        NotStarted = 32, "notStarted";
        All = 47, "all";
    }
}

domain_enum! {
    /// Build result filter
    BuildResult {
        None = 0, "none";
        Succeeded = 2, "succeeded";
        PartiallySucceeded = 4, "partiallySucceeded";
        Failed = 8, "failed";
        Canceled = 32, "canceled";
    }
}

domain_enum! {
    /// Why a build was queued
    BuildReason {
        None = 0, "none";
        Manual = 1, "manual";
        IndividualCI = 2, "individualCI";
        BatchedCI = 4, "batchedCI";
        Schedule = 8, "schedule";
        ScheduleForced = 16, "scheduleForced";
        UserCreated = 32, "userCreated";
        ValidateShelveset = 64, "validateShelveset";
        CheckInShelveset = 128, "checkInShelveset";
        PullRequest = 256, "pullRequest";
        BuildCompletion = 512, "buildCompletion";
        ResourceTrigger = 1024, "resourceTrigger";
        Triggered = 1967, "triggered";
        All = 2031, "all";
    }
}

domain_enum! {
    /// Whether deleted builds are included
    QueryDeletedOption {
        ExcludeDeleted = 0, "excludeDeleted";
        IncludeDeleted = 1, "includeDeleted";
        OnlyDeleted = 2, "onlyDeleted";
    }
}

domain_enum! {
    /// Requested change to a build stage
    StageUpdateType {
        Cancel = 0, "cancel";
        Retry = 1, "retry";
    }
}
