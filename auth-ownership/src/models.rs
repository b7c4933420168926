use database_layer::{Child, FoodEntry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    List,
    Update,
    Delete,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Kind of record addressed by a request.
///
/// For `FoodEntry` with `Create` or `List` the addressed id is the parent
/// child's id; for every other food entry operation it is the entry's own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Child,
    FoodEntry,
}

impl ResourceKind {
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Child => "Child",
            ResourceKind::FoodEntry => "Food entry",
        }
    }

    /// Lower-case form used mid-sentence
    pub fn noun(self) -> &'static str {
        match self {
            ResourceKind::Child => "child",
            ResourceKind::FoodEntry => "food entry",
        }
    }

    /// Kind of record the id in an authorization request points at.
    ///
    /// Creating and listing food entries are addressed by their parent child.
    pub fn addressed_by(self, operation: Operation) -> ResourceKind {
        match (self, operation) {
            (ResourceKind::FoodEntry, Operation::Create | Operation::List) => ResourceKind::Child,
            (kind, _) => kind,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved record handed back with an allowed decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Child(Child),
    FoodEntry { entry: FoodEntry, child: Child },
}

impl Resource {
    pub fn child(&self) -> &Child {
        match self {
            Resource::Child(child) => child,
            Resource::FoodEntry { child, .. } => child,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed(Resource),
    /// The record exists and is addressable, but belongs to someone else
    Denied,
    /// Missing, or masked because it belongs to someone else
    NotFound,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Allowed(_) => "allowed",
            Decision::Denied => "denied",
            Decision::NotFound => "not_found",
        }
    }
}
