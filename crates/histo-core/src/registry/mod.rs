use crate::domain::{HistoError, HistoResult};
use crate::property::{WorkspaceRef, downcast_workspace};
use crate::workspace::Workspace;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store of named workspaces shared between algorithm runs.
///
/// Passed by reference to whatever needs it; there is no global instance.
pub trait WorkspaceRegistry {
    /// Adds a workspace under a new name.
    fn add(&mut self, name: &str, workspace: WorkspaceRef) -> HistoResult<()>;

    fn add_or_replace(&mut self, name: &str, workspace: WorkspaceRef) -> HistoResult<()>;

    fn retrieve(&self, name: &str) -> HistoResult<WorkspaceRef>;

    fn remove(&mut self, name: &str) -> HistoResult<WorkspaceRef>;

    fn does_exist(&self, name: &str) -> bool;

    fn names(&self) -> Vec<String>;
}

/// Retrieves `name` from `registry` as a concrete workspace type.
pub fn retrieve_as<W: Workspace>(
    registry: &dyn WorkspaceRegistry,
    name: &str,
) -> HistoResult<Arc<W>> {
    downcast_workspace(registry.retrieve(name)?, name)
}

#[derive(Debug, Default)]
pub struct InMemoryWorkspaceRegistry {
    workspaces: BTreeMap<String, WorkspaceRef>,
}

impl InMemoryWorkspaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn clear(&mut self) {
        self.workspaces.clear();
    }
}

impl WorkspaceRegistry for InMemoryWorkspaceRegistry {
    fn add(&mut self, name: &str, workspace: WorkspaceRef) -> HistoResult<()> {
        let name = validated_name(name)?;
        if self.workspaces.contains_key(name) {
            return Err(HistoError::logic(
                "REGISTRY.DUPLICATE_NAME",
                format!("a workspace named '{name}' already exists"),
            ));
        }
        self.add_or_replace(name, workspace)
    }

    fn add_or_replace(&mut self, name: &str, workspace: WorkspaceRef) -> HistoResult<()> {
        let name = validated_name(name)?;
        tracing::debug!(name, workspace = workspace.id(), "registering workspace");
        self.workspaces.insert(name.to_string(), workspace);
        Ok(())
    }

    fn retrieve(&self, name: &str) -> HistoResult<WorkspaceRef> {
        self.workspaces
            .get(name.trim())
            .cloned()
            .ok_or_else(|| unknown_workspace(name))
    }

    fn remove(&mut self, name: &str) -> HistoResult<WorkspaceRef> {
        let removed = self
            .workspaces
            .remove(name.trim())
            .ok_or_else(|| unknown_workspace(name))?;
        tracing::debug!(name, "removed workspace");
        Ok(removed)
    }

    fn does_exist(&self, name: &str) -> bool {
        self.workspaces.contains_key(name.trim())
    }

    fn names(&self) -> Vec<String> {
        self.workspaces.keys().cloned().collect()
    }
}

fn validated_name(name: &str) -> HistoResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HistoError::invalid_argument(
            "REGISTRY.EMPTY_NAME",
            "workspace names must not be empty",
        ));
    }
    Ok(trimmed)
}

fn unknown_workspace(name: &str) -> HistoError {
    HistoError::not_found(
        "REGISTRY.UNKNOWN_NAME",
        format!("no workspace named '{name}'"),
    )
}
