//! Name-keyed workspace properties with type-checked retrieval.
//!
//! Algorithms declare the workspaces they consume and produce as named slots.
//! Each slot holds a shared reference to a workspace whose lifetime is owned
//! elsewhere (usually a [`WorkspaceRegistry`]); retrieving a slot downcasts to
//! the concrete workspace type the caller asks for.

use crate::domain::{Direction, HistoError, HistoResult};
use crate::registry::WorkspaceRegistry;
use crate::workspace::Workspace;
use std::collections::HashMap;
use std::sync::Arc;

pub type WorkspaceRef = Arc<dyn Workspace>;

#[derive(Debug, Clone)]
pub struct WorkspaceProperty {
    name: String,
    direction: Direction,
    value: Option<WorkspaceRef>,
}

impl WorkspaceProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub fn value(&self) -> Option<&WorkspaceRef> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// The set of workspace properties declared by one owner.
///
/// Property names are matched case-insensitively and keep their declaration
/// order.
#[derive(Debug, Default)]
pub struct PropertyManager {
    properties: Vec<WorkspaceProperty>,
    index: HashMap<String, usize>,
}

impl PropertyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare<W: Workspace>(
        &mut self,
        name: &str,
        workspace: Option<Arc<W>>,
        direction: Direction,
    ) -> HistoResult<()> {
        self.declare_ref(name, workspace.map(|w| w as WorkspaceRef), direction)
    }

    pub fn declare_ref(
        &mut self,
        name: &str,
        workspace: Option<WorkspaceRef>,
        direction: Direction,
    ) -> HistoResult<()> {
        let key = property_key(name)?;
        if self.index.contains_key(&key) {
            return Err(HistoError::logic(
                "PROPERTY.DUPLICATE_NAME",
                format!("property '{name}' is already declared"),
            ));
        }

        tracing::debug!(property = name, %direction, set = workspace.is_some(), "declaring workspace property");
        self.index.insert(key, self.properties.len());
        self.properties.push(WorkspaceProperty {
            name: name.to_string(),
            direction,
            value: workspace,
        });
        Ok(())
    }

    pub fn set<W: Workspace>(&mut self, name: &str, workspace: Arc<W>) -> HistoResult<()> {
        self.set_ref(name, workspace)
    }

    pub fn set_ref(&mut self, name: &str, workspace: WorkspaceRef) -> HistoResult<()> {
        let property = self.property_mut(name)?;
        tracing::debug!(property = name, workspace = workspace.id(), "setting workspace property");
        property.value = Some(workspace);
        Ok(())
    }

    /// Workspace held by `name`, downcast to `W`.
    pub fn retrieve<W: Workspace>(&self, name: &str) -> HistoResult<Arc<W>> {
        downcast_workspace(self.retrieve_ref(name)?, name)
    }

    pub fn retrieve_ref(&self, name: &str) -> HistoResult<WorkspaceRef> {
        self.property(name)?.value.clone().ok_or_else(|| {
            HistoError::not_found(
                "PROPERTY.UNSET",
                format!("property '{name}' has no workspace set"),
            )
        })
    }

    pub fn property(&self, name: &str) -> HistoResult<&WorkspaceProperty> {
        let index = self.position(name)?;
        Ok(&self.properties[index])
    }

    pub fn direction(&self, name: &str) -> HistoResult<Direction> {
        Ok(self.property(name)?.direction)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.property(name).is_ok_and(WorkspaceProperty::is_set)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(WorkspaceProperty::name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Fills input properties from registry entries, given as
    /// `(property name, workspace name)` pairs.
    pub fn load_inputs(
        &mut self,
        registry: &dyn WorkspaceRegistry,
        bindings: &[(&str, &str)],
    ) -> HistoResult<()> {
        for (property_name, workspace_name) in bindings {
            let direction = self.direction(property_name)?;
            if !direction.accepts_input() {
                return Err(HistoError::logic(
                    "PROPERTY.DIRECTION",
                    format!("property '{property_name}' is an {direction} property"),
                ));
            }
            let workspace = registry.retrieve(workspace_name)?;
            self.set_ref(property_name, workspace)?;
        }
        Ok(())
    }

    /// Publishes output properties into the registry under the given names.
    pub fn store_outputs(
        &self,
        registry: &mut dyn WorkspaceRegistry,
        bindings: &[(&str, &str)],
    ) -> HistoResult<()> {
        for (property_name, workspace_name) in bindings {
            let direction = self.direction(property_name)?;
            if !direction.produces_output() {
                return Err(HistoError::logic(
                    "PROPERTY.DIRECTION",
                    format!("property '{property_name}' is an {direction} property"),
                ));
            }
            registry.add_or_replace(workspace_name, self.retrieve_ref(property_name)?)?;
        }
        Ok(())
    }

    fn position(&self, name: &str) -> HistoResult<usize> {
        self.index
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| {
                HistoError::not_found(
                    "PROPERTY.UNKNOWN_NAME",
                    format!("unknown property '{name}'"),
                )
            })
    }

    fn property_mut(&mut self, name: &str) -> HistoResult<&mut WorkspaceProperty> {
        let index = self.position(name)?;
        Ok(&mut self.properties[index])
    }
}

/// Checked downcast of a shared workspace to its concrete type.
pub fn downcast_workspace<W: Workspace>(workspace: WorkspaceRef, name: &str) -> HistoResult<Arc<W>> {
    let actual = workspace.id();
    workspace.into_any().downcast::<W>().map_err(|_| {
        HistoError::not_found(
            "PROPERTY.WRONG_TYPE",
            format!(
                "'{name}' holds a {actual}, not a {}",
                std::any::type_name::<W>()
            ),
        )
    })
}

fn property_key(name: &str) -> HistoResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HistoError::invalid_argument(
            "PROPERTY.EMPTY_NAME",
            "property names must not be empty",
        ));
    }
    Ok(trimmed.to_lowercase())
}
