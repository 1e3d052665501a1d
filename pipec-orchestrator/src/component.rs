//! Component trait definitions
//!
//! This module defines the base `Component` trait shared by every
//! orchestrator component (loaders, transforms, emitters).

use std::fmt;

/// The kind of component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Loader: reads files into the pipeline
    Loader,
    /// Transform: rewrites files flowing through the pipeline
    Transform,
    /// Emitter: writes files out of the pipeline
    Emitter,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Loader => write!(f, "loader"),
            ComponentKind::Transform => write!(f, "transform"),
            ComponentKind::Emitter => write!(f, "emitter"),
        }
    }
}

/// Metadata about a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    /// The component name, used to label its errors
    pub name: String,
    /// The component version
    pub version: &'static str,
    /// The kind of component
    pub kind: ComponentKind,
    /// Optional description
    pub description: Option<&'static str>,
}

impl ComponentMetadata {
    /// Create new metadata
    pub fn new(
        name: impl Into<String>,
        version: &'static str,
        kind: ComponentKind,
        description: Option<&'static str>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            kind,
            description,
        }
    }
}

/// The base trait for all orchestrator components
pub trait Component: Send + Sync {
    /// Get the component metadata
    fn metadata(&self) -> ComponentMetadata;
}

/// Helper methods for components
pub trait ComponentExt: Component {
    /// Check if this component is of the given kind
    fn is_kind(&self, kind: ComponentKind) -> bool {
        self.metadata().kind == kind
    }

    /// Get the component name
    fn name(&self) -> String {
        self.metadata().name
    }
}

impl<T: Component + ?Sized> ComponentExt for T {}
