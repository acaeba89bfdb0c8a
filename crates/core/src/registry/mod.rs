//! Class-root and field-override tables consulted by the projector.

pub mod defaults;
pub mod types;

pub use defaults::default_registry;
pub use types::{
    AttributePair, ClassRoot, CreateElement, FieldEffect, FieldOverride, OverrideRegistry,
    RootCondition, Target,
};
