mod catalog;
mod definitions;
pub mod error;
mod registry;
mod specialize;
pub mod ty;
mod validate;

pub use catalog::{ClassBuilder, ClassDef, ClassIndex, MethodDef, VariableDef};
pub use definitions::{Definitions, InstantiationCache};
pub use error::{ErrorKind, SemaError, SemaResult};
pub use registry::TypeRegistry;
pub use specialize::{specialize, Substitution};
pub use ty::{create_default_value, create_value, Raw, Type, Value};
pub use validate::{check_has_main_class, MAIN_CLASS, MAIN_METHOD};
