//! The Javelin program model.
//!
//! An in-memory `Program` → `Package` → `Class` → {`Field`, `Method`}
//! structure extracted from parsed source, scoped to a single refactoring
//! invocation. Entities are created once by the builder, carry the exact
//! token ranges needed for later slicing, and are never mutated afterwards;
//! only the underlying text changes, via the rewrite engine.

mod builder;
mod file_info;
mod program;

pub use builder::build_program;
pub use file_info::FileInfo;
pub use program::{
    BodyItem, Class, ExpressionName, Field, LocalVariable, Method, Modifier, Package, Program,
};
