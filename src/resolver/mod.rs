//! Query resolution: the engine, its builtins and arithmetic.

mod builtins;
mod machine;
mod math;
mod resolver;
mod stream;

pub use builtins::{default_builtins, Builtin};
pub use math::{evaluate, MathError};
pub use resolver::{Resolver, ResolverConfig, Solutions, FRESH_VAR_PREFIX};
pub use stream::{QueryResult, QueryStream, ResolveError};
