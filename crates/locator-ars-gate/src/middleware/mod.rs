//! Middleware enforcing access decisions on routes.

pub mod layer;

pub use layer::{RequireActionLayer, RequireActionMiddleware};
