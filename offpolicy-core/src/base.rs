//! Core interfaces of the training loop.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use step::Step;
