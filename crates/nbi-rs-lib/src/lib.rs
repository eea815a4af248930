pub mod error;
pub use error::Result;
pub use error::Error;

pub mod registry;
pub use registry::Registry;
pub use registry::NodeId;

pub mod config;
pub use config::RegistryOptions;

pub mod validation;
pub use validation::ValidationError;

pub mod dependents;
pub mod filter;
pub mod scheduler;
pub mod document;
pub mod state;
pub mod installation;
pub mod initialization;
