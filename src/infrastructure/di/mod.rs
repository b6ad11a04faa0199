//! Dependency injection: bean container and per-run service container

mod beans;
mod service_container;

pub use beans::{Bean, BeanContainer};
pub use service_container::ServiceContainer;
