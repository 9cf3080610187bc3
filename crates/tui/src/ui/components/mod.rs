//! UI components: the server views and the shared widgets they use.

pub mod common;
pub mod component;
pub mod servers;

pub(crate) use component::Component;
