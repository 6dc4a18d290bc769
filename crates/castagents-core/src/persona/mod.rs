//! Persona registry: the static catalogue of agent personas.

pub mod registry;

pub use registry::PersonaRegistry;
