//! PokeAPI response models
//!
//! Only the fields the REPL displays are decoded; everything else in the
//! API's JSON is ignored.

pub mod location;
pub mod pokemon;

// Re-export commonly used types
pub use location::{LocationArea, LocationPage, NamedResource, PokemonEncounter};
pub use pokemon::Pokemon;
