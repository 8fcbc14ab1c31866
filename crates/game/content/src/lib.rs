//! Data-driven content definitions and loaders.
//!
//! This crate houses the content a run draws from:
//! - Hero, gear, upgrade and shrine definitions ([`catalog`])
//! - A built-in catalog used when no data directory is given ([`builtin`])
//! - Game configuration (data-driven via TOML)
//! - Content catalogs (data-driven via RON)
//!
//! Every definition is expressed with delve-core modifier types, so loaded
//! content feeds the modifier engine directly.

pub mod builtin;
pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{Catalog, GearDef, GearSlot, HeroDef, HookSpec, ShrineDef, UpgradeDef};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LoadResult};
