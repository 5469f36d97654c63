// src/core/mod.rs

pub mod composer;
pub mod converter;
pub mod engine;
pub mod features;
pub mod modifiers;
pub mod text;
pub mod types;
