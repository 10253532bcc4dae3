// src/utils/mod.rs
pub mod vsimem;
