pub mod committed;
pub mod ordinal;
