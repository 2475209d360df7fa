// Domain layer - Pure types and derivations
pub mod catalog;
pub mod chart;
pub mod chat;
pub mod filters;
pub mod market;
