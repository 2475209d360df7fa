// Application layer - Use cases over the repository seam
pub mod charts;
pub mod chat;
pub mod compare;
pub mod explorer;
pub mod export;
pub mod insight;
pub mod market_repository;
pub mod session;
