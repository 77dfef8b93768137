pub mod cost;
pub mod health;
pub mod preset;
pub mod theme;
