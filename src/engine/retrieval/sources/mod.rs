//! One adapter per external information source.

pub mod chat;
pub mod demo;
pub mod encyclopedic;
pub mod generative;

pub use chat::ChatSource;
pub use demo::DemoSource;
pub use encyclopedic::EncyclopedicSource;
pub use generative::GenerativeSource;

#[cfg(test)]
mod tests;
