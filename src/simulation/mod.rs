pub mod client;
pub mod countries;
pub mod error;
pub mod otp;
pub mod replies;

pub use client::Simulator;
