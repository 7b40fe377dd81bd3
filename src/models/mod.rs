pub mod ticket;
pub mod webhook;
