mod coordinator;
mod error;
