mod coordinator;
mod protocol;
