mod election;
mod helpers;
mod server;
