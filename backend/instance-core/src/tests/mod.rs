mod args;
mod config;
mod startup;
