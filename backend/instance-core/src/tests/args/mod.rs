mod flag;
mod parser;
