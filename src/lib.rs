#[allow(non_snake_case)]
pub mod Balancing;
#[allow(non_snake_case)]
pub mod Lookup;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
