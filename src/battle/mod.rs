pub mod action;
pub mod ai;
pub mod calculators;
pub mod engine;
pub mod move_effects;
pub mod observation;
pub mod rng;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;
