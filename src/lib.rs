//! Tic-tac-toe agents trained by model-based reinforcement learning.
//!
//! The core is a pair of dynamic-programming solvers, value iteration
//! and policy iteration, that enumerate every board reachable by legal
//! play and converge an expected-value table (and, for policy
//! iteration, an action table) against an explicit opponent transition
//! model. Around the core sit the stochastic rule-based opponents the
//! solvers model, an interactive agent, and a match-running CLI.

pub mod board;
pub mod cli;
pub mod display;
pub mod error;
pub mod export;
pub mod human;
pub mod matchup;
pub mod mdp;
pub mod model;
pub mod policy_iteration;
pub mod rule_agents;
pub mod value_iteration;
