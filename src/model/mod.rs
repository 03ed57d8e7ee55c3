// src/model/mod.rs

//! Plain data the engine works on.
//!
//! - [`axis`]: axes, their values and alias tokens.
//! - [`config`]: one immutable point of the matrix.
//! - [`command`]: commands, command builders and command results.
//! - [`action`]: actions and the resumable step protocol they implement.

pub mod action;
pub mod axis;
pub mod command;
pub mod config;

pub use action::{Action, ActionLogic, CommandSequence, FnSequence, Sequence, Step, steps};
pub use axis::{Axis, AxisValue, Token, compile_pattern};
pub use command::{Command, CommandBuilder, CommandResult};
pub use config::{Assignment, Config};
