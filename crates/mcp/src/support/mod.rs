#![forbid(unsafe_code)]

mod ai;
mod args;
mod jsonrpc;
mod time;

pub(crate) use ai::*;
pub(crate) use args::*;
pub(crate) use jsonrpc::*;
pub(crate) use self::time::*;
