#![forbid(unsafe_code)]

mod code;
mod definitions;
mod directory;
mod dispatch;
mod missions;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::dispatch_tool;
