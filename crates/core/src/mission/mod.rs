#![forbid(unsafe_code)]

mod evaluate;
mod progress;
mod rule;

pub use evaluate::*;
pub use progress::*;
pub use rule::*;

#[derive(Clone, Debug)]
pub struct Mission {
    pub id: i64,
    pub game_id: i64,
    pub order_index: i64,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub rule: MissionRule,
    pub hints: Vec<String>,
}
