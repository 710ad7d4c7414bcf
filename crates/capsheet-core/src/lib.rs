// Library root for the salary-cap analysis engine.
//
// Data flows one way: raw records -> record (field parsing) -> unit
// classification -> analysis (per player) -> team aggregate + timeline.
// Nothing in this crate performs I/O.

pub mod analysis;
pub mod config;
pub mod money;
pub mod pipeline;
pub mod record;
pub mod team;
pub mod timeline;
pub mod unit;
