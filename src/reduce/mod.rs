//! Reducers over a stream of alignment hits
//!
//! Both reducers are `HitSink`s: they consume hits one at a time and expose
//! only their final result.

pub mod bbh;
pub mod best_hit;

pub use bbh::{BbhReducer, OrthologPair};
pub use best_hit::BestHitReducer;
