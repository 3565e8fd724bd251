pub mod entity;
pub mod shared_str;
pub mod types;

pub use entity::{Entity, Lifespan, Year, format_year};
pub use shared_str::SharedStr;
pub use types::{LaidOutEntity, Piece, Segment, SegmentKind, Tick, TickKind, TickPlan};
