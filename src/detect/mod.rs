mod backend;
pub mod backends;
mod filter;
pub mod parse;
mod result;
mod service;

pub use backend::GroundingBackend;
pub use backends::{StubBackend, StubReply};
pub use filter::ButtonFilter;
pub use result::{BoundingBox, ButtonHit, Grounding, LabeledBox, Point};
pub use service::GroundingService;
