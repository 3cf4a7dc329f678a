pub mod generator;

pub use generator::{generate_projection, ProjectionPoint, ProjectionSeries};
