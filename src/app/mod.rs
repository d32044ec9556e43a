pub mod bootstrap;
pub mod pipelines;
