mod client;

pub use client::{CloudGenerator, Generator, MockGenerator};
