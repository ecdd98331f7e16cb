mod gaussian;
mod mini;
mod timestamp;

pub use mini::PhyphoxMock;
