pub mod atomic_writer;
pub mod store;

pub use atomic_writer::AtomicWriter;
pub use store::{JsonLayoutStore, LayoutStore, SavedLayout};
