// Register mapping
//
// Physical registers are reached by mapping the page that holds them from
// the memory device. Only one page is kept mapped at a time; moving to a
// register on another page unmaps the old one first.
//
// The backend sits behind `PhysicalMemory`, so the mapper can run against
// simulated memory in tests.
pub mod devmem;
pub mod error;
pub mod mapper;
pub mod shared;

pub use devmem::*;
pub use error::MapError;
pub use mapper::*;
pub use shared::*;
