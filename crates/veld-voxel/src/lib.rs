//! Voxel-level vocabulary shared by terrain generation and its consumers:
//! block/fluid identifiers and catalogs, per-voxel [`Content`], world
//! positions, and the [`Section`] storage that decoration and structure
//! placement write into.

mod catalog;
mod content;
mod position;
mod section;

pub use catalog::{BlockCatalog, BlockDef, CatalogError, FluidCatalog, FluidDef};
pub use content::{BlockId, Content, FluidFill, FluidId, FluidLevel};
pub use position::{CHUNK_FOOTPRINT, ChunkPos, SECTION_SIZE, SectionPos};
pub use section::Section;
