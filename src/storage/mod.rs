//! Almacenamiento
//!
//! Contratos de los backends (hojas de cálculo y archivos), mapeo de
//! cabeceros y los tipos de fila compartidos por los repositorios.

pub mod backend;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod record;
pub mod schema;

pub use backend::{FileStorage, SheetBackend};
#[cfg(any(test, feature = "test-support"))]
pub use memory::{MemoryBackend, RecordingStorage};
pub use record::{CellValue, Record, RowData};
pub use schema::TableSchema;
