pub mod batch_registry;
pub mod extractor;
pub mod file_validator;
pub mod intake;
pub mod remote_extractor;
pub mod result_exporter;
pub mod simulated_extractor;

pub use batch_registry::BatchRegistry;
pub use extractor::{ExtractionJob, Extractor};
pub use file_validator::FileValidator;
pub use intake::{intake, IntakeReport, Rejection};
pub use remote_extractor::RemoteExtractor;
pub use result_exporter::{ExportEntry, ExportPayload, ResultExporter};
pub use simulated_extractor::SimulatedExtractor;
