//! Default export provider registrations for application bootstrap.

use std::sync::Arc;

use tagrove_storage::{Registration, StorageRegistry};

use crate::json::JsonExport;
use crate::pascal_voc::PascalVocExport;
use crate::provider::ExportProvider;
use crate::ExportRegistry;

/// Create the export registry with all known formats.
///
/// Export providers resolve each project's target connection through the
/// given storage registry, so bootstrap builds that registry first and
/// shares it here.
pub fn default_export_registry(storage: Arc<StorageRegistry>) -> ExportRegistry {
    let mut registry = ExportRegistry::new();

    let json_storage = Arc::clone(&storage);
    registry
        .register(Registration::new(
            "tagroveJson",
            "Tagrove JSON",
            "Single JSON file with all tagged regions",
            Arc::new(move || Box::new(JsonExport::new(Arc::clone(&json_storage))) as Box<dyn ExportProvider>),
        ))
        .expect("Failed to register JSON export provider");

    registry
        .register(Registration::new(
            "pascalVoc",
            "Pascal VOC",
            "Pascal VOC annotations and image sets",
            Arc::new(move || Box::new(PascalVocExport::new(Arc::clone(&storage))) as Box<dyn ExportProvider>),
        ))
        .expect("Failed to register Pascal VOC export provider");

    registry
}
