pub mod feature;
pub mod panel;
pub mod types;

// Re-export commonly used types
pub use feature::GenomeFeature;
pub use panel::{build_reference_panel, PanelSequence};
pub use types::SequenceSet;
