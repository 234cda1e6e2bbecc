//! # Core Module
//!
//! The UI-agnostic file sorting engine.
//!
//! ## Modules
//! - `matcher` - Filename pattern matching primitives
//! - `classifier` - Assigns each file to a content class
//! - `resolver` - Works out the destination folder and final file name
//! - `mover` - Places files and applies fate policies
//! - `scanner` - Discovers files in the watched input folders
//! - `processor` - Orchestrates the full run

pub mod classifier;
pub mod matcher;
pub mod mover;
pub mod processor;
pub mod resolver;
pub mod scanner;

// Re-export commonly used types
pub use classifier::{Classification, Classifier, Criteria};
pub use mover::{FileOrganizer, PlacementAction, Summary};
pub use processor::Processor;
pub use resolver::{Destination, DestinationResolver};
pub use scanner::InputScanner;
