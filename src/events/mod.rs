//! # Events Module
//!
//! Event-driven progress reporting for the sorting pipeline.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI, web) to subscribe and display progress. The engine only
//! emits facts about each processed file; formatting, feed generation
//! and external-command invocation belong to the subscribers.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! // In a separate thread, listen for events
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::FileProcessed { summary, .. } => println!("{}", summary.output_file_name),
//!             _ => {}
//!         }
//!     }
//! });
//!
//! // Run the processor with the sender
//! processor.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
