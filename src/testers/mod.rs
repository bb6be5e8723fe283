//! The six defect detectors (§4.2). Expressed as a flat set of standalone
//! functions rather than a trait object set — the page driver enumerates
//! them explicitly, and several need to attach CDP listeners of their own
//! shape before navigating, which a single shared `(page, url)` signature
//! would only get in the way of.

mod accessibility;
mod broken_image;
mod broken_link;
mod common;
mod console_error;
pub mod js_scripts;
mod network_error;
mod responsive;

pub use accessibility::run as run_accessibility;
pub use broken_image::run as run_broken_image;
pub use broken_link::run as run_broken_link;
pub use console_error::run as run_console_error;
pub use network_error::run as run_network_error;
pub use responsive::run as run_responsive;
