// # Line Model
//
// Typed representation of a hosts file that renders back to the original
// bytes for every line the engine has not touched.

pub mod address;
pub mod line;
pub mod parser;
pub mod render;

pub use address::IpFamily;
pub use line::{AddressEntry, Line, LineKind};
pub use parser::{parse_file, parse_str};
pub use render::render;
