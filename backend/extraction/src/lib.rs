//! Card extraction — turn a business card photo into structured contact
//! fields using a vision LLM.

pub mod parse;
pub mod vision;

pub use parse::{ExtractedFields, parse_json_blob};
pub use vision::{CardExtractor, OpenAiVision};
