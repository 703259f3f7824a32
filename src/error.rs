/// Errors raised while building an organ or decoding external input.
///
/// Everything that can go wrong at run time inside a tick is a boundary
/// condition and is ignored instead of reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrganError {
	#[error("grid side length must be positive, got {side}")]
	InvalidGridSize { side: usize },

	#[error("bad substance index {index}")]
	InvalidSubstance { index: u8 },

	#[error("invalid parameter `{name}`: {reason}")]
	InvalidParameter { name: &'static str, reason: String },
}
