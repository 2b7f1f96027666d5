#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
	#[error("node not found: {id}")]
	NodeNotFound { id: String },
	#[error("edge not found: {id}")]
	EdgeNotFound { id: String },
	#[error("edge {id} is hidden: {from} or {to} is collapsed")]
	EdgeHidden { id: String, from: String, to: String },
	#[error("no document section matches {id}")]
	SectionNotFound { id: String },
	#[error("clipboard unavailable: {reason}")]
	Clipboard { reason: String },
	#[error("invalid graph data: {reason}")]
	InvalidData { reason: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
