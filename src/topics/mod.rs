// Topics — lexical similarity, the classifier capability, and topic
// extraction/comparison built on top of it.

pub mod classifier;
pub mod ollama;
pub mod similarity;
pub mod traits;
