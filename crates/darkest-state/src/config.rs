//! State manager configuration.

use std::path::{Path, PathBuf};

/// Where the state lives and who starts out as an operator.
#[derive(Debug, Clone)]
pub struct StateConfig {
    /// The state file. Written atomically through a sibling temp file.
    pub path: PathBuf,

    /// Characters marked as operators when no state file exists yet.
    pub operators: Vec<String>,
}

impl StateConfig {
    /// Sets the state file path.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the seed operator list.
    pub fn operators<S: Into<String>>(
        mut self,
        operators: impl IntoIterator<Item = S>,
    ) -> Self {
        self.operators = operators.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("state.json"),
            operators: vec!["Aller the Fox".to_string(), "MilkyBun".to_string()],
        }
    }
}
