use super::*;

/// Number of hits an endpoint received over a queried range.
///
/// Computed per query and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct ViewStats {
    pub app: String,
    pub uri: String,
    pub hits: u64,
}
