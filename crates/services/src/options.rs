use crate::anonymity::DEFAULT_MASK_NODE_BUDGET;

/// Behaviour switches the services read at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumOptions {
    /// Keep the poster's IP on the stored post.
    pub track_ip_per_post: bool,
    /// Root categories per listing page.
    pub categories_per_page: usize,
    /// Children kept under each root category in a listing.
    pub sub_categories_per_page: usize,
    /// Category nodes visited when masking teasers.
    pub mask_node_budget: usize,
}

impl Default for ForumOptions {
    fn default() -> Self {
        Self {
            track_ip_per_post: false,
            categories_per_page: 50,
            sub_categories_per_page: 10,
            mask_node_budget: DEFAULT_MASK_NODE_BUDGET,
        }
    }
}
