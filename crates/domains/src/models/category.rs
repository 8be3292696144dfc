use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::ids::CategoryId;
use super::teaser::Teaser;

/// A category node. `children` and `teaser` are filled in when a listing
/// is assembled; the stored record leaves them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub cid: CategoryId,
    pub parent_cid: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub order: i64,
    pub topic_count: u64,
    pub post_count: u64,
    #[serde(default)]
    pub teaser: Option<Teaser>,
    #[serde(default)]
    pub children: Vec<Category>,
}

/// Builds the category tree below `root` from a flat list. Siblings are
/// ordered by `order`, then by cid. Nodes not reachable from `root` are dropped.
pub fn build_tree(categories: Vec<Category>, root: CategoryId) -> Vec<Category> {
    let mut by_parent: HashMap<CategoryId, Vec<Category>> = HashMap::new();
    for category in categories {
        by_parent.entry(category.parent_cid).or_default().push(category);
    }

    // Breadth-first order of every parent reachable from the root
    let mut parents = vec![root];
    let mut seen = HashSet::from([root]);
    let mut next = 0;
    while let Some(parent) = parents.get(next).copied() {
        next += 1;
        if let Some(children) = by_parent.get(&parent) {
            for child in children {
                if seen.insert(child.cid) {
                    parents.push(child.cid);
                }
            }
        }
    }

    // Deepest levels first, so every child list is complete before it is attached
    let mut built: HashMap<CategoryId, Vec<Category>> = HashMap::new();
    for parent in parents.iter().rev() {
        let mut level = by_parent.remove(parent).unwrap_or_default();
        level.sort_by_key(|c| (c.order, c.cid));
        for node in level.iter_mut() {
            node.children = built.remove(&node.cid).unwrap_or_default();
        }
        built.insert(*parent, level);
    }
    built.remove(&root).unwrap_or_default()
}
