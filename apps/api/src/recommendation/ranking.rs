//! Scorer/Ranker — orders admitted items and enforces the size cap.

use crate::recommendation::policy::Recommendation;

/// Sorts by descending score and truncates to the variant's cap.
///
/// `sort_by` is stable, so equal scores keep the order the model gave them.
/// No secondary key is introduced.
pub fn rank<T: Recommendation>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(|a, b| b.score().total_cmp(&a.score()));
    items.truncate(T::policy().max_items);
    items
}
