//! Volume selection
//!
//! An empty list of wanted names selects every volume. Otherwise only
//! volumes whose name is listed are kept, in the provider's order. Wanted
//! names that match no volume are ignored.

use std::collections::HashSet;

use crate::models::Volume;

/// Filter `all_volumes` down to the ones named in `wanted_names`
pub fn select_volumes<S: AsRef<str>>(all_volumes: Vec<Volume>, wanted_names: &[S]) -> Vec<Volume> {
    if wanted_names.is_empty() {
        return all_volumes;
    }

    let wanted: HashSet<&str> = wanted_names.iter().map(|name| name.as_ref()).collect();

    all_volumes
        .into_iter()
        .filter(|v| wanted.contains(v.name.as_str()))
        .collect()
}
