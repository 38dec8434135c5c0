//! Three-way comparison of a local `.env` map against the Platform's variables

use serde::Serialize;

use crate::envsync::dotenv::EnvMap;

/// Changes needed to bring a file and the Platform in line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    /// Keys only in the file; file values
    pub add_to_remote: EnvMap,

    /// Keys on both sides with different values; file values
    pub update_in_remote: EnvMap,

    /// Keys only on the Platform; Platform values
    pub add_to_file: EnvMap,

    /// Same keys as `update_in_remote`; Platform values
    pub update_in_file: EnvMap,
}

impl SyncPlan {
    /// Classify every key of `file` and `remote`
    pub fn diff(file: &EnvMap, remote: &EnvMap) -> Self {
        let mut plan = SyncPlan::default();
        for (key, value) in file {
            match remote.get(key) {
                None => {
                    plan.add_to_remote.insert(key.clone(), value.clone());
                }
                Some(remote_value) if remote_value != value => {
                    plan.update_in_remote.insert(key.clone(), value.clone());
                    plan.update_in_file
                        .insert(key.clone(), remote_value.clone());
                }
                Some(_) => {}
            }
        }
        for (key, value) in remote {
            if !file.contains_key(key) {
                plan.add_to_file.insert(key.clone(), value.clone());
            }
        }
        plan
    }

    /// Variables to send in the bulk update
    pub fn remote_changes(&self) -> EnvMap {
        self.add_to_remote
            .iter()
            .chain(self.update_in_remote.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The Platform's variables once `remote_changes` are applied
    pub fn remote_after(&self, remote: &EnvMap) -> EnvMap {
        let mut merged = remote.clone();
        merged.extend(self.remote_changes());
        merged
    }

    pub fn has_remote_changes(&self) -> bool {
        !self.add_to_remote.is_empty() || !self.update_in_remote.is_empty()
    }

    pub fn has_file_changes(&self) -> bool {
        !self.add_to_file.is_empty() || !self.update_in_file.is_empty()
    }

    /// Total number of changes across both sides
    pub fn total_changes(&self) -> usize {
        self.add_to_remote.len()
            + self.update_in_remote.len()
            + self.add_to_file.len()
            + self.update_in_file.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_three_way_sets() {
        let remote = map(&[("K1", "v1"), ("K2", "old")]);
        let file = map(&[("K2", "new"), ("K3", "v3")]);

        let plan = SyncPlan::diff(&file, &remote);
        assert_eq!(plan.add_to_remote, map(&[("K3", "v3")]));
        assert_eq!(plan.update_in_remote, map(&[("K2", "new")]));
        assert_eq!(plan.add_to_file, map(&[("K1", "v1")]));
        assert_eq!(plan.update_in_file, map(&[("K2", "old")]));
        assert_eq!(plan.total_changes(), 4);

        assert_eq!(plan.remote_changes(), map(&[("K2", "new"), ("K3", "v3")]));
        assert_eq!(
            plan.remote_after(&remote),
            map(&[("K1", "v1"), ("K2", "new"), ("K3", "v3")])
        );
    }

    #[test]
    fn test_identical_maps_have_no_changes() {
        let vars = map(&[("A", "1"), ("B", "2")]);
        let plan = SyncPlan::diff(&vars, &vars);
        assert_eq!(plan.total_changes(), 0);
        assert!(!plan.has_remote_changes());
        assert!(!plan.has_file_changes());
    }
}
