use std::collections::HashSet;
use std::fmt;

use crate::api::{ApiDescription, OperationId};
use crate::naming::{DEFAULT_MODULE, module_name};

/// Name of an API group: a declared tag, or the bucket of untagged operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupName {
    Untagged,
    Named(String),
}

impl GroupName {
    /// Sort key; the untagged group sorts as the empty string, i.e. first.
    pub fn sort_key(&self) -> &str {
        match self {
            GroupName::Untagged => "",
            GroupName::Named(tag) => tag,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            GroupName::Untagged => None,
            GroupName::Named(tag) => Some(tag),
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupName::Untagged => f.write_str("<untagged>"),
            GroupName::Named(tag) => f.write_str(tag),
        }
    }
}

/// A group of operations sharing one client module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGroup {
    pub name: GroupName,
    pub operations: Vec<OperationId>,
}

impl ApiGroup {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Partition every operation of `api` into groups.
///
/// Each tag becomes one group in the parser's order. An operation listed under
/// several tags stays in the first group that claimed it. Operations that no
/// tag reaches land in the untagged group; with no tags at all, that group
/// holds every operation. Tags without operations are kept as empty groups.
///
/// Groups are keyed by [`module_name`], since that is what every emitted path
/// is derived from. A tag whose module name is already taken (`orders` after
/// `Orders`) appends its operations to the earlier group, and a tag that maps
/// to the default module takes the untagged operations.
///
/// The result is sorted by [`GroupName::sort_key`]; emitters skip empty groups.
pub fn group_operations<A: ApiDescription + ?Sized>(api: &A) -> Vec<ApiGroup> {
    let mut groups: Vec<ApiGroup> = Vec::new();
    let mut seen: HashSet<OperationId> = HashSet::new();

    for tag in api.apis() {
        let operations: Vec<OperationId> = api
            .handlers_by_tag(&tag)
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        let name = GroupName::Named(tag);
        let module = module_name(&name);
        match groups.iter_mut().find(|g| module_name(&g.name) == module) {
            Some(existing) => {
                log::debug!("tag {name} shares module {module} with {}", existing.name);
                existing.operations.extend(operations);
            }
            None => groups.push(ApiGroup { name, operations }),
        }
    }

    let leftovers: Vec<OperationId> = api
        .operation_ids()
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    if let Some(default) = groups.iter_mut().find(|g| module_name(&g.name) == DEFAULT_MODULE) {
        default.operations.extend(leftovers);
    } else if !leftovers.is_empty() || groups.is_empty() {
        log::debug!("{} operations fall into the untagged group", leftovers.len());
        groups.push(ApiGroup {
            name: GroupName::Untagged,
            operations: leftovers,
        });
    }

    groups.sort_by(|a, b| a.name.sort_key().cmp(b.name.sort_key()));
    groups
}

/// Groups that have at least one operation.
pub fn non_empty(groups: &[ApiGroup]) -> impl Iterator<Item = &ApiGroup> {
    groups.iter().filter(|g| !g.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Stand-in for a parser whose tag buckets can overlap arbitrarily.
    struct FakeApi {
        tags: Vec<&'static str>,
        buckets: HashMap<&'static str, Vec<usize>>,
        total: usize,
    }

    impl ApiDescription for FakeApi {
        fn apis(&self) -> Vec<String> {
            self.tags.iter().map(|t| t.to_string()).collect()
        }

        fn operation_ids(&self) -> Vec<OperationId> {
            (0..self.total).map(id).collect()
        }

        fn handlers_by_tag(&self, tag: &str) -> Vec<OperationId> {
            self.buckets
                .get(tag)
                .map(|ops| ops.iter().copied().map(id).collect())
                .unwrap_or_default()
        }
    }

    fn id(index: usize) -> OperationId {
        // Handles are opaque outside the crate; tests build them directly.
        OperationId(index)
    }

    fn fake(tags: &[&'static str], buckets: &[(&'static str, &[usize])], total: usize) -> FakeApi {
        FakeApi {
            tags: tags.to_vec(),
            buckets: buckets.iter().map(|(t, ops)| (*t, ops.to_vec())).collect(),
            total,
        }
    }

    fn names(groups: &[ApiGroup]) -> Vec<String> {
        groups.iter().map(|g| g.name.to_string()).collect()
    }

    #[test]
    fn test_no_tags_yields_single_untagged_group() {
        let groups = group_operations(&fake(&[], &[], 3));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, GroupName::Untagged);
        assert_eq!(groups[0].operations, vec![id(0), id(1), id(2)]);
    }

    #[test]
    fn test_untagged_leftovers_sort_first() {
        let api = fake(&["Users", "Orders"], &[("Users", &[0]), ("Orders", &[1, 2])], 4);
        let groups = group_operations(&api);
        assert_eq!(names(&groups), ["<untagged>", "Orders", "Users"]);
        assert_eq!(groups[0].operations, vec![id(3)]);
    }

    #[test]
    fn test_first_owning_group_keeps_shared_operation() {
        let api = fake(&["Users", "Admin"], &[("Users", &[0, 1]), ("Admin", &[1, 2])], 3);
        let groups = group_operations(&api);
        let admin = groups.iter().find(|g| g.name.tag() == Some("Admin")).unwrap();
        let users = groups.iter().find(|g| g.name.tag() == Some("Users")).unwrap();
        assert_eq!(users.operations, vec![id(0), id(1)]);
        assert_eq!(admin.operations, vec![id(2)]);
        assert!(groups.iter().all(|g| g.name != GroupName::Untagged));
    }

    #[test]
    fn test_empty_tag_kept_but_skipped_by_non_empty() {
        let api = fake(&["Empty", "Full"], &[("Full", &[0])], 1);
        let groups = group_operations(&api);
        assert_eq!(names(&groups), ["Empty", "Full"]);
        assert_eq!(non_empty(&groups).count(), 1);
    }

    #[test]
    fn test_tags_with_the_same_module_share_a_group() {
        let api = fake(
            &["Orders", "Users", "orders"],
            &[("Orders", &[0, 2]), ("Users", &[1]), ("orders", &[3, 2])],
            4,
        );
        let groups = group_operations(&api);
        assert_eq!(names(&groups), ["Orders", "Users"]);
        assert_eq!(groups[0].operations, vec![id(0), id(2), id(3)]);
    }

    #[test]
    fn test_default_tag_takes_untagged_operations() {
        let api = fake(&["Default", "Users"], &[("Default", &[0]), ("Users", &[1])], 3);
        let groups = group_operations(&api);
        assert_eq!(names(&groups), ["Default", "Users"]);
        assert_eq!(groups[0].operations, vec![id(0), id(2)]);
    }

    #[test]
    fn test_every_operation_appears_exactly_once() {
        let api = fake(
            &["A", "B", "C"],
            &[("A", &[0, 3, 3]), ("B", &[3, 4, 0]), ("C", &[5])],
            8,
        );
        let groups = group_operations(&api);
        let mut all: Vec<OperationId> = groups.iter().flat_map(|g| g.operations.clone()).collect();
        all.sort();
        assert_eq!(all, (0..8).map(id).collect::<Vec<_>>());
    }
}
