//! Query engine: filters and sorting over a loaded list.
//!
//! Filters keep stored order. Sorting is stable in both directions.
//!
//! # Missing completion timestamps
//!
//! A missing `completed_at` is the lowest key when sorting ascending and the
//! highest key when sorting descending, so items that were never completed
//! always come first.

use crate::error::ValidationError;
use crate::types::{Group, TodoItem, TodoList};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Completion status used by the status filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    /// Items with `completed = true`
    Completed,
    /// Items with `completed = false`
    Pending,
}

impl StatusFilter {
    /// Returns `true` if `item` has this status
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::Completed => item.completed,
            Self::Pending => !item.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// Field to sort by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    /// `id`
    Id,
    /// `title`
    Title,
    /// `created_at`
    CreatedAt,
    /// `completed`
    Completed,
    /// `completed_at`
    CompletedAt,
    /// `group`
    Group,
}

impl SortField {
    /// Wire name of the field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::CreatedAt => "created_at",
            Self::Completed => "completed",
            Self::CompletedAt => "completed_at",
            Self::Group => "group",
        }
    }

    /// Compares two items on this field before the direction is applied.
    ///
    /// Only missing timestamps depend on `order`.
    fn compare(self, a: &TodoItem, b: &TodoItem, order: SortOrder) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Title => a.title.cmp(&b.title),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Completed => a.completed.cmp(&b.completed),
            Self::Group => a.group.cmp(&b.group),
            Self::CompletedAt => match (a.completed_at, b.completed_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (None, None) => Ordering::Equal,
                // Missing sorts lowest ascending and highest descending
                (None, Some(_)) => match order {
                    SortOrder::Asc => Ordering::Less,
                    SortOrder::Desc => Ordering::Greater,
                },
                (Some(_), None) => match order {
                    SortOrder::Asc => Ordering::Greater,
                    SortOrder::Desc => Ordering::Less,
                },
            },
        }
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "created_at" => Ok(Self::CreatedAt),
            "completed" => Ok(Self::Completed),
            "completed_at" => Ok(Self::CompletedAt),
            "group" => Ok(Self::Group),
            other => Err(ValidationError::InvalidSortField(other.to_string())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::InvalidSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Field and direction for [`sorted`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by
    pub field: SortField,
    /// Direction
    pub order: SortOrder,
}

impl SortSpec {
    /// Creates a sort specification
    #[must_use]
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Parses wire names, falling back to the defaults for absent values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSortField`] or
    /// [`ValidationError::InvalidSortOrder`] for unknown names.
    pub fn parse(sort_by: Option<&str>, order: Option<&str>) -> Result<Self, ValidationError> {
        let defaults = Self::default();
        Ok(Self {
            field: sort_by.map(SortField::from_str).transpose()?.unwrap_or(defaults.field),
            order: order.map(SortOrder::from_str).transpose()?.unwrap_or(defaults.order),
        })
    }

    /// Compares two items under this specification
    #[must_use]
    pub fn compare(&self, a: &TodoItem, b: &TodoItem) -> Ordering {
        let ordering = self.field.compare(a, b, self.order);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl Default for SortSpec {
    /// Newest first
    fn default() -> Self {
        Self::new(SortField::CreatedAt, SortOrder::Desc)
    }
}

/// Items whose group equals `group`, in stored order
#[must_use]
pub fn filter_by_group(list: &TodoList, group: Group) -> Vec<TodoItem> {
    list.iter().filter(|item| item.group == group).cloned().collect()
}

/// Items with the given completion status, in stored order
#[must_use]
pub fn filter_by_status(list: &TodoList, status: StatusFilter) -> Vec<TodoItem> {
    list.iter().filter(|item| status.matches(item)).cloned().collect()
}

/// All items ordered by `spec`; ties keep stored order
#[must_use]
pub fn sorted(list: &TodoList, spec: SortSpec) -> Vec<TodoItem> {
    let mut items = list.items().to_vec();
    items.sort_by(|a, b| spec.compare(a, b));
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn item(id: u64, title: &str) -> TodoItem {
        TodoItem::new(
            TodoId::new(id),
            title.to_string(),
            None,
            Group::default(),
            base() + Duration::minutes(i64::try_from(id).unwrap()),
        )
    }

    fn titles(items: &[TodoItem]) -> Vec<&str> {
        items.iter().map(|t| t.title.as_str()).collect()
    }

    fn ids(items: &[TodoItem]) -> Vec<u64> {
        items.iter().map(|t| t.id.value()).collect()
    }

    #[test]
    fn sorts_titles_ascending() {
        let list: TodoList = vec![item(1, "Charlie"), item(2, "Alice"), item(3, "Bob")].into();
        let spec = SortSpec::parse(Some("title"), Some("asc")).unwrap();
        let out = sorted(&list, spec);
        assert_eq!(titles(&out), vec!["Alice", "Bob", "Charlie"]);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let list: TodoList = vec![item(1, "First"), item(2, "Second"), item(3, "Third")].into();
        let out = sorted(&list, SortSpec::default());
        assert_eq!(titles(&out), vec!["Third", "Second", "First"]);
    }

    #[test]
    fn group_sort_ascending() {
        let mut a = item(1, "a");
        a.group = Group::new(3).unwrap();
        let mut b = item(2, "b");
        b.group = Group::new(1).unwrap();
        let mut c = item(3, "c");
        c.group = Group::new(2).unwrap();
        let list: TodoList = vec![a, b, c].into();

        let out = sorted(&list, SortSpec::new(SortField::Group, SortOrder::Asc));
        let groups: Vec<u8> = out.iter().map(|t| t.group.value()).collect();
        assert_eq!(groups, vec![1, 2, 3]);
    }

    #[test]
    fn missing_completed_at_comes_first_in_both_directions() {
        let mut done_early = item(1, "early");
        done_early.set_completed(true, base() + Duration::hours(1));
        let pending = item(2, "pending");
        let mut done_late = item(3, "late");
        done_late.set_completed(true, base() + Duration::hours(2));
        let list: TodoList = vec![done_early, pending, done_late].into();

        let asc = sorted(&list, SortSpec::new(SortField::CompletedAt, SortOrder::Asc));
        assert_eq!(titles(&asc), vec!["pending", "early", "late"]);

        let desc = sorted(&list, SortSpec::new(SortField::CompletedAt, SortOrder::Desc));
        assert_eq!(titles(&desc), vec!["pending", "late", "early"]);
    }

    #[test]
    fn ties_keep_stored_order_descending() {
        let list: TodoList = vec![item(1, "same"), item(2, "same"), item(3, "same")].into();
        let out = sorted(&list, SortSpec::new(SortField::Title, SortOrder::Desc));
        assert_eq!(ids(&out), vec![1, 2, 3]);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(
            SortSpec::parse(Some("invalid_field"), None),
            Err(ValidationError::InvalidSortField("invalid_field".into()))
        );
        assert_eq!(
            SortSpec::parse(Some("title"), Some("sideways")),
            Err(ValidationError::InvalidSortOrder("sideways".into()))
        );
        assert_eq!(SortSpec::parse(None, None), Ok(SortSpec::default()));
    }

    #[test]
    fn status_filter() {
        let mut done = item(1, "done");
        done.set_completed(true, base());
        let list: TodoList = vec![done, item(2, "open"), item(3, "open too")].into();

        assert_eq!(ids(&filter_by_status(&list, StatusFilter::Completed)), vec![1]);
        assert_eq!(ids(&filter_by_status(&list, StatusFilter::Pending)), vec![2, 3]);
        assert_eq!(
            "invalid".parse::<StatusFilter>(),
            Err(ValidationError::InvalidStatus("invalid".into()))
        );
    }

    #[test]
    fn group_filter_with_no_match_is_empty() {
        let list: TodoList = vec![item(1, "a"), item(2, "b")].into();
        assert!(filter_by_group(&list, Group::new(5).unwrap()).is_empty());
        assert_eq!(ids(&filter_by_group(&list, Group::default())), vec![1, 2]);
    }

    fn arb_item() -> impl Strategy<Value = TodoItem> {
        (1u64..1000, "[a-z]{0,6}", 1i64..=9, 0i64..500, proptest::option::of(0i64..500)).prop_map(
            |(id, title, group, created, completed)| {
                let mut item = TodoItem::new(
                    TodoId::new(id),
                    title,
                    None,
                    Group::new(group).unwrap_or_default(),
                    base() + Duration::minutes(created),
                );
                if let Some(minutes) = completed {
                    item.set_completed(true, base() + Duration::minutes(minutes));
                }
                item
            },
        )
    }

    fn arb_spec() -> impl Strategy<Value = SortSpec> {
        let field = prop_oneof![
            Just(SortField::Id),
            Just(SortField::Title),
            Just(SortField::CreatedAt),
            Just(SortField::Completed),
            Just(SortField::CompletedAt),
            Just(SortField::Group),
        ];
        let order = prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)];
        (field, order).prop_map(|(field, order)| SortSpec::new(field, order))
    }

    proptest! {
        #[test]
        fn sort_keeps_every_item_and_is_ordered(
            items in proptest::collection::vec(arb_item(), 0..30),
            spec in arb_spec(),
        ) {
            let list: TodoList = items.clone().into();
            let out = sorted(&list, spec);

            prop_assert_eq!(out.len(), items.len());
            for item in &items {
                prop_assert!(out.contains(item));
            }
            for pair in out.windows(2) {
                prop_assert_ne!(spec.compare(&pair[0], &pair[1]), Ordering::Greater);
            }
        }
    }
}
